//! TOML-based application configuration.
//!
//! Stores the engine tunables:
//! - XP granted per completion
//! - persistence debounce window and load timeout
//! - quote rotation on/off
//!
//! Configuration is stored at `~/.config/chainbreaker/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Progression tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionConfig {
    #[serde(default = "default_xp_per_completion")]
    pub xp_per_completion: u32,
}

/// Persistence tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Mutations within this window collapse into one durable write.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Initial load proceeds with defaults after this long.
    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,
}

/// Quote-of-the-day tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotesConfig {
    #[serde(default = "default_true")]
    pub daily_rotation: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/chainbreaker/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub progression: ProgressionConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub quotes: QuotesConfig,
}

fn default_xp_per_completion() -> u32 {
    crate::progression::DEFAULT_XP_PER_COMPLETION
}
fn default_debounce_ms() -> u64 {
    300
}
fn default_load_timeout_ms() -> u64 {
    2_000
}
fn default_true() -> bool {
    true
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_per_completion: default_xp_per_completion(),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            load_timeout_ms: default_load_timeout_ms(),
        }
    }
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            daily_rotation: true,
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error. Never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as a string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let pointer = format!("/{}", key.replace('.', "/"));
        match json.pointer(&pointer)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and save.
    ///
    /// The value is parsed against the existing field's type; unknown keys
    /// are rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        let pointer = format!("/{}", key.replace('.', "/"));
        let slot = json
            .pointer_mut(&pointer)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        *slot = match slot {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse().map_err(|_| {
                ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("cannot parse '{value}' as bool"),
                }
            })?),
            serde_json::Value::Number(_) => {
                let n: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("cannot parse '{value}' as number"),
                })?;
                serde_json::Value::Number(n.into())
            }
            _ => serde_json::Value::String(value.to_string()),
        };

        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn defaults_match_engine_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.progression.xp_per_completion, 10);
        assert_eq!(cfg.persistence.debounce_ms, 300);
        assert_eq!(cfg.persistence.load_timeout_ms, 2_000);
        assert!(cfg.quotes.daily_rotation);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("[progression]\nxp_per_completion = 25\n").unwrap();
        assert_eq!(parsed.progression.xp_per_completion, 25);
        assert_eq!(parsed.persistence.debounce_ms, 300);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("progression.xp_per_completion").as_deref(), Some("10"));
        assert_eq!(cfg.get("quotes.daily_rotation").as_deref(), Some("true"));
        assert!(cfg.get("quotes.missing_key").is_none());
    }
}
