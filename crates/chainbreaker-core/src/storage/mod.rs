mod config;
pub mod document;

pub use config::{Config, PersistenceConfig, ProgressionConfig, QuotesConfig};
pub use document::{
    FileStore, KeyValueStore, LoadOutcome, MemoryStore, PersistedDocument, SaveScheduler, DATA_KEY,
};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/chainbreaker[-dev]/` based on CHAINBREAKER_ENV.
///
/// Set CHAINBREAKER_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CHAINBREAKER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("chainbreaker-dev")
    } else {
        base_dir.join("chainbreaker")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}
