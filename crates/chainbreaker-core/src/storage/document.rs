//! The persisted document and the key/value store behind it.
//!
//! All state lives in one JSON document under a fixed key, behind an
//! asynchronous get/set pair. The in-memory tree is always authoritative;
//! durable writes are best-effort and debounced through [`SaveScheduler`].
//! Initial load is bounded by a timeout so a slow store can never block
//! startup -- the system proceeds with defaults instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::data_dir;
use crate::calendar::DayKey;
use crate::error::StorageError;
use crate::habit::Habit;
use crate::ledger::CompletionLedger;

/// The single key the document is stored under.
pub const DATA_KEY: &str = "chainbreaker-data";

/// Asynchronous key/value persistence contract.
///
/// `get` resolves to `None` for absent keys. Implementations are expected
/// to be best-effort durable; callers treat every failure as non-fatal.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed store: one file per key under the data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self { dir: data_dir()? })
    }

    /// Store rooted at a custom directory (tests).
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::write(self.key_path(key), value).map_err(|e| StorageError::WriteFailed {
            key: key.to_string(),
            message: e.to_string(),
        })
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn default_level() -> u32 {
    1
}

/// The one JSON document everything persists into.
///
/// Field names match the legacy camelCase layout so existing documents
/// keep loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedDocument {
    pub completions: CompletionLedger,
    /// `None` when the field is absent (a pre-habit-list document), which
    /// re-seeds the default set. An empty list is kept empty: the user
    /// deleted every habit on purpose.
    pub habits: Option<Vec<Habit>>,
    /// Unlocked achievement ids, in order of first unlock.
    pub achievements: Vec<String>,
    pub level: u32,
    pub xp: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_day_key: Option<DayKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for PersistedDocument {
    fn default() -> Self {
        Self {
            completions: CompletionLedger::new(),
            habits: None,
            achievements: Vec::new(),
            level: default_level(),
            xp: 0,
            quote_index: None,
            quote_day_key: None,
            last_updated: None,
        }
    }
}

/// How a bounded document load ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// No document stored (or an empty one, which a reset leaves behind).
    Missing,
    /// A document was stored but did not parse.
    Malformed,
    /// The store did not answer within the window.
    TimedOut,
    /// The store reported an error.
    Failed,
}

/// Fetch and parse the document, bounded by `timeout_ms`.
///
/// Never fails: every non-success path degrades to `None` with an outcome
/// the caller can report. An in-flight load result past the deadline is
/// discarded.
pub async fn load_document<S: KeyValueStore>(
    store: &S,
    timeout_ms: u64,
) -> (Option<PersistedDocument>, LoadOutcome) {
    let fetch = store.get(DATA_KEY);
    let value = match tokio::time::timeout(Duration::from_millis(timeout_ms), fetch).await {
        Err(_) => return (None, LoadOutcome::TimedOut),
        Ok(Err(_)) => return (None, LoadOutcome::Failed),
        Ok(Ok(value)) => value,
    };

    match value {
        None => (None, LoadOutcome::Missing),
        Some(raw) if raw.trim().is_empty() => (None, LoadOutcome::Missing),
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(doc) => (Some(doc), LoadOutcome::Loaded),
            Err(_) => (None, LoadOutcome::Malformed),
        },
    }
}

/// Debounced-write bookkeeping: mark dirty on every mutation, flush once
/// the window has elapsed since the latest mark, or on shutdown.
#[derive(Debug)]
pub struct SaveScheduler {
    window: Duration,
    dirty_since: Option<Instant>,
}

impl SaveScheduler {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window: Duration::from_millis(window_ms),
            dirty_since: None,
        }
    }

    /// Record a mutation. Restarts the debounce window.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.dirty_since = Some(now);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// Whether the window has elapsed since the latest mutation.
    pub fn due(&self, now: Instant) -> bool {
        self.dirty_since
            .is_some_and(|since| now.duration_since(since) >= self.window)
    }

    /// Clear after a successful flush.
    pub fn clear(&mut self) {
        self.dirty_since = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get(DATA_KEY).await.unwrap(), None);
        store.set(DATA_KEY, "{}").await.unwrap();
        assert_eq!(store.get(DATA_KEY).await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn file_store_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::with_dir(tmp.path().to_path_buf());

        assert_eq!(store.get(DATA_KEY).await.unwrap(), None);
        store.set(DATA_KEY, r#"{"xp":10}"#).await.unwrap();
        assert_eq!(
            store.get(DATA_KEY).await.unwrap().as_deref(),
            Some(r#"{"xp":10}"#)
        );
    }

    #[tokio::test]
    async fn load_reports_missing_for_absent_or_blank_documents() {
        let store = MemoryStore::new();
        let (doc, outcome) = load_document(&store, 1_000).await;
        assert!(doc.is_none());
        assert_eq!(outcome, LoadOutcome::Missing);

        store.set(DATA_KEY, "").await.unwrap();
        let (_, outcome) = load_document(&store, 1_000).await;
        assert_eq!(outcome, LoadOutcome::Missing);
    }

    #[tokio::test]
    async fn load_reports_malformed_documents() {
        let store = MemoryStore::new();
        store.set(DATA_KEY, "not json").await.unwrap();
        let (doc, outcome) = load_document(&store, 1_000).await;
        assert!(doc.is_none());
        assert_eq!(outcome, LoadOutcome::Malformed);
    }

    #[tokio::test]
    async fn load_parses_legacy_camel_case_documents() {
        let store = MemoryStore::new();
        let raw = r#"{
            "completions": {"2026-08-30": {"walk": true}},
            "habits": [{"id": "walk", "name": "Walk", "icon": "x",
                        "weeklyTarget": 7, "color": "c", "category": "health"}],
            "achievements": ["first_step"],
            "level": 1,
            "xp": 10,
            "quoteIndex": 4,
            "quoteDayKey": "2026-08-30"
        }"#;
        store.set(DATA_KEY, raw).await.unwrap();

        let (doc, outcome) = load_document(&store, 1_000).await;
        assert_eq!(outcome, LoadOutcome::Loaded);
        let doc = doc.unwrap();
        assert_eq!(doc.xp, 10);
        let habits = doc.habits.as_deref().unwrap();
        assert_eq!(habits.len(), 1);
        assert_eq!(habits[0].weekly_target, 7);
        // Legacy habit without createdAt stays unnormalized here.
        assert!(habits[0].created_at.is_none());
        assert_eq!(doc.quote_index, Some(4));
        assert_eq!(doc.achievements, ["first_step"]);
    }

    #[tokio::test]
    async fn absent_and_empty_habit_lists_parse_differently() {
        let store = MemoryStore::new();

        // No habits field at all: a pre-habit-list document.
        store.set(DATA_KEY, r#"{"xp": 5}"#).await.unwrap();
        let (doc, _) = load_document(&store, 1_000).await;
        assert_eq!(doc.unwrap().habits, None);

        // Explicitly empty list: every habit was deleted.
        store.set(DATA_KEY, r#"{"habits": []}"#).await.unwrap();
        let (doc, _) = load_document(&store, 1_000).await;
        assert_eq!(doc.unwrap().habits, Some(Vec::new()));
    }

    #[tokio::test]
    async fn load_times_out_against_a_stalled_store() {
        struct StalledStore;
        impl KeyValueStore for StalledStore {
            async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(None)
            }
            async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
                Ok(())
            }
        }

        // Paused time auto-advances to the next timer, so this returns
        // immediately with the timeout outcome.
        tokio::time::pause();
        let (doc, outcome) = load_document(&StalledStore, 2_000).await;
        assert!(doc.is_none());
        assert_eq!(outcome, LoadOutcome::TimedOut);
    }

    #[test]
    fn scheduler_debounces_repeated_marks() {
        let mut scheduler = SaveScheduler::new(300);
        let t0 = Instant::now();
        assert!(!scheduler.is_dirty());

        scheduler.mark_dirty(t0);
        assert!(scheduler.is_dirty());
        assert!(!scheduler.due(t0 + Duration::from_millis(100)));

        // A second mutation restarts the window.
        scheduler.mark_dirty(t0 + Duration::from_millis(200));
        assert!(!scheduler.due(t0 + Duration::from_millis(400)));
        assert!(scheduler.due(t0 + Duration::from_millis(500)));

        scheduler.clear();
        assert!(!scheduler.is_dirty());
    }

    #[test]
    fn document_serializes_camel_case() {
        let doc = PersistedDocument {
            xp: 30,
            level: 1,
            quote_index: Some(2),
            quote_day_key: DayKey::from_ymd(2026, 8, 30),
            ..Default::default()
        };
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"quoteIndex\":2"));
        assert!(json.contains("\"quoteDayKey\":\"2026-08-30\""));
        assert!(json.contains("\"completions\":{}"));
    }
}
