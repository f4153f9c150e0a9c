//! # ChainBreaker Core Library
//!
//! Core engine for the ChainBreaker habit tracker: a habit registry, a
//! sparse completion ledger, and the pure derivation pass that turns the
//! two into streaks, aggregate statistics, achievement unlocks and an
//! XP/level progression. All UI surfaces are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Calendar**: explicit local-calendar [`DayKey`] values and
//!   Sunday-start week arithmetic
//! - **Registry + Ledger**: the only mutable state; a toggle may touch
//!   today's key only
//! - **Stats**: [`compute_snapshot`] is a pure recompute-on-demand pass,
//!   never persisted
//! - **Achievements**: monotonic unlocked-set; ids are never revoked
//! - **Storage**: one JSON document behind an async key/value pair, with
//!   debounced best-effort writes and a bounded initial load
//!
//! ## Key Components
//!
//! - [`HabitTracker`]: the mutation/read facade UI layers call into
//! - [`StatsSnapshot`]: the derived aggregate view
//! - [`KeyValueStore`]: the persistence collaborator contract

pub mod achievement;
pub mod calendar;
pub mod error;
pub mod habit;
pub mod ledger;
pub mod progression;
pub mod quotes;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod tracker;

pub use achievement::{AchievementDef, AchievementKind, UnlockNotice, UnlockedSet, CATALOG};
pub use calendar::DayKey;
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use habit::{Habit, HabitPatch, HabitRegistry, NewHabit};
pub use ledger::{CompletionLedger, ToggleOutcome};
pub use progression::Progression;
pub use quotes::{QuoteRotation, QUOTES};
pub use stats::{compute_snapshot, StatsSnapshot};
pub use storage::{Config, FileStore, KeyValueStore, LoadOutcome, MemoryStore, PersistedDocument};
pub use tracker::HabitTracker;
