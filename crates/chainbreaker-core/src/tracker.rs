//! The habit tracker facade.
//!
//! [`HabitTracker`] owns the registry, ledger, progression, unlocked set
//! and quote rotation, and wires the mutation flow: a toggle updates the
//! ledger, refreshes cached streaks, applies the XP delta, runs an
//! achievement pass, and marks the document dirty for the debounced write.
//! Every mutation is synchronous and runs to completion before any derived
//! recomputation; reads always see the in-memory state, landed write or
//! not.

use chrono::{DateTime, Utc};
use std::time::Instant;

use crate::achievement::{self, UnlockNotice, UnlockedSet};
use crate::calendar::DayKey;
use crate::error::{StorageError, ValidationError};
use crate::habit::{HabitPatch, HabitRegistry, NewHabit};
use crate::ledger::{CompletionLedger, ToggleOutcome};
use crate::progression::Progression;
use crate::quotes::QuoteRotation;
use crate::stats::{compute_snapshot, StatsSnapshot};
use crate::storage::{
    document::load_document, Config, KeyValueStore, LoadOutcome, PersistedDocument, SaveScheduler,
    DATA_KEY,
};
use crate::streak::refresh_cached_streaks;

pub struct HabitTracker {
    registry: HabitRegistry,
    ledger: CompletionLedger,
    progression: Progression,
    unlocked: UnlockedSet,
    notices: Vec<UnlockNotice>,
    quote: QuoteRotation,
    config: Config,
    scheduler: SaveScheduler,
}

impl HabitTracker {
    /// Fresh tracker with the built-in default habits.
    pub fn new(config: Config) -> Self {
        Self::with_defaults_at(config, Utc::now(), DayKey::today())
    }

    fn with_defaults_at(config: Config, now: DateTime<Utc>, _today: DayKey) -> Self {
        let scheduler = SaveScheduler::new(config.persistence.debounce_ms);
        Self {
            registry: HabitRegistry::default_set(now),
            ledger: CompletionLedger::new(),
            progression: Progression::default(),
            unlocked: UnlockedSet::new(),
            notices: Vec::new(),
            quote: QuoteRotation::default(),
            config,
            scheduler,
        }
    }

    /// Rebuild from a persisted document.
    ///
    /// Legacy habits are normalized, cached streaks refreshed, the level
    /// re-derived from `xp`, and an achievement pass run against the
    /// restored state.
    pub fn from_document(
        doc: PersistedDocument,
        config: Config,
        now: DateTime<Utc>,
        today: DayKey,
    ) -> Self {
        // An absent habit list re-seeds the defaults; an empty one is a
        // deliberate delete-all and stays empty.
        let mut registry = match doc.habits {
            Some(habits) => HabitRegistry::from_habits(habits),
            None => HabitRegistry::default_set(now),
        };
        registry.normalize(&doc.completions, now);
        refresh_cached_streaks(&mut registry, &doc.completions, today);

        let mut tracker = Self {
            registry,
            ledger: doc.completions,
            progression: Progression::from_xp(doc.xp),
            unlocked: UnlockedSet::from_ids(doc.achievements),
            notices: Vec::new(),
            quote: QuoteRotation::from_parts(doc.quote_index, doc.quote_day_key),
            scheduler: SaveScheduler::new(config.persistence.debounce_ms),
            config,
        };
        tracker.run_achievement_pass(today, now);
        tracker
    }

    /// Load from the store, falling back to defaults on anything but a
    /// clean read: timeout, store failure, absent or malformed document.
    pub async fn load<S: KeyValueStore>(store: &S, config: Config) -> (Self, LoadOutcome) {
        let now = Utc::now();
        let today = DayKey::today();
        let (doc, outcome) = load_document(store, config.persistence.load_timeout_ms).await;
        let mut tracker = match doc {
            Some(doc) => Self::from_document(doc, config, now, today),
            None => Self::with_defaults_at(config, now, today),
        };
        tracker.rotate_quote();
        (tracker, outcome)
    }

    // --- mutations ---

    /// Toggle `habit_id` on `day` (today's key when `None`).
    pub fn toggle(
        &mut self,
        habit_id: &str,
        day: Option<DayKey>,
    ) -> Result<ToggleOutcome, ValidationError> {
        let today = DayKey::today();
        self.toggle_at(habit_id, day.unwrap_or(today), today, Utc::now())
    }

    /// Clock-explicit toggle. Only `today` is accepted; other days are a
    /// silent no-op reported through [`ToggleOutcome::Rejected`].
    pub fn toggle_at(
        &mut self,
        habit_id: &str,
        day: DayKey,
        today: DayKey,
        now: DateTime<Utc>,
    ) -> Result<ToggleOutcome, ValidationError> {
        if self.registry.get(habit_id).is_none() {
            return Err(ValidationError::UnknownHabit(habit_id.to_string()));
        }

        let outcome = self.ledger.toggle(habit_id, day, today);
        if let ToggleOutcome::Applied { now_complete } = outcome {
            refresh_cached_streaks(&mut self.registry, &self.ledger, today);
            self.progression
                .apply_toggle(now_complete, self.config.progression.xp_per_completion);
            self.run_achievement_pass(today, now);
            self.mark_dirty();
        }
        Ok(outcome)
    }

    pub fn add_habit(&mut self, data: NewHabit) -> Result<String, ValidationError> {
        self.add_habit_at(data, Utc::now(), DayKey::today())
    }

    pub fn add_habit_at(
        &mut self,
        data: NewHabit,
        now: DateTime<Utc>,
        today: DayKey,
    ) -> Result<String, ValidationError> {
        let id = self.registry.add(data, now)?.id.clone();
        self.run_achievement_pass(today, now);
        self.mark_dirty();
        Ok(id)
    }

    pub fn update_habit(&mut self, id: &str, patch: HabitPatch) -> Result<(), ValidationError> {
        self.registry.update(id, patch)?;
        self.mark_dirty();
        Ok(())
    }

    /// Remove the habit and cascade its ledger entries.
    ///
    /// Unconditional once invoked; user confirmation is the caller's
    /// concern.
    pub fn remove_habit(&mut self, id: &str) -> Result<(), ValidationError> {
        self.remove_habit_at(id, DayKey::today(), Utc::now())
    }

    pub fn remove_habit_at(
        &mut self,
        id: &str,
        today: DayKey,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        self.registry
            .remove(id)
            .ok_or_else(|| ValidationError::UnknownHabit(id.to_string()))?;
        self.ledger.remove_habit(id);
        refresh_cached_streaks(&mut self.registry, &self.ledger, today);
        self.run_achievement_pass(today, now);
        self.mark_dirty();
        Ok(())
    }

    /// Re-roll the quote of the day if the stored day-key is stale.
    pub fn rotate_quote(&mut self) {
        self.rotate_quote_at(DayKey::today(), &mut rand::thread_rng());
    }

    pub fn rotate_quote_at<R: rand::Rng>(&mut self, today: DayKey, rng: &mut R) {
        if !self.config.quotes.daily_rotation {
            return;
        }
        if self.quote.rotate(today, rng) {
            self.mark_dirty();
        }
    }

    // --- reads ---

    pub fn stats(&self) -> StatsSnapshot {
        self.stats_at(DayKey::today())
    }

    pub fn stats_at(&self, today: DayKey) -> StatsSnapshot {
        compute_snapshot(&self.registry, &self.ledger, today)
    }

    pub fn registry(&self) -> &HabitRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &CompletionLedger {
        &self.ledger
    }

    pub fn progression(&self) -> Progression {
        self.progression
    }

    pub fn unlocked(&self) -> &UnlockedSet {
        &self.unlocked
    }

    /// Unlock notices still within their display window.
    pub fn active_notices(&self, now: DateTime<Utc>) -> Vec<&UnlockNotice> {
        self.notices.iter().filter(|n| n.is_active(now)).collect()
    }

    pub fn quote_of_the_day(&self) -> &'static str {
        self.quote.quote()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_dirty(&self) -> bool {
        self.scheduler.is_dirty()
    }

    // --- persistence ---

    pub fn to_document(&self, now: DateTime<Utc>) -> PersistedDocument {
        PersistedDocument {
            completions: self.ledger.clone(),
            habits: Some(self.registry.iter().cloned().collect()),
            achievements: self.unlocked.iter().map(str::to_string).collect(),
            level: self.progression.level,
            xp: self.progression.xp,
            quote_index: Some(self.quote.index),
            quote_day_key: self.quote.day_key,
            last_updated: Some(now),
        }
    }

    /// Write the document now, regardless of the debounce window.
    pub async fn flush<S: KeyValueStore>(&mut self, store: &S) -> Result<(), StorageError> {
        let doc = self.to_document(Utc::now());
        let raw = serde_json::to_string(&doc).map_err(|e| StorageError::WriteFailed {
            key: DATA_KEY.to_string(),
            message: e.to_string(),
        })?;
        store.set(DATA_KEY, &raw).await?;
        self.scheduler.clear();
        Ok(())
    }

    /// Write only if dirty and the debounce window has elapsed.
    pub async fn flush_if_due<S: KeyValueStore>(
        &mut self,
        store: &S,
    ) -> Result<bool, StorageError> {
        if !self.scheduler.due(Instant::now()) {
            return Ok(false);
        }
        self.flush(store).await?;
        Ok(true)
    }

    /// Clear the stored document and restore default in-memory state.
    ///
    /// The in-memory reset happens even when the store write fails.
    pub async fn reset<S: KeyValueStore>(&mut self, store: &S) -> Result<(), StorageError> {
        *self = Self::new(self.config.clone());
        store.set(DATA_KEY, "").await
    }

    fn run_achievement_pass(&mut self, today: DayKey, now: DateTime<Utc>) {
        let stats = compute_snapshot(&self.registry, &self.ledger, today);
        self.notices.retain(|n| n.is_active(now));
        let fresh = achievement::evaluate(&stats, &self.ledger, &mut self.unlocked, now);
        self.notices.extend(fresh);
    }

    fn mark_dirty(&mut self) {
        self.scheduler.mark_dirty(Instant::now());
    }
}
