//! Sparse day-by-day completion ledger.
//!
//! The ledger records, per local calendar day, which habits were marked
//! complete. Absence means "not completed"; toggling writes an explicit
//! boolean rather than deleting the key. Only the current day may be
//! mutated through [`CompletionLedger::toggle`] -- logging for the past or
//! the future is silently refused.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar::DayKey;

/// Per-day completion flags, keyed by habit id.
pub type DayEntries = BTreeMap<String, bool>;

/// The sparse day -> habit -> completed record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionLedger {
    days: BTreeMap<DayKey, DayEntries>,
}

/// Result of a toggle attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The flag was flipped; carries the new state.
    Applied { now_complete: bool },
    /// The requested day is not the current day; carries the unchanged state.
    Rejected { state: bool },
}

impl ToggleOutcome {
    /// The completion state after the attempt.
    pub fn state(self) -> bool {
        match self {
            ToggleOutcome::Applied { now_complete } => now_complete,
            ToggleOutcome::Rejected { state } => state,
        }
    }

    pub fn was_applied(self) -> bool {
        matches!(self, ToggleOutcome::Applied { .. })
    }
}

impl CompletionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the completion flag for `habit_id` on `day`.
    ///
    /// Only `today` is mutable: any other day is a no-op that reports the
    /// unchanged state. An absent entry flips to `true`.
    pub fn toggle(&mut self, habit_id: &str, day: DayKey, today: DayKey) -> ToggleOutcome {
        if day != today {
            return ToggleOutcome::Rejected {
                state: self.is_complete(day, habit_id),
            };
        }

        let entries = self.days.entry(day).or_default();
        let was = entries.get(habit_id).copied().unwrap_or(false);
        entries.insert(habit_id.to_string(), !was);
        ToggleOutcome::Applied { now_complete: !was }
    }

    pub fn is_complete(&self, day: DayKey, habit_id: &str) -> bool {
        self.days
            .get(&day)
            .and_then(|entries| entries.get(habit_id))
            .copied()
            .unwrap_or(false)
    }

    /// Whether any habit at all was completed on `day`.
    pub fn any_complete(&self, day: DayKey) -> bool {
        self.days
            .get(&day)
            .is_some_and(|entries| entries.values().any(|&done| done))
    }

    pub fn day_entries(&self, day: DayKey) -> Option<&DayEntries> {
        self.days.get(&day)
    }

    /// All recorded days in calendar order.
    pub fn days(&self) -> impl Iterator<Item = (DayKey, &DayEntries)> {
        self.days.iter().map(|(&day, entries)| (day, entries))
    }

    /// The first ever recorded day, if any.
    pub fn earliest_day(&self) -> Option<DayKey> {
        self.days.keys().next().copied()
    }

    /// Earliest day on which `habit_id` has a true completion.
    pub fn earliest_completion_for(&self, habit_id: &str) -> Option<DayKey> {
        self.days
            .iter()
            .find(|(_, entries)| entries.get(habit_id).copied().unwrap_or(false))
            .map(|(&day, _)| day)
    }

    /// Number of days on which `habit_id` has a true completion.
    pub fn completion_days_for(&self, habit_id: &str) -> u32 {
        self.days
            .values()
            .filter(|entries| entries.get(habit_id).copied().unwrap_or(false))
            .count() as u32
    }

    /// Delete cascade: drop `habit_id` from every day entry.
    pub fn remove_habit(&mut self, habit_id: &str) {
        for entries in self.days.values_mut() {
            entries.remove(habit_id);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn clear(&mut self) {
        self.days.clear();
    }

    /// Insert a full day entry directly (load path and tests).
    pub fn set_entry(&mut self, day: DayKey, habit_id: &str, complete: bool) {
        self.days
            .entry(day)
            .or_default()
            .insert(habit_id.to_string(), complete);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> DayKey {
        DayKey::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn toggle_flips_absent_to_true() {
        let mut ledger = CompletionLedger::new();
        let today = day(2026, 8, 30);

        let outcome = ledger.toggle("walk", today, today);
        assert_eq!(outcome, ToggleOutcome::Applied { now_complete: true });
        assert!(ledger.is_complete(today, "walk"));
    }

    #[test]
    fn toggle_writes_explicit_false_back() {
        let mut ledger = CompletionLedger::new();
        let today = day(2026, 8, 30);

        ledger.toggle("walk", today, today);
        let outcome = ledger.toggle("walk", today, today);
        assert_eq!(outcome, ToggleOutcome::Applied { now_complete: false });
        // The key stays, with an explicit false.
        assert_eq!(ledger.day_entries(today).unwrap().get("walk"), Some(&false));
    }

    #[test]
    fn toggle_refuses_past_and_future_days() {
        let mut ledger = CompletionLedger::new();
        let today = day(2026, 8, 30);

        let past = ledger.toggle("walk", today.pred(), today);
        assert_eq!(past, ToggleOutcome::Rejected { state: false });
        let future = ledger.toggle("walk", today.succ(), today);
        assert_eq!(future, ToggleOutcome::Rejected { state: false });
        assert!(ledger.is_empty());
    }

    #[test]
    fn rejected_toggle_reports_current_state() {
        let mut ledger = CompletionLedger::new();
        let yesterday = day(2026, 8, 29);
        ledger.set_entry(yesterday, "walk", true);

        let outcome = ledger.toggle("walk", yesterday, day(2026, 8, 30));
        assert_eq!(outcome, ToggleOutcome::Rejected { state: true });
        assert!(ledger.is_complete(yesterday, "walk"));
    }

    #[test]
    fn any_complete_ignores_explicit_false() {
        let mut ledger = CompletionLedger::new();
        let d = day(2026, 8, 30);
        ledger.set_entry(d, "walk", false);
        assert!(!ledger.any_complete(d));
        ledger.set_entry(d, "build", true);
        assert!(ledger.any_complete(d));
    }

    #[test]
    fn earliest_completion_skips_false_entries() {
        let mut ledger = CompletionLedger::new();
        ledger.set_entry(day(2026, 8, 1), "walk", false);
        ledger.set_entry(day(2026, 8, 3), "walk", true);
        ledger.set_entry(day(2026, 8, 5), "walk", true);

        assert_eq!(ledger.earliest_completion_for("walk"), Some(day(2026, 8, 3)));
        assert_eq!(ledger.earliest_completion_for("build"), None);
        assert_eq!(ledger.completion_days_for("walk"), 2);
    }

    #[test]
    fn remove_habit_cascades_but_keeps_days() {
        let mut ledger = CompletionLedger::new();
        let d = day(2026, 8, 30);
        ledger.set_entry(d, "walk", true);
        ledger.set_entry(d, "build", true);

        ledger.remove_habit("walk");
        assert!(!ledger.is_complete(d, "walk"));
        assert!(ledger.is_complete(d, "build"));
        assert_eq!(ledger.earliest_day(), Some(d));
    }

    #[test]
    fn serde_shape_matches_day_keyed_object() {
        let mut ledger = CompletionLedger::new();
        ledger.set_entry(day(2026, 8, 30), "walk", true);

        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(json, r#"{"2026-08-30":{"walk":true}}"#);
        let back: CompletionLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }
}
