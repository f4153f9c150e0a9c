//! Consecutive-day streak walks.
//!
//! Streaks are computed by walking backward from today one day at a time.
//! The walks carry no explicit cap: the ledger has a first recorded day,
//! after which lookups miss and the walk ends.

use crate::calendar::DayKey;
use crate::habit::HabitRegistry;
use crate::ledger::CompletionLedger;

/// Consecutive days, ending today, on which `habit_id` is marked complete.
///
/// Only contiguity matters here; the habit's activation date is not
/// consulted.
pub fn per_habit_streak(ledger: &CompletionLedger, habit_id: &str, today: DayKey) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while ledger.is_complete(day, habit_id) {
        streak += 1;
        day = day.pred();
    }
    streak
}

/// Consecutive days, ending today, with at least one completion by any habit.
pub fn global_current_streak(ledger: &CompletionLedger, today: DayKey) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while ledger.any_complete(day) {
        streak += 1;
        day = day.pred();
    }
    streak
}

/// The larger of the global streak and the best cached per-habit streak.
///
/// Cached streaks are refreshed on every toggle and on load, so on a day
/// with no completions yet they still hold their last-toggle values; the
/// maximum carries over instead of collapsing to zero.
pub fn max_streak(registry: &HabitRegistry, ledger: &CompletionLedger, today: DayKey) -> u32 {
    let best_cached = registry.iter().map(|h| h.streak).max().unwrap_or(0);
    best_cached.max(global_current_streak(ledger, today))
}

/// Refresh every habit's cached `streak` field from the ledger.
pub fn refresh_cached_streaks(
    registry: &mut HabitRegistry,
    ledger: &CompletionLedger,
    today: DayKey,
) {
    let streaks: Vec<(String, u32)> = registry
        .iter()
        .map(|h| (h.id.clone(), per_habit_streak(ledger, &h.id, today)))
        .collect();
    for (id, streak) in streaks {
        if let Some(habit) = registry.get_mut(&id) {
            habit.streak = streak;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> DayKey {
        DayKey::from_ymd(y, m, d).unwrap()
    }

    fn mark_range(ledger: &mut CompletionLedger, habit: &str, from: DayKey, days: i64) {
        for offset in 0..days {
            ledger.set_entry(from.add_days(offset), habit, true);
        }
    }

    #[test]
    fn empty_ledger_has_zero_streaks() {
        let ledger = CompletionLedger::new();
        let today = day(2026, 8, 30);
        assert_eq!(per_habit_streak(&ledger, "walk", today), 0);
        assert_eq!(global_current_streak(&ledger, today), 0);
    }

    #[test]
    fn per_habit_streak_counts_back_from_today() {
        let mut ledger = CompletionLedger::new();
        let today = day(2026, 8, 30);
        mark_range(&mut ledger, "walk", day(2026, 8, 27), 4); // 27..=30

        assert_eq!(per_habit_streak(&ledger, "walk", today), 4);
    }

    #[test]
    fn per_habit_streak_stops_at_gap() {
        let mut ledger = CompletionLedger::new();
        let today = day(2026, 8, 30);
        mark_range(&mut ledger, "walk", day(2026, 8, 20), 5); // old run
        mark_range(&mut ledger, "walk", day(2026, 8, 29), 2); // 29, 30

        assert_eq!(per_habit_streak(&ledger, "walk", today), 2);
    }

    #[test]
    fn per_habit_streak_breaks_on_explicit_false() {
        let mut ledger = CompletionLedger::new();
        let today = day(2026, 8, 30);
        mark_range(&mut ledger, "walk", day(2026, 8, 28), 3);
        ledger.set_entry(day(2026, 8, 29), "walk", false);

        assert_eq!(per_habit_streak(&ledger, "walk", today), 1);
    }

    #[test]
    fn per_habit_streak_ends_today_not_yesterday() {
        let mut ledger = CompletionLedger::new();
        let today = day(2026, 8, 30);
        // Completed through yesterday, nothing yet today.
        mark_range(&mut ledger, "walk", day(2026, 8, 27), 3); // 27..=29

        assert_eq!(per_habit_streak(&ledger, "walk", today), 0);
    }

    #[test]
    fn week_of_completions_gives_streak_of_seven() {
        let mut ledger = CompletionLedger::new();
        let d0 = day(2026, 8, 24);
        mark_range(&mut ledger, "h", d0, 7);

        assert_eq!(per_habit_streak(&ledger, "h", d0.add_days(6)), 7);
    }

    #[test]
    fn global_streak_counts_any_habit_per_day() {
        let mut ledger = CompletionLedger::new();
        let today = day(2026, 8, 30);
        ledger.set_entry(day(2026, 8, 28), "walk", true);
        ledger.set_entry(day(2026, 8, 29), "build", true);
        ledger.set_entry(today, "noScroll", true);

        assert_eq!(global_current_streak(&ledger, today), 3);
    }

    #[test]
    fn max_streak_takes_larger_of_global_and_per_habit() {
        let mut ledger = CompletionLedger::new();
        let today = day(2026, 8, 30);
        // walk: 4-day streak; build: alternating days keep the global
        // streak alive further back.
        mark_range(&mut ledger, "walk", day(2026, 8, 27), 4);
        for offset in 0..6 {
            ledger.set_entry(day(2026, 8, 24).add_days(offset), "build", true);
        }

        let mut registry = HabitRegistry::default_set(chrono::Utc::now());
        refresh_cached_streaks(&mut registry, &ledger, today);

        assert_eq!(max_streak(&registry, &ledger, today), 7); // global run 24..=30
        assert_eq!(registry.get("walk").unwrap().streak, 4);
    }

    #[test]
    fn max_streak_keeps_cached_value_on_an_unmarked_day() {
        let mut ledger = CompletionLedger::new();
        let d0 = day(2026, 8, 24);
        mark_range(&mut ledger, "walk", d0, 4); // 24..=27

        let mut registry = HabitRegistry::default_set(chrono::Utc::now());
        refresh_cached_streaks(&mut registry, &ledger, d0.add_days(3));

        // Day 4 has nothing marked yet: the walks are 0 but the cached
        // streak from the last toggle still carries the maximum.
        assert_eq!(global_current_streak(&ledger, d0.add_days(4)), 0);
        assert_eq!(max_streak(&registry, &ledger, d0.add_days(4)), 4);
    }

    #[test]
    fn refresh_overwrites_stale_cached_values() {
        let mut registry = HabitRegistry::default_set(chrono::Utc::now());
        registry.get_mut("walk").unwrap().streak = 99;

        refresh_cached_streaks(&mut registry, &CompletionLedger::new(), day(2026, 8, 30));
        assert_eq!(registry.get("walk").unwrap().streak, 0);
    }
}
