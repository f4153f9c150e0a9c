//! Derived statistics over the registry and ledger.
//!
//! [`compute_snapshot`] is a pure pass: same registry, ledger and `today`
//! always produce the same snapshot. Nothing here is persisted; callers
//! recompute after any mutation.
//!
//! A habit is *active* on day `d` when its activation day-key is <= `d`.
//! Days with zero active habits are excluded from every day-level
//! aggregate. Weekly miss accounting partitions the calendar into
//! Sunday-start weeks; the current, not-yet-complete week never counts.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::calendar::DayKey;
use crate::habit::{Habit, HabitRegistry};
use crate::ledger::CompletionLedger;
use crate::streak::{global_current_streak, max_streak};

/// Recomputed-on-demand aggregate view. Never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// Completions by active habits, summed over all recorded days.
    pub total_completions: u32,
    /// Days where every active habit was completed.
    pub perfect_days: u32,
    pub max_streak: u32,
    pub current_streak: u32,
    /// Completion rate over the current month so far, 0..=100.
    pub current_month_rate: u32,
    /// Weekly-target shortfalls summed over all fully-elapsed weeks.
    pub total_misses: u32,
    /// Consecutive fully-elapsed weeks, ending last week, with a shortfall.
    pub current_miss_streak: u32,
}

/// Completions per habit per Sunday-start week.
type WeeklyCounts = HashMap<DayKey, HashMap<String, u32>>;

fn weekly_counts(ledger: &CompletionLedger) -> WeeklyCounts {
    let mut counts: WeeklyCounts = HashMap::new();
    for (day, entries) in ledger.days() {
        let week = day.week_start();
        for (habit_id, &done) in entries {
            if !done {
                continue;
            }
            *counts
                .entry(week)
                .or_default()
                .entry(habit_id.clone())
                .or_insert(0) += 1;
        }
    }
    counts
}

/// Summed shortfall for the week starting at `week_start`.
///
/// Activity is judged at the week's last day. `None` when no habit is
/// active that week, which excludes the week from miss accounting.
fn week_shortfall(
    registry: &HabitRegistry,
    counts: &WeeklyCounts,
    week_start: DayKey,
    today: DayKey,
) -> Option<u32> {
    let week_end = week_start.add_days(6);
    let active: Vec<&Habit> = registry
        .iter()
        .filter(|h| h.activation_day(today) <= week_end)
        .collect();
    if active.is_empty() {
        return None;
    }

    let week = counts.get(&week_start);
    let mut missing = 0;
    for habit in active {
        let actual = week
            .and_then(|per_habit| per_habit.get(&habit.id))
            .copied()
            .unwrap_or(0);
        missing += habit.weekly_target.saturating_sub(actual);
    }
    Some(missing)
}

/// Compute the full snapshot for `today`.
pub fn compute_snapshot(
    registry: &HabitRegistry,
    ledger: &CompletionLedger,
    today: DayKey,
) -> StatsSnapshot {
    if registry.is_empty() {
        return StatsSnapshot::default();
    }

    let mut snapshot = StatsSnapshot {
        current_streak: global_current_streak(ledger, today),
        max_streak: max_streak(registry, ledger, today),
        ..Default::default()
    };

    // Day-level totals over every recorded day.
    for (day, entries) in ledger.days() {
        let active: Vec<&Habit> = registry
            .iter()
            .filter(|h| h.activation_day(today) <= day)
            .collect();
        if active.is_empty() {
            continue;
        }
        let completed = active
            .iter()
            .filter(|h| entries.get(&h.id).copied().unwrap_or(false))
            .count() as u32;
        snapshot.total_completions += completed;
        if completed as usize == active.len() {
            snapshot.perfect_days += 1;
        }
    }

    // Weekly miss accounting over fully-elapsed weeks.
    let counts = weekly_counts(ledger);
    let last_full_week = today.week_start().add_days(-7);
    let earliest = registry
        .iter()
        .map(|h| h.activation_day(today))
        .chain(ledger.earliest_day())
        .min();

    if let Some(earliest) = earliest {
        let earliest_week = earliest.week_start();

        let mut week = earliest_week;
        while week <= last_full_week {
            if let Some(missing) = week_shortfall(registry, &counts, week, today) {
                snapshot.total_misses += missing;
            }
            week = week.add_days(7);
        }

        let mut week = last_full_week;
        while week >= earliest_week {
            match week_shortfall(registry, &counts, week, today) {
                Some(missing) if missing > 0 => snapshot.current_miss_streak += 1,
                _ => break,
            }
            week = week.add_days(-7);
        }
    }

    // Current-month completion rate, day 1 through today.
    let mut possible = 0u32;
    let mut completions = 0u32;
    let mut day = today.month_start();
    while day <= today {
        let active: Vec<&Habit> = registry
            .iter()
            .filter(|h| h.activation_day(today) <= day)
            .collect();
        if !active.is_empty() {
            possible += active.len() as u32;
            completions += active
                .iter()
                .filter(|h| ledger.is_complete(day, &h.id))
                .count() as u32;
        }
        day = day.succ();
    }
    if possible > 0 {
        snapshot.current_month_rate =
            ((completions as f64 / possible as f64) * 100.0).round() as u32;
    }

    snapshot
}
