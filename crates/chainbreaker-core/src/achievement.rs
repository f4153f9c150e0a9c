//! Achievement catalog, unlock evaluation, and the append-only unlocked set.
//!
//! Unlocking is monotonic: once an id is in the [`UnlockedSet`] it is never
//! re-evaluated or revoked, even if the underlying stat later regresses.
//! Each new unlock emits a transient [`UnlockNotice`] that auto-expires
//! after a fixed display window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::CompletionLedger;
use crate::stats::StatsSnapshot;

/// What an achievement's requirement is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    TotalCompletions,
    MaxStreak,
    PerfectDays,
    /// Days on which one specific habit was completed.
    HabitSpecific,
    MonthlyRate,
}

/// A static catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub requirement: u32,
    pub kind: AchievementKind,
    /// Present only for `HabitSpecific`.
    pub habit_id: Option<&'static str>,
}

/// The full catalog, in unlock-evaluation order.
pub const CATALOG: &[AchievementDef] = &[
    AchievementDef {
        id: "first_step",
        name: "First Step",
        icon: "🎯",
        description: "Complete your first habit",
        requirement: 1,
        kind: AchievementKind::TotalCompletions,
        habit_id: None,
    },
    AchievementDef {
        id: "week_warrior",
        name: "Week Warrior",
        icon: "⚔️",
        description: "Complete all habits for 7 days",
        requirement: 7,
        kind: AchievementKind::PerfectDays,
        habit_id: None,
    },
    AchievementDef {
        id: "streak_5",
        name: "5 Day Streak",
        icon: "🔥",
        description: "Maintain a 5 day streak",
        requirement: 5,
        kind: AchievementKind::MaxStreak,
        habit_id: None,
    },
    AchievementDef {
        id: "streak_10",
        name: "10 Day Streak",
        icon: "🚀",
        description: "Maintain a 10 day streak",
        requirement: 10,
        kind: AchievementKind::MaxStreak,
        habit_id: None,
    },
    AchievementDef {
        id: "streak_30",
        name: "30 Day Master",
        icon: "👑",
        description: "Maintain a 30 day streak",
        requirement: 30,
        kind: AchievementKind::MaxStreak,
        habit_id: None,
    },
    AchievementDef {
        id: "century",
        name: "Century Club",
        icon: "💯",
        description: "Complete 100 habits total",
        requirement: 100,
        kind: AchievementKind::TotalCompletions,
        habit_id: None,
    },
    AchievementDef {
        id: "consistency",
        name: "Consistency King",
        icon: "💎",
        description: "Maintain 80% completion rate for a month",
        requirement: 80,
        kind: AchievementKind::MonthlyRate,
        habit_id: None,
    },
    AchievementDef {
        id: "early_bird",
        name: "Early Bird",
        icon: "🌅",
        description: "Complete morning walk 10 times",
        requirement: 10,
        kind: AchievementKind::HabitSpecific,
        habit_id: Some("walk"),
    },
    AchievementDef {
        id: "builder",
        name: "Builder Badge",
        icon: "🔨",
        description: "Complete 5 weekend builds",
        requirement: 5,
        kind: AchievementKind::HabitSpecific,
        habit_id: Some("build"),
    },
    AchievementDef {
        id: "no_scroll_master",
        name: "Digital Detox",
        icon: "📵",
        description: "No doomscroll for 14 days straight",
        requirement: 14,
        kind: AchievementKind::HabitSpecific,
        habit_id: Some("noScroll"),
    },
];

/// Look up a catalog entry by id.
pub fn catalog_entry(id: &str) -> Option<&'static AchievementDef> {
    CATALOG.iter().find(|def| def.id == id)
}

/// Append-only set of unlocked achievement ids.
///
/// Insertion order is preserved (it is the order of first unlock) and ids
/// are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnlockedSet {
    ids: Vec<String>,
}

impl UnlockedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted ids, dropping duplicates but keeping order.
    pub fn from_ids(ids: Vec<String>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.insert(&id);
        }
        set
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Append `id` if absent. Returns whether it was newly added.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// How long an unlock toast stays active.
const NOTICE_DISPLAY_MS: i64 = 4_000;

/// One-shot notification for a fresh unlock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockNotice {
    pub achievement_id: String,
    pub name: String,
    pub icon: String,
    pub raised_at: DateTime<Utc>,
}

impl UnlockNotice {
    /// Whether the notice is still within its display window.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.raised_at).num_milliseconds() < NOTICE_DISPLAY_MS
    }
}

fn satisfied(def: &AchievementDef, stats: &StatsSnapshot, ledger: &CompletionLedger) -> bool {
    let observed = match def.kind {
        AchievementKind::TotalCompletions => stats.total_completions,
        AchievementKind::MaxStreak => stats.max_streak,
        AchievementKind::PerfectDays => stats.perfect_days,
        AchievementKind::MonthlyRate => stats.current_month_rate,
        AchievementKind::HabitSpecific => match def.habit_id {
            Some(habit_id) => ledger.completion_days_for(habit_id),
            None => return false,
        },
    };
    observed >= def.requirement
}

/// Evaluate every not-yet-unlocked catalog entry, batch-insert the newly
/// satisfied ones, and return one notice per new unlock in catalog order.
pub fn evaluate(
    stats: &StatsSnapshot,
    ledger: &CompletionLedger,
    unlocked: &mut UnlockedSet,
    now: DateTime<Utc>,
) -> Vec<UnlockNotice> {
    let mut notices = Vec::new();
    for def in CATALOG {
        if unlocked.contains(def.id) {
            continue;
        }
        if satisfied(def, stats, ledger) {
            unlocked.insert(def.id);
            notices.push(UnlockNotice {
                achievement_id: def.id.to_string(),
                name: def.name.to_string(),
                icon: def.icon.to_string(),
                raised_at: now,
            });
        }
    }
    notices
}
