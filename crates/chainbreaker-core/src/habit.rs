//! Habit entities and the registry that owns them.
//!
//! A habit's `created_at` is its activation boundary: it only contributes
//! to day-level aggregates from its activation day-key onward. Legacy data
//! may lack `created_at`; [`HabitRegistry::normalize`] backfills it from
//! the earliest ledger day with a true completion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::DayKey;
use crate::error::ValidationError;
use crate::ledger::CompletionLedger;

/// A recurring habit with a weekly completion target.
///
/// Field names serialize in camelCase to match the persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub icon: String,
    /// Completions expected per week, 1..=7.
    pub weekly_target: u32,
    pub color: String,
    pub category: String,
    /// Cached current streak, refreshed after every toggle and on load.
    #[serde(default)]
    pub streak: u32,
    /// Activation timestamp. `None` only for unnormalized legacy data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Habit {
    /// The first day-key this habit counts toward aggregates.
    ///
    /// Habits without a creation timestamp (legacy data before
    /// normalization) activate "today", so they never retroactively claim
    /// history.
    pub fn activation_day(&self, today: DayKey) -> DayKey {
        self.created_at
            .map(DayKey::from_timestamp)
            .unwrap_or(today)
    }
}

/// Input for creating a habit.
#[derive(Debug, Clone)]
pub struct NewHabit {
    pub name: String,
    pub icon: String,
    pub weekly_target: u32,
    pub color: String,
    pub category: String,
}

/// Partial update for a habit. `id` and `created_at` are not editable.
#[derive(Debug, Clone, Default)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub weekly_target: Option<u32>,
    pub color: Option<String>,
    pub category: Option<String>,
}

fn validate_target(value: u32) -> Result<(), ValidationError> {
    if (1..=7).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::TargetOutOfRange { value })
    }
}

/// The set of habits, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitRegistry {
    habits: Vec<Habit>,
}

impl HabitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in starter set, activated at `now`.
    pub fn default_set(now: DateTime<Utc>) -> Self {
        let defaults = [
            ("walk", "30-min Morning Walk", "🚶", 7, "bg-green-500", "health"),
            ("noScroll", "No Doomscroll After Work", "🚫", 7, "bg-blue-500", "productivity"),
            ("build", "Weekend Build", "🔨", 1, "bg-purple-500", "creativity"),
        ];
        Self {
            habits: defaults
                .into_iter()
                .map(|(id, name, icon, target, color, category)| Habit {
                    id: id.to_string(),
                    name: name.to_string(),
                    icon: icon.to_string(),
                    weekly_target: target,
                    color: color.to_string(),
                    category: category.to_string(),
                    streak: 0,
                    created_at: Some(now),
                })
                .collect(),
        }
    }

    pub fn from_habits(habits: Vec<Habit>) -> Self {
        Self { habits }
    }

    /// Create a habit with a fresh id, activated at `now`.
    pub fn add(&mut self, data: NewHabit, now: DateTime<Utc>) -> Result<&Habit, ValidationError> {
        if data.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        validate_target(data.weekly_target)?;

        self.habits.push(Habit {
            id: Uuid::new_v4().to_string(),
            name: data.name,
            icon: data.icon,
            weekly_target: data.weekly_target,
            color: data.color,
            category: data.category,
            streak: 0,
            created_at: Some(now),
        });
        Ok(self.habits.last().unwrap())
    }

    /// Merge `patch` into the habit. `id` and `created_at` never change.
    pub fn update(&mut self, id: &str, patch: HabitPatch) -> Result<(), ValidationError> {
        if let Some(target) = patch.weekly_target {
            validate_target(target)?;
        }
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyName);
            }
        }

        let habit = self
            .get_mut(id)
            .ok_or_else(|| ValidationError::UnknownHabit(id.to_string()))?;
        if let Some(name) = patch.name {
            habit.name = name;
        }
        if let Some(icon) = patch.icon {
            habit.icon = icon;
        }
        if let Some(target) = patch.weekly_target {
            habit.weekly_target = target;
        }
        if let Some(color) = patch.color {
            habit.color = color;
        }
        if let Some(category) = patch.category {
            habit.category = category;
        }
        Ok(())
    }

    /// Remove the habit. The caller cascades the ledger cleanup.
    pub fn remove(&mut self, id: &str) -> Option<Habit> {
        let pos = self.habits.iter().position(|h| h.id == id)?;
        Some(self.habits.remove(pos))
    }

    /// Backfill missing `created_at` fields.
    ///
    /// A habit with completions inherits its earliest true-completion day;
    /// one without any is activated at `now`. Idempotent: already-dated
    /// habits are untouched.
    pub fn normalize(&mut self, ledger: &CompletionLedger, now: DateTime<Utc>) {
        for habit in &mut self.habits {
            if habit.created_at.is_some() {
                continue;
            }
            habit.created_at = Some(match ledger.earliest_completion_for(&habit.id) {
                Some(day) => day.local_midnight_utc(),
                None => now,
            });
        }
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|h| h.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Habit> {
        self.habits.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }
}
