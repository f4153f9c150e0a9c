//! Habit management commands for CLI.

use clap::Subcommand;
use chainbreaker_core::{DayKey, HabitPatch, NewHabit};

use super::{with_tracker, CmdResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// Emoji or short marker shown next to the name
        #[arg(long, default_value = "✅")]
        icon: String,
        /// Completions expected per week, 1..=7
        #[arg(long, default_value = "7")]
        target: u32,
        /// Display color token
        #[arg(long, default_value = "bg-green-500")]
        color: String,
        /// Free-form grouping label
        #[arg(long, default_value = "general")]
        category: String,
    },
    /// List habits with today's state
    List,
    /// Update a habit (id and creation time are fixed)
    Edit {
        /// Habit ID (see `habit list`)
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New icon
        #[arg(long)]
        icon: Option<String>,
        /// New weekly target, 1..=7
        #[arg(long)]
        target: Option<u32>,
        /// New color token
        #[arg(long)]
        color: Option<String>,
        /// New category
        #[arg(long)]
        category: Option<String>,
    },
    /// Remove a habit and its completion history
    Remove {
        /// Habit ID
        id: String,
        /// Skip the confirmation guard
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: HabitAction) -> CmdResult {
    match action {
        HabitAction::Add {
            name,
            icon,
            target,
            color,
            category,
        } => with_tracker(|tracker| {
            let id = tracker.add_habit(NewHabit {
                name,
                icon,
                weekly_target: target,
                color,
                category,
            })?;
            println!("Habit created: {id}");
            Ok(())
        }),
        HabitAction::List => with_tracker(|tracker| {
            let today = DayKey::today();
            for habit in tracker.registry().iter() {
                let mark = if tracker.ledger().is_complete(today, &habit.id) {
                    "x"
                } else {
                    " "
                };
                println!(
                    "[{mark}] {} {} ({}) target {}/wk streak {}",
                    habit.icon, habit.name, habit.id, habit.weekly_target, habit.streak
                );
            }
            Ok(())
        }),
        HabitAction::Edit {
            id,
            name,
            icon,
            target,
            color,
            category,
        } => with_tracker(|tracker| {
            tracker.update_habit(
                &id,
                HabitPatch {
                    name,
                    icon,
                    weekly_target: target,
                    color,
                    category,
                },
            )?;
            println!("ok");
            Ok(())
        }),
        HabitAction::Remove { id, yes } => {
            if !yes {
                eprintln!("this removes the habit and all of its history; pass --yes to confirm");
                std::process::exit(1);
            }
            with_tracker(|tracker| {
                tracker.remove_habit(&id)?;
                println!("Habit removed: {id}");
                Ok(())
            })
        }
    }
}
