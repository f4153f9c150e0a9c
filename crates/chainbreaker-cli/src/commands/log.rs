//! Toggle a habit's completion for today.

use chainbreaker_core::ToggleOutcome;

use super::{with_tracker, CmdResult};

pub fn run(habit_id: &str) -> CmdResult {
    with_tracker(|tracker| {
        let outcome = tracker.toggle(habit_id, None)?;
        match outcome {
            ToggleOutcome::Applied { now_complete: true } => println!("{habit_id}: done"),
            ToggleOutcome::Applied {
                now_complete: false,
            } => println!("{habit_id}: undone"),
            ToggleOutcome::Rejected { .. } => println!("{habit_id}: unchanged"),
        }
        let progression = tracker.progression();
        println!("xp {} (level {})", progression.xp, progression.level);
        for notice in tracker.active_notices(chrono::Utc::now()) {
            println!("unlocked: {} {}", notice.icon, notice.name);
        }
        Ok(())
    })
}
