//! Achievement catalog and unlock listing.

use clap::Subcommand;
use chainbreaker_core::CATALOG;

use super::{with_tracker, CmdResult};

#[derive(Subcommand)]
pub enum AchievementsAction {
    /// List unlocked achievements
    List {
        /// Include locked entries from the full catalog
        #[arg(long)]
        all: bool,
    },
}

pub fn run(action: AchievementsAction) -> CmdResult {
    match action {
        AchievementsAction::List { all } => with_tracker(|tracker| {
            for def in CATALOG {
                let unlocked = tracker.unlocked().contains(def.id);
                if !unlocked && !all {
                    continue;
                }
                let mark = if unlocked { "x" } else { " " };
                println!("[{mark}] {} {} - {}", def.icon, def.name, def.description);
            }
            Ok(())
        }),
    }
}
