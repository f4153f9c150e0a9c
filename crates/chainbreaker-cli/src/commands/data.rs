//! Stored data management.

use clap::Subcommand;
use chainbreaker_core::storage::data_dir;
use chainbreaker_core::{Config, FileStore, HabitTracker};

use super::{runtime, CmdResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Clear all stored data and start over
    Reset {
        /// Skip the confirmation guard
        #[arg(long)]
        yes: bool,
    },
    /// Print the data directory path
    Path,
}

pub fn run(action: DataAction) -> CmdResult {
    match action {
        DataAction::Reset { yes } => {
            if !yes {
                eprintln!("this erases all habits, history and progress; pass --yes to confirm");
                std::process::exit(1);
            }
            let rt = runtime()?;
            let store = FileStore::open()?;
            let (mut tracker, _) =
                rt.block_on(HabitTracker::load(&store, Config::load_or_default()));
            rt.block_on(tracker.reset(&store))?;
            println!("data reset");
        }
        DataAction::Path => {
            println!("{}", data_dir()?.display());
        }
    }
    Ok(())
}
