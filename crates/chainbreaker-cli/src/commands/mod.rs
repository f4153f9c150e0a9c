pub mod achievements;
pub mod config;
pub mod data;
pub mod habit;
pub mod log;
pub mod quote;
pub mod stats;

use chainbreaker_core::{Config, FileStore, HabitTracker, LoadOutcome};

pub(crate) type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Load the tracker, run `op`, and flush back if anything changed.
///
/// Load problems degrade to defaults with a warning; they never abort the
/// command.
pub(crate) fn with_tracker<F>(op: F) -> CmdResult
where
    F: FnOnce(&mut HabitTracker) -> CmdResult,
{
    let rt = runtime()?;
    let store = FileStore::open()?;
    let (mut tracker, outcome) =
        rt.block_on(HabitTracker::load(&store, Config::load_or_default()));
    match outcome {
        LoadOutcome::TimedOut => eprintln!("warning: load timed out, starting from defaults"),
        LoadOutcome::Malformed => eprintln!("warning: stored data is malformed, starting from defaults"),
        LoadOutcome::Failed => eprintln!("warning: could not read stored data, starting from defaults"),
        LoadOutcome::Loaded | LoadOutcome::Missing => {}
    }

    op(&mut tracker)?;

    if tracker.is_dirty() {
        rt.block_on(tracker.flush(&store))?;
    }
    Ok(())
}
