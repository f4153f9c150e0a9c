//! Derived statistics commands.

use clap::Subcommand;

use super::{with_tracker, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Current snapshot across all habits
    Show {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StatsAction) -> CmdResult {
    match action {
        StatsAction::Show { json } => with_tracker(|tracker| {
            let stats = tracker.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("total completions:  {}", stats.total_completions);
                println!("perfect days:       {}", stats.perfect_days);
                println!("current streak:     {}", stats.current_streak);
                println!("max streak:         {}", stats.max_streak);
                println!("month rate:         {}%", stats.current_month_rate);
                println!("total misses:       {}", stats.total_misses);
                println!("miss streak:        {} wk", stats.current_miss_streak);
            }
            Ok(())
        }),
    }
}
