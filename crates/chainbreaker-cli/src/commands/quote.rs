//! Print the quote of the day.

use super::{with_tracker, CmdResult};

pub fn run() -> CmdResult {
    with_tracker(|tracker| {
        println!("{}", tracker.quote_of_the_day());
        Ok(())
    })
}
