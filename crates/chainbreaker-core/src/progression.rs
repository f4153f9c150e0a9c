//! Experience points and the derived level.
//!
//! Invariant: `level = xp / 100 + 1`, re-derived whenever `xp` changes --
//! the level is never stored in a way that could drift from `xp`.

use serde::{Deserialize, Serialize};

/// XP granted (and revoked) per completion toggle.
pub const DEFAULT_XP_PER_COMPLETION: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub xp: u32,
    pub level: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self::from_xp(0)
    }
}

impl Progression {
    pub fn from_xp(xp: u32) -> Self {
        Self {
            xp,
            level: Self::level_for(xp),
        }
    }

    pub fn level_for(xp: u32) -> u32 {
        xp / 100 + 1
    }

    /// Apply the XP delta for a completion toggle.
    ///
    /// `+amount` on a transition to complete, `-amount` (saturating at 0)
    /// on a transition back to incomplete.
    pub fn apply_toggle(&mut self, now_complete: bool, amount: u32) {
        self.xp = if now_complete {
            self.xp + amount
        } else {
            self.xp.saturating_sub(amount)
        };
        self.level = Self::level_for(self.xp);
    }

    /// XP gained within the current level, 0..100.
    pub fn xp_progress(&self) -> u32 {
        self.xp % 100
    }

    /// XP still needed to reach the next level.
    pub fn xp_to_next_level(&self) -> u32 {
        self.level * 100 - self.xp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starts_at_level_one() {
        let p = Progression::default();
        assert_eq!(p.xp, 0);
        assert_eq!(p.level, 1);
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(Progression::from_xp(99).level, 1);
        assert_eq!(Progression::from_xp(100).level, 2);
        assert_eq!(Progression::from_xp(250).level, 3);
    }

    #[test]
    fn toggle_down_saturates_at_zero() {
        let mut p = Progression::default();
        p.apply_toggle(false, DEFAULT_XP_PER_COMPLETION);
        assert_eq!(p.xp, 0);
        assert_eq!(p.level, 1);
    }

    #[test]
    fn toggle_up_then_down_is_net_zero() {
        let mut p = Progression::from_xp(95);
        p.apply_toggle(true, DEFAULT_XP_PER_COMPLETION);
        assert_eq!(p.level, 2); // crossed 100
        p.apply_toggle(false, DEFAULT_XP_PER_COMPLETION);
        assert_eq!(p.xp, 95);
        assert_eq!(p.level, 1);
    }

    #[test]
    fn progress_and_remaining_xp() {
        let p = Progression::from_xp(130);
        assert_eq!(p.xp_progress(), 30);
        assert_eq!(p.xp_to_next_level(), 70);
    }

    proptest! {
        // The level invariant holds after any sequence of toggles.
        #[test]
        fn level_invariant_holds_for_any_toggle_sequence(
            toggles in proptest::collection::vec(any::<bool>(), 0..100)
        ) {
            let mut p = Progression::default();
            for now_complete in toggles {
                p.apply_toggle(now_complete, DEFAULT_XP_PER_COMPLETION);
                prop_assert_eq!(p.level, p.xp / 100 + 1);
            }
        }
    }
}
