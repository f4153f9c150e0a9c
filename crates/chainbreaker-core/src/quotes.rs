//! Quote-of-the-day catalog and rotation.
//!
//! A pseudo-random index is picked once per local calendar day; re-reading
//! the quote on the same day never re-rolls it. The index and the day-key
//! it was rotated on are persisted alongside the rest of the document.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::calendar::DayKey;

pub const QUOTES: &[&str] = &[
    "You will never always feel motivated, so learn to be disciplined.",
    "Your future is hidden in your daily routine.",
    "The pain of discipline weighs ounces; the pain of regret weighs tons.",
    "Small consistent steps build unstoppable momentum.",
    "Become the person who can handle the life you want.",
    "Growth begins where comfort ends.",
    "You don’t find your limits — you create them.",
    "Hard choices, easy life. Easy choices, hard life.",
    "If you avoid the struggle, you avoid becoming.",
    "Master boredom, and you will master your life.",
    "Your mind is either your prison or your palace — you decide.",
    "Confidence is built by keeping promises to yourself.",
    "Stop negotiating with excuses.",
    "The strongest people are forged by unseen battles.",
    "What you tolerate becomes your standard.",
    "Self-respect is the root of discipline.",
    "You become what you repeatedly do.",
    "Don’t believe every thought you think.",
    "Starve your distractions, feed your focus.",
    "When you control your mind, you control your direction.",
    "One day or day one — the choice is yours.",
    "Time will pass anyway; decide who you become while it does.",
    "Don’t trade long-term respect for short-term comfort.",
    "Where you are in five years is decided by what you do today.",
    "You are not behind; you are either preparing or procrastinating.",
    "The cost of inaction is far greater than the cost of failure.",
    "Most people overestimate a year and underestimate a decade.",
    "Protect your time — it is your life in fragments.",
    "A focused hour beats a distracted day.",
    "Live deliberately, not accidentally.",
    "Fear shrinks when confronted.",
    "Action cures anxiety.",
    "You don’t need more motivation; you need more action.",
    "Courage is doing it before you feel ready.",
    "If you wait for perfect conditions, you will wait forever.",
    "Start before you’re confident — confidence comes from starting.",
    "Risk is the tuition for growth.",
    "Dreams demand execution.",
    "You miss 100% of the lives you’re afraid to live.",
    "The door opens for the one who knocks.",
    "Failure is feedback, not a verdict.",
    "Rock bottom is a foundation if you decide to build on it.",
    "Fall seven times, stand up eight.",
    "Every setback carries the seed of a stronger version of you.",
    "Scars prove you survived what tried to break you.",
    "Resilience is quiet persistence.",
    "The comeback is always stronger than the setback.",
    "Storms don’t last, but strong people do.",
    "Your struggles are training, not punishment.",
    "Broken crayons still color.",
    "Don’t chase success — become someone it follows.",
    "Your habits are votes for the person you are becoming.",
    "Reinvent yourself as many times as necessary.",
    "Be stubborn about your goals, flexible about your methods.",
    "Character is built when no one is watching.",
    "Stop asking if it’s possible — ask if you’re committed.",
    "Who you become matters more than what you achieve.",
    "Act like the person you want to be.",
    "Self-transformation is the highest form of rebellion.",
    "Upgrade your identity, and your life upgrades automatically.",
    "Great things grow slowly.",
    "The oak tree doesn’t apologize for growing at its own pace.",
    "Consistency turns average into excellence.",
    "Trust the process, even when it’s boring.",
    "Momentum is invisible until it isn’t.",
    "Delayed gratification is self-respect in action.",
    "Focus on trajectory, not speed.",
    "What compounds quietly today dominates loudly tomorrow.",
    "Endure the seed stage.",
    "Stay patient — mastery is under construction.",
    "No one is coming to save you.",
    "Your life reflects what you’re willing to tolerate.",
    "Comfort is expensive — it costs you your potential.",
    "Excuses sound best to the person making them.",
    "Discipline is remembering what you want.",
    "If it matters, you’ll make time; if not, you’ll make excuses.",
    "You can have results or reasons — not both.",
    "The mirror is your most honest mentor.",
    "Talk less about goals; show more results.",
    "Average is a choice.",
    "Comparison steals joy and replaces it with insecurity.",
    "Gratitude turns what you have into enough.",
    "Energy flows where attention goes.",
    "Your environment shapes your ambition.",
    "Protect your peace like it’s priceless — because it is.",
    "Not everything deserves your reaction.",
    "Silence is sometimes the loudest strength.",
    "Let go of what no longer grows you.",
    "Inner peace is the ultimate success.",
    "Choose progress over perfection.",
    "Live so that your past is proud and your future is grateful.",
    "Make your life a story worth telling.",
    "Don’t die with your music still inside you.",
    "Be the ancestor your descendants thank.",
    "Leave footprints worth following.",
    "The goal is not to exist, but to matter.",
    "Greatness is built in ordinary moments.",
    "Your life is your message — make it powerful.",
    "Meaning is found in contribution.",
    "Become unforgettable through the way you live.",
];

/// Which quote is showing, and the day it was picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRotation {
    pub index: usize,
    pub day_key: Option<DayKey>,
}

impl QuoteRotation {
    /// Rebuild from persisted fields. A missing index forces a re-roll on
    /// the next rotation regardless of the stored day-key.
    pub fn from_parts(index: Option<usize>, day_key: Option<DayKey>) -> Self {
        match index {
            Some(index) => Self { index, day_key },
            None => Self { index: 0, day_key: None },
        }
    }

    /// Pick a fresh index if the stored day differs from `today`.
    /// Returns whether a rotation happened.
    pub fn rotate<R: Rng>(&mut self, today: DayKey, rng: &mut R) -> bool {
        if self.day_key == Some(today) {
            return false;
        }
        self.index = rng.gen_range(0..QUOTES.len());
        self.day_key = Some(today);
        true
    }

    pub fn quote(&self) -> &'static str {
        QUOTES[self.index % QUOTES.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn day(y: i32, m: u32, d: u32) -> DayKey {
        DayKey::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn rotates_once_per_day() {
        let mut rng = StepRng::new(7, 13);
        let mut rotation = QuoteRotation::default();
        let today = day(2026, 8, 30);

        assert!(rotation.rotate(today, &mut rng));
        let picked = rotation.index;
        assert!(!rotation.rotate(today, &mut rng));
        assert_eq!(rotation.index, picked);
    }

    #[test]
    fn rotates_again_on_a_new_day() {
        let mut rng = StepRng::new(0, 1 << 32);
        let mut rotation = QuoteRotation::default();
        rotation.rotate(day(2026, 8, 29), &mut rng);
        assert!(rotation.rotate(day(2026, 8, 30), &mut rng));
        assert_eq!(rotation.day_key, Some(day(2026, 8, 30)));
    }

    #[test]
    fn missing_persisted_index_forces_reroll() {
        let today = day(2026, 8, 30);
        let mut rotation = QuoteRotation::from_parts(None, Some(today));
        let mut rng = StepRng::new(3, 1);
        assert!(rotation.rotate(today, &mut rng));
    }

    #[test]
    fn quote_index_is_always_in_bounds() {
        let rotation = QuoteRotation::from_parts(Some(usize::MAX), None);
        // Must not panic.
        let _ = rotation.quote();
    }
}
