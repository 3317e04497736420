//! End-of-round feedback derived from the final contact count

use serde::{Deserialize, Serialize};

/// Enthusiasm tier for a final score, ordered from least to most enthusiastic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScoreTier {
    NiceTry,
    Good,
    Excellent,
    Wonderful,
    Awesome,
    Brilliant,
}

impl ScoreTier {
    /// Tier for a final contact count
    pub fn for_count(count: u32) -> Self {
        match count {
            0..=4 => ScoreTier::NiceTry,
            5..=9 => ScoreTier::Good,
            10..=19 => ScoreTier::Excellent,
            20..=29 => ScoreTier::Wonderful,
            30..=49 => ScoreTier::Awesome,
            _ => ScoreTier::Brilliant,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ScoreTier::NiceTry => "Nice try!",
            ScoreTier::Good => "Good Score!",
            ScoreTier::Excellent => "Excellent Work!",
            ScoreTier::Wonderful => "wonderful!!",
            ScoreTier::Awesome => "Awesome!",
            ScoreTier::Brilliant => "Brilliant!!",
        }
    }
}

/// Message shown for a final contact count
pub fn result_message(count: u32) -> &'static str {
    ScoreTier::for_count(count).message()
}

/// Full result text shown when the ball drops
pub fn result_label(count: u32) -> String {
    format!("Your Score: {}\n{}", count, result_message(count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_result_message_boundaries() {
        let cases = [
            (0, "Nice try!"),
            (4, "Nice try!"),
            (5, "Good Score!"),
            (9, "Good Score!"),
            (10, "Excellent Work!"),
            (19, "Excellent Work!"),
            (20, "wonderful!!"),
            (29, "wonderful!!"),
            (30, "Awesome!"),
            (49, "Awesome!"),
            (50, "Brilliant!!"),
            (u32::MAX, "Brilliant!!"),
        ];
        for (count, expected) in cases {
            assert_eq!(result_message(count), expected, "count {count}");
        }
    }

    #[test]
    fn test_result_label() {
        assert_eq!(result_label(3), "Your Score: 3\nNice try!");
        assert_eq!(result_label(27), "Your Score: 27\nwonderful!!");
    }

    proptest! {
        #[test]
        fn tier_never_decreases(a in 0u32..200, b in 0u32..200) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ScoreTier::for_count(lo) <= ScoreTier::for_count(hi));
        }
    }
}
