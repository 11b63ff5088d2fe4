//! SM-2 (SuperMemo 2) spaced repetition update rule.
//!
//! - Scores 0-2: repetitions reset to 0 and the card comes back tomorrow.
//!   The ease factor is left as it was.
//! - Scores 3-5: ease factor adjusted (never below 1.3), then the interval
//!   progresses 1 day → 6 days → previous interval × ease factor.
//! - Intervals stop growing at [`MAX_INTERVAL_DAYS`].
//! - The card's next review date is always `now + interval` days.

use super::Flashcard;
use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};

pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Longest interval a card can be scheduled out, about a hundred years.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Recall quality in the closed range 0..=5.
/// 0 = complete blackout, 3 = correct with serious effort, 5 = perfect recall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(u8);

impl Score {
    pub fn new(value: i32) -> Result<Self> {
        match value {
            0..=5 => Ok(Self(value as u8)),
            _ => Err(Error::InvalidScore(value)),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_pass(self) -> bool {
        self.0 >= 3
    }
}

impl TryFrom<i32> for Score {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value)
    }
}

/// `max(1.3, ease + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)))`
pub fn next_ease_factor(ease_factor: f64, score: Score) -> f64 {
    let miss = 5.0 - score.value() as f64;
    (ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR)
}

/// Returns the card after a review at `now`. The input is left untouched.
pub fn review_at(card: &Flashcard, score: Score, now: DateTime<Utc>) -> Flashcard {
    let mut next = card.clone();

    if score.is_pass() {
        next.ease_factor = next_ease_factor(card.ease_factor, score);
        next.interval_days = match card.repetition_count {
            0 => 1,
            1 => 6,
            _ => (card.interval_days as f64 * next.ease_factor)
                .round()
                .min(MAX_INTERVAL_DAYS as f64) as u32,
        };
        next.repetition_count = card.repetition_count.saturating_add(1);
    } else {
        next.repetition_count = 0;
        next.interval_days = 1;
    }

    next.last_review_date = Some(now);
    next.next_review_date = now
        .checked_add_signed(Duration::days(next.interval_days as i64))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    next
}

/// Validates the raw score and reviews the card as of now.
pub fn review(card: &Flashcard, performance_score: i32) -> Result<Flashcard> {
    let score = Score::new(performance_score)?;
    Ok(review_at(card, score, Utc::now()))
}
