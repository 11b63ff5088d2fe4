//! Flashcard is a question/answer pair tied to a study material, together with
//! its spaced repetition state.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
pub const DEFAULT_DIFFICULTY: u8 = 3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub material_id: Uuid,
    /// 1 (easiest) to 5 (hardest). Display bucket only, the scheduler never touches it.
    pub difficulty_level: u8,
    pub next_review_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_review_date: Option<DateTime<Utc>>,
    pub repetition_count: u32,
    pub ease_factor: f64,
    pub interval_days: u32,
}

/// Where a card is in its life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardPhase {
    New,
    Reviewing,
}

/// Coarse grouping of `difficulty_level` used for deck statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DifficultyBucket {
    Mastered,
    Learning,
    Difficult,
}

impl Flashcard {
    /// A fresh card, due immediately.
    pub fn new(material_id: Uuid, question: String, answer: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            question,
            answer,
            material_id,
            difficulty_level: DEFAULT_DIFFICULTY,
            next_review_date: created_at,
            last_review_date: None,
            repetition_count: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval_days: 0,
        }
    }

    pub fn with_difficulty(mut self, level: u8) -> Self {
        self.difficulty_level = level.clamp(1, 5);
        self
    }

    pub fn phase(&self) -> CardPhase {
        if self.last_review_date.is_none() {
            CardPhase::New
        } else {
            CardPhase::Reviewing
        }
    }

    pub fn difficulty_bucket(&self) -> DifficultyBucket {
        match self.difficulty_level {
            0..=2 => DifficultyBucket::Mastered,
            3 => DifficultyBucket::Learning,
            _ => DifficultyBucket::Difficult,
        }
    }
}
