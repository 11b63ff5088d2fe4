//! Wrapper for flashcards that tracks progress within one learning session.
use super::Flashcard;
use chrono::{DateTime, Utc};

#[derive(Clone, Debug)]
pub struct LearningCard {
    pub flashcard: Flashcard,
    pub is_learned: bool,
    pub last_learned_at: Option<DateTime<Utc>>,
}

impl LearningCard {
    pub fn new(flashcard: Flashcard) -> Self {
        Self {
            flashcard,
            is_learned: false,
            last_learned_at: None,
        }
    }

    pub fn mark_as_learned(&mut self, at: DateTime<Utc>) {
        self.is_learned = true;
        self.last_learned_at = Some(at);
    }
}
