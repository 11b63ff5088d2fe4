//! Learning session management for spaced repetition practice.
//! Handles multi-round flashcard review with SM-2 algorithm integration.

use super::sm2::{self, Score};
use super::{Flashcard, LearningCard, ReviewSession};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Manages a learning session with multiple review rounds.
/// Cards that aren't passed (score < 3) are repeated in subsequent rounds.
pub struct LearningSession {
    pub material_id: Uuid,
    pub material_name: String,
    pub all_cards: Vec<LearningCard>,
    pub current_round_cards: Vec<usize>,
    pub current_index: usize,
    pub show_answer: bool,
    pub round_number: usize,
    pub started_at: DateTime<Utc>,
}

impl LearningSession {
    /// Creates a new learning session from cards that are due for review.
    pub fn new_from_due_cards(
        material_id: Uuid,
        material_name: String,
        cards: Vec<Flashcard>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let all_cards: Vec<_> = cards.into_iter().map(LearningCard::new).collect();
        let indices: Vec<usize> = (0..all_cards.len()).collect();

        Self {
            material_id,
            material_name,
            all_cards,
            current_round_cards: indices,
            current_index: 0,
            show_answer: false,
            round_number: 1,
            started_at,
        }
    }

    pub fn current_card(&self) -> Option<&LearningCard> {
        self.current_round_cards
            .get(self.current_index)
            .and_then(|&idx| self.all_cards.get(idx))
    }

    pub fn toggle_answer(&mut self) {
        self.show_answer = !self.show_answer;
    }

    pub fn next_card(&mut self) {
        if self.current_index + 1 < self.current_round_cards.len() {
            self.current_index += 1;
            self.show_answer = false;
        } else {
            self.start_next_round();
        }
    }

    /// Starts a new round with the cards that weren't passed.
    /// If none remain, the session is complete.
    fn start_next_round(&mut self) {
        let failed_indices: Vec<usize> = self
            .current_round_cards
            .iter()
            .copied()
            .filter(|&idx| {
                self.all_cards
                    .get(idx)
                    .map(|card| !card.is_learned)
                    .unwrap_or(false)
            })
            .collect();

        if !failed_indices.is_empty() {
            self.current_round_cards = failed_indices;
            self.current_index = 0;
            self.show_answer = false;
            self.round_number += 1;
        }
    }

    /// Reviews the current card and returns its new state for the caller to persist.
    /// Cards with score >= 3 count as passed for this session.
    pub fn grade_current_card(&mut self, score: Score, now: DateTime<Utc>) -> Option<Flashcard> {
        let &actual_idx = self.current_round_cards.get(self.current_index)?;
        let card = self.all_cards.get_mut(actual_idx)?;

        if score.is_pass() {
            card.mark_as_learned(now);
        } else {
            card.is_learned = false;
        }

        card.flashcard = sm2::review_at(&card.flashcard, score, now);
        log::debug!(
            "graded card {} with {}, next review in {} days",
            card.flashcard.id,
            score.value(),
            card.flashcard.interval_days
        );
        Some(card.flashcard.clone())
    }

    pub fn learned_count(&self) -> usize {
        self.current_round_cards
            .iter()
            .filter(|&&idx| {
                self.all_cards
                    .get(idx)
                    .map(|card| card.is_learned)
                    .unwrap_or(false)
            })
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.current_round_cards.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.learned_count()
    }

    /// Returns true when every card in the current round has been passed.
    pub fn is_completed(&self) -> bool {
        self.current_round_cards.is_empty() || self.learned_count() == self.total_count()
    }

    pub fn phase_message(&self) -> String {
        if self.round_number == 1 {
            format!("Round {}: {} cards", self.round_number, self.total_count())
        } else {
            format!(
                "Round {} (Review): {} cards to retry",
                self.round_number,
                self.total_count()
            )
        }
    }

    /// Closes the session, early exits included, and summarises it.
    pub fn finish(&self, now: DateTime<Utc>) -> ReviewSession {
        let completed = self.all_cards.iter().filter(|card| card.is_learned).count();
        let duration = (now - self.started_at).num_seconds().max(0) as u64;
        ReviewSession::record_at(
            self.material_id,
            completed as u32,
            self.all_cards.len() as u32,
            duration,
            now,
        )
    }
}
