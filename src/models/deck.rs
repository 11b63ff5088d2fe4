//! Portable deck: the question/answer pairs of one material, without any
//! scheduling state. Used for JSON import/export.
use super::Flashcard;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckCard {
    pub question: String,
    pub answer: String,
    #[serde(default = "default_difficulty")]
    pub difficulty_level: u8,
}

fn default_difficulty() -> u8 {
    super::flashcard::DEFAULT_DIFFICULTY
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub material_id: Uuid,
    pub flashcards: Vec<DeckCard>,
}

impl Deck {
    /// Collects the cards belonging to `material_id`, dropping their scheduling state.
    pub fn from_cards<'a>(material_id: Uuid, cards: impl IntoIterator<Item = &'a Flashcard>) -> Self {
        let flashcards = cards
            .into_iter()
            .filter(|card| card.material_id == material_id)
            .map(|card| DeckCard {
                question: card.question.clone(),
                answer: card.answer.clone(),
                difficulty_level: card.difficulty_level,
            })
            .collect();
        Self {
            material_id,
            flashcards,
        }
    }
}
