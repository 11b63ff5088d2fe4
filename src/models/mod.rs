pub mod deck;
pub mod flashcard;
pub mod learning_card;
pub mod learning_session;
pub mod material;
pub mod review_session;
pub mod scheduler;
pub mod sm2;

pub use deck::{Deck, DeckCard};
pub use flashcard::{CardPhase, DifficultyBucket, Flashcard};
pub use learning_card::LearningCard;
pub use learning_session::LearningSession;
pub use material::{Material, MaterialKind};
pub use review_session::ReviewSession;
pub use sm2::Score;
