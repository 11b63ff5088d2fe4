pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod generator;
pub mod models;
pub mod service;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{Deck, Flashcard, LearningSession, Material, ReviewSession, Score};
pub use service::StudyService;
