//! Persistence for flashcards, review sessions and materials.
//!
//! Every store hands out and takes back whole collections; the scheduler
//! never sees how they are laid out.

pub mod db;
pub mod json_store;

use crate::config::{Config, StorageBackend};
use crate::error::StoreError;
use crate::models::{Flashcard, Material, ReviewSession};

pub use db::SqliteStore;
pub use json_store::JsonFileStore;

pub type Result<T> = std::result::Result<T, StoreError>;

pub trait Store {
    fn load_flashcards(&self) -> Result<Vec<Flashcard>>;
    fn save_flashcards(&mut self, cards: &[Flashcard]) -> Result<()>;

    fn load_sessions(&self) -> Result<Vec<ReviewSession>>;
    fn save_sessions(&mut self, sessions: &[ReviewSession]) -> Result<()>;

    fn load_materials(&self) -> Result<Vec<Material>>;
    fn save_materials(&mut self, materials: &[Material]) -> Result<()>;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn load_flashcards(&self) -> Result<Vec<Flashcard>> {
        (**self).load_flashcards()
    }

    fn save_flashcards(&mut self, cards: &[Flashcard]) -> Result<()> {
        (**self).save_flashcards(cards)
    }

    fn load_sessions(&self) -> Result<Vec<ReviewSession>> {
        (**self).load_sessions()
    }

    fn save_sessions(&mut self, sessions: &[ReviewSession]) -> Result<()> {
        (**self).save_sessions(sessions)
    }

    fn load_materials(&self) -> Result<Vec<Material>> {
        (**self).load_materials()
    }

    fn save_materials(&mut self, materials: &[Material]) -> Result<()> {
        (**self).save_materials(materials)
    }
}

/// Opens the store selected by `config`.
pub fn open_store(config: &Config) -> Result<Box<dyn Store>> {
    match config.storage {
        StorageBackend::Sqlite => {
            std::fs::create_dir_all(&config.data_dir)?;
            Ok(Box::new(SqliteStore::open(config.database_path())?))
        }
        StorageBackend::Json => Ok(Box::new(JsonFileStore::open(&config.data_dir)?)),
    }
}

/// Keeps everything in memory. Used by tests and as a scratch store.
#[derive(Default, Clone, Debug)]
pub struct MemoryStore {
    flashcards: Vec<Flashcard>,
    sessions: Vec<ReviewSession>,
    materials: Vec<Material>,
}

impl Store for MemoryStore {
    fn load_flashcards(&self) -> Result<Vec<Flashcard>> {
        Ok(self.flashcards.clone())
    }

    fn save_flashcards(&mut self, cards: &[Flashcard]) -> Result<()> {
        self.flashcards = cards.to_vec();
        Ok(())
    }

    fn load_sessions(&self) -> Result<Vec<ReviewSession>> {
        Ok(self.sessions.clone())
    }

    fn save_sessions(&mut self, sessions: &[ReviewSession]) -> Result<()> {
        self.sessions = sessions.to_vec();
        Ok(())
    }

    fn load_materials(&self) -> Result<Vec<Material>> {
        Ok(self.materials.clone())
    }

    fn save_materials(&mut self, materials: &[Material]) -> Result<()> {
        self.materials = materials.to_vec();
        Ok(())
    }
}
