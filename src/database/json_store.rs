//! Flat JSON files, one array per collection, under namespaced file names
//! inside a data directory.

use super::{Result, Store};
use crate::models::{Flashcard, Material, ReviewSession};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

const FLASHCARDS_FILE: &str = "ai_study_flashcards.json";
const SESSIONS_FILE: &str = "ai_study_spaced_rep_sessions.json";
const MATERIALS_FILE: &str = "ai_study_materials.json";

pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        log::info!("using JSON store in {}", data_dir.display());
        Ok(Self { data_dir })
    }

    fn read_collection<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let path = self.data_dir.join(file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_collection<T: Serialize>(&self, file: &str, items: &[T]) -> Result<()> {
        let path = self.data_dir.join(file);
        write_atomically(&path, serde_json::to_string_pretty(items)?.as_bytes())?;
        log::debug!("wrote {} records to {}", items.len(), path.display());
        Ok(())
    }
}

/// Writes next to the target, then renames over it.
fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

impl Store for JsonFileStore {
    fn load_flashcards(&self) -> Result<Vec<Flashcard>> {
        self.read_collection(FLASHCARDS_FILE)
    }

    fn save_flashcards(&mut self, cards: &[Flashcard]) -> Result<()> {
        self.write_collection(FLASHCARDS_FILE, cards)
    }

    fn load_sessions(&self) -> Result<Vec<ReviewSession>> {
        self.read_collection(SESSIONS_FILE)
    }

    fn save_sessions(&mut self, sessions: &[ReviewSession]) -> Result<()> {
        self.write_collection(SESSIONS_FILE, sessions)
    }

    fn load_materials(&self) -> Result<Vec<Material>> {
        self.read_collection(MATERIALS_FILE)
    }

    fn save_materials(&mut self, materials: &[Material]) -> Result<()> {
        self.write_collection(MATERIALS_FILE, materials)
    }
}
