//! Runtime configuration read from the environment (and an optional `.env`).
//!
//! - `STUDY_HUB_DATA_DIR`: directory holding the data files (default `.`)
//! - `STUDY_HUB_STORAGE`: `sqlite` or `json` (default `sqlite`)
//! - `STUDY_HUB_FLASHCARD_COUNT`: cards requested per generation (default 10)

use std::path::PathBuf;

pub const DEFAULT_FLASHCARD_COUNT: usize = 10;
const DATABASE_FILE: &str = "study_hub.sqlite3";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub storage: StorageBackend,
    pub flashcard_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            storage: StorageBackend::default(),
            flashcard_count: DEFAULT_FLASHCARD_COUNT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("ignoring .env: {}", e);
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let storage = match get("STUDY_HUB_STORAGE").map(|v| v.trim().to_ascii_lowercase()) {
            None => defaults.storage,
            Some(v) if v == "sqlite" => StorageBackend::Sqlite,
            Some(v) if v == "json" => StorageBackend::Json,
            Some(other) => {
                log::warn!("unknown STUDY_HUB_STORAGE '{}', using sqlite", other);
                StorageBackend::Sqlite
            }
        };

        let flashcard_count = match get("STUDY_HUB_FLASHCARD_COUNT") {
            None => defaults.flashcard_count,
            Some(v) => match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    log::warn!("invalid STUDY_HUB_FLASHCARD_COUNT '{}', using {}", v, DEFAULT_FLASHCARD_COUNT);
                    DEFAULT_FLASHCARD_COUNT
                }
            },
        };

        Self {
            data_dir: get("STUDY_HUB_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            storage,
            flashcard_count,
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}
