//! Error types shared by the scheduler, the stores and the study service.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use crate::generator::GeneratorError;

/// What kind of record a `NotFound` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Flashcard,
    Material,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Flashcard => "Flashcard",
            RecordKind::Material => "Material",
        };
        f.write_str(name)
    }
}

/// Failures of the persistence collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Performance score must be between 0 and 5, got {0}")]
    InvalidScore(i32),

    #[error("{kind} with ID {id} not found")]
    NotFound { kind: RecordKind, id: Uuid },

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

pub type Result<T> = std::result::Result<T, Error>;
