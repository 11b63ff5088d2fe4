//! SQLite-backed store
//!
//! Handles database initialization and whole-collection reads and writes for
//! flashcards (with their SM-2 state), review sessions and materials.

use super::{Result, Store};
use crate::models::{Flashcard, Material, MaterialKind, ReviewSession};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use std::path::Path;
use uuid::Uuid;

/// Creates the tables if they don't exist yet.
///
/// `position` keeps collections in the order they were saved.
pub fn init_database(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS materials (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            content TEXT NOT NULL,
            date_added TEXT NOT NULL
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS flashcards (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            material_id TEXT NOT NULL,
            question TEXT NOT NULL,
            answer TEXT NOT NULL,
            difficulty_level INTEGER NOT NULL DEFAULT 3,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            interval_days INTEGER NOT NULL DEFAULT 0,
            repetition_count INTEGER NOT NULL DEFAULT 0,
            next_review_date TEXT NOT NULL,
            last_review_date TEXT
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS review_sessions (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            material_id TEXT NOT NULL,
            cards_completed INTEGER NOT NULL,
            total_cards INTEGER NOT NULL,
            duration_secs INTEGER NOT NULL,
            date TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn kind_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<MaterialKind> {
    let text: String = row.get(idx)?;
    serde_json::from_value(serde_json::Value::String(text))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn kind_name(kind: MaterialKind) -> Result<String> {
    match serde_json::to_value(kind)? {
        serde_json::Value::String(name) => Ok(name),
        other => Ok(other.to_string()),
    }
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        init_database(&conn)?;
        log::info!("opened SQLite store at {}", path.as_ref().display());
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_database(&conn)?;
        Ok(Self { conn })
    }
}

impl Store for SqliteStore {
    fn load_flashcards(&self) -> Result<Vec<Flashcard>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, material_id, question, answer, difficulty_level, ease_factor,
                    interval_days, repetition_count, next_review_date, last_review_date
             FROM flashcards ORDER BY position ASC",
        )?;

        let cards = stmt
            .query_map([], |row| {
                Ok(Flashcard {
                    id: uuid_column(row, 0)?,
                    material_id: uuid_column(row, 1)?,
                    question: row.get(2)?,
                    answer: row.get(3)?,
                    difficulty_level: row.get(4)?,
                    ease_factor: row.get(5)?,
                    interval_days: row.get(6)?,
                    repetition_count: row.get(7)?,
                    next_review_date: row.get(8)?,
                    last_review_date: row.get(9)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(cards)
    }

    fn save_flashcards(&mut self, cards: &[Flashcard]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM flashcards", ())?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO flashcards (id, position, material_id, question, answer, difficulty_level,
                    ease_factor, interval_days, repetition_count, next_review_date, last_review_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for (position, card) in cards.iter().enumerate() {
                insert.execute(params![
                    card.id.to_string(),
                    position as i64,
                    card.material_id.to_string(),
                    card.question,
                    card.answer,
                    card.difficulty_level,
                    card.ease_factor,
                    card.interval_days,
                    card.repetition_count,
                    card.next_review_date,
                    card.last_review_date,
                ])?;
            }
        }
        tx.commit()?;
        log::debug!("saved {} flashcards", cards.len());
        Ok(())
    }

    fn load_sessions(&self) -> Result<Vec<ReviewSession>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, material_id, cards_completed, total_cards, duration_secs, date
             FROM review_sessions ORDER BY position ASC",
        )?;

        let sessions = stmt
            .query_map([], |row| {
                Ok(ReviewSession {
                    id: uuid_column(row, 0)?,
                    material_id: uuid_column(row, 1)?,
                    cards_completed: row.get(2)?,
                    total_cards: row.get(3)?,
                    duration: row.get::<_, i64>(4)? as u64,
                    date: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(sessions)
    }

    fn save_sessions(&mut self, sessions: &[ReviewSession]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM review_sessions", ())?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO review_sessions (id, position, material_id, cards_completed, total_cards, duration_secs, date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (position, session) in sessions.iter().enumerate() {
                insert.execute(params![
                    session.id.to_string(),
                    position as i64,
                    session.material_id.to_string(),
                    session.cards_completed,
                    session.total_cards,
                    session.duration as i64,
                    session.date,
                ])?;
            }
        }
        tx.commit()?;
        log::debug!("saved {} review sessions", sessions.len());
        Ok(())
    }

    fn load_materials(&self) -> Result<Vec<Material>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, kind, content, date_added FROM materials ORDER BY position ASC",
        )?;

        let materials = stmt
            .query_map([], |row| {
                Ok(Material {
                    id: uuid_column(row, 0)?,
                    name: row.get(1)?,
                    kind: kind_column(row, 2)?,
                    content: row.get(3)?,
                    date_added: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(materials)
    }

    fn save_materials(&mut self, materials: &[Material]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM materials", ())?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO materials (id, position, name, kind, content, date_added)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (position, material) in materials.iter().enumerate() {
                insert.execute(params![
                    material.id.to_string(),
                    position as i64,
                    material.name,
                    kind_name(material.kind)?,
                    material.content,
                    material.date_added,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::*;
    use chrono::Utc;

    #[test]
    fn test_flashcards_roundtrip() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let material = Uuid::new_v4();
        let cards = vec![
            reviewed_card(material),
            Flashcard::new(material, "dziękuję".into(), "thank you".into(), Utc::now()),
            reviewed_card(Uuid::new_v4()),
        ];

        store.save_flashcards(&cards).unwrap();
        assert_eq!(store.load_flashcards().unwrap(), cards);
    }

    #[test]
    fn test_save_replaces_previous_collection() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let material = Uuid::new_v4();
        let first = vec![reviewed_card(material), reviewed_card(material)];
        store.save_flashcards(&first).unwrap();

        let second = vec![first[1].clone()];
        store.save_flashcards(&second).unwrap();
        assert_eq!(store.load_flashcards().unwrap(), second);
    }

    #[test]
    fn test_sessions_and_materials_roundtrip() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let material = sample_material();
        let sessions = vec![sample_session(material.id), sample_session(material.id)];

        store.save_sessions(&sessions).unwrap();
        store.save_materials(&[material.clone()]).unwrap();

        assert_eq!(store.load_sessions().unwrap(), sessions);
        assert_eq!(store.load_materials().unwrap(), vec![material]);
    }

    #[test]
    fn test_reopen_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study_hub.sqlite3");
        let card = reviewed_card(Uuid::new_v4());

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.save_flashcards(&[card.clone()]).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.load_flashcards().unwrap(), vec![card]);
    }

    #[test]
    fn test_corrupt_id_is_an_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO review_sessions VALUES ('not-a-uuid', 0, 'x', 1, 1, 1, '2024-01-01 00:00:00+00:00')",
                (),
            )
            .unwrap();
        assert!(store.load_sessions().is_err());
    }
}
