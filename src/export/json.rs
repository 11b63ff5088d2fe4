//! JSON import/export of decks.
//! Saves the question/answer pairs of one material to a file and loads them back.

use crate::error::StoreError;
use crate::models::Deck;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Exports a deck to a JSON file at the specified path.
pub fn export_json_to_path(deck: &Deck, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let json_string = serde_json::to_string_pretty(deck)?;
    let mut file = File::create(path.as_ref())?;
    file.write_all(json_string.as_bytes())?;
    log::info!(
        "exported {} flashcards to {}",
        deck.flashcards.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Imports a deck from a JSON file.
/// Fails if the file doesn't exist or doesn't contain a deck.
pub fn import_json(path: impl AsRef<Path>) -> Result<Deck, StoreError> {
    let mut file = File::open(path.as_ref())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let deck: Deck = serde_json::from_str(&contents)?;

    log::info!(
        "imported {} flashcards from {}",
        deck.flashcards.len(),
        path.as_ref().display()
    );
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeckCard;
    use std::fs;
    use uuid::Uuid;

    fn create_test_deck() -> Deck {
        Deck {
            material_id: Uuid::new_v4(),
            flashcards: vec![
                DeckCard {
                    question: "hello".to_string(),
                    answer: "cześć".to_string(),
                    difficulty_level: 3,
                },
                DeckCard {
                    question: "goodbye".to_string(),
                    answer: "do widzenia".to_string(),
                    difficulty_level: 4,
                },
            ],
        }
    }

    #[test]
    fn test_export_json_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let test_file = dir.path().join("test_export.json");

        export_json_to_path(&create_test_deck(), &test_file).unwrap();

        let written = fs::read_to_string(&test_file).unwrap();
        assert!(written.contains("\"materialId\""));
        assert!(written.contains("\"difficultyLevel\": 4"));
    }

    #[test]
    fn test_import_json() {
        let json_content = r#"{
  "materialId": "6f1c2a4e-8a57-4d53-9d39-3f1f0b2a9c10",
  "flashcards": [
    {
      "question": "test question",
      "answer": "test answer"
    }
  ]
}"#;

        let dir = tempfile::tempdir().unwrap();
        let test_file = dir.path().join("test_import.json");
        fs::write(&test_file, json_content).unwrap();

        let deck = import_json(&test_file).unwrap();
        assert_eq!(deck.flashcards.len(), 1);
        assert_eq!(deck.flashcards[0].question, "test question");
        assert_eq!(deck.flashcards[0].answer, "test answer");
        assert_eq!(deck.flashcards[0].difficulty_level, 3);
    }

    #[test]
    fn test_export_and_import_roundtrip() {
        let original_deck = create_test_deck();
        let dir = tempfile::tempdir().unwrap();
        let test_file = dir.path().join("test_roundtrip.json");

        export_json_to_path(&original_deck, &test_file).unwrap();
        let imported_deck = import_json(&test_file).unwrap();

        assert_eq!(original_deck, imported_deck);
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_json("nonexistent_file_xyz123.json");
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[test]
    fn test_import_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let test_file = dir.path().join("test_invalid.json");
        fs::write(&test_file, "{ this is not valid json }").unwrap();

        assert!(matches!(import_json(&test_file), Err(StoreError::Json(_))));
    }
}
