//! Flashcard content generation.
//!
//! The language model that writes question/answer pairs lives outside this
//! crate. What comes back from it is validated here against a fixed schema:
//! a JSON array of `{"question": ..., "answer": ...}` objects and nothing else.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratedCard {
    pub question: String,
    pub answer: String,
}

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Failed to generate valid flashcards: {0}")]
    Malformed(String),

    #[error("Failed to read model output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Flashcard generation failed: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

pub trait FlashcardGenerator {
    /// Produces up to `count` question/answer pairs for `content`.
    fn generate(&self, content: &str, count: usize) -> Result<Vec<GeneratedCard>, GeneratorError>;
}

/// Strips one surrounding Markdown code fence, if the whole text is fenced.
fn unfence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string (`json`) on the opening line.
    match body.split_once('\n') {
        Some((info, inner)) if !info.trim().contains(char::is_whitespace) => inner.trim(),
        _ => body.trim(),
    }
}

/// Parses model output into flashcards, rejecting anything that isn't
/// exactly the expected document.
pub fn parse_generated_flashcards(text: &str) -> Result<Vec<GeneratedCard>, GeneratorError> {
    let body = unfence(text.trim());
    let cards: Vec<GeneratedCard> =
        serde_json::from_str(body).map_err(|e| GeneratorError::Malformed(e.to_string()))?;

    if cards.is_empty() {
        return Err(GeneratorError::Malformed("no flashcards in output".into()));
    }
    if let Some(pos) = cards
        .iter()
        .position(|c| c.question.trim().is_empty() || c.answer.trim().is_empty())
    {
        return Err(GeneratorError::Malformed(format!(
            "flashcard {} has an empty question or answer",
            pos + 1
        )));
    }

    Ok(cards)
}

/// Replays model output captured earlier, e.g. a response saved to a file.
pub struct ModelOutputGenerator {
    output: String,
}

impl ModelOutputGenerator {
    pub fn new(output: String) -> Self {
        Self { output }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GeneratorError> {
        Ok(Self::new(std::fs::read_to_string(path)?))
    }
}

impl FlashcardGenerator for ModelOutputGenerator {
    fn generate(&self, _content: &str, count: usize) -> Result<Vec<GeneratedCard>, GeneratorError> {
        let mut cards = parse_generated_flashcards(&self.output)?;
        cards.truncate(count);
        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_plain_array() {
        let cards = parse_generated_flashcards(
            r#" [{"question": "What is ATP?", "answer": "The cell's energy currency"}] "#,
        )
        .unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "What is ATP?");
    }

    #[test]
    fn test_parses_fenced_block() {
        let text = "```json\n[{\"question\": \"q\", \"answer\": \"a\"}]\n```";
        assert_eq!(parse_generated_flashcards(text).unwrap().len(), 1);

        let bare = "```\n[{\"question\": \"q\", \"answer\": \"a\"}]\n```";
        assert_eq!(parse_generated_flashcards(bare).unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_prose_around_json() {
        let text = r#"Sure! Here are your cards: [{"question": "q", "answer": "a"}] Hope this helps."#;
        assert!(matches!(
            parse_generated_flashcards(text),
            Err(GeneratorError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_schema_violations() {
        for text in [
            r#"[{"question": "q"}]"#,
            r#"[{"question": "q", "answer": "a", "hint": "h"}]"#,
            r#"[{"question": "q", "answer": 42}]"#,
            r#"{"question": "q", "answer": "a"}"#,
            r#"[{"question": "  ", "answer": "a"}]"#,
            "[]",
            "",
        ] {
            assert!(
                matches!(parse_generated_flashcards(text), Err(GeneratorError::Malformed(_))),
                "accepted {text:?}"
            );
        }
    }

    #[test]
    fn test_replay_generator_limits_count() {
        let generator = ModelOutputGenerator::new(
            r#"[{"question": "1", "answer": "a"}, {"question": "2", "answer": "b"}, {"question": "3", "answer": "c"}]"#
                .to_string(),
        );
        let cards = generator.generate("ignored", 2).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].question, "2");
    }

    #[test]
    fn test_replay_from_missing_file() {
        assert!(matches!(
            ModelOutputGenerator::from_file("nonexistent_file_xyz123.json"),
            Err(GeneratorError::Io(_))
        ));
    }
}
