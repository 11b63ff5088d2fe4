//! Study material that flashcards are generated from.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Pdf,
    #[default]
    Text,
    Docx,
    Pptx,
    Image,
    Audio,
    Url,
    Note,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    pub content: String,
    pub date_added: DateTime<Utc>,
}

impl Material {
    pub fn new(name: String, kind: MaterialKind, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            content,
            date_added: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_type() {
        let material = Material::new("Cells".into(), MaterialKind::Pdf, "Mitochondria...".into());
        let value = serde_json::to_value(&material).unwrap();
        assert_eq!(value["type"], "pdf");
        assert_eq!(value["name"], "Cells");
        assert!(value.get("dateAdded").is_some());
    }
}
