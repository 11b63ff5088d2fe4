use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary of one finished study session. Never updated after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSession {
    pub id: Uuid,
    pub material_id: Uuid,
    pub cards_completed: u32,
    pub total_cards: u32,
    pub date: DateTime<Utc>,
    /// Seconds.
    pub duration: u64,
}

impl ReviewSession {
    pub fn record(material_id: Uuid, cards_completed: u32, total_cards: u32, duration_seconds: u64) -> Self {
        Self::record_at(material_id, cards_completed, total_cards, duration_seconds, Utc::now())
    }

    pub fn record_at(
        material_id: Uuid,
        cards_completed: u32,
        total_cards: u32,
        duration_seconds: u64,
        date: DateTime<Utc>,
    ) -> Self {
        if cards_completed > total_cards {
            log::warn!(
                "session for material {} completed {} of {} cards",
                material_id,
                cards_completed,
                total_cards
            );
        }
        Self {
            id: Uuid::new_v4(),
            material_id,
            cards_completed,
            total_cards,
            date,
            duration: duration_seconds,
        }
    }
}
