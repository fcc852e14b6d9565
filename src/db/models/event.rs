use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "event_mode", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventMode {
    Online,
    Offline,
    Hybrid,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub start_date: OffsetDateTime,
    pub end_date: OffsetDateTime,
    pub venue: String,
    pub mode: EventMode,
    pub duration: Option<String>,
    pub skills: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Event {
    /// Display duration, defaulting single-session events the way the
    /// certificate template expects.
    pub fn display_duration(&self) -> String {
        self.duration.clone().unwrap_or_else(|| "1 Day".to_string())
    }
}
