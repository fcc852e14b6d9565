use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;

/// One lifecycle record per (participant, event) pair. Flags only move
/// forward: no repository operation writes `false` into a flag column.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
    pub id: Uuid,
    pub participant_id: Uuid,
    pub event_id: Uuid,
    pub attended: bool,
    pub feedback_given: bool,
    pub certificate_generated: bool,
    pub attendance_marked_date: Option<OffsetDateTime>,
    pub feedback_date: Option<OffsetDateTime>,
    pub certificate_generated_date: Option<OffsetDateTime>,
    pub certificate_id: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Enrollment joined with the event columns the participant dashboard
/// needs when listing "my events".
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentWithEvent {
    pub id: Uuid,
    pub participant_id: Uuid,
    pub event_id: Uuid,
    pub attended: bool,
    pub feedback_given: bool,
    pub certificate_generated: bool,
    pub certificate_id: Option<String>,
    pub event_title: String,
    pub event_start_date: OffsetDateTime,
    pub event_end_date: OffsetDateTime,
    pub venue: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub participant_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    pub participant_id: Uuid,
}
