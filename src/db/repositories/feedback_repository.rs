use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{FeedbackSubmission, NewFeedback};
use crate::db::DatabaseError;

const FEEDBACK_COLUMNS: &str = "id, participant_id, event_id, name, email, designation, \
     institute, contact, responses, overall_rating, submission_source, created_at";

pub struct FeedbackRepository;

impl FeedbackRepository {
    /// At most one submission per (participant, event); the composite
    /// unique constraint turns a concurrent duplicate into `Duplicate`.
    pub async fn create(
        pool: &PgPool,
        new_feedback: &NewFeedback,
    ) -> Result<FeedbackSubmission, DatabaseError> {
        let submission = sqlx::query_as::<_, FeedbackSubmission>(&format!(
            "INSERT INTO feedback (participant_id, event_id, name, email, designation, \
                                   institute, contact, responses, overall_rating, \
                                   submission_source) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {FEEDBACK_COLUMNS}"
        ))
        .bind(new_feedback.participant_id)
        .bind(new_feedback.event_id)
        .bind(&new_feedback.name)
        .bind(&new_feedback.email)
        .bind(&new_feedback.designation)
        .bind(&new_feedback.institute)
        .bind(&new_feedback.contact)
        .bind(Json(&new_feedback.responses))
        .bind(new_feedback.overall_rating)
        .bind(&new_feedback.submission_source)
        .fetch_one(pool)
        .await?;

        Ok(submission)
    }

    #[allow(unused)]
    pub async fn find(
        pool: &PgPool,
        participant_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<FeedbackSubmission>, DatabaseError> {
        let submission = sqlx::query_as::<_, FeedbackSubmission>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback \
             WHERE participant_id = $1 AND event_id = $2"
        ))
        .bind(participant_id)
        .bind(event_id)
        .fetch_optional(pool)
        .await?;

        Ok(submission)
    }
}
