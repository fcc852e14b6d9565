use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{EnrollmentRecord, EnrollmentWithEvent};
use crate::db::DatabaseError;

const ENROLLMENT_COLUMNS: &str = "id, participant_id, event_id, attended, feedback_given, \
     certificate_generated, attendance_marked_date, feedback_date, certificate_generated_date, \
     certificate_id, created_at, updated_at";

pub struct EnrollmentRepository;

impl EnrollmentRepository {
    /// Creates the lifecycle record with all flags false. A second
    /// registration for the same pair trips the composite unique
    /// constraint and surfaces as `Duplicate`.
    pub async fn register(
        pool: &PgPool,
        participant_id: Uuid,
        event_id: Uuid,
    ) -> Result<EnrollmentRecord, DatabaseError> {
        let record = sqlx::query_as::<_, EnrollmentRecord>(&format!(
            "INSERT INTO enrollments (participant_id, event_id) \
             VALUES ($1, $2) \
             RETURNING {ENROLLMENT_COLUMNS}"
        ))
        .bind(participant_id)
        .bind(event_id)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    pub async fn find(
        pool: &PgPool,
        participant_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<EnrollmentRecord>, DatabaseError> {
        let record = sqlx::query_as::<_, EnrollmentRecord>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments \
             WHERE participant_id = $1 AND event_id = $2"
        ))
        .bind(participant_id)
        .bind(event_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Legacy lookup path: the enrollment record carries the issued
    /// certificate id denormalized.
    pub async fn find_by_certificate_id(
        pool: &PgPool,
        certificate_id: &str,
    ) -> Result<Option<EnrollmentRecord>, DatabaseError> {
        let record = sqlx::query_as::<_, EnrollmentRecord>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE certificate_id = $1"
        ))
        .bind(certificate_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn list_for_participant(
        pool: &PgPool,
        participant_id: Uuid,
    ) -> Result<Vec<EnrollmentWithEvent>, DatabaseError> {
        let records = sqlx::query_as::<_, EnrollmentWithEvent>(
            "SELECT en.id, en.participant_id, en.event_id, en.attended, en.feedback_given, \
                    en.certificate_generated, en.certificate_id, \
                    ev.title AS event_title, ev.start_date AS event_start_date, \
                    ev.end_date AS event_end_date, ev.venue, en.created_at \
             FROM enrollments en \
             JOIN events ev ON ev.id = en.event_id \
             WHERE en.participant_id = $1 \
             ORDER BY ev.start_date DESC",
        )
        .bind(participant_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn mark_attended(
        pool: &PgPool,
        participant_id: Uuid,
        event_id: Uuid,
    ) -> Result<EnrollmentRecord, DatabaseError> {
        Self::set_flag(
            pool,
            participant_id,
            event_id,
            "SET attended = TRUE, attendance_marked_date = NOW(), updated_at = NOW()",
        )
        .await
    }

    pub async fn mark_feedback_given(
        pool: &PgPool,
        participant_id: Uuid,
        event_id: Uuid,
    ) -> Result<EnrollmentRecord, DatabaseError> {
        Self::set_flag(
            pool,
            participant_id,
            event_id,
            "SET feedback_given = TRUE, feedback_date = NOW(), updated_at = NOW()",
        )
        .await
    }

    pub async fn mark_certificate_issued(
        pool: &PgPool,
        participant_id: Uuid,
        event_id: Uuid,
        certificate_id: &str,
    ) -> Result<EnrollmentRecord, DatabaseError> {
        let record = sqlx::query_as::<_, EnrollmentRecord>(&format!(
            "UPDATE enrollments \
             SET certificate_generated = TRUE, certificate_generated_date = NOW(), \
                 certificate_id = $3, updated_at = NOW() \
             WHERE participant_id = $1 AND event_id = $2 \
             RETURNING {ENROLLMENT_COLUMNS}"
        ))
        .bind(participant_id)
        .bind(event_id)
        .bind(certificate_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DatabaseError::NotFound)?;

        Ok(record)
    }

    // Flags only ever move to TRUE; there is deliberately no operation
    // that writes FALSE back into a lifecycle column.
    async fn set_flag(
        pool: &PgPool,
        participant_id: Uuid,
        event_id: Uuid,
        set_clause: &str,
    ) -> Result<EnrollmentRecord, DatabaseError> {
        let record = sqlx::query_as::<_, EnrollmentRecord>(&format!(
            "UPDATE enrollments {set_clause} \
             WHERE participant_id = $1 AND event_id = $2 \
             RETURNING {ENROLLMENT_COLUMNS}"
        ))
        .bind(participant_id)
        .bind(event_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DatabaseError::NotFound)?;

        Ok(record)
    }
}
