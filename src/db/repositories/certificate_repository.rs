use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{Certificate, NewCertificate};
use crate::db::DatabaseError;

const CERTIFICATE_COLUMNS: &str = "id, certificate_id, participant_id, event_id, \
     participant_name, event_title, event_duration, event_start_date, event_end_date, venue, \
     mode, signer_name, issued_by, issued_date, template_name, template_width, template_height, \
     verification_url, digital_signature, verified, image_data, image_content_type, \
     image_file_name, image_size, status, skills, audit_log, download_count, last_downloaded";

pub struct CertificateRepository;

impl CertificateRepository {
    /// The issuer's idempotency check reads through this: one row per
    /// (participant, event), enforced by the composite unique constraint.
    pub async fn find_by_pair(
        pool: &PgPool,
        participant_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<Certificate>, DatabaseError> {
        let certificate = sqlx::query_as::<_, Certificate>(&format!(
            "SELECT {CERTIFICATE_COLUMNS} FROM certificates \
             WHERE participant_id = $1 AND event_id = $2"
        ))
        .bind(participant_id)
        .bind(event_id)
        .fetch_optional(pool)
        .await?;

        Ok(certificate)
    }

    pub async fn find_by_certificate_id(
        pool: &PgPool,
        certificate_id: &str,
    ) -> Result<Option<Certificate>, DatabaseError> {
        let certificate = sqlx::query_as::<_, Certificate>(&format!(
            "SELECT {CERTIFICATE_COLUMNS} FROM certificates WHERE certificate_id = $1"
        ))
        .bind(certificate_id)
        .fetch_optional(pool)
        .await?;

        Ok(certificate)
    }

    pub async fn create(
        pool: &PgPool,
        new_certificate: &NewCertificate,
    ) -> Result<Certificate, DatabaseError> {
        let image_content_type =
            new_certificate.image_data.as_ref().map(|_| "image/png".to_string());

        let certificate = sqlx::query_as::<_, Certificate>(&format!(
            "INSERT INTO certificates (certificate_id, participant_id, event_id, \
                 participant_name, event_title, event_duration, event_start_date, \
                 event_end_date, venue, mode, signer_name, issued_by, issued_date, \
                 template_name, template_width, template_height, verification_url, \
                 digital_signature, image_data, image_content_type, image_file_name, \
                 image_size, skills, audit_log) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
                     $17, $18, $19, $20, $21, $22, $23, $24) \
             RETURNING {CERTIFICATE_COLUMNS}"
        ))
        .bind(&new_certificate.certificate_id)
        .bind(new_certificate.participant_id)
        .bind(new_certificate.event_id)
        .bind(&new_certificate.participant_name)
        .bind(&new_certificate.event_title)
        .bind(&new_certificate.event_duration)
        .bind(new_certificate.event_start_date)
        .bind(new_certificate.event_end_date)
        .bind(&new_certificate.venue)
        .bind(new_certificate.mode)
        .bind(&new_certificate.signer_name)
        .bind(new_certificate.issued_by)
        .bind(new_certificate.issued_date)
        .bind(&new_certificate.template_name)
        .bind(new_certificate.template_width)
        .bind(new_certificate.template_height)
        .bind(&new_certificate.verification_url)
        .bind(&new_certificate.digital_signature)
        .bind(&new_certificate.image_data)
        .bind(image_content_type)
        .bind(new_certificate.image_file_name())
        .bind(new_certificate.image_size())
        .bind(&new_certificate.skills)
        .bind(Json(&new_certificate.audit_log))
        .fetch_one(pool)
        .await?;

        Ok(certificate)
    }

    pub async fn list_for_participant(
        pool: &PgPool,
        participant_id: Uuid,
    ) -> Result<Vec<Certificate>, DatabaseError> {
        let certificates = sqlx::query_as::<_, Certificate>(&format!(
            "SELECT {CERTIFICATE_COLUMNS} FROM certificates \
             WHERE participant_id = $1 \
             ORDER BY issued_date DESC"
        ))
        .bind(participant_id)
        .fetch_all(pool)
        .await?;

        Ok(certificates)
    }
}
