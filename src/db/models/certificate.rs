use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::types::{Json, Uuid};
use time::OffsetDateTime;

use super::event::EventMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "certificate_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    Generated,
    Revoked,
}

/// Append-only trail of certificate actions; the first entry is always
/// `created`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub action: String,
    pub performed_by: Uuid,
    pub details: String,
    pub timestamp: OffsetDateTime,
}

impl AuditLogEntry {
    pub fn created(performed_by: Uuid, details: &str) -> Self {
        Self {
            action: "created".to_string(),
            performed_by,
            details: details.to_string(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Certificate {
    pub id: Uuid,
    pub certificate_id: String,
    pub participant_id: Uuid,
    pub event_id: Uuid,
    pub participant_name: String,
    pub event_title: String,
    pub event_duration: String,
    pub event_start_date: OffsetDateTime,
    pub event_end_date: OffsetDateTime,
    pub venue: String,
    pub mode: EventMode,
    pub signer_name: String,
    pub issued_by: Uuid,
    pub issued_date: OffsetDateTime,
    pub template_name: String,
    pub template_width: i32,
    pub template_height: i32,
    pub verification_url: String,
    pub digital_signature: String,
    pub verified: bool,
    pub image_data: Option<Vec<u8>>,
    pub image_content_type: Option<String>,
    pub image_file_name: Option<String>,
    pub image_size: Option<i64>,
    pub status: CertificateStatus,
    pub skills: Vec<String>,
    pub audit_log: Json<Vec<AuditLogEntry>>,
    pub download_count: i32,
    pub last_downloaded: Option<OffsetDateTime>,
}

impl Certificate {
    pub fn has_image(&self) -> bool {
        self.image_data.is_some()
    }
}

/// Insert payload for a freshly issued certificate. `image_*` fields are
/// absent when rendering failed; issuance proceeds regardless.
#[derive(Debug, Clone)]
pub struct NewCertificate {
    pub certificate_id: String,
    pub participant_id: Uuid,
    pub event_id: Uuid,
    pub participant_name: String,
    pub event_title: String,
    pub event_duration: String,
    pub event_start_date: OffsetDateTime,
    pub event_end_date: OffsetDateTime,
    pub venue: String,
    pub mode: EventMode,
    pub signer_name: String,
    pub issued_by: Uuid,
    pub issued_date: OffsetDateTime,
    pub template_name: String,
    pub template_width: i32,
    pub template_height: i32,
    pub verification_url: String,
    pub digital_signature: String,
    pub image_data: Option<Vec<u8>>,
    pub skills: Vec<String>,
    pub audit_log: Vec<AuditLogEntry>,
}

impl NewCertificate {
    pub fn image_file_name(&self) -> Option<String> {
        self.image_data
            .as_ref()
            .map(|_| format!("certificate-{}.png", self.certificate_id))
    }

    pub fn image_size(&self) -> Option<i64> {
        self.image_data.as_ref().map(|buf| buf.len() as i64)
    }
}

/// Public summary returned to callers; never carries the image payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateSummary {
    pub certificate_id: String,
    pub participant_name: String,
    pub event_title: String,
    pub issued_date: OffsetDateTime,
    pub verified: bool,
    pub skills: Vec<String>,
    pub description: String,
}

impl From<&Certificate> for CertificateSummary {
    fn from(cert: &Certificate) -> Self {
        Self {
            certificate_id: cert.certificate_id.clone(),
            participant_name: cert.participant_name.clone(),
            event_title: cert.event_title.clone(),
            issued_date: cert.issued_date,
            verified: cert.verified,
            skills: cert.skills.clone(),
            description: format!("Certificate of completion for {}", cert.event_title),
        }
    }
}

const ID_PREFIX: &str = "CERT";
const SUFFIX_LEN: usize = 9;
const SUFFIX_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// `CERT-<unix millis>-<9 uppercase base36 chars>`. Collisions are
/// accepted as negligible; the storage layer's unique constraints are
/// the actual guarantee.
pub fn generate_certificate_id() -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{ID_PREFIX}-{millis}-{suffix}")
}

/// Checks the `CERT-<digits>-<9 base36 chars>` shape without touching
/// storage.
pub fn is_well_formed_certificate_id(id: &str) -> bool {
    let mut parts = id.splitn(3, '-');
    let (Some(prefix), Some(millis), Some(suffix)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    prefix == ID_PREFIX
        && !millis.is_empty()
        && millis.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == SUFFIX_LEN
        && suffix.bytes().all(|b| SUFFIX_ALPHABET.contains(&b))
}

/// Verification signature embedded in the certificate record, derived
/// from the certificate id alone.
pub fn digital_signature_for(certificate_id: &str) -> String {
    BASE64.encode(certificate_id.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_well_formed() {
        for _ in 0..50 {
            let id = generate_certificate_id();
            assert!(is_well_formed_certificate_id(&id), "malformed id: {id}");
        }
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = generate_certificate_id();
        let b = generate_certificate_id();
        assert_ne!(a, b);
    }

    #[test]
    fn well_formedness_rejects_wrong_shapes() {
        assert!(is_well_formed_certificate_id("CERT-1722470400000-A1B2C3D4E"));
        assert!(!is_well_formed_certificate_id("CERT-1722470400000"));
        assert!(!is_well_formed_certificate_id("CERT-1722470400000-a1b2c3d4e"));
        assert!(!is_well_formed_certificate_id("CERT-1722470400000-A1B2C3D4"));
        assert!(!is_well_formed_certificate_id("CRED-1722470400000-A1B2C3D4E"));
        assert!(!is_well_formed_certificate_id("CERT-17224x0400000-A1B2C3D4E"));
        assert!(!is_well_formed_certificate_id(""));
    }

    #[test]
    fn digital_signature_is_base64_of_the_id() {
        let sig = digital_signature_for("CERT-1-ABCDEFGHI");
        assert_eq!(BASE64.decode(sig).unwrap(), b"CERT-1-ABCDEFGHI");
    }

    #[test]
    fn audit_trail_starts_with_created() {
        let actor = Uuid::new_v4();
        let entry = AuditLogEntry::created(actor, "Certificate generated after feedback submission");
        assert_eq!(entry.action, "created");
        assert_eq!(entry.performed_by, actor);
    }
}
