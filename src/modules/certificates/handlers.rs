use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::{
    Certificate, CertificateRepository, CertificateStatus, EnrollmentRepository, EventMode,
    EventRepository, UserRepository,
};
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCertificatesQuery {
    #[serde(default)]
    pub include_preview: bool,
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventDates {
    start_date: OffsetDateTime,
    end_date: OffsetDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateInfo {
    name: String,
    width: i32,
    height: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerificationInfo {
    verification_url: String,
    verified: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BufferInfo {
    has_image_buffer: bool,
    image_size: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CertificateListItem {
    id: Uuid,
    participant_id: Uuid,
    event_id: Uuid,
    title: String,
    event_title: String,
    issued_date: OffsetDateTime,
    certificate_id: String,
    verified: bool,
    skills: Vec<String>,
    description: String,
    status: CertificateStatus,
    download_count: i32,
    event_dates: EventDates,
    venue: String,
    mode: EventMode,
    last_downloaded: Option<OffsetDateTime>,
    template: TemplateInfo,
    verification: VerificationInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    buffer_info: Option<BufferInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview_image: Option<String>,
}

impl CertificateListItem {
    fn from_certificate(cert: &Certificate, detailed: bool, include_preview: bool) -> Self {
        Self {
            id: cert.id,
            participant_id: cert.participant_id,
            event_id: cert.event_id,
            title: format!("Certificate of Completion - {}", cert.event_title),
            event_title: cert.event_title.clone(),
            issued_date: cert.issued_date,
            certificate_id: cert.certificate_id.clone(),
            verified: cert.verified,
            skills: cert.skills.clone(),
            description: format!("Certificate of completion for {}", cert.event_title),
            status: cert.status,
            download_count: cert.download_count,
            event_dates: EventDates {
                start_date: cert.event_start_date,
                end_date: cert.event_end_date,
            },
            venue: cert.venue.clone(),
            mode: cert.mode,
            last_downloaded: cert.last_downloaded,
            template: TemplateInfo {
                name: cert.template_name.clone(),
                width: cert.template_width,
                height: cert.template_height,
            },
            verification: VerificationInfo {
                verification_url: cert.verification_url.clone(),
                verified: cert.verified,
            },
            buffer_info: detailed.then(|| BufferInfo {
                has_image_buffer: cert.has_image(),
                image_size: cert.image_size.unwrap_or(0),
            }),
            preview_image: (include_preview && cert.has_image())
                .then(|| image_data_url(cert))
                .flatten(),
        }
    }
}

fn image_data_url(cert: &Certificate) -> Option<String> {
    cert.image_data
        .as_ref()
        .map(|buf| format!("data:image/png;base64,{}", BASE64.encode(buf)))
}

/// Caller identity forwarded by the (external) auth layer; absent for
/// unauthenticated internal calls.
fn caller_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
}

/// Owner or elevated role only; an absent identity is left to the auth
/// layer upstream and not re-checked here.
async fn authorize_certificate_access(
    pool: &PgPool,
    caller: Option<Uuid>,
    owner: Uuid,
) -> AppResult<()> {
    let Some(caller) = caller else {
        return Ok(());
    };
    if caller == owner {
        return Ok(());
    }
    match UserRepository::find_by_id(pool, caller).await? {
        Some(user) if user.role.is_elevated() => Ok(()),
        _ => Err(AppError::Permission(
            "You do not have permission to view this certificate".to_string(),
        )),
    }
}

/// GET /certificates/:participant_id
pub async fn list_certificates(
    State(state): State<AppState>,
    Path(participant_id): Path<Uuid>,
    Query(query): Query<ListCertificatesQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let format = query.format.unwrap_or_else(|| "summary".to_string());
    let detailed = format == "detailed";

    let certificates =
        CertificateRepository::list_for_participant(&state.db, participant_id).await?;

    let data: Vec<CertificateListItem> = certificates
        .iter()
        .map(|cert| CertificateListItem::from_certificate(cert, detailed, query.include_preview))
        .collect();
    let total = data.len();

    Ok(Json(json!({
        "success": true,
        "message": "Certificates retrieved successfully",
        "data": data,
        "meta": {
            "total": total,
            "format": format,
            "includePreview": query.include_preview,
        }
    })))
}

/// GET /certificates/preview/:certificate_id
pub async fn certificate_preview(
    State(state): State<AppState>,
    Path(certificate_id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Json<serde_json::Value>> {
    let certificate = CertificateRepository::find_by_certificate_id(&state.db, &certificate_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Certificate not found".to_string()))?;

    let caller = caller_from_headers(&headers);
    authorize_certificate_access(&state.db, caller, certificate.participant_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Certificate preview retrieved successfully",
        "data": {
            "certificateId": certificate.certificate_id,
            "participantName": certificate.participant_name,
            "eventTitle": certificate.event_title,
            "eventDates": EventDates {
                start_date: certificate.event_start_date,
                end_date: certificate.event_end_date,
            },
            "venue": certificate.venue,
            "mode": certificate.mode,
            "signedBy": certificate.signer_name,
            "issuedDate": certificate.issued_date,
            "status": certificate.status,
            "skills": certificate.skills,
            "template": TemplateInfo {
                name: certificate.template_name.clone(),
                width: certificate.template_width,
                height: certificate.template_height,
            },
            "verification": VerificationInfo {
                verification_url: certificate.verification_url.clone(),
                verified: certificate.verified,
            },
            "downloadCount": certificate.download_count,
            "lastDownloaded": certificate.last_downloaded,
            "hasImageBuffer": certificate.has_image(),
        }
    })))
}

/// GET /certificates/image/:certificate_id
pub async fn certificate_image(
    State(state): State<AppState>,
    Path(certificate_id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Json<serde_json::Value>> {
    let certificate = CertificateRepository::find_by_certificate_id(&state.db, &certificate_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Certificate not found".to_string()))?;

    let caller = caller_from_headers(&headers);
    authorize_certificate_access(&state.db, caller, certificate.participant_id).await?;

    let image_data_url = image_data_url(&certificate)
        .ok_or_else(|| AppError::NotFound("Certificate image not available".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "message": "Certificate image retrieved successfully",
        "data": {
            "certificateId": certificate.certificate_id,
            "imageDataUrl": image_data_url,
            "contentType": certificate.image_content_type,
            "size": certificate.image_size.unwrap_or(0),
        }
    })))
}

/// GET /certificates/verify/:certificate_id
///
/// Total over unknown ids: an unknown certificate is `valid: false`,
/// never an error. Falls back to the enrollment record's denormalized
/// certificate id so degraded-path certificates still verify.
pub async fn verify_certificate(
    State(state): State<AppState>,
    Path(certificate_id): Path<String>,
) -> AppResult<Response> {
    if let Some(certificate) =
        CertificateRepository::find_by_certificate_id(&state.db, &certificate_id).await?
    {
        return Ok(Json(json!({
            "valid": true,
            "certificate": {
                "certificateId": certificate.certificate_id,
                "participantName": certificate.participant_name,
                "eventTitle": certificate.event_title,
                "issuedDate": certificate.issued_date,
                "eventDates": EventDates {
                    start_date: certificate.event_start_date,
                    end_date: certificate.event_end_date,
                },
                "venue": certificate.venue,
                "status": certificate.status,
            }
        }))
        .into_response());
    }

    if let Some(enrollment) =
        EnrollmentRepository::find_by_certificate_id(&state.db, &certificate_id).await?
    {
        let event = EventRepository::find_by_id(&state.db, enrollment.event_id).await?;
        let participant = UserRepository::find_by_id(&state.db, enrollment.participant_id).await?;

        return Ok(Json(json!({
            "valid": true,
            "certificate": {
                "certificateId": certificate_id,
                "participantName": participant.map(|p| p.name),
                "eventTitle": event.map(|e| e.title),
                "issuedDate": enrollment.certificate_generated_date,
            }
        }))
        .into_response());
    }

    Ok((
        StatusCode::NOT_FOUND,
        Json(json!({
            "valid": false,
            "message": "Certificate not found",
        })),
    )
        .into_response())
}
