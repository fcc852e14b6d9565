use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::{
    EnrollmentRecord, EnrollmentRepository, EnrollmentWithEvent, MarkAttendanceRequest,
    RegisterRequest,
};
use crate::error::{AppError, AppResult};

/// POST /events/:event_id/register
pub async fn register_for_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<EnrollmentRecord>)> {
    let record =
        match EnrollmentRepository::register(&state.db, request.participant_id, event_id).await {
            Err(crate::db::DatabaseError::Duplicate) => {
                return Err(AppError::Conflict("Already registered".to_string()));
            }
            other => other?,
        };

    tracing::info!(
        participant_id = %record.participant_id,
        event_id = %record.event_id,
        "participant registered"
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// POST /events/:event_id/attendance
pub async fn mark_attendance(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<MarkAttendanceRequest>,
) -> AppResult<Json<EnrollmentRecord>> {
    let record =
        match EnrollmentRepository::mark_attended(&state.db, request.participant_id, event_id)
            .await
        {
            Err(crate::db::DatabaseError::NotFound) => {
                return Err(AppError::NotFound(
                    "Participant not registered for this event".to_string(),
                ));
            }
            other => other?,
        };

    Ok(Json(record))
}

/// GET /participants/:participant_id/events
pub async fn my_events(
    State(state): State<AppState>,
    Path(participant_id): Path<Uuid>,
) -> AppResult<Json<Vec<EnrollmentWithEvent>>> {
    let records = EnrollmentRepository::list_for_participant(&state.db, participant_id).await?;
    Ok(Json(records))
}
