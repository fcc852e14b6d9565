use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::{
    CertificateSummary, EnrollmentRepository, FeedbackRepository, FeedbackSubmission, NewFeedback,
    SubmitFeedbackRequest,
};
use crate::error::{AppError, AppResult};
use crate::modules::certificates::issuer;

use super::questions::feedback_questions;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackResponse {
    pub feedback: FeedbackSubmission,
    pub certificate: CertificateSummary,
    pub message: String,
}

/// POST /feedback
///
/// Preconditions are checked in a fixed order, first failure wins:
/// enrollment exists, attendance marked, feedback not yet given,
/// personal info complete, answers complete. On success the certificate
/// is issued synchronously and returned with the stored submission.
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(request): Json<SubmitFeedbackRequest>,
) -> AppResult<(StatusCode, Json<SubmitFeedbackResponse>)> {
    let enrollment = EnrollmentRepository::find(&state.db, request.participant_id, request.event_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Participant not registered for this event".to_string())
        })?;

    if !enrollment.attended {
        return Err(AppError::Validation(
            "Cannot submit feedback for events you haven't attended".to_string(),
        ));
    }

    if enrollment.feedback_given {
        return Err(AppError::Conflict(
            "Feedback already submitted for this event".to_string(),
        ));
    }

    let personal = request.personal_info().map_err(AppError::Validation)?;
    personal
        .validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    let answers = request.answers().map_err(AppError::Validation)?;
    let overall_rating = answers.overall_rating();

    let new_feedback = NewFeedback {
        participant_id: request.participant_id,
        event_id: request.event_id,
        name: personal.name.clone(),
        email: personal.email,
        designation: personal.designation,
        institute: personal.institute,
        contact: personal.contact,
        responses: answers.into_responses(),
        overall_rating,
        submission_source: "web".to_string(),
    };

    let feedback = match FeedbackRepository::create(&state.db, &new_feedback).await {
        Err(crate::db::DatabaseError::Duplicate) => {
            return Err(AppError::Conflict(
                "Feedback already submitted for this event".to_string(),
            ));
        }
        other => other?,
    };

    EnrollmentRepository::mark_feedback_given(&state.db, request.participant_id, request.event_id)
        .await?;

    let certificate = issuer::issue_or_fallback(
        &state.db,
        &state.env,
        request.participant_id,
        request.event_id,
        &personal.name,
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(SubmitFeedbackResponse {
            feedback,
            certificate,
            message: "Feedback submitted successfully! Your certificate has been generated."
                .to_string(),
        }),
    ))
}

/// GET /feedback/questions
pub async fn get_feedback_questions() -> Json<serde_json::Value> {
    let questions = feedback_questions();
    Json(serde_json::json!({
        "success": true,
        "totalCount": questions.len(),
        "questions": questions,
    }))
}
