use axum::{
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;

use super::handlers::{mark_attendance, my_events, register_for_event};

pub fn event_enrollment_routes() -> Router<AppState> {
    Router::new()
        .route("/:event_id/register", post(register_for_event))
        .route("/:event_id/attendance", post(mark_attendance))
}

pub fn participant_routes() -> Router<AppState> {
    Router::new().route("/:participant_id/events", get(my_events))
}
