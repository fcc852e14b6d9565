use axum::{
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;

use super::handlers::{get_feedback_questions, submit_feedback};

pub fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_feedback))
        .route("/questions", get(get_feedback_questions))
}
