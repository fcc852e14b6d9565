use axum::{routing::get, Router};

use crate::app_state::AppState;

use super::handlers::{
    certificate_image, certificate_preview, list_certificates, verify_certificate,
};

pub fn certificate_routes() -> Router<AppState> {
    Router::new()
        .route("/:participant_id", get(list_certificates))
        .route("/preview/:certificate_id", get(certificate_preview))
        .route("/image/:certificate_id", get(certificate_image))
        .route("/verify/:certificate_id", get(verify_certificate))
}
