//! Certificate HTTP Routes
//!
//! Public verification; no actor headers required.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::error;

use crate::certificate::verify;
use crate::services::Services;

use super::response::ErrorResponse;

/// Create certificate routes
pub fn certificate_routes(state: Arc<Services>) -> Router {
    Router::new()
        .route("/:certificate_id/verify", get(verify_certificate))
        .with_state(state)
}

async fn verify_certificate(
    State(state): State<Arc<Services>>,
    Path(certificate_id): Path<String>,
) -> Response {
    match verify(state.store.as_ref(), &certificate_id) {
        Ok(Some(verification)) => (StatusCode::OK, Json(verification)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Json(json!({ "valid": false }))).into_response(),
        Err(e) => {
            error!(error = %e, certificate_id = %certificate_id, "certificate lookup failed");
            ErrorResponse::new(e.status_code(), "Internal error").into_response()
        }
    }
}
