//! Application HTTP Routes
//!
//! Admin endpoints: enrollment, progress override and statistics.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;

use crate::intake::ProgressOverride;
use crate::program::EnrollmentRequest;
use crate::services::Services;

use super::actor::RequestActor;
use super::response::{ApiResponse, ApiResult};

/// Create application routes
pub fn application_routes(state: Arc<Services>) -> Router {
    Router::new()
        .route("/", post(enroll))
        .route("/stats", get(stats))
        .route("/:id/progress", patch(override_progress))
        .with_state(state)
}

async fn enroll(
    State(state): State<Arc<Services>>,
    RequestActor(admin): RequestActor,
    Json(req): Json<EnrollmentRequest>,
) -> ApiResult<impl IntoResponse> {
    let application = state.admin.enroll(&admin, req)?;
    Ok((StatusCode::CREATED, ApiResponse::ok(application)))
}

async fn override_progress(
    State(state): State<Arc<Services>>,
    RequestActor(admin): RequestActor,
    Path(id): Path<Uuid>,
    Json(change): Json<ProgressOverride>,
) -> ApiResult<impl IntoResponse> {
    let application = state.admin.override_progress(&admin, id, change)?;
    Ok(ApiResponse::ok(application))
}

async fn stats(
    State(state): State<Arc<Services>>,
    RequestActor(admin): RequestActor,
) -> ApiResult<impl IntoResponse> {
    let stats = state.admin.stats(&admin)?;
    Ok(ApiResponse::ok(stats))
}
