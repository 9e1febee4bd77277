//! Submission HTTP Routes
//!
//! Reviewer endpoints: manual review, review queue and audit history.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::program::SubmissionStatus;
use crate::services::Services;

use super::actor::RequestActor;
use super::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub status: SubmissionStatus,
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct PendingQuery {
    #[serde(default)]
    pub cohort: Option<Uuid>,
}

/// Create submission routes
pub fn submission_routes(state: Arc<Services>) -> Router {
    Router::new()
        .route("/pending", get(list_pending))
        .route("/by-actor/:actor_id", get(list_for_actor))
        .route("/:id", patch(review_submission))
        .route("/:id/history", get(submission_history))
        .with_state(state)
}

async fn review_submission(
    State(state): State<Arc<Services>>,
    RequestActor(reviewer): RequestActor,
    Path(id): Path<Uuid>,
    axum::Json(req): axum::Json<ReviewRequest>,
) -> ApiResult<impl IntoResponse> {
    let outcome = state
        .reviews
        .review(&reviewer, id, req.status, &req.feedback)?;
    let response = ApiResponse::ok(outcome.submission);
    state.reviews.dispatch_later(outcome.effects);
    Ok(response)
}

async fn list_pending(
    State(state): State<Arc<Services>>,
    RequestActor(reviewer): RequestActor,
    Query(query): Query<PendingQuery>,
) -> ApiResult<impl IntoResponse> {
    let pending = state.reviews.pending(&reviewer, query.cohort)?;
    Ok(ApiResponse::ok(pending))
}

async fn submission_history(
    State(state): State<Arc<Services>>,
    RequestActor(reviewer): RequestActor,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let history = state.reviews.history(&reviewer, id)?;
    Ok(ApiResponse::ok(history))
}

async fn list_for_actor(
    State(state): State<Arc<Services>>,
    RequestActor(reviewer): RequestActor,
    Path(actor_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let submissions = state.reviews.submissions_for_actor(&reviewer, &actor_id)?;
    Ok(ApiResponse::ok(submissions))
}
