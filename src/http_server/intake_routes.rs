//! Intake HTTP Routes
//!
//! Participant submissions. The response only acknowledges; the audit result
//! arrives later as a direct message.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;

use crate::intake::Acknowledgement;
use crate::program::Actor;
use crate::services::Services;

use super::response::ApiResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitProjectRequest {
    pub actor_id: String,
    #[serde(default)]
    pub actor_display_name: Option<String>,
    pub project_link: String,
}

/// Create intake routes
pub fn intake_routes(state: Arc<Services>) -> Router {
    Router::new()
        .route("/submissions", post(submit_project))
        .with_state(state)
}

async fn submit_project(
    State(state): State<Arc<Services>>,
    Json(req): Json<SubmitProjectRequest>,
) -> ApiResult<(StatusCode, Json<Acknowledgement>)> {
    let name = req
        .actor_display_name
        .unwrap_or_else(|| req.actor_id.clone());
    let actor = Actor::participant(req.actor_id, name);
    let ack = state.intake.submit(&actor, &req.project_link)?;
    Ok((StatusCode::ACCEPTED, Json(ack)))
}
