//! # Reviewer Audit Log
//!
//! Append-only record of manual status changes on submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::submission::SubmissionStatus;

/// Kind of manual change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditLogAction {
    #[serde(rename = "Status Update")]
    StatusUpdate,
    #[serde(rename = "Feedback Edit")]
    FeedbackEdit,
}

/// Audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: Uuid,

    pub reviewer_id: String,

    pub reviewer_name: String,

    pub submission_id: Uuid,

    pub action: AuditLogAction,

    pub old_status: SubmissionStatus,

    pub new_status: SubmissionStatus,

    /// Feedback as it read after the change
    pub feedback: String,

    pub timestamp: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn record(
        reviewer_id: impl Into<String>,
        reviewer_name: impl Into<String>,
        submission_id: Uuid,
        old_status: SubmissionStatus,
        new_status: SubmissionStatus,
        feedback: impl Into<String>,
    ) -> Self {
        let action = if old_status == new_status {
            AuditLogAction::FeedbackEdit
        } else {
            AuditLogAction::StatusUpdate
        };
        Self {
            id: Uuid::new_v4(),
            reviewer_id: reviewer_id.into(),
            reviewer_name: reviewer_name.into(),
            submission_id,
            action,
            old_status,
            new_status,
            feedback: feedback.into(),
            timestamp: Utc::now(),
        }
    }
}
