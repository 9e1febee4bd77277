//! # Submissions
//!
//! One project-link attempt at one stage. Submissions are append-only: a
//! revision creates a new record and never overwrites an earlier one.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::application::Application;

/// Submission status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Pending,
    Accepted,
    #[serde(rename = "Needs Revision")]
    NeedsRevision,
    Rejected,
}

/// Outcome on a submission that drives stage progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    NeedsRevision,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "Pending",
            SubmissionStatus::Accepted => "Accepted",
            SubmissionStatus::NeedsRevision => "Needs Revision",
            SubmissionStatus::Rejected => "Rejected",
        }
    }

    /// The verdict carried by this status, if any
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            SubmissionStatus::Pending => None,
            SubmissionStatus::Accepted => Some(Verdict::Accepted),
            SubmissionStatus::NeedsRevision => Some(Verdict::NeedsRevision),
            SubmissionStatus::Rejected => Some(Verdict::Rejected),
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(SubmissionStatus::Pending),
            "accepted" => Ok(SubmissionStatus::Accepted),
            "needs revision" | "needs_revision" => Ok(SubmissionStatus::NeedsRevision),
            "rejected" => Ok(SubmissionStatus::Rejected),
            other => Err(format!("unknown submission status: {}", other)),
        }
    }
}

impl From<Verdict> for SubmissionStatus {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Accepted => SubmissionStatus::Accepted,
            Verdict::NeedsRevision => SubmissionStatus::NeedsRevision,
            Verdict::Rejected => SubmissionStatus::Rejected,
        }
    }
}

/// Submission model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,

    pub application_id: Uuid,

    pub cohort_id: Uuid,

    /// Messaging identity of the participant who submitted
    pub actor_id: String,

    pub actor_display_name: String,

    pub project_link: String,

    /// Stage the link was submitted for
    pub stage: u8,

    pub status: SubmissionStatus,

    pub feedback: String,

    /// Automated audit score (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl Submission {
    /// New submission for the application's current stage
    pub fn new(
        application: &Application,
        actor_id: impl Into<String>,
        actor_display_name: impl Into<String>,
        project_link: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            application_id: application.id,
            cohort_id: application.cohort_id,
            actor_id: actor_id.into(),
            actor_display_name: actor_display_name.into(),
            project_link: project_link.into().trim().to_string(),
            stage: application.current_stage,
            status: SubmissionStatus::Pending,
            feedback: String::new(),
            score: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Record a reviewer's decision
    pub fn mark_reviewed(
        &mut self,
        reviewer_id: impl Into<String>,
        status: SubmissionStatus,
        feedback: impl Into<String>,
    ) {
        self.status = status;
        self.feedback = feedback.into();
        self.reviewed_by = Some(reviewer_id.into());
        self.reviewed_at = Some(Utc::now());
    }
}
