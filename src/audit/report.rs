//! Audit results

use serde::Serialize;

use crate::program::{AuditStyle, Verdict};

/// Minimum score for automatic promotion
pub const ACCEPTANCE_THRESHOLD: u8 = 40;

/// Score and message for one check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub score: u8,
    pub feedback: String,
}

impl Finding {
    pub fn new(score: u8, feedback: impl Into<String>) -> Self {
        Self {
            score: score.min(100),
            feedback: feedback.into(),
        }
    }
}

/// Outcome of auditing one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    /// None when the submission was queued for a reviewer
    pub style: Option<AuditStyle>,

    pub stage: u8,

    pub score: u8,

    pub feedback: String,
}

impl AuditReport {
    /// Constant result for submissions that go to a reviewer
    pub fn manual(stage: u8) -> Self {
        Self {
            style: None,
            stage,
            score: 0,
            feedback: "Submission received and queued for manual review by a mentor.".to_string(),
        }
    }

    pub fn automated(style: AuditStyle, stage: u8, finding: Finding) -> Self {
        Self {
            style: Some(style),
            stage,
            score: finding.score,
            feedback: finding.feedback,
        }
    }

    pub fn is_manual(&self) -> bool {
        self.style.is_none()
    }

    /// Verdict implied by the score; `None` for manual review
    pub fn decision(&self) -> Option<Verdict> {
        if self.is_manual() {
            None
        } else if self.score >= ACCEPTANCE_THRESHOLD {
            Some(Verdict::Accepted)
        } else {
            Some(Verdict::NeedsRevision)
        }
    }
}
