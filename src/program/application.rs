//! # Applications
//!
//! One participant's enrollment in one cohort.
//!
//! ## Invariants
//! - `current_stage` is always within `1..=TOTAL_STAGES`
//! - `progress == progress_for_stage(current_stage)` unless completed, then 100
//! - `completed` implies `current_stage == TOTAL_STAGES`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::track::{PackageTier, Track, TOTAL_STAGES};

/// Progress percentage for a stage, rounded half away from zero
pub fn progress_for_stage(stage: u8) -> u8 {
    let stage = stage.clamp(1, TOTAL_STAGES);
    ((f64::from(stage) / f64::from(TOTAL_STAGES)) * 100.0).round() as u8
}

/// Application model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,

    pub first_name: String,

    pub last_name: String,

    /// Lowercased; unique together with `cohort_id`
    pub email: String,

    /// External messaging identity used for direct messages
    pub messaging_handle: String,

    pub track: Track,

    pub tier: PackageTier,

    pub cohort_id: Uuid,

    pub current_stage: u8,

    pub progress: u8,

    pub completed: bool,

    pub completed_tasks: u32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Confirmed enrollment handed over by the payment/enrollment collaborator
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub messaging_handle: String,
    pub track: Track,
    pub tier: PackageTier,
    pub cohort_id: Uuid,
}

impl Application {
    /// Create an application at stage 1
    pub fn enroll(request: EnrollmentRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            messaging_handle: request.messaging_handle.trim().to_string(),
            track: request.track,
            tier: request.tier,
            cohort_id: request.cohort_id,
            current_stage: 1,
            progress: progress_for_stage(1),
            completed: false,
            completed_tasks: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check the stage/progress/completion invariants
    pub fn is_consistent(&self) -> bool {
        if !(1..=TOTAL_STAGES).contains(&self.current_stage) {
            return false;
        }
        if self.completed {
            self.current_stage == TOTAL_STAGES && self.progress == 100
        } else {
            self.progress == progress_for_stage(self.current_stage)
        }
    }

    /// Set the stage directly, keeping progress consistent
    pub fn set_stage(&mut self, stage: u8) {
        self.current_stage = stage.clamp(1, TOTAL_STAGES);
        self.progress = progress_for_stage(self.current_stage);
        self.updated_at = Utc::now();
    }
}
