//! Stage state machine
//!
//! `Stage k --Accept--> Stage k+1 (k < 8) | Completed (k = 8)`
//! `Stage k --Revise/Reject--> Stage k`
//! `Completed` is terminal.

use serde::Serialize;

use crate::program::{Application, Verdict, TOTAL_STAGES};

/// Position of an application in its track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "stage")]
pub enum StageState {
    Stage(u8),
    Completed,
}

impl StageState {
    pub fn of(application: &Application) -> Self {
        if application.completed {
            StageState::Completed
        } else {
            StageState::Stage(application.current_stage)
        }
    }

    /// Next state for a verdict
    pub fn on_verdict(self, verdict: Verdict) -> Self {
        match (self, verdict) {
            (StageState::Completed, _) => StageState::Completed,
            (StageState::Stage(k), Verdict::Accepted) if k >= TOTAL_STAGES => StageState::Completed,
            (StageState::Stage(k), Verdict::Accepted) => StageState::Stage(k + 1),
            (state, Verdict::NeedsRevision | Verdict::Rejected) => state,
        }
    }
}

/// A stage change applied to an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: StageState,
    pub to: StageState,
}

impl Transition {
    pub fn completed(&self) -> bool {
        self.to == StageState::Completed
    }

    /// Stage reached, if the application moved to a new stage
    pub fn advanced_to(&self) -> Option<u8> {
        match self.to {
            StageState::Stage(k) => Some(k),
            StageState::Completed => None,
        }
    }
}

/// Apply a verdict to an application
///
/// Returns the transition when the state changed. Progress and
/// `completed_tasks` are kept in step with the stage.
pub fn apply_verdict(application: &mut Application, verdict: Verdict) -> Option<Transition> {
    let from = StageState::of(application);
    let to = from.on_verdict(verdict);
    if from == to {
        return None;
    }

    match to {
        StageState::Stage(k) => application.set_stage(k),
        StageState::Completed => {
            application.set_stage(TOTAL_STAGES);
            application.progress = 100;
            application.completed = true;
        }
    }
    application.completed_tasks += 1;
    Some(Transition { from, to })
}
