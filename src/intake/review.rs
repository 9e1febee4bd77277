//! Reviewer operations

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::notify::Dispatcher;
use crate::program::{Actor, AuditLogEntry, Capability, Submission, SubmissionStatus};
use crate::progression::{Effect, ProgressionEngine};
use crate::store::ProgramStore;

use super::errors::{IntakeError, IntakeResult};

/// Result of a manual review; effects are delivered after the response
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub submission: Submission,
    pub effects: Vec<Effect>,
}

/// Manual review and review-queue queries
#[derive(Clone)]
pub struct ReviewDesk {
    store: Arc<dyn ProgramStore>,
    engine: ProgressionEngine,
    dispatcher: Dispatcher,
}

fn require(actor: &Actor, capability: Capability) -> IntakeResult<()> {
    if actor.can(capability) {
        Ok(())
    } else {
        Err(IntakeError::Forbidden(capability))
    }
}

impl ReviewDesk {
    pub fn new(store: Arc<dyn ProgramStore>, engine: ProgressionEngine, dispatcher: Dispatcher) -> Self {
        Self {
            store,
            engine,
            dispatcher,
        }
    }

    /// Set a submission's status and feedback
    pub fn review(
        &self,
        reviewer: &Actor,
        submission_id: Uuid,
        status: SubmissionStatus,
        feedback: &str,
    ) -> IntakeResult<ReviewOutcome> {
        require(reviewer, Capability::ReviewSubmission)?;
        let outcome = self
            .engine
            .apply_review(reviewer, submission_id, status, feedback)?;
        Ok(ReviewOutcome {
            submission: outcome.submission,
            effects: outcome.effects,
        })
    }

    /// Deliver review effects in the background
    pub fn dispatch_later(&self, effects: Vec<Effect>) {
        if effects.is_empty() {
            return;
        }
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            let report = dispatcher.drain(effects).await;
            debug!(delivered = report.delivered, failed = report.failed, "review effects drained");
        });
    }

    /// Pending submissions, oldest first
    pub fn pending(&self, reviewer: &Actor, cohort_id: Option<Uuid>) -> IntakeResult<Vec<Submission>> {
        require(reviewer, Capability::ReviewSubmission)?;
        Ok(self.store.pending_submissions(cohort_id)?)
    }

    /// Audit history for a submission id, or for an application's latest
    /// submission when given an application id
    pub fn history(&self, reviewer: &Actor, id: Uuid) -> IntakeResult<Vec<AuditLogEntry>> {
        require(reviewer, Capability::ViewAuditHistory)?;
        if self.store.submission(id)?.is_some() {
            return Ok(self.store.audit_history(id)?);
        }
        match self.store.latest_submission_for_application(id)? {
            Some(latest) => Ok(self.store.audit_history(latest.id)?),
            None => Ok(Vec::new()),
        }
    }

    /// Every submission by one participant, newest first
    pub fn submissions_for_actor(&self, reviewer: &Actor, actor_id: &str) -> IntakeResult<Vec<Submission>> {
        require(reviewer, Capability::ViewAuditHistory)?;
        Ok(self.store.submissions_for_actor(actor_id)?)
    }
}
