//! Participant submission pipeline
//!
//! `submit` gates synchronously (capability, active application, link, lock)
//! and hands back an acknowledgement. The audit, the progression transaction
//! and notification delivery then run in the background.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, info_span, Instrument};

use crate::audit::{AuditRequest, ProjectAuditor};
use crate::lock::{SubmissionGuard, SubmissionLock};
use crate::notify::Dispatcher;
use crate::program::{Actor, Application, Capability};
use crate::progression::{messages, ProgressionEngine, ProgressionOutcome, SubmissionDraft};
use crate::store::ProgramStore;
use crate::validation;

use super::errors::{IntakeError, IntakeResult};

/// Immediate reply to a submission
#[derive(Debug, Clone, Serialize)]
pub struct Acknowledgement {
    pub accepted: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Entry point for participant submissions
#[derive(Clone)]
pub struct SubmissionIntake {
    store: Arc<dyn ProgramStore>,
    lock: SubmissionLock,
    auditor: Arc<dyn ProjectAuditor>,
    engine: ProgressionEngine,
    dispatcher: Dispatcher,
}

impl SubmissionIntake {
    pub fn new(
        store: Arc<dyn ProgramStore>,
        lock: SubmissionLock,
        auditor: Arc<dyn ProjectAuditor>,
        engine: ProgressionEngine,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            store,
            lock,
            auditor,
            engine,
            dispatcher,
        }
    }

    /// Run the synchronous gates and take the actor's lock
    pub fn begin(&self, actor: &Actor, project_link: &str) -> IntakeResult<PendingSubmission> {
        if !actor.can(Capability::SubmitProject) {
            return Err(IntakeError::Forbidden(Capability::SubmitProject));
        }

        let application = self
            .store
            .active_application_for_handle(&actor.id)?
            .ok_or_else(|| IntakeError::NoActiveApplication(actor.id.clone()))?;

        let warning = validation::validate(project_link, application.track).into_result()?;

        let guard = self
            .lock
            .acquire(&actor.id)
            .ok_or(IntakeError::AlreadyProcessing)?;

        Ok(PendingSubmission {
            intake: self.clone(),
            guard,
            application,
            actor: actor.clone(),
            project_link: project_link.trim().to_string(),
            warning,
        })
    }

    /// Gate, acknowledge, and finish the submission in the background
    pub fn submit(&self, actor: &Actor, project_link: &str) -> IntakeResult<Acknowledgement> {
        let pending = self.begin(actor, project_link)?;
        let ack = Acknowledgement {
            accepted: true,
            message: format!(
                "Got it! Your Stage {} submission is being processed. Results will arrive as a direct message.",
                pending.application.current_stage
            ),
            warning: pending.warning.clone(),
        };

        let span = info_span!("submission", actor_id = %actor.id, application_id = %pending.application.id);
        tokio::spawn(
            async move {
                let _ = pending.run().await;
            }
            .instrument(span),
        );
        Ok(ack)
    }
}

/// A gated submission holding the actor's lock
pub struct PendingSubmission {
    intake: SubmissionIntake,
    guard: SubmissionGuard,
    application: Application,
    actor: Actor,
    project_link: String,
    warning: Option<String>,
}

impl PendingSubmission {
    pub fn application(&self) -> &Application {
        &self.application
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Audit, record, release the lock, then deliver notifications
    pub async fn run(self) -> IntakeResult<ProgressionOutcome> {
        let PendingSubmission {
            intake,
            guard,
            application,
            actor,
            project_link,
            warning,
        } = self;

        let report = intake
            .auditor
            .audit(&AuditRequest {
                link: project_link.clone(),
                track: application.track,
                stage: application.current_stage,
                tier: application.tier,
            })
            .await;

        let result = intake.engine.record_submission(
            SubmissionDraft {
                application_id: application.id,
                actor_id: actor.id.clone(),
                actor_display_name: actor.display_name.clone(),
                project_link,
                link_warning: warning,
            },
            &report,
        );
        drop(guard);

        match result {
            Ok(outcome) => {
                let delivery = intake.dispatcher.drain(outcome.effects.clone()).await;
                info!(
                    submission_id = %outcome.submission.id,
                    delivered = delivery.delivered,
                    failed = delivery.failed,
                    "submission processed"
                );
                Ok(outcome)
            }
            Err(e) => {
                error!(error = %e, application_id = %application.id, "submission transaction aborted");
                intake
                    .dispatcher
                    .notify(&application.messaging_handle, &messages::system_error())
                    .await;
                Err(IntakeError::from(e))
            }
        }
    }
}
