//! Transactional progression
//!
//! Each operation runs in exactly one store transaction covering the
//! submission write, the application update and any certificate. Effects are
//! returned to the caller and delivered only after commit.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::audit::AuditReport;
use crate::certificate::CertificateIssuer;
use crate::program::{
    Actor, Application, AuditLogEntry, Certificate, Submission, SubmissionStatus, Verdict,
    TOTAL_STAGES,
};
use crate::store::{ProgramStore, Transaction};

use super::effects::Effect;
use super::errors::{ProgressionError, ProgressionResult};
use super::messages;
use super::state::{apply_verdict, Transition};

/// A submission waiting to be recorded
#[derive(Debug, Clone)]
pub struct SubmissionDraft {
    pub application_id: Uuid,
    pub actor_id: String,
    pub actor_display_name: String,
    pub project_link: String,
    /// Non-blocking link advisory from validation
    pub link_warning: Option<String>,
}

/// Committed result of a progression operation
#[derive(Debug, Clone)]
pub struct ProgressionOutcome {
    pub submission: Submission,
    pub application: Application,
    pub transition: Option<Transition>,
    pub certificate: Option<Certificate>,
    /// Deliver after commit
    pub effects: Vec<Effect>,
}

/// Owns every write to applications, submissions and certificates
#[derive(Clone)]
pub struct ProgressionEngine {
    store: Arc<dyn ProgramStore>,
    issuer: CertificateIssuer,
}

impl ProgressionEngine {
    pub fn new(store: Arc<dyn ProgramStore>, issuer: CertificateIssuer) -> Self {
        Self { store, issuer }
    }

    pub fn store(&self) -> &Arc<dyn ProgramStore> {
        &self.store
    }

    /// Record a new submission with its audit result
    ///
    /// Automated reports carry a verdict and move the application in the same
    /// transaction. Manual reports leave the submission pending. A report for
    /// a stage the application has already left is recorded against that
    /// stage and never moves the application.
    pub fn record_submission(
        &self,
        draft: SubmissionDraft,
        report: &AuditReport,
    ) -> ProgressionResult<ProgressionOutcome> {
        let mut tx = self.store.begin()?;

        let mut application = tx
            .application(draft.application_id)?
            .ok_or(ProgressionError::ApplicationNotFound(draft.application_id))?;
        if application.completed {
            return Err(ProgressionError::AlreadyCompleted(application.id));
        }

        let mut submission = Submission::new(
            &application,
            draft.actor_id,
            draft.actor_display_name,
            draft.project_link,
        );
        submission.stage = report.stage;
        submission.feedback = report.feedback.clone();
        let stage = submission.stage;
        let stale = stage != application.current_stage;

        let mut effects = Vec::new();
        let mut transition = None;
        let mut certificate = None;

        match report.decision() {
            Some(verdict) if stale => {
                submission.status = SubmissionStatus::from(verdict);
                submission.score = Some(report.score);
                warn!(
                    application_id = %application.id,
                    report_stage = stage,
                    current_stage = application.current_stage,
                    "audit finished for a stage the application has left; not moved"
                );
                let text = match verdict {
                    Verdict::Accepted => {
                        messages::accepted_without_advance(&application, stage, &report.feedback)
                    }
                    Verdict::NeedsRevision => messages::needs_revision(
                        &application,
                        stage,
                        &report.feedback,
                        Some(report.score),
                    ),
                    Verdict::Rejected => messages::rejected(&application, stage, &report.feedback),
                };
                effects.push(Effect::direct_message(&application.messaging_handle, text));
            }
            None => {
                effects.push(Effect::direct_message(
                    &application.messaging_handle,
                    messages::queued(&application, stage, draft.link_warning.as_deref()),
                ));
            }
            Some(verdict) => {
                submission.status = SubmissionStatus::from(verdict);
                submission.score = Some(report.score);
                let applied = self.progress(
                    &mut *tx,
                    &mut application,
                    verdict,
                    stage,
                    &report.feedback,
                    Some(report.score),
                )?;
                transition = applied.transition;
                certificate = applied.certificate;
                effects.extend(applied.effects);
            }
        }

        tx.insert_submission(submission.clone())?;
        tx.commit()?;

        info!(
            application_id = %application.id,
            submission_id = %submission.id,
            stage,
            status = %submission.status,
            score = ?submission.score,
            "submission recorded"
        );

        Ok(ProgressionOutcome {
            submission,
            application,
            transition,
            certificate,
            effects,
        })
    }

    /// Apply a reviewer's status decision to an existing submission
    ///
    /// The change is written to the audit log. An Accepted verdict moves the
    /// application only while the submission's stage is still the
    /// application's current stage.
    pub fn apply_review(
        &self,
        reviewer: &Actor,
        submission_id: Uuid,
        status: SubmissionStatus,
        feedback: &str,
    ) -> ProgressionResult<ProgressionOutcome> {
        let mut tx = self.store.begin()?;

        let mut submission = tx
            .submission(submission_id)?
            .ok_or(ProgressionError::SubmissionNotFound(submission_id))?;
        let mut application = tx
            .application(submission.application_id)?
            .ok_or(ProgressionError::ApplicationNotFound(submission.application_id))?;

        let old_status = submission.status;
        submission.mark_reviewed(&reviewer.id, status, feedback);
        tx.put_submission(submission.clone())?;
        tx.append_audit_entry(AuditLogEntry::record(
            &reviewer.id,
            &reviewer.display_name,
            submission.id,
            old_status,
            status,
            feedback,
        ))?;

        let mut effects = Vec::new();
        let mut transition = None;
        let mut certificate = None;

        if let Some(verdict) = status.verdict() {
            let current = !application.completed && submission.stage == application.current_stage;
            if verdict == Verdict::Accepted && !current {
                warn!(
                    submission_id = %submission.id,
                    submission_stage = submission.stage,
                    current_stage = application.current_stage,
                    completed = application.completed,
                    "stale review; application not moved"
                );
                if !application.completed {
                    effects.push(Effect::direct_message(
                        &application.messaging_handle,
                        messages::accepted_without_advance(&application, submission.stage, feedback),
                    ));
                }
            } else if !application.completed {
                let applied = self.progress(
                    &mut *tx,
                    &mut application,
                    verdict,
                    submission.stage,
                    feedback,
                    None,
                )?;
                transition = applied.transition;
                certificate = applied.certificate;
                effects.extend(applied.effects);
            }
        }

        tx.commit()?;

        info!(
            reviewer_id = %reviewer.id,
            submission_id = %submission.id,
            old_status = %old_status,
            new_status = %status,
            "review applied"
        );

        Ok(ProgressionOutcome {
            submission,
            application,
            transition,
            certificate,
            effects,
        })
    }

    /// Set an application's stage directly
    pub fn override_stage(
        &self,
        application_id: Uuid,
        stage: u8,
        completed_tasks: Option<u32>,
    ) -> ProgressionResult<Application> {
        if !(1..=TOTAL_STAGES).contains(&stage) {
            return Err(ProgressionError::StageOutOfRange(stage));
        }

        let mut tx = self.store.begin()?;
        let mut application = tx
            .application(application_id)?
            .ok_or(ProgressionError::ApplicationNotFound(application_id))?;
        if application.completed {
            return Err(ProgressionError::AlreadyCompleted(application_id));
        }

        let previous = application.current_stage;
        application.set_stage(stage);
        if let Some(tasks) = completed_tasks {
            application.completed_tasks = tasks;
        }
        tx.put_application(application.clone())?;
        tx.commit()?;

        info!(
            application_id = %application_id,
            from_stage = previous,
            to_stage = stage,
            "progress overridden"
        );
        Ok(application)
    }

    /// Apply a verdict inside `tx`, issuing a certificate on paid completion
    fn progress(
        &self,
        tx: &mut dyn Transaction,
        application: &mut Application,
        verdict: Verdict,
        stage: u8,
        feedback: &str,
        score: Option<u8>,
    ) -> ProgressionResult<Applied> {
        let mut applied = Applied {
            transition: apply_verdict(application, verdict),
            ..Applied::default()
        };

        match (verdict, applied.transition) {
            (Verdict::Accepted, Some(t)) if t.completed() => {
                tx.put_application(application.clone())?;

                let issued = if application.tier.is_paid() {
                    self.issuer.issue_within(tx, application)?
                } else {
                    None
                };
                applied.effects.push(Effect::direct_message(
                    &application.messaging_handle,
                    messages::completed(application, feedback, issued.is_some()),
                ));
                if let Some(issued) = issued {
                    applied.effects.push(Effect::CertificateEmail {
                        to: application.email.clone(),
                        recipient_name: application.full_name(),
                        certificate_id: issued.certificate.certificate_id.clone(),
                        file_name: issued.artifact.file_name,
                        content_type: issued.artifact.content_type,
                        artifact: issued.artifact.bytes,
                    });
                    applied.certificate = Some(issued.certificate);
                }
            }
            (Verdict::Accepted, Some(_)) => {
                tx.put_application(application.clone())?;
                applied.effects.push(Effect::direct_message(
                    &application.messaging_handle,
                    messages::advanced(application, feedback, score),
                ));
            }
            (Verdict::NeedsRevision, _) => {
                applied.effects.push(Effect::direct_message(
                    &application.messaging_handle,
                    messages::needs_revision(application, stage, feedback, score),
                ));
            }
            (Verdict::Rejected, _) => {
                applied.effects.push(Effect::direct_message(
                    &application.messaging_handle,
                    messages::rejected(application, stage, feedback),
                ));
            }
            (Verdict::Accepted, None) => {}
        }

        Ok(applied)
    }
}

#[derive(Debug, Default)]
struct Applied {
    transition: Option<Transition>,
    certificate: Option<Certificate>,
    effects: Vec<Effect>,
}
