//! Progression Invariant Tests
//!
//! - Stage and progress stay consistent for every application
//! - A certificate is issued at most once per application
//! - Free completions never produce a certificate; paid completions produce
//!   exactly one
//! - A failed certificate render leaves no submission, application or
//!   certificate change behind

use std::sync::Arc;

use cohortd::audit::{AuditReport, Finding};
use cohortd::certificate::{
    CertificateData, CertificateError, CertificateIssuer, CertificateRenderer, CertificateResult,
    RenderedArtifact, SvgCertificateRenderer,
};
use cohortd::program::{
    progress_for_stage, Actor, Application, AuditStyle, EnrollmentRequest, PackageTier,
    SubmissionStatus, Track, TOTAL_STAGES,
};
use cohortd::progression::{Effect, ProgressionEngine, ProgressionError, SubmissionDraft};
use cohortd::store::{MemoryStore, ProgramStore};
use uuid::Uuid;

// =============================================================================
// Fixtures
// =============================================================================

struct FailingRenderer;

impl CertificateRenderer for FailingRenderer {
    fn render(&self, _data: &CertificateData) -> CertificateResult<RenderedArtifact> {
        Err(CertificateError::Render("template missing".to_string()))
    }
}

fn engine_with(renderer: Arc<dyn CertificateRenderer>) -> (Arc<MemoryStore>, ProgressionEngine) {
    let store = Arc::new(MemoryStore::new());
    let engine = ProgressionEngine::new(
        Arc::clone(&store) as Arc<dyn ProgramStore>,
        CertificateIssuer::new(renderer),
    );
    (store, engine)
}

fn engine() -> (Arc<MemoryStore>, ProgressionEngine) {
    engine_with(Arc::new(SvgCertificateRenderer::new()))
}

fn enroll(store: &MemoryStore, handle: &str, track: Track, tier: PackageTier, stage: u8) -> Application {
    let mut application = Application::enroll(EnrollmentRequest {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: format!("{}@example.com", handle.to_lowercase()),
        messaging_handle: handle.to_string(),
        track,
        tier,
        cohort_id: Uuid::new_v4(),
    });
    application.set_stage(stage);
    let mut tx = store.begin().unwrap();
    tx.insert_application(application.clone()).unwrap();
    tx.commit().unwrap();
    application
}

fn draft(application: &Application) -> SubmissionDraft {
    SubmissionDraft {
        application_id: application.id,
        actor_id: application.messaging_handle.clone(),
        actor_display_name: application.full_name(),
        project_link: "https://ada.example.dev".to_string(),
        link_warning: None,
    }
}

fn passing(stage: u8) -> AuditReport {
    AuditReport::automated(AuditStyle::Frontend, stage, Finding::new(100, "Looks good."))
}

fn failing(stage: u8) -> AuditReport {
    AuditReport::automated(AuditStyle::Frontend, stage, Finding::new(20, "Add a <title>."))
}

// =============================================================================
// Stage / progress consistency
// =============================================================================

#[test]
fn test_progress_follows_stage() {
    for stage in 1..=TOTAL_STAGES {
        let expected = ((stage as f64 / 8.0) * 100.0).round() as u8;
        assert_eq!(progress_for_stage(stage), expected, "stage {}", stage);
    }
}

#[test]
fn test_walk_through_all_stages_stays_consistent() {
    let (store, engine) = engine();
    let application = enroll(&store, "U100", Track::FrontendDevelopment, PackageTier::Free, 1);

    for stage in 1..=TOTAL_STAGES {
        let outcome = engine.record_submission(draft(&application), &passing(stage)).unwrap();
        assert!(outcome.application.is_consistent());
        let stored = store.application(application.id).unwrap().unwrap();
        assert!(stored.is_consistent());
    }

    let finished = store.application(application.id).unwrap().unwrap();
    assert!(finished.completed);
    assert_eq!(finished.current_stage, TOTAL_STAGES);
    assert_eq!(finished.progress, 100);
    assert_eq!(finished.completed_tasks, u32::from(TOTAL_STAGES));
}

#[test]
fn test_failed_audit_keeps_stage() {
    let (store, engine) = engine();
    let application = enroll(&store, "U101", Track::FrontendDevelopment, PackageTier::Free, 2);

    let outcome = engine.record_submission(draft(&application), &failing(2)).unwrap();
    assert_eq!(outcome.submission.status, SubmissionStatus::NeedsRevision);
    assert_eq!(outcome.submission.score, Some(20));
    assert!(outcome.transition.is_none());

    let stored = store.application(application.id).unwrap().unwrap();
    assert_eq!(stored.current_stage, 2);
    assert_eq!(stored.progress, 25);
}

#[test]
fn test_override_rejects_out_of_range_stage() {
    let (store, engine) = engine();
    let application = enroll(&store, "U102", Track::DataAnalysis, PackageTier::Free, 1);

    assert!(matches!(
        engine.override_stage(application.id, 0, None),
        Err(ProgressionError::StageOutOfRange(0))
    ));
    assert!(matches!(
        engine.override_stage(application.id, 9, None),
        Err(ProgressionError::StageOutOfRange(9))
    ));

    let moved = engine.override_stage(application.id, 5, Some(4)).unwrap();
    assert_eq!(moved.current_stage, 5);
    assert_eq!(moved.progress, 63);
    assert_eq!(moved.completed_tasks, 4);
    assert!(moved.is_consistent());
}

// =============================================================================
// Scenarios
// =============================================================================

/// Free application at stage 3 accepted moves to stage 4 at 50%.
#[test]
fn test_free_stage_three_accepted() {
    let (store, engine) = engine();
    let application = enroll(&store, "U200", Track::FrontendDevelopment, PackageTier::Free, 3);

    let outcome = engine.record_submission(draft(&application), &passing(3)).unwrap();

    assert_eq!(outcome.application.current_stage, 4);
    assert_eq!(outcome.application.progress, 50);
    assert!(!outcome.application.completed);
    assert!(outcome.certificate.is_none());
    assert!(store.certificate_for_application(application.id).unwrap().is_none());
    assert_eq!(outcome.effects.len(), 1);
    assert!(matches!(outcome.effects[0], Effect::DirectMessage { .. }));
}

/// Paid application at stage 8 accepted completes with exactly one certificate.
#[test]
fn test_paid_final_stage_accepted_issues_one_certificate() {
    let (store, engine) = engine();
    let application = enroll(&store, "U201", Track::UiUxDesign, PackageTier::Premium, 8);
    let reviewer = Actor::reviewer("mentor-1", "Grace");

    let queued = engine
        .record_submission(draft(&application), &AuditReport::manual(8))
        .unwrap();
    assert_eq!(queued.submission.status, SubmissionStatus::Pending);

    let outcome = engine
        .apply_review(&reviewer, queued.submission.id, SubmissionStatus::Accepted, "Great work")
        .unwrap();

    assert!(outcome.application.completed);
    assert_eq!(outcome.application.progress, 100);
    let certificate = outcome.certificate.expect("certificate issued");
    assert!(certificate.certificate_id.starts_with("KNOW-"));
    assert!(outcome
        .effects
        .iter()
        .any(|e| matches!(e, Effect::CertificateEmail { .. })));

    let stored = store.certificate_for_application(application.id).unwrap().unwrap();
    assert_eq!(stored.certificate_id, certificate.certificate_id);
    assert_eq!(store.stats().unwrap().certificates_issued, 1);
}

/// The same completion on the free tier issues nothing.
#[test]
fn test_free_completion_has_no_certificate() {
    let (store, engine) = engine();
    let application = enroll(&store, "U202", Track::FrontendDevelopment, PackageTier::Free, 8);

    let outcome = engine.record_submission(draft(&application), &passing(8)).unwrap();

    assert!(outcome.application.completed);
    assert!(outcome.certificate.is_none());
    assert!(!outcome
        .effects
        .iter()
        .any(|e| matches!(e, Effect::CertificateEmail { .. })));
    assert_eq!(store.stats().unwrap().certificates_issued, 0);
}

// =============================================================================
// Certificate idempotence
// =============================================================================

#[test]
fn test_second_issuance_is_a_no_op() {
    let store = MemoryStore::new();
    let application = enroll(&store, "U300", Track::DataAnalysis, PackageTier::PremiumPro, 8);
    let issuer = CertificateIssuer::new(Arc::new(SvgCertificateRenderer::new()));

    let mut tx = store.begin().unwrap();
    let first = issuer.issue_within(&mut *tx, &application).unwrap();
    assert!(first.is_some());
    tx.commit().unwrap();

    let mut tx = store.begin().unwrap();
    let second = issuer.issue_within(&mut *tx, &application).unwrap();
    assert!(second.is_none());
    tx.commit().unwrap();

    assert_eq!(store.stats().unwrap().certificates_issued, 1);
}

#[test]
fn test_re_review_after_completion_issues_nothing() {
    let (store, engine) = engine();
    let application = enroll(&store, "U301", Track::ContentWriting, PackageTier::Premium, 8);
    let reviewer = Actor::reviewer("mentor-1", "Grace");

    let queued = engine
        .record_submission(draft(&application), &AuditReport::manual(8))
        .unwrap();
    engine
        .apply_review(&reviewer, queued.submission.id, SubmissionStatus::Accepted, "Done")
        .unwrap();

    // Flip the status back and forth; the application is already complete.
    engine
        .apply_review(&reviewer, queued.submission.id, SubmissionStatus::NeedsRevision, "Hmm")
        .unwrap();
    let again = engine
        .apply_review(&reviewer, queued.submission.id, SubmissionStatus::Accepted, "Fine")
        .unwrap();

    assert!(again.certificate.is_none());
    assert!(again.transition.is_none());
    assert_eq!(store.stats().unwrap().certificates_issued, 1);
    assert_eq!(store.audit_history(queued.submission.id).unwrap().len(), 3);
}

// =============================================================================
// Atomicity
// =============================================================================

/// A render failure on the automated path rolls back the new submission too.
#[test]
fn test_render_failure_rolls_back_submission_and_application() {
    let (store, engine) = engine_with(Arc::new(FailingRenderer));
    let application = enroll(&store, "U400", Track::FrontendDevelopment, PackageTier::Premium, 8);

    let result = engine.record_submission(draft(&application), &passing(8));
    assert!(matches!(result, Err(ProgressionError::Certificate(_))));

    let stored = store.application(application.id).unwrap().unwrap();
    assert_eq!(stored, application);
    assert!(store.submissions_for_actor("U400").unwrap().is_empty());
    assert!(store.certificate_for_application(application.id).unwrap().is_none());
}

/// A render failure during review rolls back the status change and audit entry.
#[test]
fn test_render_failure_rolls_back_review() {
    let (store, engine) = engine_with(Arc::new(FailingRenderer));
    let application = enroll(&store, "U401", Track::ProjectManagement, PackageTier::Premium, 8);
    let reviewer = Actor::reviewer("mentor-1", "Grace");

    let queued = engine
        .record_submission(draft(&application), &AuditReport::manual(8))
        .unwrap();

    let result = engine.apply_review(&reviewer, queued.submission.id, SubmissionStatus::Accepted, "ok");
    assert!(result.is_err());

    let submission = store.submission(queued.submission.id).unwrap().unwrap();
    assert_eq!(submission.status, SubmissionStatus::Pending);
    assert!(store.audit_history(queued.submission.id).unwrap().is_empty());
    let stored = store.application(application.id).unwrap().unwrap();
    assert!(!stored.completed);
    assert_eq!(stored.current_stage, 8);
    assert!(store.certificate_for_application(application.id).unwrap().is_none());
}

// =============================================================================
// Stale reviews
// =============================================================================

#[test]
fn test_accepting_an_old_stage_does_not_move_application() {
    let (store, engine) = engine();
    let application = enroll(&store, "U500", Track::UiUxDesign, PackageTier::Premium, 2);
    let reviewer = Actor::reviewer("mentor-2", "Linus");

    let old = engine
        .record_submission(draft(&application), &AuditReport::manual(2))
        .unwrap();
    engine.override_stage(application.id, 4, None).unwrap();

    let outcome = engine
        .apply_review(&reviewer, old.submission.id, SubmissionStatus::Accepted, "Nice")
        .unwrap();

    assert!(outcome.transition.is_none());
    assert_eq!(outcome.submission.status, SubmissionStatus::Accepted);
    let stored = store.application(application.id).unwrap().unwrap();
    assert_eq!(stored.current_stage, 4);
}

#[test]
fn test_audit_for_a_left_stage_does_not_move_application() {
    let (store, engine) = engine();
    let application = enroll(&store, "U502", Track::FrontendDevelopment, PackageTier::Free, 1);
    engine.override_stage(application.id, 3, None).unwrap();

    let outcome = engine
        .record_submission(draft(&application), &passing(1))
        .unwrap();

    assert!(outcome.transition.is_none());
    assert_eq!(outcome.submission.stage, 1);
    assert_eq!(outcome.submission.status, SubmissionStatus::Accepted);
    assert_eq!(outcome.submission.score, Some(100));
    let stored = store.application(application.id).unwrap().unwrap();
    assert_eq!(stored.current_stage, 3);
    assert_eq!(stored.progress, progress_for_stage(3));
    assert_eq!(outcome.effects.len(), 1);
    match &outcome.effects[0] {
        Effect::DirectMessage { text, .. } => assert!(text.contains("currently on Stage 3")),
        other => panic!("unexpected effect {:?}", other),
    }

    let recorded = store.submission(outcome.submission.id).unwrap().unwrap();
    assert_eq!(recorded.stage, 1);
}

#[test]
fn test_submission_for_completed_application_rejected() {
    let (store, engine) = engine();
    let application = enroll(&store, "U501", Track::FrontendDevelopment, PackageTier::Free, 8);
    engine.record_submission(draft(&application), &passing(8)).unwrap();

    assert!(matches!(
        engine.record_submission(draft(&application), &passing(8)),
        Err(ProgressionError::AlreadyCompleted(_))
    ));
}
