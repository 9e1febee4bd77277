//! Intake Pipeline Tests
//!
//! - Synchronous gates: capability, active application, link validation, lock
//! - One submission in flight per actor; the lock is released on success,
//!   on failure and on panic
//! - An aborted transaction sends the generic system-error message
//! - Reviewer operations are capability-gated

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cohortd::audit::{AuditReport, AuditRequest, Finding, ProjectAuditor};
use cohortd::certificate::{
    CertificateData, CertificateError, CertificateRenderer, CertificateResult, RenderedArtifact,
    SvgCertificateRenderer,
};
use cohortd::intake::{IntakeError, ProgressOverride};
use cohortd::lock::{MemoryKeyedLockStore, SubmissionLock};
use cohortd::notify::{ArtifactStore, MockEmailSender, MockMessenger};
use cohortd::program::{
    Actor, AuditStyle, EnrollmentRequest, PackageTier, SubmissionStatus, Track,
};
use cohortd::progression::{messages, Effect};
use cohortd::services::{Backends, Services};
use cohortd::store::{MemoryStore, ProgramStore};
use cohortd::validation::LinkRejection;
use tempfile::TempDir;
use uuid::Uuid;

// =============================================================================
// Fixtures
// =============================================================================

/// Counts calls and answers with a fixed score, or queues for review
struct ScriptedAuditor {
    calls: AtomicUsize,
    score: Option<u8>,
    delay: Duration,
}

impl ScriptedAuditor {
    fn new(score: u8) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            score: Some(score),
            delay: Duration::ZERO,
        }
    }

    fn manual() -> Self {
        Self {
            score: None,
            ..Self::new(0)
        }
    }

    fn slow(score: u8, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new(score)
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProjectAuditor for ScriptedAuditor {
    async fn audit(&self, request: &AuditRequest) -> AuditReport {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.score {
            Some(score) => AuditReport::automated(
                AuditStyle::Frontend,
                request.stage,
                Finding::new(score, "scripted"),
            ),
            None => AuditReport::manual(request.stage),
        }
    }
}

struct PanickingAuditor;

#[async_trait]
impl ProjectAuditor for PanickingAuditor {
    async fn audit(&self, _request: &AuditRequest) -> AuditReport {
        panic!("probe exploded");
    }
}

struct FailingRenderer;

impl CertificateRenderer for FailingRenderer {
    fn render(&self, _data: &CertificateData) -> CertificateResult<RenderedArtifact> {
        Err(CertificateError::Render("template missing".to_string()))
    }
}

struct Harness {
    services: Services,
    store: Arc<MemoryStore>,
    messenger: Arc<MockMessenger>,
    email: Arc<MockEmailSender>,
    _artifacts: TempDir,
}

fn harness_with(
    auditor: Arc<dyn ProjectAuditor>,
    renderer: Arc<dyn CertificateRenderer>,
) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let messenger = Arc::new(MockMessenger::new());
    let email = Arc::new(MockEmailSender::new());
    let artifacts = tempfile::tempdir().unwrap();

    let services = Services::assemble(Backends {
        store: store.clone(),
        auditor,
        renderer,
        messenger: messenger.clone(),
        email: email.clone(),
        artifacts: ArtifactStore::new(artifacts.path()),
        lock: SubmissionLock::new(
            Arc::new(MemoryKeyedLockStore::new()),
            Duration::from_secs(30),
        ),
    });

    Harness {
        services,
        store,
        messenger,
        email,
        _artifacts: artifacts,
    }
}

fn harness(auditor: Arc<dyn ProjectAuditor>) -> Harness {
    harness_with(auditor, Arc::new(SvgCertificateRenderer::new()))
}

fn admin() -> Actor {
    Actor::admin("admin-1", "Ops")
}

fn enroll(h: &Harness, handle: &str, track: Track, tier: PackageTier) -> Uuid {
    h.services
        .admin
        .enroll(
            &admin(),
            EnrollmentRequest {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: format!("{}@example.com", handle.to_lowercase()),
                messaging_handle: handle.to_string(),
                track,
                tier,
                cohort_id: Uuid::new_v4(),
            },
        )
        .unwrap()
        .id
}

async fn wait_for_submissions(store: &MemoryStore, actor_id: &str, count: usize) {
    for _ in 0..200 {
        if store.submissions_for_actor(actor_id).unwrap().len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {} submissions from {}", count, actor_id);
}

// =============================================================================
// Gates
// =============================================================================

#[tokio::test]
async fn test_reviewer_cannot_submit() {
    let h = harness(Arc::new(ScriptedAuditor::new(100)));
    let result = h
        .services
        .intake
        .submit(&Actor::reviewer("U1", "Grace"), "https://example.dev");
    assert!(matches!(result, Err(IntakeError::Forbidden(_))));
}

#[tokio::test]
async fn test_unknown_actor_has_no_application() {
    let h = harness(Arc::new(ScriptedAuditor::new(100)));
    let result = h
        .services
        .intake
        .submit(&Actor::participant("U404", "Nobody"), "https://example.dev");
    assert!(matches!(result, Err(IntakeError::NoActiveApplication(_))));
}

#[tokio::test]
async fn test_design_link_off_tool_rejected_without_submission() {
    let auditor = Arc::new(ScriptedAuditor::new(100));
    let h = harness(auditor.clone());
    enroll(&h, "U10", Track::UiUxDesign, PackageTier::Free);

    let result = h
        .services
        .intake
        .submit(&Actor::participant("U10", "Ada"), "https://my-portfolio.dev/case-study");

    assert!(matches!(
        result,
        Err(IntakeError::InvalidLink(LinkRejection::NotDesignTool { .. }))
    ));
    assert!(h.store.submissions_for_actor("U10").unwrap().is_empty());
    assert_eq!(auditor.calls(), 0);
}

#[tokio::test]
async fn test_loopback_link_rejected_for_engineering() {
    let h = harness(Arc::new(ScriptedAuditor::new(100)));
    enroll(&h, "U11", Track::BackendDevelopment, PackageTier::Free);

    let result = h
        .services
        .intake
        .submit(&Actor::participant("U11", "Ada"), "http://127.0.0.1:3000");
    assert!(matches!(
        result,
        Err(IntakeError::InvalidLink(LinkRejection::NonPublicHost(_)))
    ));
}

#[tokio::test]
async fn test_document_link_without_suffix_accepted_with_warning() {
    let h = harness(Arc::new(ScriptedAuditor::new(100)));
    enroll(&h, "U12", Track::ContentWriting, PackageTier::Free);

    let ack = h
        .services
        .intake
        .submit(
            &Actor::participant("U12", "Ada"),
            "https://docs.google.com/document/d/abc123",
        )
        .unwrap();

    assert!(ack.accepted);
    assert!(ack.warning.is_some());
    wait_for_submissions(&h.store, "U12", 1).await;
}

// =============================================================================
// Lock
// =============================================================================

#[tokio::test]
async fn test_second_submission_while_processing_is_refused() {
    let h = harness(Arc::new(ScriptedAuditor::new(100)));
    enroll(&h, "U20", Track::FrontendDevelopment, PackageTier::Free);
    let actor = Actor::participant("U20", "Ada");

    let pending = h.services.intake.begin(&actor, "https://ada.example.dev").unwrap();
    assert!(matches!(
        h.services.intake.begin(&actor, "https://ada.example.dev"),
        Err(IntakeError::AlreadyProcessing)
    ));

    pending.run().await.unwrap();

    // Released after the run
    let again = h.services.intake.begin(&actor, "https://ada.example.dev");
    assert!(again.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_run_once() {
    let auditor = Arc::new(ScriptedAuditor::slow(100, Duration::from_millis(100)));
    let h = Arc::new(harness(auditor.clone()));
    enroll(&h, "U21", Track::FrontendDevelopment, PackageTier::Free);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let h = Arc::clone(&h);
        handles.push(tokio::spawn(async move {
            h.services
                .intake
                .submit(&Actor::participant("U21", "Ada"), "https://ada.example.dev")
        }));
    }

    let mut accepted = 0;
    let mut refused = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(IntakeError::AlreadyProcessing) => refused += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    assert_eq!(accepted, 1);
    assert_eq!(refused, 7);

    wait_for_submissions(&h.store, "U21", 1).await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(auditor.calls(), 1);
    assert_eq!(h.store.submissions_for_actor("U21").unwrap().len(), 1);
}

#[tokio::test]
async fn test_lock_released_when_pipeline_panics() {
    let h = harness(Arc::new(PanickingAuditor));
    enroll(&h, "U22", Track::FrontendDevelopment, PackageTier::Free);
    let actor = Actor::participant("U22", "Ada");

    let pending = h.services.intake.begin(&actor, "https://ada.example.dev").unwrap();
    let joined = tokio::spawn(pending.run()).await;
    assert!(joined.is_err());

    assert!(h.services.intake.begin(&actor, "https://ada.example.dev").is_ok());
}

// =============================================================================
// Failure handling
// =============================================================================

#[tokio::test]
async fn test_aborted_transaction_sends_system_error() {
    let h = harness_with(Arc::new(ScriptedAuditor::new(100)), Arc::new(FailingRenderer));
    let id = enroll(&h, "U30", Track::FrontendDevelopment, PackageTier::Premium);
    h.services
        .admin
        .override_progress(
            &admin(),
            id,
            ProgressOverride {
                stage: 8,
                completed_tasks: None,
            },
        )
        .unwrap();
    let actor = Actor::participant("U30", "Ada");

    let pending = h.services.intake.begin(&actor, "https://ada.example.dev").unwrap();
    let result = pending.run().await;

    assert!(matches!(result, Err(IntakeError::System)));
    let sent = h.messenger.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].handle, "U30");
    assert_eq!(sent[0].text, messages::system_error());
    assert_eq!(h.email.sent_count(), 0);

    assert!(h.store.submissions_for_actor("U30").unwrap().is_empty());
    let application = h.store.application(id).unwrap().unwrap();
    assert!(!application.completed);

    // Lock released for a retry
    assert!(h.services.intake.begin(&actor, "https://ada.example.dev").is_ok());
}

#[tokio::test]
async fn test_successful_submission_notifies_participant() {
    let h = harness(Arc::new(ScriptedAuditor::new(100)));
    enroll(&h, "U31", Track::FrontendDevelopment, PackageTier::Free);
    let actor = Actor::participant("U31", "Ada");

    let outcome = h
        .services
        .intake
        .begin(&actor, "https://ada.example.dev")
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.submission.status, SubmissionStatus::Accepted);
    assert_eq!(outcome.application.current_stage, 2);
    assert_eq!(h.messenger.sent_count(), 1);
    assert_eq!(h.messenger.sent()[0].handle, "U31");
}

// =============================================================================
// Reviews
// =============================================================================

#[tokio::test]
async fn test_review_requires_capability() {
    let h = harness(Arc::new(ScriptedAuditor::new(100)));
    let result = h.services.reviews.review(
        &Actor::participant("U40", "Ada"),
        Uuid::new_v4(),
        SubmissionStatus::Accepted,
        "self-approved",
    );
    assert!(matches!(result, Err(IntakeError::Forbidden(_))));
}

#[tokio::test]
async fn test_review_of_unknown_submission_is_not_found() {
    let h = harness(Arc::new(ScriptedAuditor::new(100)));
    let result = h.services.reviews.review(
        &Actor::reviewer("mentor-1", "Grace"),
        Uuid::new_v4(),
        SubmissionStatus::Accepted,
        "",
    );
    let err = result.unwrap_err();
    assert!(matches!(err, IntakeError::NotFound(_)));
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_paid_completion_by_review_emails_certificate() {
    let h = harness(Arc::new(ScriptedAuditor::manual()));
    let id = enroll(&h, "U41", Track::UiUxDesign, PackageTier::PremiumPro);
    h.services
        .admin
        .override_progress(
            &admin(),
            id,
            ProgressOverride {
                stage: 8,
                completed_tasks: Some(7),
            },
        )
        .unwrap();

    let actor = Actor::participant("U41", "Ada");
    let queued = h
        .services
        .intake
        .begin(&actor, "https://www.figma.com/file/abc/final")
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(queued.submission.status, SubmissionStatus::Pending);

    let reviewer = Actor::reviewer("mentor-1", "Grace");
    let pending = h.services.reviews.pending(&reviewer, None).unwrap();
    assert_eq!(pending.len(), 1);

    let review = h
        .services
        .reviews
        .review(&reviewer, queued.submission.id, SubmissionStatus::Accepted, "Ship it")
        .unwrap();
    assert_eq!(review.submission.status, SubmissionStatus::Accepted);
    assert!(review
        .effects
        .iter()
        .any(|e| matches!(e, Effect::CertificateEmail { .. })));

    h.services.reviews.dispatch_later(review.effects);
    for _ in 0..200 {
        if h.email.sent_count() == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(h.email.sent_count(), 1);
    assert_eq!(h.email.sent()[0].to, "u41@example.com");

    let application = h.store.application(id).unwrap().unwrap();
    assert!(application.completed);
    assert!(h.services.reviews.pending(&reviewer, None).unwrap().is_empty());

    let history = h.services.reviews.history(&reviewer, queued.submission.id).unwrap();
    assert_eq!(history.len(), 1);
    let by_application = h.services.reviews.history(&reviewer, id).unwrap();
    assert_eq!(by_application, history);
}
