//! # Program Store
//!
//! Persistence for applications, submissions, certificates and the reviewer
//! audit log.
//!
//! ## Transactions
//! Every write goes through a [`Transaction`]. Writers are serialized for the
//! transaction's lifetime; staged writes become visible only on `commit`.
//! Dropping an uncommitted transaction discards everything it staged.
//!
//! ## Keys
//! - Application: unique on (lowercased email, cohort)
//! - Certificate: unique on public certificate id, at most one per application
//! - Submissions and audit entries are append-only

mod errors;
mod memory;
mod stats;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use stats::EnrollmentStats;

use uuid::Uuid;

use crate::program::{Application, AuditLogEntry, Certificate, Submission};

/// Staged unit of work against the store
pub trait Transaction {
    fn application(&self, id: Uuid) -> StoreResult<Option<Application>>;

    /// Newest non-completed application for a messaging handle
    fn active_application_for_handle(&self, handle: &str) -> StoreResult<Option<Application>>;

    fn insert_application(&mut self, application: Application) -> StoreResult<()>;

    fn put_application(&mut self, application: Application) -> StoreResult<()>;

    fn submission(&self, id: Uuid) -> StoreResult<Option<Submission>>;

    fn insert_submission(&mut self, submission: Submission) -> StoreResult<()>;

    fn put_submission(&mut self, submission: Submission) -> StoreResult<()>;

    fn certificate_for_application(&self, application_id: Uuid) -> StoreResult<Option<Certificate>>;

    fn certificate_by_public_id(&self, certificate_id: &str) -> StoreResult<Option<Certificate>>;

    fn insert_certificate(&mut self, certificate: Certificate) -> StoreResult<()>;

    fn append_audit_entry(&mut self, entry: AuditLogEntry) -> StoreResult<()>;

    /// Publish every staged write at once
    fn commit(self: Box<Self>) -> StoreResult<()>;
}

/// Store backend
pub trait ProgramStore: Send + Sync {
    /// Start a transaction; blocks while another writer is active
    fn begin(&self) -> StoreResult<Box<dyn Transaction + '_>>;

    fn application(&self, id: Uuid) -> StoreResult<Option<Application>>;

    fn active_application_for_handle(&self, handle: &str) -> StoreResult<Option<Application>>;

    fn submission(&self, id: Uuid) -> StoreResult<Option<Submission>>;

    /// Submissions by one actor, newest first
    fn submissions_for_actor(&self, actor_id: &str) -> StoreResult<Vec<Submission>>;

    /// Latest submission for an application
    fn latest_submission_for_application(&self, application_id: Uuid)
        -> StoreResult<Option<Submission>>;

    /// Pending submissions, oldest first
    fn pending_submissions(&self, cohort_id: Option<Uuid>) -> StoreResult<Vec<Submission>>;

    /// Audit entries for a submission, newest first
    fn audit_history(&self, submission_id: Uuid) -> StoreResult<Vec<AuditLogEntry>>;

    fn certificate_by_public_id(&self, certificate_id: &str) -> StoreResult<Option<Certificate>>;

    fn certificate_for_application(&self, application_id: Uuid) -> StoreResult<Option<Certificate>>;

    fn stats(&self) -> StoreResult<EnrollmentStats>;
}
