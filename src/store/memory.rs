//! In-memory store backend

use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard};

use uuid::Uuid;

use crate::program::{Application, AuditLogEntry, Certificate, Submission, SubmissionStatus};

use super::errors::{StoreError, StoreResult};
use super::stats::EnrollmentStats;
use super::{ProgramStore, Transaction};

#[derive(Debug, Clone, Default)]
struct Tables {
    applications: Vec<Application>,
    submissions: Vec<Submission>,
    certificates: Vec<Certificate>,
    audit_log: Vec<AuditLogEntry>,
}

impl Tables {
    fn application(&self, id: Uuid) -> Option<Application> {
        self.applications.iter().find(|a| a.id == id).cloned()
    }

    fn active_application_for_handle(&self, handle: &str) -> Option<Application> {
        self.applications
            .iter()
            .filter(|a| !a.completed && a.messaging_handle == handle)
            .max_by_key(|a| a.created_at)
            .cloned()
    }

    fn submission(&self, id: Uuid) -> Option<Submission> {
        self.submissions.iter().find(|s| s.id == id).cloned()
    }

    fn certificate_for_application(&self, application_id: Uuid) -> Option<Certificate> {
        self.certificates
            .iter()
            .find(|c| c.application_id == application_id)
            .cloned()
    }

    fn certificate_by_public_id(&self, certificate_id: &str) -> Option<Certificate> {
        self.certificates
            .iter()
            .find(|c| c.certificate_id == certificate_id)
            .cloned()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("Lock poisoned".to_string())
}

/// Reference store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Serializes writers for the lifetime of a transaction
    writer: Mutex<()>,
    /// Last committed state
    published: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.published.read().map_err(poisoned)
    }
}

/// Transaction over a private copy of the tables
struct MemoryTransaction<'a> {
    _writer: MutexGuard<'a, ()>,
    published: &'a RwLock<Tables>,
    staged: Tables,
}

impl Transaction for MemoryTransaction<'_> {
    fn application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        Ok(self.staged.application(id))
    }

    fn active_application_for_handle(&self, handle: &str) -> StoreResult<Option<Application>> {
        Ok(self.staged.active_application_for_handle(handle))
    }

    fn insert_application(&mut self, application: Application) -> StoreResult<()> {
        let duplicate = self.staged.applications.iter().any(|a| {
            a.id == application.id
                || (a.email == application.email && a.cohort_id == application.cohort_id)
        });
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "application for {} already exists in cohort {}",
                application.email, application.cohort_id
            )));
        }
        self.staged.applications.push(application);
        Ok(())
    }

    fn put_application(&mut self, application: Application) -> StoreResult<()> {
        let slot = self
            .staged
            .applications
            .iter_mut()
            .find(|a| a.id == application.id)
            .ok_or_else(|| StoreError::NotFound(format!("application {}", application.id)))?;
        *slot = application;
        Ok(())
    }

    fn submission(&self, id: Uuid) -> StoreResult<Option<Submission>> {
        Ok(self.staged.submission(id))
    }

    fn insert_submission(&mut self, submission: Submission) -> StoreResult<()> {
        if self.staged.submissions.iter().any(|s| s.id == submission.id) {
            return Err(StoreError::Conflict(format!("submission {}", submission.id)));
        }
        self.staged.submissions.push(submission);
        Ok(())
    }

    fn put_submission(&mut self, submission: Submission) -> StoreResult<()> {
        let slot = self
            .staged
            .submissions
            .iter_mut()
            .find(|s| s.id == submission.id)
            .ok_or_else(|| StoreError::NotFound(format!("submission {}", submission.id)))?;
        *slot = submission;
        Ok(())
    }

    fn certificate_for_application(&self, application_id: Uuid) -> StoreResult<Option<Certificate>> {
        Ok(self.staged.certificate_for_application(application_id))
    }

    fn certificate_by_public_id(&self, certificate_id: &str) -> StoreResult<Option<Certificate>> {
        Ok(self.staged.certificate_by_public_id(certificate_id))
    }

    fn insert_certificate(&mut self, certificate: Certificate) -> StoreResult<()> {
        if self
            .staged
            .certificate_for_application(certificate.application_id)
            .is_some()
        {
            return Err(StoreError::Conflict(format!(
                "certificate already issued for application {}",
                certificate.application_id
            )));
        }
        if self
            .staged
            .certificate_by_public_id(&certificate.certificate_id)
            .is_some()
        {
            return Err(StoreError::Conflict(format!(
                "certificate id {} already in use",
                certificate.certificate_id
            )));
        }
        self.staged.certificates.push(certificate);
        Ok(())
    }

    fn append_audit_entry(&mut self, entry: AuditLogEntry) -> StoreResult<()> {
        self.staged.audit_log.push(entry);
        Ok(())
    }

    fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTransaction {
            _writer,
            published,
            staged,
        } = *self;
        *published.write().map_err(poisoned)? = staged;
        Ok(())
    }
}

impl ProgramStore for MemoryStore {
    fn begin(&self) -> StoreResult<Box<dyn Transaction + '_>> {
        let writer = self.writer.lock().map_err(poisoned)?;
        let staged = self.read()?.clone();
        Ok(Box::new(MemoryTransaction {
            _writer: writer,
            published: &self.published,
            staged,
        }))
    }

    fn application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        Ok(self.read()?.application(id))
    }

    fn active_application_for_handle(&self, handle: &str) -> StoreResult<Option<Application>> {
        Ok(self.read()?.active_application_for_handle(handle))
    }

    fn submission(&self, id: Uuid) -> StoreResult<Option<Submission>> {
        Ok(self.read()?.submission(id))
    }

    fn submissions_for_actor(&self, actor_id: &str) -> StoreResult<Vec<Submission>> {
        // insertion order is creation order
        Ok(self
            .read()?
            .submissions
            .iter()
            .rev()
            .filter(|s| s.actor_id == actor_id)
            .cloned()
            .collect())
    }

    fn latest_submission_for_application(
        &self,
        application_id: Uuid,
    ) -> StoreResult<Option<Submission>> {
        Ok(self
            .read()?
            .submissions
            .iter()
            .rev()
            .find(|s| s.application_id == application_id)
            .cloned())
    }

    fn pending_submissions(&self, cohort_id: Option<Uuid>) -> StoreResult<Vec<Submission>> {
        Ok(self
            .read()?
            .submissions
            .iter()
            .filter(|s| s.status == SubmissionStatus::Pending)
            .filter(|s| cohort_id.map_or(true, |c| s.cohort_id == c))
            .cloned()
            .collect())
    }

    fn audit_history(&self, submission_id: Uuid) -> StoreResult<Vec<AuditLogEntry>> {
        Ok(self
            .read()?
            .audit_log
            .iter()
            .rev()
            .filter(|e| e.submission_id == submission_id)
            .cloned()
            .collect())
    }

    fn certificate_by_public_id(&self, certificate_id: &str) -> StoreResult<Option<Certificate>> {
        Ok(self.read()?.certificate_by_public_id(certificate_id))
    }

    fn certificate_for_application(&self, application_id: Uuid) -> StoreResult<Option<Certificate>> {
        Ok(self.read()?.certificate_for_application(application_id))
    }

    fn stats(&self) -> StoreResult<EnrollmentStats> {
        let tables = self.read()?;
        Ok(EnrollmentStats::compute(
            &tables.applications,
            &tables.certificates,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{EnrollmentRequest, PackageTier, Track};

    fn application(email: &str, handle: &str, cohort: Uuid) -> Application {
        Application::enroll(EnrollmentRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            messaging_handle: handle.to_string(),
            track: Track::FrontendDevelopment,
            tier: PackageTier::Premium,
            cohort_id: cohort,
        })
    }

    #[test]
    fn test_uncommitted_writes_are_discarded() {
        let store = MemoryStore::new();
        let app = application("a@example.com", "U1", Uuid::new_v4());
        {
            let mut tx = store.begin().unwrap();
            tx.insert_application(app.clone()).unwrap();
            assert!(tx.application(app.id).unwrap().is_some());
        }
        assert!(store.application(app.id).unwrap().is_none());
    }

    #[test]
    fn test_commit_publishes() {
        let store = MemoryStore::new();
        let app = application("a@example.com", "U1", Uuid::new_v4());
        let mut tx = store.begin().unwrap();
        tx.insert_application(app.clone()).unwrap();
        tx.commit().unwrap();
        assert_eq!(store.application(app.id).unwrap(), Some(app));
    }

    #[test]
    fn test_email_cohort_unique() {
        let store = MemoryStore::new();
        let cohort = Uuid::new_v4();
        let mut tx = store.begin().unwrap();
        tx.insert_application(application("a@example.com", "U1", cohort))
            .unwrap();
        let err = tx
            .insert_application(application("A@example.com", "U2", cohort))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // same email, another cohort is fine
        tx.insert_application(application("a@example.com", "U1", Uuid::new_v4()))
            .unwrap();
    }

    #[test]
    fn test_active_lookup_skips_completed() {
        let store = MemoryStore::new();
        let mut done = application("a@example.com", "U1", Uuid::new_v4());
        done.set_stage(8);
        done.completed = true;

        let mut tx = store.begin().unwrap();
        tx.insert_application(done).unwrap();
        tx.commit().unwrap();
        assert!(store.active_application_for_handle("U1").unwrap().is_none());

        let next = application("a@example.com", "U1", Uuid::new_v4());
        let mut tx = store.begin().unwrap();
        tx.insert_application(next.clone()).unwrap();
        tx.commit().unwrap();
        assert_eq!(
            store.active_application_for_handle("U1").unwrap().map(|a| a.id),
            Some(next.id)
        );
    }

    #[test]
    fn test_one_certificate_per_application() {
        let store = MemoryStore::new();
        let app = application("a@example.com", "U1", Uuid::new_v4());
        let cert = |id: &str| {
            Certificate::new(
                app.id,
                id.to_string(),
                app.cohort_id,
                app.track,
                app.tier,
                app.full_name(),
            )
        };
        let mut tx = store.begin().unwrap();
        tx.insert_certificate(cert("KNOW-2026-000001")).unwrap();
        assert!(matches!(
            tx.insert_certificate(cert("KNOW-2026-000002")),
            Err(StoreError::Conflict(_))
        ));
    }

    #[test]
    fn test_readers_see_last_commit_during_transaction() {
        let store = MemoryStore::new();
        let app = application("a@example.com", "U1", Uuid::new_v4());
        let mut tx = store.begin().unwrap();
        tx.insert_application(app.clone()).unwrap();
        assert!(store.application(app.id).unwrap().is_none());
        tx.commit().unwrap();
        assert!(store.application(app.id).unwrap().is_some());
    }
}
