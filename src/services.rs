//! # Service Assembly
//!
//! Wires the store, lock, auditor, progression engine and notification
//! backends into the intake, review and admin desks.

use std::sync::Arc;

use thiserror::Error;

use crate::audit::{AuditEngine, AuditError, ProjectAuditor};
use crate::certificate::{CertificateIssuer, CertificateRenderer, SvgCertificateRenderer};
use crate::config::ServiceConfig;
use crate::intake::{AdminDesk, ReviewDesk, SubmissionIntake};
use crate::lock::{MemoryKeyedLockStore, SubmissionLock};
use crate::notify::{
    create_email_sender, create_messenger, ArtifactStore, Dispatcher, EmailSender, Messenger,
    NotifyError,
};
use crate::progression::ProgressionEngine;
use crate::store::{MemoryStore, ProgramStore};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// Collaborators the services are built from
pub struct Backends {
    pub store: Arc<dyn ProgramStore>,
    pub auditor: Arc<dyn ProjectAuditor>,
    pub renderer: Arc<dyn CertificateRenderer>,
    pub messenger: Arc<dyn Messenger>,
    pub email: Arc<dyn EmailSender>,
    pub artifacts: ArtifactStore,
    pub lock: SubmissionLock,
}

/// Everything the HTTP layer needs
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn ProgramStore>,
    pub intake: SubmissionIntake,
    pub reviews: ReviewDesk,
    pub admin: AdminDesk,
}

impl Services {
    pub fn assemble(backends: Backends) -> Self {
        let Backends {
            store,
            auditor,
            renderer,
            messenger,
            email,
            artifacts,
            lock,
        } = backends;

        let engine = ProgressionEngine::new(Arc::clone(&store), CertificateIssuer::new(renderer));
        let dispatcher = Dispatcher::new(messenger, email, artifacts);

        Self {
            intake: SubmissionIntake::new(
                Arc::clone(&store),
                lock,
                auditor,
                engine.clone(),
                dispatcher.clone(),
            ),
            reviews: ReviewDesk::new(Arc::clone(&store), engine.clone(), dispatcher),
            admin: AdminDesk::new(Arc::clone(&store), engine),
            store,
        }
    }

    /// In-memory store with backends chosen by configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self, StartupError> {
        let renderer: Arc<dyn CertificateRenderer> = match &config.public_base_url {
            Some(url) => Arc::new(SvgCertificateRenderer::with_verify_url(url.clone())),
            None => Arc::new(SvgCertificateRenderer::new()),
        };
        Ok(Self::assemble(Backends {
            store: Arc::new(MemoryStore::new()),
            auditor: Arc::new(AuditEngine::new(&config.audit)?),
            renderer,
            messenger: create_messenger(config.messaging.clone())?,
            email: create_email_sender(config.email.clone()),
            artifacts: ArtifactStore::new(config.artifact_dir.clone()),
            lock: SubmissionLock::new(Arc::new(MemoryKeyedLockStore::new()), config.lock_ttl()),
        }))
    }
}
