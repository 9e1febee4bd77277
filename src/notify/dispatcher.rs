//! Best-effort effect delivery
//!
//! Drains the effects of a committed transaction. Each effect is isolated:
//! a failure is logged and the rest still run. Nothing is retried.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::progression::Effect;

use super::artifacts::ArtifactStore;
use super::email::{CertificateEmail, EmailSender};
use super::errors::NotifyResult;
use super::messenger::Messenger;

/// Counts from one drain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Delivers effects to the messaging and email backends
#[derive(Clone)]
pub struct Dispatcher {
    messenger: Arc<dyn Messenger>,
    email: Arc<dyn EmailSender>,
    artifacts: ArtifactStore,
}

impl Dispatcher {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        email: Arc<dyn EmailSender>,
        artifacts: ArtifactStore,
    ) -> Self {
        Self {
            messenger,
            email,
            artifacts,
        }
    }

    /// Deliver every effect, in order
    pub async fn drain(&self, effects: Vec<Effect>) -> DispatchReport {
        let mut report = DispatchReport::default();
        for effect in effects {
            let kind = effect.kind();
            match self.deliver(effect).await {
                Ok(()) => {
                    debug!(effect = kind, "effect delivered");
                    report.delivered += 1;
                }
                Err(e) => {
                    warn!(effect = kind, error = %e, "effect delivery failed");
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Direct message outside of an effect list, e.g. the generic system
    /// error after an aborted transaction
    pub async fn notify(&self, handle: &str, text: &str) {
        if let Err(e) = self.messenger.direct_message(handle, text).await {
            warn!(handle, error = %e, "direct message failed");
        }
    }

    async fn deliver(&self, effect: Effect) -> NotifyResult<()> {
        match effect {
            Effect::DirectMessage { handle, text } => {
                self.messenger.direct_message(&handle, &text).await
            }
            Effect::CertificateEmail {
                to,
                recipient_name,
                certificate_id,
                file_name,
                content_type,
                artifact,
            } => {
                let saved = match self.artifacts.save(&file_name, &artifact).await {
                    Ok(path) => {
                        debug!(certificate_id = %certificate_id, path = %path.display(), "artifact written");
                        Some(path)
                    }
                    Err(e) => {
                        warn!(certificate_id = %certificate_id, error = %e, "artifact not written; emailing anyway");
                        None
                    }
                };

                let result = self
                    .email
                    .send_certificate(CertificateEmail {
                        to,
                        recipient_name,
                        certificate_id: certificate_id.clone(),
                        file_name,
                        content_type,
                        attachment: artifact,
                    })
                    .await;
                if result.is_err() {
                    error!(
                        certificate_id = %certificate_id,
                        path = ?saved,
                        "certificate email failed"
                    );
                }
                result
            }
        }
    }
}
