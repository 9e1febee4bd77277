//! Enrollment and administrative overrides

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::program::{Actor, Application, Capability, EnrollmentRequest};
use crate::progression::ProgressionEngine;
use crate::store::{EnrollmentStats, ProgramStore};

use super::errors::{IntakeError, IntakeResult};

/// Manual progress override
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOverride {
    pub stage: u8,
    #[serde(default)]
    pub completed_tasks: Option<u32>,
}

#[derive(Clone)]
pub struct AdminDesk {
    store: Arc<dyn ProgramStore>,
    engine: ProgressionEngine,
}

impl AdminDesk {
    pub fn new(store: Arc<dyn ProgramStore>, engine: ProgressionEngine) -> Self {
        Self { store, engine }
    }

    /// Create an application from a confirmed enrollment
    pub fn enroll(&self, actor: &Actor, request: EnrollmentRequest) -> IntakeResult<Application> {
        if !actor.can(Capability::Enroll) {
            return Err(IntakeError::Forbidden(Capability::Enroll));
        }
        if request.email.trim().is_empty() || request.messaging_handle.trim().is_empty() {
            return Err(IntakeError::InvalidRequest(
                "email and messagingHandle are required".to_string(),
            ));
        }

        let application = Application::enroll(request);
        let mut tx = self.store.begin()?;
        tx.insert_application(application.clone())?;
        tx.commit()?;

        info!(
            actor_id = %actor.id,
            application_id = %application.id,
            track = %application.track,
            tier = %application.tier,
            "application enrolled"
        );
        Ok(application)
    }

    /// Move an application to a stage by hand
    pub fn override_progress(
        &self,
        actor: &Actor,
        application_id: Uuid,
        change: ProgressOverride,
    ) -> IntakeResult<Application> {
        if !actor.can(Capability::OverrideProgress) {
            return Err(IntakeError::Forbidden(Capability::OverrideProgress));
        }
        let application =
            self.engine
                .override_stage(application_id, change.stage, change.completed_tasks)?;
        info!(actor_id = %actor.id, application_id = %application_id, "override applied");
        Ok(application)
    }

    pub fn stats(&self, actor: &Actor) -> IntakeResult<EnrollmentStats> {
        if !actor.can(Capability::ViewStats) {
            return Err(IntakeError::Forbidden(Capability::ViewStats));
        }
        Ok(self.store.stats()?)
    }
}
