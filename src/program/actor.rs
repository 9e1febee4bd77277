//! # Actors and Capabilities
//!
//! An actor is the authenticated party behind an action. Authentication
//! happens upstream; the boundary resolves the actor's role into a capability
//! set once, and core operations only ever ask `actor.can(..)`.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role assigned by the upstream authentication collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Participant,
    Reviewer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Participant => "participant",
            Role::Reviewer => "reviewer",
            Role::Admin => "admin",
        }
    }

    /// Capabilities granted to this role
    pub fn capabilities(&self) -> HashSet<Capability> {
        match self {
            Role::Participant => [Capability::SubmitProject].into_iter().collect(),
            Role::Reviewer => [Capability::ReviewSubmission, Capability::ViewAuditHistory]
                .into_iter()
                .collect(),
            Role::Admin => Capability::ALL.into_iter().collect(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "participant" | "intern" => Ok(Role::Participant),
            "reviewer" | "mentor" => Ok(Role::Reviewer),
            "admin" | "super-admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// An action the core permits only to resolved actors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    SubmitProject,
    ReviewSubmission,
    OverrideProgress,
    ViewAuditHistory,
    Enroll,
    ViewStats,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::SubmitProject,
        Capability::ReviewSubmission,
        Capability::OverrideProgress,
        Capability::ViewAuditHistory,
        Capability::Enroll,
        Capability::ViewStats,
    ];
}

/// Resolved actor context passed into the core
#[derive(Debug, Clone)]
pub struct Actor {
    /// Stable identity (messaging handle for participants)
    pub id: String,

    pub display_name: String,

    pub role: Role,

    capabilities: HashSet<Capability>,
}

impl Actor {
    /// Resolve an actor's capability set from its role
    pub fn resolve(id: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            role,
            capabilities: role.capabilities(),
        }
    }

    pub fn participant(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::resolve(id, display_name, Role::Participant)
    }

    pub fn reviewer(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::resolve(id, display_name, Role::Reviewer)
    }

    pub fn admin(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::resolve(id, display_name, Role::Admin)
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn capabilities(&self) -> &HashSet<Capability> {
        &self.capabilities
    }
}
