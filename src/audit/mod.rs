//! # Project Audit
//!
//! Automated checks for free-tier engineering submissions.
//!
//! ## Behavior
//! - Manual-review tracks and paid tiers short-circuit without network access
//! - One bounded GET against the normalized link; any status code is data
//! - Frontend stages look for one structural marker in the page
//! - Backend stages inspect the response, or probe `/api/admin` and
//!   `/api/users` on the same origin
//! - Transport failures become a zero score with a remediation message
//!
//! A report with `score >= ACCEPTANCE_THRESHOLD` promotes the participant.

mod backend;
mod config;
mod engine;
mod errors;
mod frontend;
mod probe;
mod report;
mod target;

pub use config::AuditConfig;
pub use engine::{AuditEngine, AuditRequest, ProjectAuditor};
pub use errors::{AuditError, AuditResult};
pub use frontend::advisory as frontend_advisory;
pub use probe::FetchFailure;
pub use report::{AuditReport, Finding, ACCEPTANCE_THRESHOLD};
pub use target::normalize as normalize_target;
