//! # Intake
//!
//! Actor-facing operations. Each checks the actor's resolved capabilities
//! once, then delegates to the progression engine or the store.
//!
//! - [`SubmissionIntake`]: participant project submissions
//! - [`ReviewDesk`]: manual review, review queue, audit history
//! - [`AdminDesk`]: enrollment, progress override, statistics

mod admin;
mod errors;
mod pipeline;
mod review;

pub use admin::{AdminDesk, ProgressOverride};
pub use errors::{IntakeError, IntakeResult};
pub use pipeline::{Acknowledgement, PendingSubmission, SubmissionIntake};
pub use review::{ReviewDesk, ReviewOutcome};
