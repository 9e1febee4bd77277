//! # Stage Progression
//!
//! The transactional core. Records submissions, moves applications through
//! their 8 stages and triggers certificate issuance on paid completion.
//!
//! ## Invariants
//! - `current_stage` stays in `1..=8`; progress follows the stage
//! - `completed` only through an Accepted verdict at stage 8
//! - Submission, application and certificate writes commit together or not
//!   at all
//! - Notifications are returned as [`Effect`]s, never sent from inside a
//!   transaction

mod effects;
mod engine;
mod errors;
pub mod messages;
mod state;

pub use effects::Effect;
pub use engine::{ProgressionEngine, ProgressionOutcome, SubmissionDraft};
pub use errors::{ProgressionError, ProgressionResult};
pub use state::{apply_verdict, StageState, Transition};
