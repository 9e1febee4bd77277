//! # Program Domain Model
//!
//! Records and fixed constants of the internship program: tracks, package
//! tiers, applications, submissions, certificates and the reviewer audit log.
//!
//! Stage count, ordering and per-track rules are domain constants. Nothing in
//! this module is configurable at runtime.

pub mod actor;
pub mod application;
pub mod audit_log;
pub mod certificate;
pub mod submission;
pub mod track;

pub use actor::{Actor, Capability, Role};
pub use application::{progress_for_stage, Application, EnrollmentRequest};
pub use audit_log::{AuditLogAction, AuditLogEntry};
pub use certificate::Certificate;
pub use submission::{Submission, SubmissionStatus, Verdict};
pub use track::{
    review_mode, AuditStyle, LinkClass, PackageTier, ReviewMode, Track, UnknownTier, UnknownTrack,
    TOTAL_STAGES,
};
