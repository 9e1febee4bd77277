//! cohortd - cohort internship program service
//!
//! Participants submit project links per stage; submissions are validated,
//! audited or queued for a reviewer, and progression is applied as a single
//! transaction. Paid completions receive a verifiable certificate.

pub mod audit;
pub mod certificate;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod intake;
pub mod lock;
pub mod notify;
pub mod program;
pub mod progression;
pub mod services;
pub mod store;
pub mod validation;
