//! # HTTP Server Module
//!
//! Axum API over the intake, review and admin services.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/intake/submissions` - Participant project submission
//! - `/submissions/*` - Review, review queue, audit history
//! - `/applications/*` - Enrollment, progress override, statistics
//! - `/certificates/:id/verify` - Public certificate verification

pub mod actor;
pub mod application_routes;
pub mod certificate_routes;
pub mod config;
pub mod health_routes;
pub mod intake_routes;
pub mod response;
pub mod server;
pub mod submission_routes;

pub use actor::RequestActor;
pub use config::HttpServerConfig;
pub use response::{ApiResponse, ErrorResponse};
pub use server::HttpServer;
