//! # Notifications
//!
//! Post-commit delivery of participant messages and certificate email.
//! Delivery failures are logged and swallowed; they never reach the caller
//! and never trigger a compensating write.

mod artifacts;
mod config;
mod dispatcher;
mod email;
mod errors;
mod messenger;

pub use artifacts::ArtifactStore;
pub use config::{EmailConfig, MessagingConfig};
pub use dispatcher::{DispatchReport, Dispatcher};
pub use email::{create_email_sender, CertificateEmail, EmailSender, MockEmailSender, SmtpEmailSender};
pub use errors::{NotifyError, NotifyResult};
pub use messenger::{create_messenger, Messenger, MockMessenger, SentMessage, SlackMessenger};
