//! Post-commit effects
//!
//! Produced by a committed progression transaction, drained afterwards by the
//! notification dispatcher. Never executed inside the transaction.

/// Side effect awaiting delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Direct message to a participant's messaging identity
    DirectMessage { handle: String, text: String },

    /// Email carrying a newly issued certificate
    CertificateEmail {
        to: String,
        recipient_name: String,
        certificate_id: String,
        file_name: String,
        content_type: String,
        artifact: Vec<u8>,
    },
}

impl Effect {
    pub fn direct_message(handle: impl Into<String>, text: impl Into<String>) -> Self {
        Effect::DirectMessage {
            handle: handle.into(),
            text: text.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Effect::DirectMessage { .. } => "direct_message",
            Effect::CertificateEmail { .. } => "certificate_email",
        }
    }
}
