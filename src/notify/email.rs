//! # Certificate Email
//!
//! Sends a newly issued certificate to the participant.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::config::EmailConfig;
use super::errors::{NotifyError, NotifyResult};

/// Certificate email contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateEmail {
    pub to: String,
    pub recipient_name: String,
    pub certificate_id: String,
    pub file_name: String,
    pub content_type: String,
    pub attachment: Vec<u8>,
}

impl CertificateEmail {
    fn subject(&self) -> String {
        "Your program certificate".to_string()
    }

    fn body(&self) -> String {
        format!(
            "Hello {},\n\n\
            Congratulations on completing your program! Your certificate is attached.\n\n\
            Certificate ID: {}\n\
            Anyone can confirm it using this ID on our verification page.\n\n\
            Thanks,\n\
            The Program Team",
            self.recipient_name, self.certificate_id
        )
    }
}

/// Email sender abstraction
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_certificate(&self, email: CertificateEmail) -> NotifyResult<()>;
}

/// Recording sender for tests and unconfigured deployments
#[derive(Debug, Default)]
pub struct MockEmailSender {
    sent: RwLock<Vec<CertificateEmail>>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<CertificateEmail> {
        self.sent.read().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.read().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send_certificate(&self, email: CertificateEmail) -> NotifyResult<()> {
        self.sent
            .write()
            .map_err(|_| NotifyError::Email("Lock poisoned".to_string()))?
            .push(email);
        Ok(())
    }
}

/// SMTP email sender
pub struct SmtpEmailSender {
    config: EmailConfig,
}

impl SmtpEmailSender {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, email: &CertificateEmail) -> NotifyResult<lettre::Message> {
        use lettre::message::{header::ContentType, Attachment, MultiPart, SinglePart};

        let attachment_type = ContentType::parse(&email.content_type)
            .map_err(|e| NotifyError::Email(format!("Invalid attachment type: {}", e)))?;

        lettre::Message::builder()
            .from(
                format!("{} <{}>", self.config.from_name, self.config.from_email)
                    .parse()
                    .map_err(|e| NotifyError::Email(format!("Invalid from address: {}", e)))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|e| NotifyError::Email(format!("Invalid to address: {}", e)))?)
            .subject(email.subject())
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(email.body()))
                    .singlepart(
                        Attachment::new(email.file_name.clone())
                            .body(email.attachment.clone(), attachment_type),
                    ),
            )
            .map_err(|e| NotifyError::Email(format!("Failed to build email: {}", e)))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send_certificate(&self, email: CertificateEmail) -> NotifyResult<()> {
        use lettre::{
            transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport,
            Tokio1Executor,
        };

        let message = self.build_message(&email)?;

        let mailer = if self.config.smtp_user.is_empty() {
            // local development relays
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_user.clone(),
                self.config.smtp_password.clone(),
            );

            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
                .map_err(|e| NotifyError::Email(format!("SMTP relay error: {}", e)))?
                .credentials(creds)
                .port(self.config.smtp_port)
                .build()
        };

        mailer
            .send(message)
            .await
            .map_err(|e| NotifyError::Email(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

/// SMTP sender when configured, recording mock otherwise
pub fn create_email_sender(config: Option<EmailConfig>) -> Arc<dyn EmailSender> {
    match config {
        Some(cfg) => Arc::new(SmtpEmailSender::new(cfg)),
        None => Arc::new(MockEmailSender::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> CertificateEmail {
        CertificateEmail {
            to: "ada@example.com".to_string(),
            recipient_name: "Ada Lovelace".to_string(),
            certificate_id: "KNOW-2026-ABC123".to_string(),
            file_name: "KNOW-2026-ABC123.svg".to_string(),
            content_type: "image/svg+xml".to_string(),
            attachment: b"<svg/>".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_mock_email_sender() {
        let sender = MockEmailSender::new();
        sender.send_certificate(email()).await.unwrap();
        assert_eq!(sender.sent_count(), 1);
    }

    #[test]
    fn test_message_builds_with_attachment() {
        let sender = SmtpEmailSender::new(EmailConfig::default());
        let message = sender.build_message(&email()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("KNOW-2026-ABC123.svg"));
        assert!(raw.contains("To: ada@example.com"));
    }

    #[test]
    fn test_invalid_recipient_rejected() {
        let sender = SmtpEmailSender::new(EmailConfig::default());
        let mut bad = email();
        bad.to = "not an address".to_string();
        assert!(matches!(sender.build_message(&bad), Err(NotifyError::Email(_))));
    }
}
