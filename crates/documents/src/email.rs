//! Transactional email via SMTP.
//!
//! [`MailTransport`] is the delivery seam; [`SmtpMailer`] is the
//! production implementation over the `lettre` async SMTP transport,
//! sending document emails with a PDF attachment. Configuration is
//! loaded from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and no mailer should be
//! constructed.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@ridgeline.local";

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured.
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send a plain-text email with a PDF attachment to every recipient.
    ///
    /// Fails on the first undeliverable recipient; the caller treats
    /// any failure as fatal to the send operation.
    async fn send_with_attachment(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
        attachment_name: &str,
        attachment: &[u8],
    ) -> Result<(), EmailError>;
}

/// Sends document emails via SMTP.
pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send_with_attachment(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
        attachment_name: &str,
        attachment: &[u8],
    ) -> Result<(), EmailError> {
        let mut transport =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);
        if let (Some(user), Some(password)) = (&self.config.smtp_user, &self.config.smtp_password)
        {
            transport = transport.credentials(Credentials::new(user.clone(), password.clone()));
        }
        let transport = transport.build();

        let pdf_type = ContentType::parse("application/pdf")
            .map_err(|e| EmailError::Build(e.to_string()))?;

        for recipient in recipients {
            let email = Message::builder()
                .from(self.config.from_address.parse()?)
                .to(recipient.parse()?)
                .subject(subject)
                .multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(body.to_string()))
                        .singlepart(
                            Attachment::new(attachment_name.to_string())
                                .body(attachment.to_vec(), pdf_type.clone()),
                        ),
                )
                .map_err(|e| EmailError::Build(e.to_string()))?;

            transport.send(email).await?;
        }
        Ok(())
    }
}
