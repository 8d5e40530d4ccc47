//! SMTP delivery over lettre's async transport.

use super::{MailTransport, OutgoingEmail};
use crate::config::SmtpConfig;
use crate::errors::RsvpError;
use async_trait::async_trait;
use lettre::message::MultiPart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::instrument;

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// SMTP relay transport.
///
/// Port 465 uses implicit TLS, port 587 STARTTLS, anything else plain SMTP
/// (a local relay or a test server).
#[derive(Clone)]
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    pub fn new(config: &SmtpConfig) -> Result<Self, RsvpError> {
        let builder = match config.port {
            465 => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| RsvpError::Email(format!("Invalid SMTP relay: {}", e)))?,
            587 => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| RsvpError::Email(format!("Invalid SMTP relay: {}", e)))?,
            _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };

        let builder = builder.port(config.port).timeout(Some(SMTP_TIMEOUT));

        let builder = match (&config.username, &config.password) {
            (Some(username), Some(password)) => builder.credentials(Credentials::new(
                username.clone(),
                password.expose_secret().to_string(),
            )),
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
        })
    }
}

/// Build the MIME message (multipart/alternative, text then HTML).
pub fn build_message(email: &OutgoingEmail) -> Result<Message, RsvpError> {
    Message::builder()
        .from(email.from.clone())
        .reply_to(email.reply_to.clone())
        .to(email.to.clone())
        .subject(email.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            email.text_body.clone(),
            email.html_body.clone(),
        ))
        .map_err(|e| RsvpError::Email(format!("Failed to build message: {}", e)))
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    #[instrument(skip_all, name = "rsvp.email.smtp_send", fields(template = email.template))]
    async fn send(&self, email: &OutgoingEmail) -> Result<(), RsvpError> {
        let message = build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| RsvpError::Email(format!("SMTP delivery failed: {}", e)))?;

        Ok(())
    }
}
