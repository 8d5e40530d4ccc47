//! Outgoing email.
//!
//! Messages are rendered from [`templates::EmailTemplate`], handed to the
//! [`dispatcher::EmailDispatcher`] queue and delivered through a
//! [`MailTransport`].

pub mod dispatcher;
pub mod smtp;
pub mod templates;

pub use dispatcher::EmailDispatcher;
pub use smtp::SmtpMailTransport;
pub use templates::{EmailTemplate, RenderedEmail};

use crate::errors::RsvpError;
use async_trait::async_trait;
pub use lettre::message::Mailbox;

/// A fully addressed message ready for delivery.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    /// Template name, for logs and metrics.
    pub template: &'static str,
    pub from: Mailbox,
    pub reply_to: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Delivery backend.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), RsvpError>;
}
