//! Templated email notifications.
//!
//! The sender is `"{event.title} <{event.email}>"`, read from the event
//! configuration at send time, falling back to the configured default when
//! either value is blank or unusable.

use crate::email::{EmailDispatcher, EmailTemplate, OutgoingEmail};
use crate::errors::RsvpError;
use crate::messages::FALLBACK_EVENT_TITLE;
use crate::models::ConfigKey;
use crate::observability::hash_for_correlation;
use crate::observability::metrics::record_email_dispatch;
use crate::repositories::event_configs;
use lettre::message::Mailbox;
use lettre::Address;
use sqlx::PgPool;
use tracing::{instrument, warn};

/// Renders templates and queues them for delivery.
#[derive(Clone)]
pub struct Mailer {
    dispatcher: EmailDispatcher,
    default_from: Mailbox,
    public_url: String,
}

impl Mailer {
    pub fn new(
        dispatcher: EmailDispatcher,
        default_from: &str,
        public_url: &str,
    ) -> Result<Self, RsvpError> {
        let default_from = default_from
            .parse::<Mailbox>()
            .map_err(|e| RsvpError::Email(format!("Invalid default sender address: {}", e)))?;

        Ok(Self {
            dispatcher,
            default_from,
            public_url: public_url.trim_end_matches('/').to_string(),
        })
    }

    /// Link to the page where an account is activated.
    pub fn activation_url(&self, token: &str) -> String {
        format!("{}/activate/{}", self.public_url, token)
    }

    pub fn login_url(&self) -> String {
        format!("{}/login", self.public_url)
    }

    /// Configured event title, or a generic phrase when unset.
    pub async fn event_title(&self, pool: &PgPool) -> String {
        match event_configs::get_value(pool, ConfigKey::Title.as_str()).await {
            Ok(Some(title)) if !title.trim().is_empty() => title.trim().to_string(),
            Ok(_) => FALLBACK_EVENT_TITLE.to_string(),
            Err(e) => {
                warn!(target: "rsvp.services.notification", error = %e, "Failed to read event title");
                FALLBACK_EVENT_TITLE.to_string()
            }
        }
    }

    async fn resolve_sender(&self, pool: &PgPool) -> Mailbox {
        let title = event_configs::get_value(pool, ConfigKey::Title.as_str()).await;
        let email = event_configs::get_value(pool, ConfigKey::Email.as_str()).await;

        match (title, email) {
            (Ok(title), Ok(email)) => {
                sender_from_event(title.as_deref(), email.as_deref(), &self.default_from)
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(target: "rsvp.services.notification", error = %e, "Failed to read sender configuration");
                self.default_from.clone()
            }
        }
    }

    /// Render `template` for one recipient and queue it.
    ///
    /// Never fails: problems are logged and counted.
    #[instrument(skip_all, name = "rsvp.services.notification.send", fields(template = template.name()))]
    pub async fn send(&self, pool: &PgPool, to_name: &str, to_email: &str, template: EmailTemplate) {
        let address = match to_email.trim().parse::<Address>() {
            Ok(address) => address,
            Err(e) => {
                warn!(
                    target: "rsvp.services.notification",
                    recipient_hash = %hash_for_correlation(to_email),
                    error = %e,
                    "Recipient address is not valid, email not sent"
                );
                record_email_dispatch(template.name(), "failed");
                return;
            }
        };

        let from = self.resolve_sender(pool).await;
        let rendered = template.render();

        self.dispatcher.enqueue(OutgoingEmail {
            template: template.name(),
            reply_to: from.clone(),
            from,
            to: Mailbox::new(Some(to_name.to_string()), address),
            subject: rendered.subject,
            text_body: rendered.text_body,
            html_body: rendered.html_body,
        });
    }
}

/// Sender derived from the event title and contact email.
pub fn sender_from_event(title: Option<&str>, email: Option<&str>, default: &Mailbox) -> Mailbox {
    let title = title.map(str::trim).filter(|t| !t.is_empty());
    let email = email.map(str::trim).filter(|e| !e.is_empty());

    match (title, email) {
        (Some(title), Some(email)) => match email.parse::<Address>() {
            Ok(address) => Mailbox::new(Some(title.to_string()), address),
            Err(_) => {
                warn!(target: "rsvp.services.notification", "Configured event email is not a valid address");
                default.clone()
            }
        },
        _ => default.clone(),
    }
}
