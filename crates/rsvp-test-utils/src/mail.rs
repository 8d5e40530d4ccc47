//! Mail transport that keeps messages in memory instead of sending them.

use async_trait::async_trait;
use rsvp_service::email::{MailTransport, OutgoingEmail};
use rsvp_service::errors::RsvpError;
use std::time::Duration;
use tokio::sync::Mutex;

/// How long [`RecordingMailTransport::wait_for`] polls before giving up.
pub const MAIL_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Default)]
pub struct RecordingMailTransport {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailTransport {
    /// Messages delivered so far.
    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().await.clone()
    }

    /// Messages delivered to `address`.
    pub async fn sent_to(&self, address: &str) -> Vec<OutgoingEmail> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|email| email.to.email.to_string().eq_ignore_ascii_case(address))
            .cloned()
            .collect()
    }

    /// Wait until at least `count` messages were delivered.
    ///
    /// Delivery is asynchronous, so tests poll instead of reading `sent`
    /// right after the request that triggered it. Returns whatever was
    /// delivered once the count is reached or the timeout expires.
    pub async fn wait_for(&self, count: usize) -> Vec<OutgoingEmail> {
        let deadline = tokio::time::Instant::now() + MAIL_WAIT_TIMEOUT;
        loop {
            let sent = self.sent().await;
            if sent.len() >= count || tokio::time::Instant::now() >= deadline {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl MailTransport for RecordingMailTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), RsvpError> {
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}

/// Extract the activation token from the link in a message body.
pub fn activation_token(email: &OutgoingEmail) -> Option<String> {
    let start = email.text_body.find("/activate/")? + "/activate/".len();
    let token: String = email
        .text_body
        .get(start..)?
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    (!token.is_empty()).then_some(token)
}
