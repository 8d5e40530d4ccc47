//! Helpers for service tests.

#![allow(clippy::panic, clippy::expect_used)]

use crate::email::{EmailDispatcher, MailTransport, OutgoingEmail};
use crate::errors::RsvpError;
use crate::services::notification_service::Mailer;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

pub const TEST_BCRYPT_COST: u32 = 10;

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingTransport {
    /// Wait until at least `count` messages were delivered, then return them.
    pub async fn wait_for(&self, count: usize) -> Vec<OutgoingEmail> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let sent = self.sent.lock().await.clone();
            if sent.len() >= count || tokio::time::Instant::now() >= deadline {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), RsvpError> {
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}

pub fn test_mailer() -> (Mailer, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let (dispatcher, _handle) =
        EmailDispatcher::spawn(transport.clone(), 2, 32, CancellationToken::new());
    let mailer = Mailer::new(dispatcher, "RSVP <noreply@example.com>", "http://rsvp.test/")
        .expect("test mailer");
    (mailer, transport)
}

/// The token at the end of the activation link in a message body.
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
