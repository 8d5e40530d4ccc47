//! Asynchronous email hand-off.
//!
//! `enqueue` never waits for delivery: messages go onto a bounded channel and a
//! dispatcher task hands each one to a worker slot. At most `workers` sends run
//! at once. A full queue or a failed delivery is logged and counted; callers
//! never see it. On cancellation the queue is closed and drained before the
//! task exits.

use super::{MailTransport, OutgoingEmail};
use crate::observability::hash_for_correlation;
use crate::observability::metrics::record_email_dispatch;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Cloneable handle to the email queue.
#[derive(Clone)]
pub struct EmailDispatcher {
    sender: mpsc::Sender<OutgoingEmail>,
}

impl EmailDispatcher {
    /// Start the dispatcher task.
    ///
    /// The task stops when `cancel_token` is cancelled or every handle is
    /// dropped, then waits for in-flight deliveries to finish.
    pub fn spawn(
        transport: Arc<dyn MailTransport>,
        workers: usize,
        capacity: usize,
        cancel_token: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(run_dispatcher(
            receiver,
            transport,
            workers.max(1),
            cancel_token,
        ));
        (Self { sender }, handle)
    }

    /// Queue a message for delivery.
    pub fn enqueue(&self, email: OutgoingEmail) {
        let template = email.template;
        let recipient_hash = hash_for_correlation(&email.to.email.to_string());

        match self.sender.try_send(email) {
            Ok(()) => {
                debug!(
                    target: "rsvp.email.dispatcher",
                    template = template,
                    recipient_hash = %recipient_hash,
                    "Email queued"
                );
                record_email_dispatch(template, "queued");
            }
            Err(TrySendError::Full(_)) => {
                warn!(
                    target: "rsvp.email.dispatcher",
                    template = template,
                    recipient_hash = %recipient_hash,
                    "Email queue full, message dropped"
                );
                record_email_dispatch(template, "dropped");
            }
            Err(TrySendError::Closed(_)) => {
                warn!(
                    target: "rsvp.email.dispatcher",
                    template = template,
                    recipient_hash = %recipient_hash,
                    "Email dispatcher stopped, message dropped"
                );
                record_email_dispatch(template, "dropped");
            }
        }
    }
}

async fn run_dispatcher(
    mut receiver: mpsc::Receiver<OutgoingEmail>,
    transport: Arc<dyn MailTransport>,
    workers: usize,
    cancel_token: CancellationToken,
) {
    let slots = Arc::new(Semaphore::new(workers));

    info!(target: "rsvp.email.dispatcher", workers = workers, "Email dispatcher started");

    loop {
        let email = tokio::select! {
            _ = cancel_token.cancelled() => break,
            next = receiver.recv() => match next {
                Some(email) => email,
                None => break,
            },
        };

        dispatch(&slots, &transport, email).await;
    }

    // Refuse new messages, then deliver everything already queued.
    receiver.close();
    let mut drained = 0usize;
    while let Some(email) = receiver.recv().await {
        dispatch(&slots, &transport, email).await;
        drained += 1;
    }
    if drained > 0 {
        info!(target: "rsvp.email.dispatcher", count = drained, "Queued emails dispatched during shutdown");
    }

    // Let in-flight sends finish before reporting shutdown.
    let all = u32::try_from(workers).unwrap_or(u32::MAX);
    let _ = slots.acquire_many(all).await;

    info!(target: "rsvp.email.dispatcher", "Email dispatcher stopped");
}

/// Wait for a free worker slot and deliver `email` on it.
async fn dispatch(slots: &Arc<Semaphore>, transport: &Arc<dyn MailTransport>, email: OutgoingEmail) {
    let permit = match slots.clone().acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => {
            // Only reachable if the semaphore was closed.
            warn!(
                target: "rsvp.email.dispatcher",
                template = email.template,
                "No worker slot available, message dropped"
            );
            record_email_dispatch(email.template, "dropped");
            return;
        }
    };

    let transport = transport.clone();
    tokio::spawn(async move {
        let _permit = permit;
        deliver(transport.as_ref(), &email).await;
    });
}

async fn deliver(transport: &dyn MailTransport, email: &OutgoingEmail) {
    match transport.send(email).await {
        Ok(()) => {
            debug!(
                target: "rsvp.email.dispatcher",
                template = email.template,
                "Email delivered"
            );
            record_email_dispatch(email.template, "sent");
        }
        Err(e) => {
            warn!(
                target: "rsvp.email.dispatcher",
                template = email.template,
                recipient_hash = %hash_for_correlation(&email.to.email.to_string()),
                error = %e,
                "Email delivery failed"
            );
            record_email_dispatch(email.template, "failed");
        }
    }
}
