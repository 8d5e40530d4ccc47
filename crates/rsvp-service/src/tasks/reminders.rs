//! Attendance reminder background task.
//!
//! On every tick, each activated invitee whose invitation still has PENDING
//! attendants gets an `attendance-reminder` email. The first run happens one
//! full interval after startup, not immediately.
//!
//! # Graceful Shutdown
//!
//! The task exits when the cancellation token is triggered. A run already in
//! progress finishes queueing its emails first.

use crate::email::EmailTemplate;
use crate::errors::RsvpError;
use crate::observability::metrics::record_reminder_run;
use crate::repositories::invitations;
use crate::services::notification_service::Mailer;
use sqlx::PgPool;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

/// Start the reminder loop. Returns immediately when `period` is zero.
#[instrument(skip_all, name = "rsvp.task.reminders")]
pub async fn start_reminder_task(
    pool: PgPool,
    mailer: Mailer,
    period: Duration,
    cancel_token: CancellationToken,
) {
    if period.is_zero() {
        info!(target: "rsvp.task.reminders", "Attendance reminders disabled");
        return;
    }

    info!(
        target: "rsvp.task.reminders",
        interval_seconds = period.as_secs(),
        "Starting attendance reminder task"
    );

    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match run_once(&pool, &mailer).await {
                    Ok(sent) => record_reminder_run("success", sent),
                    Err(e) => {
                        error!(target: "rsvp.task.reminders", error = %e, "Reminder run failed");
                        record_reminder_run("error", 0);
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                info!(
                    target: "rsvp.task.reminders",
                    "Reminder task received shutdown signal, exiting"
                );
                break;
            }
        }
    }

    info!(target: "rsvp.task.reminders", "Attendance reminder task stopped");
}

/// Queue one reminder per invitee with unanswered attendants.
///
/// Returns how many reminders were queued.
pub async fn run_once(pool: &PgPool, mailer: &Mailer) -> Result<u64, RsvpError> {
    let pending = invitations::pending_invitees(pool).await?;
    if pending.is_empty() {
        return Ok(0);
    }

    let event_title = mailer.event_title(pool).await;
    let login_url = mailer.login_url();
    let mut sent = 0u64;

    for invitee in pending {
        let template = EmailTemplate::AttendanceReminder {
            first_name: invitee.first_name.clone(),
            event_title: event_title.clone(),
            invitation_name: invitee.invitation_name,
            pending_count: invitee.pending_count,
            login_url: login_url.clone(),
        };
        mailer
            .send(pool, &invitee.first_name, &invitee.email, template)
            .await;
        sent += 1;
    }

    info!(target: "rsvp.task.reminders", reminders = sent, "Attendance reminders queued");
    Ok(sent)
}
