//! Metrics definitions for the RSVP service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `rsvp_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `outcome`: fixed sets per metric (see each function)
//! - `template`: 3 email templates
//! - `path`: route templates, dynamic segments replaced by `{id}` / `{token}`,
//!   every other path collapsed to `/other`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the global Prometheus recorder.
///
/// Can succeed only once per process; the handle renders `/metrics`.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("rsvp_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `rsvp_http_requests_total`, `rsvp_http_request_duration_seconds`
/// Labels: `method`, `path`, `status_code`
pub fn record_http_request(method: &str, path: &str, status_code: u16, duration: Duration) {
    let normalized_path = normalize_path(path);

    histogram!("rsvp_http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => normalized_path.clone(),
        "status_code" => status_code.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("rsvp_http_requests_total",
        "method" => method.to_string(),
        "path" => normalized_path,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Map a request path onto its route template.
///
/// Dynamic segments become `{id}` / `{token}`; anything that is not a known
/// route becomes `/other`.
///
/// Examples:
/// - `/api/meals/550e8400-e29b-41d4-a716-446655440000` → `/api/meals/{id}`
/// - `/api/invitations/{uuid}/attendants/{uuid}` → `/api/invitations/{id}/attendants/{id}`
/// - `/api/activations/AbC123...` → `/api/activations/{token}`
/// - `/api/meals/not-an-id` → `/other`
fn normalize_path(path: &str) -> String {
    match path {
        "/"
        | "/health"
        | "/metrics"
        | "/api/health"
        | "/api/auth/login"
        | "/api/auth/logout"
        | "/api/accounts"
        | "/api/accounts/data"
        | "/api/activations"
        | "/api/admins"
        | "/api/configs"
        | "/api/event"
        | "/api/meals"
        | "/api/invitations"
        | "/api/stats"
        | "/api/stats/attendants.csv" => path.to_string(),
        _ => normalize_dynamic_path(path),
    }
}

fn normalize_dynamic_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();

    let template = match segments.as_slice() {
        ["", "api", "activations", token] if is_token(token) => "/api/activations/{token}",
        ["", "api", "admins", id] if is_uuid(id) => "/api/admins/{id}",
        ["", "api", "meals", id] if is_uuid(id) => "/api/meals/{id}",
        ["", "api", "invitations", id] if is_uuid(id) => "/api/invitations/{id}",
        ["", "api", "invitations", id, "attendants"] if is_uuid(id) => {
            "/api/invitations/{id}/attendants"
        }
        ["", "api", "invitations", id, "attendants", attendant_id]
            if is_uuid(id) && is_uuid(attendant_id) =>
        {
            "/api/invitations/{id}/attendants/{id}"
        }
        _ => "/other",
    };

    template.to_string()
}

/// Non-empty run of ASCII letters and digits.
fn is_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|byte| byte.is_ascii_alphanumeric())
}

/// Check if a string matches UUID format (8-4-4-4-12 hex digits with dashes)
fn is_uuid(s: &str) -> bool {
    if s.len() != 36 {
        return false;
    }

    s.bytes().enumerate().all(|(i, byte)| match i {
        8 | 13 | 18 | 23 => byte == b'-',
        _ => byte.is_ascii_hexdigit(),
    })
}

// ============================================================================
// Authentication Metrics
// ============================================================================

/// Record a login attempt
///
/// Metric: `rsvp_logins_total`
/// Labels: `outcome` (success, invalid_credentials, not_activated, error)
pub fn record_login(outcome: &str) {
    counter!("rsvp_logins_total", "outcome" => outcome.to_string()).increment(1);
}

// ============================================================================
// Email Metrics
// ============================================================================

/// Record an email dispatch event
///
/// Metric: `rsvp_emails_total`
/// Labels: `template`, `outcome` (queued, dropped, sent, failed)
pub fn record_email_dispatch(template: &str, outcome: &str) {
    counter!("rsvp_emails_total",
        "template" => template.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

// ============================================================================
// Invitation Metrics
// ============================================================================

/// Record an invitation code that was already taken and had to be redrawn
///
/// Metric: `rsvp_invitation_code_collisions_total`
pub fn record_invitation_code_collision() {
    counter!("rsvp_invitation_code_collisions_total").increment(1);
}

// ============================================================================
// Reminder Metrics
// ============================================================================

/// Record a reminder job run
///
/// Metric: `rsvp_reminder_runs_total`, `rsvp_reminder_emails_total`
/// Labels: `status` (success, error)
pub fn record_reminder_run(status: &str, emails: u64) {
    counter!("rsvp_reminder_runs_total", "status" => status.to_string()).increment(1);
    counter!("rsvp_reminder_emails_total").increment(emails);
}
