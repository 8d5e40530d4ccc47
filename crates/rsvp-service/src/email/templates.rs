//! Email templates.
//!
//! Each template renders a subject, a plain-text body and an HTML body. Values
//! interpolated into HTML are escaped.

use crate::messages;

/// A template together with the attributes it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailTemplate {
    InviteeActivation {
        first_name: String,
        event_title: String,
        invitation_name: String,
        activation_url: String,
    },
    AdminActivation {
        first_name: String,
        event_title: String,
        activation_url: String,
    },
    AttendanceReminder {
        first_name: String,
        event_title: String,
        invitation_name: String,
        pending_count: i64,
        login_url: String,
    },
}

/// Rendered subject and bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn wrap_html(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<body style=\"font-family: Georgia, serif;\">\n{}\n</body>\n</html>\n",
        body
    )
}

impl EmailTemplate {
    /// Template name, used as a metrics label.
    pub fn name(&self) -> &'static str {
        match self {
            EmailTemplate::InviteeActivation { .. } => "invitee-activation",
            EmailTemplate::AdminActivation { .. } => "admin-activation",
            EmailTemplate::AttendanceReminder { .. } => "attendance-reminder",
        }
    }

    pub fn render(&self) -> RenderedEmail {
        match self {
            EmailTemplate::InviteeActivation {
                first_name,
                event_title,
                invitation_name,
                activation_url,
            } => RenderedEmail {
                subject: messages::invitee_activation_subject(event_title),
                text_body: format!(
                    "Hello {first_name},\n\n\
                     Thank you for registering for {event_title} ({invitation_name}).\n\n\
                     Please activate your account and choose a password by visiting:\n\n\
                     {activation_url}\n\n\
                     Once activated you can let us know who is coming and what they would like to eat.\n"
                ),
                html_body: wrap_html(&format!(
                    "<p>Hello {},</p>\n\
                     <p>Thank you for registering for <strong>{}</strong> ({}).</p>\n\
                     <p>Please <a href=\"{}\">activate your account</a> and choose a password.</p>\n\
                     <p>Once activated you can let us know who is coming and what they would like to eat.</p>",
                    escape_html(first_name),
                    escape_html(event_title),
                    escape_html(invitation_name),
                    escape_html(activation_url),
                )),
            },
            EmailTemplate::AdminActivation {
                first_name,
                event_title,
                activation_url,
            } => RenderedEmail {
                subject: messages::admin_activation_subject(event_title),
                text_body: format!(
                    "Hello {first_name},\n\n\
                     You have been made an administrator for {event_title}.\n\n\
                     Set your password by visiting:\n\n\
                     {activation_url}\n"
                ),
                html_body: wrap_html(&format!(
                    "<p>Hello {},</p>\n\
                     <p>You have been made an administrator for <strong>{}</strong>.</p>\n\
                     <p><a href=\"{}\">Set your password</a> to get started.</p>",
                    escape_html(first_name),
                    escape_html(event_title),
                    escape_html(activation_url),
                )),
            },
            EmailTemplate::AttendanceReminder {
                first_name,
                event_title,
                invitation_name,
                pending_count,
                login_url,
            } => {
                let guests = if *pending_count == 1 {
                    "1 guest".to_string()
                } else {
                    format!("{} guests", pending_count)
                };
                RenderedEmail {
                    subject: messages::attendance_reminder_subject(event_title),
                    text_body: format!(
                        "Hello {first_name},\n\n\
                         We have not yet heard back about {guests} on the {invitation_name} invitation for {event_title}.\n\n\
                         Please sign in and respond:\n\n\
                         {login_url}\n"
                    ),
                    html_body: wrap_html(&format!(
                        "<p>Hello {},</p>\n\
                         <p>We have not yet heard back about {} on the {} invitation for <strong>{}</strong>.</p>\n\
                         <p>Please <a href=\"{}\">sign in and respond</a>.</p>",
                        escape_html(first_name),
                        guests,
                        escape_html(invitation_name),
                        escape_html(event_title),
                        escape_html(login_url),
                    )),
                }
            }
        }
    }
}
