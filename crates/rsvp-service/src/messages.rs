//! User-facing text: configuration labels, email subjects and report headers.

use crate::models::ConfigKey;

/// Label shown next to a configuration field in the admin UI.
pub fn config_display_name(key: ConfigKey) -> &'static str {
    match key {
        ConfigKey::AddressCeremony => "Ceremony Address",
        ConfigKey::AddressReception => "Reception Address",
        ConfigKey::Date => "Date",
        ConfigKey::Description => "Description",
        ConfigKey::DressCode => "Dress Code",
        ConfigKey::Email => "Contact Email",
        ConfigKey::Time => "Time",
        ConfigKey::Title => "Title",
        ConfigKey::Url => "Website",
    }
}

/// Event name used in emails when no title is configured.
pub const FALLBACK_EVENT_TITLE: &str = "our wedding";

pub fn invitee_activation_subject(event_title: &str) -> String {
    format!("You're invited to {}! Activate your account", event_title)
}

pub fn admin_activation_subject(event_title: &str) -> String {
    format!("Administrator access for {}", event_title)
}

pub fn attendance_reminder_subject(event_title: &str) -> String {
    format!("Reminder: please RSVP for {}", event_title)
}

/// Column headers of the attendant CSV report.
pub const ATTENDANT_CSV_HEADERS: [&str; 4] = ["Party", "Name", "Response", "Meal"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_config_key_has_label() {
        for key in ConfigKey::ALL {
            assert!(!config_display_name(key).is_empty());
        }
    }

    #[test]
    fn test_subjects_include_event_title() {
        assert!(invitee_activation_subject("Sam & Alex").contains("Sam & Alex"));
        assert!(admin_activation_subject("Sam & Alex").contains("Sam & Alex"));
        assert!(attendance_reminder_subject("Sam & Alex").contains("Sam & Alex"));
    }
}
