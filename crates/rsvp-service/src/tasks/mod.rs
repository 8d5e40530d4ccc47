//! Background tasks.
//!
//! # Tasks
//!
//! - `reminders` - Emails invitees whose guests have not answered yet

pub mod reminders;

pub use reminders::start_reminder_task;
