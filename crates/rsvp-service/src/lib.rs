//! Wedding RSVP Service Library
//!
//! Administrators configure the event, meal options and invitations; invitees
//! register with an invitation code, activate their account from an emailed
//! link and answer for each guest on their invitation.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Password hashing and random codes/tokens
//! - `email` - Templates, SMTP transport and the send queue
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `middleware` - Session authentication and request metrics
//! - `models` - Rows and request/response bodies
//! - `repositories` - Database access layer
//! - `routes` - Router and shared state
//! - `services` - Business logic layer
//! - `sessions` - Session cache
//! - `tasks` - Background jobs

pub mod config;
pub mod crypto;
pub mod email;
pub mod errors;
pub mod handlers;
pub mod messages;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod sessions;
pub mod tasks;
