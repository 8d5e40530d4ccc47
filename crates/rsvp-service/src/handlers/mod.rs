//! HTTP request handlers.

pub mod accounts;
pub mod activations;
pub mod admins;
pub mod attendants;
pub mod auth;
pub mod configs;
pub mod health;
pub mod invitations;
pub mod meals;
pub mod metrics;
pub mod stats;

pub use health::{api_health, health_check};
pub use metrics::metrics_handler;
