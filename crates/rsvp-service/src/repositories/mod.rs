//! Database access layer.
//!
//! Free async functions over `&PgPool`, or any `PgExecutor` where the call
//! takes part in a transaction.

pub mod accounts;
pub mod activations;
pub mod attendants;
pub mod event_configs;
pub mod invitations;
pub mod meal_options;
