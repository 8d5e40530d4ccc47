//! # RSVP Test Utilities
//!
//! Shared test utilities for the RSVP service.
//!
//! This crate provides:
//! - Server test harness (`TestRsvpServer` for E2E tests)
//! - An in-memory mail transport that records every delivered message
//! - Fixtures for activated accounts, invitations and logged-in clients
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rsvp_test_utils::*;
//!
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_example(pool: PgPool) -> Result<(), anyhow::Error> {
//!     let server = TestRsvpServer::spawn(pool).await?;
//!     let admin = server.create_admin("ada@example.com", "secret-pass").await?;
//!     let token = server.login("ada@example.com", "secret-pass").await?;
//!     Ok(())
//! }
//! ```

pub mod fixtures;
pub mod mail;
pub mod server_harness;

pub use fixtures::*;
pub use mail::*;
pub use server_harness::*;
