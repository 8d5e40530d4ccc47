//! HTTP middleware.

pub mod auth;
pub mod http_metrics;

pub use auth::{require_auth, SessionToken, AUTH_TOKEN_HEADER};
pub use http_metrics::http_metrics_middleware;
