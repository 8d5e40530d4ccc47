//! RSVP service configuration.
//!
//! Configuration is loaded from environment variables. Connection URLs and the
//! SMTP password are redacted in Debug output.

use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default bcrypt cost factor.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Lowest accepted bcrypt cost factor.
pub const MIN_BCRYPT_COST: u32 = 10;

/// Highest accepted bcrypt cost factor.
pub const MAX_BCRYPT_COST: u32 = 14;

/// Default session lifetime (90 minutes).
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 5400;

/// Default sender used when the event has no title or contact email configured.
pub const DEFAULT_MAIL_FROM: &str = "RSVP <noreply@localhost>";

pub const DEFAULT_EMAIL_WORKERS: usize = 5;

pub const DEFAULT_EMAIL_QUEUE_CAPACITY: usize = 100;

pub const DEFAULT_REMINDER_INTERVAL_HOURS: u64 = 24;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// First administrator created at startup when no admin exists yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// SMTP relay settings.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// RSVP service configuration.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Redis connection URL for the session store.
    pub redis_url: String,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Externally reachable base URL, used to build activation links.
    pub public_url: String,

    /// Sliding session lifetime in seconds.
    pub session_ttl_seconds: u64,

    /// Bcrypt cost factor for password hashing (10-14).
    pub bcrypt_cost: u32,

    pub smtp: SmtpConfig,

    /// Fallback sender address.
    pub mail_from: String,

    /// Maximum number of concurrent email deliveries.
    pub email_workers: usize,

    /// Number of emails that may wait for a delivery slot.
    pub email_queue_capacity: usize,

    /// Interval between attendance reminder runs; 0 disables reminders.
    pub reminder_interval_hours: u64,

    pub bootstrap_admin: Option<BootstrapAdmin>,

    pub log_format: LogFormat,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("public_url", &self.public_url)
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("smtp", &self.smtp)
            .field("mail_from", &self.mail_from)
            .field("email_workers", &self.email_workers)
            .field("email_queue_capacity", &self.email_queue_capacity)
            .field("reminder_interval_hours", &self.reminder_interval_hours)
            .field("bootstrap_admin", &self.bootstrap_admin)
            .field("log_format", &self.log_format)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },

    #[error("Invalid bcrypt cost: {0} (must be 10-14)")]
    InvalidBcryptCost(u32),
}

fn required(vars: &HashMap<String, String>, name: &str) -> Result<String, ConfigError> {
    vars.get(name)
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(vars: &HashMap<String, String>, name: &str) -> Option<String> {
    vars.get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T>(vars: &HashMap<String, String>, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match optional(vars, name) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("'{}': {}", raw, e),
        }),
        None => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = required(vars, "DATABASE_URL")?;
        let redis_url = required(vars, "REDIS_URL")?;

        let bind_address =
            optional(vars, "BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let public_url = optional(vars, "PUBLIC_URL")
            .unwrap_or_else(|| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        let session_ttl_seconds =
            parsed(vars, "SESSION_TTL_SECONDS", DEFAULT_SESSION_TTL_SECONDS)?;
        if session_ttl_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                name: "SESSION_TTL_SECONDS".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        let bcrypt_cost = parsed(vars, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidBcryptCost(bcrypt_cost));
        }

        let smtp = SmtpConfig {
            host: optional(vars, "SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parsed(vars, "SMTP_PORT", 25u16)?,
            username: optional(vars, "SMTP_USERNAME"),
            password: optional(vars, "SMTP_PASSWORD").map(SecretString::from),
        };

        let mail_from =
            optional(vars, "MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string());

        let email_workers = parsed(vars, "EMAIL_WORKERS", DEFAULT_EMAIL_WORKERS)?;
        let email_queue_capacity =
            parsed(vars, "EMAIL_QUEUE_CAPACITY", DEFAULT_EMAIL_QUEUE_CAPACITY)?;
        for (name, value) in [
            ("EMAIL_WORKERS", email_workers),
            ("EMAIL_QUEUE_CAPACITY", email_queue_capacity),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    name: name.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        let reminder_interval_hours = parsed(
            vars,
            "REMINDER_INTERVAL_HOURS",
            DEFAULT_REMINDER_INTERVAL_HOURS,
        )?;

        let bootstrap_admin = optional(vars, "BOOTSTRAP_ADMIN_EMAIL").map(|email| BootstrapAdmin {
            email,
            first_name: optional(vars, "BOOTSTRAP_ADMIN_FIRST_NAME")
                .unwrap_or_else(|| "Admin".to_string()),
            last_name: optional(vars, "BOOTSTRAP_ADMIN_LAST_NAME")
                .unwrap_or_else(|| "Admin".to_string()),
        });

        let log_format = match optional(vars, "LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "LOG_FORMAT".to_string(),
                    reason: format!("expected 'text' or 'json', got '{}'", other),
                })
            }
        };

        Ok(Config {
            database_url,
            redis_url,
            bind_address,
            public_url,
            session_ttl_seconds,
            bcrypt_cost,
            smtp,
            mail_from,
            email_workers,
            email_queue_capacity,
            reminder_interval_hours,
            bootstrap_admin,
            log_format,
        })
    }
}
