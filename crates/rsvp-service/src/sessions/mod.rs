//! Login sessions.
//!
//! A session is the JSON body handed to the client at login, stored in the
//! cache under its opaque token with a sliding TTL.
//!
//! # Key Patterns
//!
//! - `session:{token}` - Session body (JSON string)

use crate::errors::RsvpError;
use crate::models::{Account, AccountType};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{error, instrument, warn};
use uuid::Uuid;

/// Session body returned by login and `GET /api/accounts/data`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub account_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: AccountType,
    pub token: String,
}

impl Session {
    pub fn for_account(account: &Account, token: String) -> Self {
        Self {
            account_id: account.id,
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            role: account.account_type,
            token,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("account_id", &self.account_id)
            .field("role", &self.role)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Storage for sessions keyed by token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a session, replacing any previous value under the same token.
    async fn put(&self, session: &Session, ttl: Duration) -> Result<(), RsvpError>;

    /// Fetch a session; `None` if unknown or expired.
    async fn get(&self, token: &str) -> Result<Option<Session>, RsvpError>;

    /// Reset the TTL of an existing session.
    async fn touch(&self, token: &str, ttl: Duration) -> Result<(), RsvpError>;

    async fn remove(&self, token: &str) -> Result<(), RsvpError>;

    /// Check that the backing store answers.
    async fn ping(&self) -> Result<(), RsvpError>;
}

fn session_key(token: &str) -> String {
    format!("session:{token}")
}

/// Redis-backed session store.
///
/// `MultiplexedConnection` is cheap to clone and safe for concurrent use, so
/// each operation works on its own clone.
#[derive(Clone)]
pub struct RedisSessionStore {
    connection: MultiplexedConnection,
}

impl RedisSessionStore {
    pub async fn connect(redis_url: &str) -> Result<Self, RsvpError> {
        let client = Client::open(redis_url).map_err(|e| {
            // The URL may carry credentials; never log it.
            error!(target: "rsvp.sessions", error = %e, "Failed to open Redis client");
            RsvpError::Cache(format!("Failed to open Redis client: {e}"))
        })?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                error!(target: "rsvp.sessions", error = %e, "Failed to connect to Redis");
                RsvpError::Cache(format!("Failed to connect to Redis: {e}"))
            })?;

        Ok(Self { connection })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    #[instrument(skip_all, name = "rsvp.sessions.put")]
    async fn put(&self, session: &Session, ttl: Duration) -> Result<(), RsvpError> {
        let mut conn = self.connection.clone();
        let body = serde_json::to_string(session)
            .map_err(|e| RsvpError::Cache(format!("Failed to serialize session: {e}")))?;

        conn.set_ex::<_, _, ()>(session_key(&session.token), body, ttl.as_secs())
            .await
            .map_err(|e| {
                warn!(target: "rsvp.sessions", error = %e, "Failed to store session");
                RsvpError::Cache(format!("Failed to store session: {e}"))
            })
    }

    #[instrument(skip_all, name = "rsvp.sessions.get")]
    async fn get(&self, token: &str) -> Result<Option<Session>, RsvpError> {
        let mut conn = self.connection.clone();
        let body: Option<String> = conn.get(session_key(token)).await.map_err(|e| {
            warn!(target: "rsvp.sessions", error = %e, "Failed to read session");
            RsvpError::Cache(format!("Failed to read session: {e}"))
        })?;

        match body {
            Some(body) => match serde_json::from_str(&body) {
                Ok(session) => Ok(Some(session)),
                Err(e) => {
                    // Unreadable entries are treated as absent.
                    warn!(target: "rsvp.sessions", error = %e, "Discarding malformed session");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    #[instrument(skip_all, name = "rsvp.sessions.touch")]
    async fn touch(&self, token: &str, ttl: Duration) -> Result<(), RsvpError> {
        let mut conn = self.connection.clone();
        let seconds = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

        conn.expire::<_, ()>(session_key(token), seconds)
            .await
            .map_err(|e| RsvpError::Cache(format!("Failed to refresh session: {e}")))
    }

    #[instrument(skip_all, name = "rsvp.sessions.remove")]
    async fn remove(&self, token: &str) -> Result<(), RsvpError> {
        let mut conn = self.connection.clone();

        conn.del::<_, ()>(session_key(token))
            .await
            .map_err(|e| RsvpError::Cache(format!("Failed to remove session: {e}")))
    }

    async fn ping(&self) -> Result<(), RsvpError> {
        let mut conn = self.connection.clone();
        let _pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| RsvpError::Cache(format!("Redis ping failed: {e}")))?;
        Ok(())
    }
}

/// Process-local session store for tests and single-instance development.
///
/// Entries expire lazily: an expired session is dropped when it is next read.
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<String, (Session, Instant)>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .values()
            .filter(|(_, deadline)| *deadline > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put(&self, session: &Session, ttl: Duration) -> Result<(), RsvpError> {
        self.entries.lock().await.insert(
            session.token.clone(),
            (session.clone(), Instant::now() + ttl),
        );
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, RsvpError> {
        let mut entries = self.entries.lock().await;
        match entries.get(token) {
            Some((session, deadline)) if *deadline > Instant::now() => Ok(Some(session.clone())),
            Some(_) => {
                entries.remove(token);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn touch(&self, token: &str, ttl: Duration) -> Result<(), RsvpError> {
        if let Some((_, deadline)) = self.entries.lock().await.get_mut(token) {
            *deadline = Instant::now() + ttl;
        }
        Ok(())
    }

    async fn remove(&self, token: &str) -> Result<(), RsvpError> {
        self.entries.lock().await.remove(token);
        Ok(())
    }

    async fn ping(&self) -> Result<(), RsvpError> {
        Ok(())
    }
}
