//! Test server harness for E2E testing
//!
//! Provides `TestRsvpServer` for spawning real RSVP server instances in tests.

use crate::mail::RecordingMailTransport;
use metrics_exporter_prometheus::PrometheusBuilder;
use rsvp_service::config::{Config, MIN_BCRYPT_COST};
use rsvp_service::email::EmailDispatcher;
use rsvp_service::routes::{self, AppState};
use rsvp_service::services::notification_service::Mailer;
use rsvp_service::sessions::InMemorySessionStore;
use sqlx::PgPool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Public URL used in links inside test emails.
pub const TEST_PUBLIC_URL: &str = "http://rsvp.test";

/// Test harness for spawning the RSVP server in E2E tests.
///
/// Sessions live in memory and email is captured by a
/// [`RecordingMailTransport`], so only PostgreSQL is needed.
///
/// # Example
/// ```rust,ignore
/// #[sqlx::test(migrations = "../../migrations")]
/// async fn test_login_e2e(pool: PgPool) -> Result<()> {
///     let server = TestRsvpServer::spawn(pool).await?;
///     let response = reqwest::Client::new()
///         .post(format!("{}/api/auth/login", server.url()))
///         .json(&serde_json::json!({"principal": "a@b.c", "credentials": "x"}))
///         .send()
///         .await?;
///     assert_eq!(response.status(), 401);
///     Ok(())
/// }
/// ```
pub struct TestRsvpServer {
    addr: SocketAddr,
    pool: PgPool,
    config: Config,
    mail: Arc<RecordingMailTransport>,
    shutdown: CancellationToken,
    _handle: JoinHandle<()>,
}

impl TestRsvpServer {
    /// Spawn a new test server instance on the given database.
    ///
    /// The server binds to a random port on 127.0.0.1 and uses the lowest
    /// accepted bcrypt cost. The reminder task is not started.
    pub async fn spawn(pool: PgPool) -> Result<Self, anyhow::Error> {
        let vars: HashMap<String, String> = [
            ("DATABASE_URL", "postgres://unused"),
            ("REDIS_URL", "redis://unused"),
            ("BIND_ADDRESS", "127.0.0.1:0"),
            ("PUBLIC_URL", TEST_PUBLIC_URL),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .chain([("BCRYPT_COST".to_string(), MIN_BCRYPT_COST.to_string())])
        .collect();
        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to build test config: {}", e))?;

        let shutdown = CancellationToken::new();
        let mail = Arc::new(RecordingMailTransport::default());
        let (dispatcher, _dispatcher_handle) = EmailDispatcher::spawn(
            mail.clone(),
            config.email_workers,
            config.email_queue_capacity,
            shutdown.child_token(),
        );
        let mailer = Mailer::new(dispatcher, &config.mail_from, &config.public_url)
            .map_err(|e| anyhow::anyhow!("Failed to build mailer: {}", e))?;

        let state = Arc::new(AppState {
            pool: pool.clone(),
            config: config.clone(),
            sessions: Arc::new(InMemorySessionStore::new()),
            mailer,
        });

        // A standalone recorder keeps tests from fighting over the global one.
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();
        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            pool,
            config,
            mail,
            shutdown,
            _handle: handle,
        })
    }

    /// Get reference to the database pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Messages the server tried to send.
    pub fn mail(&self) -> &RecordingMailTransport {
        &self.mail
    }
}

impl Drop for TestRsvpServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
        self._handle.abort();
    }
}
