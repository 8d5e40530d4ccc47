use rsvp_service::config::Config;
use rsvp_service::email::{EmailDispatcher, SmtpMailTransport};
use rsvp_service::observability::{init_tracing, metrics::init_metrics_recorder};
use rsvp_service::routes::{self, AppState};
use rsvp_service::services::notification_service::Mailer;
use rsvp_service::services::registration_service;
use rsvp_service::sessions::RedisSessionStore;
use rsvp_service::tasks::start_reminder_task;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env().map_err(|e| {
        // Tracing is not set up yet.
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    init_tracing(config.log_format);

    info!("Starting RSVP service");
    info!(
        bind_address = %config.bind_address,
        public_url = %config.public_url,
        session_ttl_seconds = config.session_ttl_seconds,
        email_workers = config.email_workers,
        reminder_interval_hours = config.reminder_interval_hours,
        "Configuration loaded successfully"
    );

    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics recorder: {}", e);
        e
    })?;

    info!("Connecting to database...");
    let db_pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;

    sqlx::migrate!("../../migrations")
        .run(&db_pool)
        .await
        .map_err(|e| {
            error!("Failed to run database migrations: {}", e);
            e
        })?;

    info!("Database connection established and migrations applied");

    let sessions = RedisSessionStore::connect(&config.redis_url).await?;
    info!("Session cache connection established");

    let shutdown = CancellationToken::new();

    let transport = SmtpMailTransport::new(&config.smtp)?;
    let (dispatcher, dispatcher_handle) = EmailDispatcher::spawn(
        Arc::new(transport),
        config.email_workers,
        config.email_queue_capacity,
        shutdown.child_token(),
    );
    let mailer = Mailer::new(dispatcher, &config.mail_from, &config.public_url)?;

    if let Some(admin) = &config.bootstrap_admin {
        match registration_service::bootstrap_admin(&db_pool, &mailer, admin).await {
            Ok(Some(account)) => {
                info!(account_id = %account.id, "Bootstrap administrator registered")
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Bootstrap administrator was not registered"),
        }
    }

    let reminder_handle = tokio::spawn(start_reminder_task(
        db_pool.clone(),
        mailer.clone(),
        Duration::from_secs(config.reminder_interval_hours.saturating_mul(3600)),
        shutdown.child_token(),
    ));

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    let state = Arc::new(AppState {
        pool: db_pool,
        config,
        sessions: Arc::new(sessions),
        mailer,
    });

    let app = routes::build_routes(state, metrics_handle);

    info!("RSVP service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop background work; deliveries already in progress finish first.
    shutdown.cancel();
    if let Err(e) = reminder_handle.await {
        warn!("Reminder task ended abnormally: {}", e);
    }
    if let Err(e) = dispatcher_handle.await {
        warn!("Email dispatcher ended abnormally: {}", e);
    }

    info!("RSVP service shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
