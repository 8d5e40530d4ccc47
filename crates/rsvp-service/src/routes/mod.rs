//! HTTP routes for the RSVP service.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::{http_metrics_middleware, require_auth};
use crate::services::notification_service::Mailer;
use crate::sessions::SessionStore;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,

    pub config: Config,

    /// Session cache (Redis in production).
    pub sessions: Arc<dyn SessionStore>,

    pub mailer: Mailer,
}

impl AppState {
    /// Sliding expiry applied to sessions on login and on every request.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.config.session_ttl_seconds)
    }
}

/// Build the application routes.
///
/// Public:
/// - `/health`, `/api/health`, `/metrics`
/// - `POST /api/auth/login`, `GET /api/accounts/data`
/// - `/api/activations` (invitee registration and account activation)
///
/// Everything else requires an `X-Auth-Token` session; admin-only routes
/// check the caller's role in the handler.
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::api_health))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/accounts/data", get(handlers::auth::session_data))
        .route("/api/activations", post(handlers::activations::register))
        .route(
            "/api/activations/:token",
            get(handlers::activations::lookup).put(handlers::activations::activate),
        )
        .with_state(state.clone());

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route(
            "/api/accounts",
            get(handlers::accounts::get_account).put(handlers::accounts::update_account),
        )
        .route(
            "/api/admins",
            get(handlers::admins::list_admins).post(handlers::admins::create_admin),
        )
        .route(
            "/api/admins/:id",
            get(handlers::admins::get_admin).delete(handlers::admins::delete_admin),
        )
        .route(
            "/api/configs",
            get(handlers::configs::list_configs).post(handlers::configs::update_configs),
        )
        .route("/api/event", get(handlers::configs::event_details))
        .route(
            "/api/meals",
            get(handlers::meals::list_meals).post(handlers::meals::save_meal),
        )
        .route(
            "/api/meals/:id",
            get(handlers::meals::get_meal).delete(handlers::meals::delete_meal),
        )
        .route(
            "/api/invitations",
            get(handlers::invitations::list_invitations)
                .post(handlers::invitations::save_invitation),
        )
        .route(
            "/api/invitations/:id",
            get(handlers::invitations::get_invitation)
                .delete(handlers::invitations::delete_invitation),
        )
        .route(
            "/api/invitations/:id/attendants",
            get(handlers::attendants::list_attendants).post(handlers::attendants::save_attendant),
        )
        .route(
            "/api/invitations/:id/attendants/:attendant_id",
            axum::routing::put(handlers::attendants::respond)
                .delete(handlers::attendants::delete_attendant),
        )
        .route("/api/stats", get(handlers::stats::get_stats))
        .route(
            "/api/stats/attendants.csv",
            get(handlers::stats::attendants_csv),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer (innermost)
    // 2. TraceLayer
    // 3. http_metrics_middleware (outermost, sees every response)
    public_routes
        .merge(metrics_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::email::EmailDispatcher;
    use crate::services::testing::RecordingTransport;
    use crate::sessions::InMemorySessionStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use sqlx::postgres::PgPoolOptions;
    use std::collections::HashMap;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    /// Router over a pool that never connects; only paths that are rejected
    /// before touching the database can be exercised.
    fn offline_app() -> Router {
        let vars: HashMap<String, String> = [
            ("DATABASE_URL", "postgres://localhost/unused"),
            ("REDIS_URL", "redis://localhost"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let config = Config::from_vars(&vars).unwrap();

        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let (dispatcher, _handle) = EmailDispatcher::spawn(
            Arc::new(RecordingTransport::default()),
            1,
            8,
            CancellationToken::new(),
        );
        let mailer = Mailer::new(dispatcher, &config.mail_from, &config.public_url).unwrap();

        let state = Arc::new(AppState {
            pool,
            config,
            sessions: Arc::new(InMemorySessionStore::new()),
            mailer,
        });
        build_routes(state, PrometheusBuilder::new().build_recorder().handle())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let response = offline_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let request = Request::get("/api/meals").body(Body::empty()).unwrap();
        let (status, body) = send(offline_app(), request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let request = Request::get("/api/stats")
            .header("X-Auth-Token", "not-a-session")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(offline_app(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_session_data_without_token() {
        let request = Request::get("/api/accounts/data").body(Body::empty()).unwrap();
        let (status, _) = send(offline_app(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_login_body_is_bad_request() {
        let request = Request::post("/api/auth/login")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(offline_app(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_metrics_endpoint_is_public() {
        let request = Request::get("/metrics").body(Body::empty()).unwrap();
        let response = offline_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
