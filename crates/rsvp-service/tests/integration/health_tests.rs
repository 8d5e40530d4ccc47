//! Integration tests for the health and metrics endpoints.

use rsvp_test_utils::TestRsvpServer;
use reqwest::StatusCode;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_health_endpoint_returns_ok(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;

    let response = reqwest::get(format!("{}/health", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "OK");
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_api_health_reports_dependencies(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;

    let response = reqwest::get(format!("{}/api/health", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "healthy");
    assert_eq!(body["cache"], "healthy");
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_api_health_fails_when_database_is_gone(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    server.pool().close().await;

    let response = reqwest::get(format!("{}/api/health", server.url())).await?;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["database"], "unhealthy");
    assert_eq!(body["cache"], "healthy");
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_metrics_endpoint_is_public(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;

    let response = reqwest::get(format!("{}/metrics", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}
