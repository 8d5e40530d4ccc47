//! Integration tests for login, logout and session lookup.

use reqwest::{Method, StatusCode};
use rsvp_service::models::AccountType;
use rsvp_service::repositories::accounts;
use rsvp_test_utils::{TestRsvpServer, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

async fn post_login(
    server: &TestRsvpServer,
    principal: &str,
    credentials: &str,
) -> Result<reqwest::Response, anyhow::Error> {
    Ok(reqwest::Client::new()
        .post(format!("{}/api/auth/login", server.url()))
        .json(&json!({ "principal": principal, "credentials": credentials }))
        .send()
        .await?)
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_login_returns_session(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    let admin = server.create_admin("ada@example.com", TEST_PASSWORD).await?;

    let response = post_login(&server, "ada@example.com", TEST_PASSWORD).await?;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["accountId"], admin.id.to_string());
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["role"], "ADMIN");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_login_wrong_password(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    server.create_admin("ada@example.com", TEST_PASSWORD).await?;

    let response = post_login(&server, "ada@example.com", "not-the-password").await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_login_unknown_email_matches_wrong_password(
    pool: PgPool,
) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;

    let response = post_login(&server, "nobody@example.com", TEST_PASSWORD).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_login_unactivated_account(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    accounts::create(
        server.pool(),
        "Una",
        "Waiting",
        "una@example.com",
        AccountType::Admin,
    )
    .await?;

    let response = post_login(&server, "una@example.com", TEST_PASSWORD).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "ACCOUNT_NOT_ACTIVATED");
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_session_data_and_logout(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    server.create_admin("ada@example.com", TEST_PASSWORD).await?;
    let token = server.login("ada@example.com", TEST_PASSWORD).await?;

    let response = server
        .authed(Method::GET, "/api/accounts/data", &token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["token"], token.as_str());

    let response = server
        .authed(Method::POST, "/api/auth/logout", &token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = server
        .authed(Method::GET, "/api/accounts/data", &token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = server.authed(Method::GET, "/api/meals", &token).send().await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_own_account(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    server.create_admin("ada@example.com", TEST_PASSWORD).await?;
    server.create_admin("bob@example.com", TEST_PASSWORD).await?;
    let token = server.login("ada@example.com", TEST_PASSWORD).await?;

    let response = server
        .authed(Method::PUT, "/api/accounts", &token)
        .json(&json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "BOB@example.com",
        }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "DUPLICATE_EMAIL");

    let response = server
        .authed(Method::PUT, "/api/accounts", &token)
        .json(&json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "password": "a-new-password",
            "confirmPassword": "a-new-password",
        }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = server.authed(Method::GET, "/api/accounts", &token).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["lastName"], "Lovelace");

    server.login("ada@example.com", "a-new-password").await?;
    assert!(server.login("ada@example.com", TEST_PASSWORD).await.is_err());
    Ok(())
}
