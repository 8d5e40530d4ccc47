//! Integration tests for registration and account activation.

use reqwest::{Method, StatusCode};
use rsvp_test_utils::{activation_token, TestRsvpServer, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

async fn activate(
    server: &TestRsvpServer,
    token: &str,
    password: &str,
) -> Result<reqwest::Response, anyhow::Error> {
    Ok(reqwest::Client::new()
        .put(format!("{}/api/activations/{}", server.url(), token))
        .json(&json!({ "password": password, "confirmPassword": password }))
        .send()
        .await?)
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_admin_invites_admin_who_activates(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    server.create_admin("ada@example.com", TEST_PASSWORD).await?;
    let token = server.login("ada@example.com", TEST_PASSWORD).await?;

    let response = server
        .authed(Method::POST, "/api/admins", &token)
        .json(&json!({
            "firstName": "Grace",
            "lastName": "Hopper",
            "email": "grace@example.com",
        }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["activated"], false);

    let sent = server.mail().wait_for(1).await;
    let email = sent
        .iter()
        .find(|e| e.to.email.to_string() == "grace@example.com")
        .ok_or_else(|| anyhow::anyhow!("activation email not sent"))?;
    assert_eq!(email.template, "admin-activation");
    let activation = activation_token(email).ok_or_else(|| anyhow::anyhow!("no token in email"))?;

    let response = reqwest::get(format!("{}/api/activations/{}", server.url(), activation)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["email"], "grace@example.com");
    assert_eq!(body["firstName"], "Grace");

    let response = activate(&server, &activation, "grace-password").await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Tokens are single use.
    let response = reqwest::get(format!("{}/api/activations/{}", server.url(), activation)).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = activate(&server, &activation, "grace-password").await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    server.login("grace@example.com", "grace-password").await?;
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_activation_rejects_mismatched_passwords(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    server.create_admin("ada@example.com", TEST_PASSWORD).await?;
    let token = server.login("ada@example.com", TEST_PASSWORD).await?;

    server
        .authed(Method::POST, "/api/admins", &token)
        .json(&json!({ "firstName": "Grace", "lastName": "Hopper", "email": "grace@example.com" }))
        .send()
        .await?;
    let sent = server.mail().wait_for(1).await;
    let activation = sent
        .first()
        .and_then(activation_token)
        .ok_or_else(|| anyhow::anyhow!("no activation email"))?;

    let response = reqwest::Client::new()
        .put(format!("{}/api/activations/{}", server.url(), activation))
        .json(&json!({ "password": "grace-password", "confirmPassword": "something-else" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The token survives a rejected attempt.
    let response = activate(&server, &activation, "grace-password").await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_invitee_registers_with_code(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    let invitation = server.create_invitation("The Smiths").await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/activations", server.url()))
        .json(&json!({
            "firstName": "Jane",
            "lastName": "Smith",
            "email": "jane@example.com",
            "invitationCode": invitation.code.to_uppercase(),
        }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let sent = server.mail().wait_for(1).await;
    let email = sent
        .first()
        .ok_or_else(|| anyhow::anyhow!("activation email not sent"))?;
    assert_eq!(email.template, "invitee-activation");
    let activation = activation_token(email).ok_or_else(|| anyhow::anyhow!("no token in email"))?;

    // Not activated yet.
    assert!(server.login("jane@example.com", "jane-password").await.is_err());

    let response = activate(&server, &activation, "jane-password").await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let token = server.login("jane@example.com", "jane-password").await?;
    let response = server
        .authed(Method::GET, &format!("/api/invitations/{}", invitation.id), &token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["name"], "The Smiths");
    assert_eq!(body["claimed"], true);
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_invitation_code_is_single_use(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    let invitation = server.create_invitation("The Smiths").await?;
    let client = reqwest::Client::new();
    let url = format!("{}/api/activations", server.url());

    let first = client
        .post(&url)
        .json(&json!({
            "firstName": "Jane",
            "lastName": "Smith",
            "email": "jane@example.com",
            "invitationCode": invitation.code,
        }))
        .send()
        .await?;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client
        .post(&url)
        .json(&json!({
            "firstName": "John",
            "lastName": "Smith",
            "email": "john@example.com",
            "invitationCode": invitation.code,
        }))
        .send()
        .await?;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    let unknown = client
        .post(&url)
        .json(&json!({
            "firstName": "Jim",
            "lastName": "Nobody",
            "email": "jim@example.com",
            "invitationCode": "zzzzzzzz",
        }))
        .send()
        .await?;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_unknown_activation_token(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;

    let response = reqwest::get(format!("{}/api/activations/doesnotexist", server.url())).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}
