//! Integration tests for administrator management and role checks.

use reqwest::{Method, StatusCode};
use rsvp_test_utils::{TestRsvpServer, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_and_delete_admins(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    let ada = server.create_admin("ada@example.com", TEST_PASSWORD).await?;
    let bob = server.create_admin("bob@example.com", TEST_PASSWORD).await?;
    let token = server.login("ada@example.com", TEST_PASSWORD).await?;
    let bob_token = server.login("bob@example.com", TEST_PASSWORD).await?;

    let response = server.authed(Method::GET, "/api/admins", &token).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Vec<serde_json::Value> = response.json().await?;
    assert_eq!(body.len(), 2);

    let response = server
        .authed(Method::DELETE, &format!("/api/admins/{}", ada.id), &token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = server
        .authed(Method::DELETE, &format!("/api/admins/{}", bob.id), &token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = server
        .authed(Method::GET, &format!("/api/admins/{}", bob.id), &token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The deleted admin's session stops working.
    let response = server.authed(Method::GET, "/api/admins", &bob_token).send().await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicate_admin_email(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    server.create_admin("ada@example.com", TEST_PASSWORD).await?;
    let token = server.login("ada@example.com", TEST_PASSWORD).await?;

    let response = server
        .authed(Method::POST, "/api/admins", &token)
        .json(&json!({ "firstName": "Ada", "lastName": "Again", "email": "ADA@example.com" }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "DUPLICATE_EMAIL");
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_invitee_cannot_use_admin_routes(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    let invitation = server.create_invitation("The Smiths").await?;
    server
        .create_invitee(invitation.id, "jane@example.com", TEST_PASSWORD)
        .await?;
    let token = server.login("jane@example.com", TEST_PASSWORD).await?;

    for (method, path) in [
        (Method::GET, "/api/admins"),
        (Method::GET, "/api/invitations"),
        (Method::GET, "/api/configs"),
        (Method::GET, "/api/stats"),
        (Method::GET, "/api/stats/attendants.csv"),
    ] {
        let response = server.authed(method, path, &token).send().await?;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{}", path);
    }

    let response = server
        .authed(Method::POST, "/api/meals", &token)
        .json(&json!({ "name": "Fish", "description": "Sea bass" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Reading the menu is allowed.
    let response = server.authed(Method::GET, "/api/meals", &token).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_malformed_id_returns_error_body(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    server.create_admin("ada@example.com", TEST_PASSWORD).await?;
    let token = server.login("ada@example.com", TEST_PASSWORD).await?;

    for path in [
        "/api/meals/not-a-uuid",
        "/api/admins/42",
        "/api/invitations/zz/attendants",
    ] {
        let response = server.authed(Method::GET, path, &token).send().await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", path);
        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["error"]["code"], "BAD_REQUEST", "{}", path);
    }
    Ok(())
}
