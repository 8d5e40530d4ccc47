//! Integration tests for event configuration.

use reqwest::{Method, StatusCode};
use rsvp_test_utils::{TestRsvpServer, TEST_PASSWORD};
use serde_json::{json, Value};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_admin_updates_event_details(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    server.create_admin("ada@example.com", TEST_PASSWORD).await?;
    let admin = server.login("ada@example.com", TEST_PASSWORD).await?;

    let response = server.authed(Method::GET, "/api/configs", &admin).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    let configs: Vec<Value> = response.json().await?;
    assert_eq!(configs.len(), 9);
    assert!(configs.iter().all(|c| c["value"] == ""));

    let response = server
        .authed(Method::POST, "/api/configs", &admin)
        .json(&json!([
            { "key": "event.title", "value": "  Ada & Grace  " },
            { "key": "event.date", "value": "2027-06-12" },
        ]))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let invitation = server.create_invitation("The Smiths").await?;
    server
        .create_invitee(invitation.id, "jane@example.com", TEST_PASSWORD)
        .await?;
    let invitee = server.login("jane@example.com", TEST_PASSWORD).await?;

    let response = server.authed(Method::GET, "/api/event", &invitee).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    let details: Value = response.json().await?;
    assert_eq!(details["event.title"], "Ada & Grace");
    assert_eq!(details["event.date"], "2027-06-12");
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_unknown_config_key_changes_nothing(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    server.create_admin("ada@example.com", TEST_PASSWORD).await?;
    let admin = server.login("ada@example.com", TEST_PASSWORD).await?;

    let response = server
        .authed(Method::POST, "/api/configs", &admin)
        .json(&json!([
            { "key": "event.title", "value": "Changed" },
            { "key": "event.colour", "value": "blue" },
        ]))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let details: Value = server
        .authed(Method::GET, "/api/event", &admin)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(details["event.title"], "");
    Ok(())
}
