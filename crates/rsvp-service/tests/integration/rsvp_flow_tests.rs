//! End-to-end RSVP flow: an admin prepares the party, the invitee answers,
//! and the admin reads the totals.

use reqwest::{Method, StatusCode};
use rsvp_test_utils::{TestRsvpServer, TEST_PASSWORD};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn json_body(response: reqwest::Response) -> Result<Value, anyhow::Error> {
    Ok(response.json().await?)
}

fn id_of(value: &Value) -> Result<String, anyhow::Error> {
    value["id"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("response has no id: {}", value))
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_full_rsvp_flow(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    server.create_admin("ada@example.com", TEST_PASSWORD).await?;
    let admin = server.login("ada@example.com", TEST_PASSWORD).await?;

    // Menu
    let fish = json_body(
        server
            .authed(Method::POST, "/api/meals", &admin)
            .json(&json!({ "name": "Fish", "description": "Sea bass" }))
            .send()
            .await?,
    )
    .await?;
    let fish_id = id_of(&fish)?;
    let response = server
        .authed(Method::POST, "/api/meals", &admin)
        .json(&json!({ "name": "Beef", "description": "Short rib" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    // Party
    let response = server
        .authed(Method::POST, "/api/invitations", &admin)
        .json(&json!({ "name": "The Smiths", "address": "1 Chapel Lane" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let invitation = json_body(response).await?;
    let invitation_id = id_of(&invitation)?;
    assert_eq!(invitation["guestCount"], 0);
    assert_eq!(invitation["claimed"], false);

    let attendants_path = format!("/api/invitations/{}/attendants", invitation_id);
    let mut attendant_ids = Vec::new();
    for name in ["Jane Smith", "John Smith"] {
        let response = server
            .authed(Method::POST, &attendants_path, &admin)
            .json(&json!({ "name": name }))
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let attendant = json_body(response).await?;
        assert_eq!(attendant["responseStatus"], "PENDING");
        attendant_ids.push(id_of(&attendant)?);
    }
    let [jane_id, john_id] = attendant_ids.as_slice() else {
        anyhow::bail!("expected two attendants");
    };

    let invitation_uuid = invitation_id.parse()?;
    server
        .create_invitee(invitation_uuid, "jane@example.com", TEST_PASSWORD)
        .await?;
    let invitee = server.login("jane@example.com", TEST_PASSWORD).await?;

    // The invitee sees their party and answers for everyone in it.
    let response = server
        .authed(Method::GET, &attendants_path, &invitee)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let listed: Vec<Value> = response.json().await?;
    assert_eq!(listed.len(), 2);

    let response = server
        .authed(Method::PUT, &format!("{}/{}", attendants_path, jane_id), &invitee)
        .json(&json!({ "responseStatus": "ACCEPTED", "diningOption": fish_id }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = server
        .authed(Method::PUT, &format!("{}/{}", attendants_path, john_id), &invitee)
        .json(&json!({ "responseStatus": "DECLINED" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Stats
    let response = server.authed(Method::GET, "/api/stats", &admin).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = json_body(response).await?;
    assert_eq!(stats["pendingAttendants"], 0);
    assert_eq!(stats["acceptedAttendants"], 1);
    assert_eq!(stats["declinedAttendants"], 1);
    assert_eq!(
        stats["mealStats"],
        json!([{ "name": "Beef", "count": 0 }, { "name": "Fish", "count": 1 }])
    );

    // CSV export
    let response = server
        .authed(Method::GET, "/api/stats/attendants.csv", &admin)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/csv"));
    let csv = response.text().await?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#""Party","Name","Response","Meal""#,
            r#""The Smiths","Jane Smith","ACCEPTED","Fish""#,
            r#""The Smiths","John Smith","DECLINED","""#,
        ]
    );

    // Deleting a chosen meal clears it from the attendant.
    let response = server
        .authed(Method::DELETE, &format!("/api/meals/{}", fish_id), &admin)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let listed: Vec<Value> = server
        .authed(Method::GET, &attendants_path, &admin)
        .send()
        .await?
        .json()
        .await?;
    assert!(listed.iter().all(|a| a["diningOption"].is_null()));
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_invitee_cannot_touch_other_parties(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    let smiths = server.create_invitation("The Smiths").await?;
    let joneses = server.create_invitation("The Joneses").await?;
    server
        .create_invitee(smiths.id, "jane@example.com", TEST_PASSWORD)
        .await?;
    let invitee = server.login("jane@example.com", TEST_PASSWORD).await?;

    let response = server
        .authed(Method::GET, &format!("/api/invitations/{}", joneses.id), &invitee)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = server
        .authed(
            Method::GET,
            &format!("/api/invitations/{}/attendants", joneses.id),
            &invitee,
        )
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_deleting_invitation_removes_invitee(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestRsvpServer::spawn(pool).await?;
    server.create_admin("ada@example.com", TEST_PASSWORD).await?;
    let admin = server.login("ada@example.com", TEST_PASSWORD).await?;
    let invitation = server.create_invitation("The Smiths").await?;
    server
        .create_invitee(invitation.id, "jane@example.com", TEST_PASSWORD)
        .await?;
    let invitee = server.login("jane@example.com", TEST_PASSWORD).await?;

    let response = server
        .authed(Method::DELETE, &format!("/api/invitations/{}", invitation.id), &admin)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = server
        .authed(Method::GET, "/api/accounts", &invitee)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(server.login("jane@example.com", TEST_PASSWORD).await.is_err());

    let response = server
        .authed(Method::GET, &format!("/api/invitations/{}", invitation.id), &admin)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}
