//! Database fixtures and authenticated requests.
//!
//! Accounts are written straight through the repositories so tests can start
//! from an activated, logged-in state without walking the email flow.

use crate::server_harness::TestRsvpServer;
use reqwest::{Method, RequestBuilder};
use rsvp_service::crypto;
use rsvp_service::middleware::AUTH_TOKEN_HEADER;
use rsvp_service::models::{Account, AccountType, InvitationRequest, InvitationWithCount};
use rsvp_service::repositories::{accounts, invitations};
use rsvp_service::services::invitation_service;
use serde_json::json;
use uuid::Uuid;

/// Password used by fixture accounts unless a test picks its own.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

impl TestRsvpServer {
    /// Create an activated account with the given password.
    pub async fn create_account(
        &self,
        email: &str,
        password: &str,
        account_type: AccountType,
    ) -> Result<Account, anyhow::Error> {
        let account = accounts::create(self.pool(), "Test", "Account", email, account_type).await?;
        let hash = crypto::hash_password(password, self.config().bcrypt_cost)?;
        accounts::activate(self.pool(), account.id, &hash).await?;

        accounts::get_by_id(self.pool(), account.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Fixture account {} vanished", account.id))
    }

    pub async fn create_admin(&self, email: &str, password: &str) -> Result<Account, anyhow::Error> {
        self.create_account(email, password, AccountType::Admin).await
    }

    /// Create an invitation with a generated code.
    pub async fn create_invitation(&self, name: &str) -> Result<InvitationWithCount, anyhow::Error> {
        let invitation = invitation_service::save_invitation(
            self.pool(),
            InvitationRequest {
                id: None,
                name: Some(name.to_string()),
                address: Some("1 Chapel Lane".to_string()),
            },
        )
        .await?;
        Ok(invitation)
    }

    /// Create an activated invitee that has claimed `invitation_id`.
    pub async fn create_invitee(
        &self,
        invitation_id: Uuid,
        email: &str,
        password: &str,
    ) -> Result<Account, anyhow::Error> {
        let account = self
            .create_account(email, password, AccountType::Invitee)
            .await?;
        if !invitations::claim(self.pool(), invitation_id, account.id).await? {
            anyhow::bail!("Invitation {} was already claimed", invitation_id);
        }
        Ok(account)
    }

    /// Log in over HTTP and return the session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, anyhow::Error> {
        let response = reqwest::Client::new()
            .post(format!("{}/api/auth/login", self.url()))
            .json(&json!({ "principal": email, "credentials": password }))
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::CREATED {
            anyhow::bail!("Login for {} failed with {}", email, status);
        }

        let body: serde_json::Value = response.json().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("Login response has no token"))
    }

    /// Build a request to `path` carrying the session token.
    pub fn authed(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        reqwest::Client::new()
            .request(method, format!("{}{}", self.url(), path))
            .header(AUTH_TOKEN_HEADER, token)
    }
}
