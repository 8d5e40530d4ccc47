//! Login, logout and per-request authentication.

use crate::crypto;
use crate::errors::RsvpError;
use crate::models::AccountType;
use crate::observability::hash_for_correlation;
use crate::observability::metrics::record_login;
use crate::repositories::accounts;
use crate::sessions::{Session, SessionStore};
use sqlx::PgPool;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Authenticated caller, attached to each request by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub account_id: Uuid,
    pub role: AccountType,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == AccountType::Admin
    }

    pub fn require_admin(&self) -> Result<(), RsvpError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(RsvpError::Forbidden(
                "Administrator access required".to_string(),
            ))
        }
    }
}

/// Check credentials and open a session.
///
/// Unknown emails still pay for one bcrypt verification so response time does
/// not reveal which addresses have accounts.
#[instrument(skip_all, name = "rsvp.services.auth.login")]
pub async fn login(
    pool: &PgPool,
    sessions: &dyn SessionStore,
    ttl: Duration,
    principal: &str,
    credentials: &str,
) -> Result<Session, RsvpError> {
    let email_hash = hash_for_correlation(principal);
    let account = accounts::get_by_email(pool, principal.trim()).await?;

    let stored_hash = account
        .as_ref()
        .and_then(|a| a.password_hash.as_deref())
        .unwrap_or(crypto::DUMMY_PASSWORD_HASH);
    let password_ok = crypto::verify_password(credentials, stored_hash).unwrap_or(false);

    let account = match account {
        Some(account) if password_ok => account,
        Some(account) if !account.activated && account.password_hash.is_none() => {
            // Never activated: no password can match yet.
            warn!(target: "rsvp.services.auth", email_hash = %email_hash, "Login for account that is not activated");
            record_login("not_activated");
            return Err(RsvpError::AccountNotActivated);
        }
        _ => {
            warn!(target: "rsvp.services.auth", email_hash = %email_hash, "Login failed");
            record_login("invalid_credentials");
            return Err(RsvpError::InvalidCredentials);
        }
    };

    if !account.activated {
        warn!(target: "rsvp.services.auth", email_hash = %email_hash, "Login for account that is not activated");
        record_login("not_activated");
        return Err(RsvpError::AccountNotActivated);
    }

    let token = crypto::generate_session_token()?;
    let session = Session::for_account(&account, token);
    sessions.put(&session, ttl).await?;

    info!(
        target: "rsvp.services.auth",
        account_id = %account.id,
        role = %account.account_type,
        "Login succeeded"
    );
    record_login("success");

    Ok(session)
}

/// Resolve a token to a principal and extend its session.
///
/// Fails with 401 when the token is unknown or expired, or when the account
/// behind it has since been deleted (its session is then dropped).
#[instrument(skip_all, name = "rsvp.services.auth.authenticate")]
pub async fn authenticate(
    pool: &PgPool,
    sessions: &dyn SessionStore,
    ttl: Duration,
    token: &str,
) -> Result<Principal, RsvpError> {
    let session = sessions
        .get(token)
        .await?
        .ok_or_else(|| RsvpError::Unauthorized("Invalid or expired session".to_string()))?;

    let account = match accounts::get_by_id(pool, session.account_id).await? {
        Some(account) => account,
        None => {
            sessions.remove(token).await?;
            return Err(RsvpError::Unauthorized(
                "Invalid or expired session".to_string(),
            ));
        }
    };

    sessions.touch(token, ttl).await?;

    Ok(Principal {
        account_id: account.id,
        role: account.account_type,
    })
}

/// Session body for a token, without extending it.
pub async fn current_session(
    sessions: &dyn SessionStore,
    token: &str,
) -> Result<Session, RsvpError> {
    sessions
        .get(token)
        .await?
        .ok_or_else(|| RsvpError::Unauthorized("Invalid or expired session".to_string()))
}

#[instrument(skip_all, name = "rsvp.services.auth.logout")]
pub async fn logout(sessions: &dyn SessionStore, token: &str) -> Result<(), RsvpError> {
    sessions.remove(token).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_roles() {
        let admin = Principal {
            account_id: Uuid::new_v4(),
            role: AccountType::Admin,
        };
        let invitee = Principal {
            account_id: Uuid::new_v4(),
            role: AccountType::Invitee,
        };

        assert!(admin.is_admin());
        assert!(admin.require_admin().is_ok());
        assert!(!invitee.is_admin());
        assert!(matches!(
            invitee.require_admin(),
            Err(RsvpError::Forbidden(_))
        ));
    }
}
