//! Account registration.
//!
//! Invitees register themselves with an invitation code; administrators are
//! registered by other administrators, or bootstrapped at startup when none
//! exist. Either way the account starts unactivated and an activation link is
//! emailed.

use crate::config::BootstrapAdmin;
use crate::crypto;
use crate::email::EmailTemplate;
use crate::errors::RsvpError;
use crate::models::{Account, AccountType, CreateAdminRequest, RegisterInviteeRequest};
use crate::observability::hash_for_correlation;
use crate::repositories::{accounts, activations, invitations};
use crate::services::notification_service::Mailer;
use crate::services::validation::{require_non_blank, validate_email};
use sqlx::PgPool;
use tracing::{info, instrument, warn};

/// Register an unactivated administrator and email the activation link.
#[instrument(skip_all, name = "rsvp.services.registration.admin")]
pub async fn register_admin(
    pool: &PgPool,
    mailer: &Mailer,
    request: CreateAdminRequest,
) -> Result<Account, RsvpError> {
    let first_name = require_non_blank(&request.first_name, "First name")?;
    let last_name = require_non_blank(&request.last_name, "Last name")?;
    let email = validate_email(&request.email)?;

    let mut tx = pool.begin().await?;

    if accounts::email_taken(&mut *tx, &email, None).await? {
        return Err(RsvpError::DuplicateEmail);
    }

    let account =
        accounts::create(&mut *tx, &first_name, &last_name, &email, AccountType::Admin).await?;
    let token = crypto::generate_activation_token()?;
    activations::create(&mut *tx, account.id, &token).await?;

    tx.commit().await?;

    info!(
        target: "rsvp.services.registration",
        account_id = %account.id,
        email_hash = %hash_for_correlation(&account.email),
        "Administrator registered"
    );

    let template = EmailTemplate::AdminActivation {
        first_name: account.first_name.clone(),
        event_title: mailer.event_title(pool).await,
        activation_url: mailer.activation_url(&token),
    };
    mailer
        .send(pool, &account.full_name(), &account.email, template)
        .await;

    Ok(account)
}

/// Register an invitee against an unclaimed invitation code.
#[instrument(skip_all, name = "rsvp.services.registration.invitee")]
pub async fn register_invitee(
    pool: &PgPool,
    mailer: &Mailer,
    request: RegisterInviteeRequest,
) -> Result<Account, RsvpError> {
    let first_name = require_non_blank(&request.first_name, "First name")?;
    let last_name = require_non_blank(&request.last_name, "Last name")?;
    let email = validate_email(&request.email)?;
    let code = require_non_blank(&request.invitation_code, "Invitation code")?;

    let mut tx = pool.begin().await?;

    let invitation = invitations::get_by_code(&mut *tx, &code)
        .await?
        .ok_or_else(|| RsvpError::BadRequest("Invitation code is not valid".to_string()))?;

    if invitation.account_id.is_some() {
        return Err(RsvpError::BadRequest(
            "Invitation code has already been used".to_string(),
        ));
    }

    if accounts::email_taken(&mut *tx, &email, None).await? {
        return Err(RsvpError::DuplicateEmail);
    }

    let account =
        accounts::create(&mut *tx, &first_name, &last_name, &email, AccountType::Invitee).await?;

    if !invitations::claim(&mut *tx, invitation.id, account.id).await? {
        // Another registration claimed it between the lookup and now.
        return Err(RsvpError::BadRequest(
            "Invitation code has already been used".to_string(),
        ));
    }

    let token = crypto::generate_activation_token()?;
    activations::create(&mut *tx, account.id, &token).await?;

    tx.commit().await?;

    info!(
        target: "rsvp.services.registration",
        account_id = %account.id,
        invitation_id = %invitation.id,
        "Invitee registered"
    );

    let template = EmailTemplate::InviteeActivation {
        first_name: account.first_name.clone(),
        event_title: mailer.event_title(pool).await,
        invitation_name: invitation.name.clone(),
        activation_url: mailer.activation_url(&token),
    };
    mailer
        .send(pool, &account.full_name(), &account.email, template)
        .await;

    Ok(account)
}

/// Register the configured administrator if there is none yet.
///
/// Returns the new account, or `None` when administrators already exist.
#[instrument(skip_all, name = "rsvp.services.registration.bootstrap")]
pub async fn bootstrap_admin(
    pool: &PgPool,
    mailer: &Mailer,
    admin: &BootstrapAdmin,
) -> Result<Option<Account>, RsvpError> {
    let existing = accounts::count_by_type(pool, AccountType::Admin).await?;
    if existing > 0 {
        info!(
            target: "rsvp.services.registration",
            admins = existing,
            "Administrators exist, skipping bootstrap"
        );
        return Ok(None);
    }

    let request = CreateAdminRequest {
        first_name: admin.first_name.clone(),
        last_name: admin.last_name.clone(),
        email: admin.email.clone(),
    };

    match register_admin(pool, mailer, request).await {
        Ok(account) => Ok(Some(account)),
        Err(RsvpError::DuplicateEmail) => {
            warn!(
                target: "rsvp.services.registration",
                email_hash = %hash_for_correlation(&admin.email),
                "Bootstrap email belongs to an existing invitee, no administrator created"
            );
            Err(RsvpError::DuplicateEmail)
        }
        Err(e) => Err(e),
    }
}
