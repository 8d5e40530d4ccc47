//! Invitations and their codes.
//!
//! # Code allocation
//!
//! New invitations get a 6-character code drawn uniformly from `[a-z0-9]`
//! (about 2.2 billion values). A drawn code is checked against existing rows
//! and redrawn if taken; the unique constraint catches races between the
//! check and the insert, which are redrawn the same way. After
//! [`MAX_CODE_ATTEMPTS`] collisions in a row the request fails instead of
//! looping.

use crate::crypto;
use crate::errors::RsvpError;
use crate::models::{Invitation, InvitationRequest, InvitationWithCount};
use crate::observability::metrics::record_invitation_code_collision;
use crate::repositories::{accounts, invitations};
use crate::services::auth_service::Principal;
use crate::services::validation::require_non_blank;
use sqlx::PgPool;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

pub const MAX_CODE_ATTEMPTS: usize = 16;

fn invitation_not_found() -> RsvpError {
    RsvpError::NotFound("Invitation not found".to_string())
}

/// Admins see every invitation; invitees only the one they claimed.
pub fn authorize(principal: &Principal, invitation_account: Option<Uuid>) -> Result<(), RsvpError> {
    if principal.is_admin() || invitation_account == Some(principal.account_id) {
        Ok(())
    } else {
        Err(RsvpError::Forbidden(
            "You do not have access to this invitation".to_string(),
        ))
    }
}

/// Fetch an invitation the caller is allowed to see.
pub async fn get_authorized(
    pool: &PgPool,
    principal: &Principal,
    id: Uuid,
) -> Result<Invitation, RsvpError> {
    let invitation = invitations::get_by_id(pool, id)
        .await?
        .ok_or_else(invitation_not_found)?;
    authorize(principal, invitation.account_id)?;
    Ok(invitation)
}

pub async fn list_invitations(pool: &PgPool) -> Result<Vec<InvitationWithCount>, RsvpError> {
    invitations::list_with_counts(pool).await
}

pub async fn get_invitation(
    pool: &PgPool,
    principal: &Principal,
    id: Uuid,
) -> Result<InvitationWithCount, RsvpError> {
    let invitation = invitations::get_with_count(pool, id)
        .await?
        .ok_or_else(invitation_not_found)?;
    authorize(principal, invitation.account_id)?;
    Ok(invitation)
}

/// Create an invitation with a fresh code, or update one when `id` is given.
///
/// Updates change only the fields present in the request; the code is kept.
#[instrument(skip_all, name = "rsvp.services.invitation.save")]
pub async fn save_invitation(
    pool: &PgPool,
    request: InvitationRequest,
) -> Result<InvitationWithCount, RsvpError> {
    let id = match request.id {
        Some(id) => {
            let name = match request.name.as_deref() {
                Some(name) => Some(require_non_blank(name, "Name")?),
                None => None,
            };
            let address = request.address.as_deref().map(str::trim);
            invitations::update(pool, id, name.as_deref(), address)
                .await?
                .ok_or_else(invitation_not_found)?
                .id
        }
        None => {
            let name = require_non_blank(request.name.as_deref().unwrap_or(""), "Name")?;
            let address = request.address.as_deref().unwrap_or("").trim();
            create_with_unique_code(pool, &name, address).await?.id
        }
    };

    info!(target: "rsvp.services.invitation", invitation_id = %id, "Invitation saved");

    invitations::get_with_count(pool, id)
        .await?
        .ok_or_else(invitation_not_found)
}

async fn create_with_unique_code(
    pool: &PgPool,
    name: &str,
    address: &str,
) -> Result<Invitation, RsvpError> {
    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = crypto::generate_invitation_code()?;

        if invitations::code_taken(pool, &code).await? {
            record_invitation_code_collision();
            warn!(target: "rsvp.services.invitation", attempt = attempt, "Invitation code already taken, redrawing");
            continue;
        }

        match invitations::insert(pool, name, address, &code).await? {
            Some(invitation) => return Ok(invitation),
            None => {
                record_invitation_code_collision();
                warn!(target: "rsvp.services.invitation", attempt = attempt, "Invitation code claimed concurrently, redrawing");
            }
        }
    }

    error!(
        target: "rsvp.services.invitation",
        attempts = MAX_CODE_ATTEMPTS,
        "Could not allocate a unique invitation code"
    );
    Err(RsvpError::Internal)
}

/// Delete an invitation together with the account that claimed it.
#[instrument(skip_all, name = "rsvp.services.invitation.delete", fields(invitation_id = %id))]
pub async fn delete_invitation(pool: &PgPool, id: Uuid) -> Result<(), RsvpError> {
    let mut tx = pool.begin().await?;

    let invitation = invitations::delete(&mut *tx, id)
        .await?
        .ok_or_else(invitation_not_found)?;

    if let Some(account_id) = invitation.account_id {
        accounts::delete(&mut *tx, account_id).await?;
    }

    tx.commit().await?;

    info!(
        target: "rsvp.services.invitation",
        removed_account = invitation.account_id.is_some(),
        "Invitation deleted"
    );
    Ok(())
}
