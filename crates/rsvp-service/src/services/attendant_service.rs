use crate::errors::RsvpError;
use crate::models::{Attendant, AttendantRequest, RsvpRequest};
use crate::repositories::{attendants, invitations, meal_options};
use crate::services::auth_service::Principal;
use crate::services::invitation_service;
use crate::services::validation::require_non_blank;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

fn attendant_not_found() -> RsvpError {
    RsvpError::NotFound("Attendant not found".to_string())
}

async fn ensure_invitation_exists(pool: &PgPool, invitation_id: Uuid) -> Result<(), RsvpError> {
    match invitations::get_by_id(pool, invitation_id).await? {
        Some(_) => Ok(()),
        None => Err(RsvpError::NotFound("Invitation not found".to_string())),
    }
}

async fn ensure_meal_exists(pool: &PgPool, meal_option_id: Option<Uuid>) -> Result<(), RsvpError> {
    if let Some(id) = meal_option_id {
        if meal_options::get_by_id(pool, id).await?.is_none() {
            return Err(RsvpError::BadRequest(
                "Dining option does not exist".to_string(),
            ));
        }
    }
    Ok(())
}

pub async fn list_attendants(
    pool: &PgPool,
    principal: &Principal,
    invitation_id: Uuid,
) -> Result<Vec<Attendant>, RsvpError> {
    invitation_service::get_authorized(pool, principal, invitation_id).await?;
    attendants::list_by_invitation(pool, invitation_id).await
}

/// Add an attendant to an invitation, or change one when `id` is given.
///
/// On update only the fields present in the request change.
#[instrument(skip_all, name = "rsvp.services.attendant.save", fields(invitation_id = %invitation_id))]
pub async fn save_attendant(
    pool: &PgPool,
    invitation_id: Uuid,
    request: AttendantRequest,
) -> Result<Attendant, RsvpError> {
    ensure_invitation_exists(pool, invitation_id).await?;
    ensure_meal_exists(pool, request.dining_option).await?;

    let attendant = match request.id {
        Some(id) => {
            let existing = attendants::get_by_id(pool, id)
                .await?
                .ok_or_else(attendant_not_found)?;
            if existing.invitation_id != invitation_id {
                return Err(RsvpError::BadRequest(
                    "Attendant belongs to a different invitation".to_string(),
                ));
            }
            let name = match request.name.as_deref() {
                Some(name) => Some(require_non_blank(name, "Name")?),
                None => None,
            };
            attendants::update_details(
                pool,
                id,
                name.as_deref(),
                request.response_status,
                request.dining_option,
            )
            .await?
        }
        None => {
            let name = require_non_blank(request.name.as_deref().unwrap_or(""), "Name")?;
            attendants::create(
                pool,
                invitation_id,
                &name,
                request.response_status.unwrap_or_default(),
                request.dining_option,
            )
            .await?
        }
    };

    info!(target: "rsvp.services.attendant", attendant_id = %attendant.id, "Attendant saved");
    Ok(attendant)
}

/// Record an attendant's answer. Open to admins and the invitation's owner.
#[instrument(skip_all, name = "rsvp.services.attendant.respond", fields(attendant_id = %attendant_id))]
pub async fn respond(
    pool: &PgPool,
    principal: &Principal,
    invitation_id: Uuid,
    attendant_id: Uuid,
    request: RsvpRequest,
) -> Result<Attendant, RsvpError> {
    invitation_service::get_authorized(pool, principal, invitation_id).await?;

    let existing = attendants::get_by_id(pool, attendant_id)
        .await?
        .ok_or_else(attendant_not_found)?;
    if existing.invitation_id != invitation_id {
        return Err(attendant_not_found());
    }

    ensure_meal_exists(pool, request.dining_option).await?;

    let attendant =
        attendants::set_response(pool, attendant_id, request.response_status, request.dining_option)
            .await?;

    info!(
        target: "rsvp.services.attendant",
        response = attendant.response_status.as_str(),
        "Attendance recorded"
    );
    Ok(attendant)
}

#[instrument(skip_all, name = "rsvp.services.attendant.delete", fields(attendant_id = %attendant_id))]
pub async fn delete_attendant(
    pool: &PgPool,
    invitation_id: Uuid,
    attendant_id: Uuid,
) -> Result<(), RsvpError> {
    ensure_invitation_exists(pool, invitation_id).await?;

    if !attendants::delete(pool, invitation_id, attendant_id).await? {
        return Err(attendant_not_found());
    }

    info!(target: "rsvp.services.attendant", "Attendant deleted");
    Ok(())
}
