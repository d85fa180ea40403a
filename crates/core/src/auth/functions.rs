use uuid::Uuid;

use super::{AccessError, Actor, Role};

/// Requires the actor to hold exactly `required`.
pub fn require_role(actor: &Actor, required: Role) -> Result<(), AccessError> {
    if actor.role == required {
        Ok(())
    } else {
        Err(AccessError::MissingRole { required })
    }
}

/// Requires the actor to be the declared owner of a resource.
pub fn require_owner(
    actor: &Actor,
    owner_id: Uuid,
    entity_type: &'static str,
    action: &'static str,
) -> Result<(), AccessError> {
    if actor.id == owner_id {
        Ok(())
    } else {
        Err(AccessError::NotOwner {
            entity_type,
            action,
        })
    }
}

/// An application is visible to its applicant, the employer owning the job,
/// and admins.
pub fn can_view_application(actor: &Actor, applicant_id: Uuid, job_owner_id: Uuid) -> bool {
    actor.role == Role::Admin || actor.id == applicant_id || actor.id == job_owner_id
}
