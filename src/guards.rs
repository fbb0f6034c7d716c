//! Pure authorization predicates.
//!
//! Guards decide whether an actor may perform an action against a target,
//! given state already loaded onto the passed entities. They never touch a
//! repository and have no side effects, which keeps them trivially testable.
//!
//! Every failure is one of the forbidden sentinels on [`Error`]
//! (`ForbiddenAction`, `InactiveUser`, `MemberOfInactiveOrganization`) so the
//! boundary layer can map them uniformly to access-denied responses.

use crate::entities::{Organization, OrganizationStatus, PlatformRole, User, UserStatus};
use crate::Error;

/// Succeeds iff the actor is a platform superuser.
pub fn is_super_user(actor: &User) -> Result<(), Error> {
    if actor.platform_role != PlatformRole::RelifMember {
        return Err(Error::ForbiddenAction);
    }

    Ok(())
}

/// Superusers bypass every organization-scoped check. All other actors fall
/// through to `check`.
fn super_user_or(actor: &User, check: impl FnOnce() -> Result<(), Error>) -> Result<(), Error> {
    if is_super_user(actor).is_ok() {
        return Ok(());
    }

    check()
}

/// An actor may create an organization only while not belonging to one:
/// no organization set and platform role still `NoOrg`.
pub fn authorize_create_organization(actor: &User) -> Result<(), Error> {
    super_user_or(actor, || {
        if actor.organization_id.is_none() && actor.platform_role == PlatformRole::NoOrg {
            Ok(())
        } else {
            Err(Error::ForbiddenAction)
        }
    })
}

/// Succeeds iff the actor administers the given organization: member of it
/// with the `OrgAdmin` role. Admins of other organizations are refused.
pub fn is_organization_admin(actor: &User, organization: &Organization) -> Result<(), Error> {
    super_user_or(actor, || {
        if actor.organization_id.as_deref() == Some(organization.id.as_str())
            && actor.platform_role == PlatformRole::OrgAdmin
        {
            Ok(())
        } else {
            Err(Error::ForbiddenAction)
        }
    })
}

/// Read access to an organization's data: direct membership, or a
/// cross-organization grant. The grant is unidirectional; the actor's
/// organization must appear in the *target's* granted list.
pub fn has_access_to_organization_data(actor: &User, target: &Organization) -> Result<(), Error> {
    super_user_or(actor, || match actor.organization_id.as_deref() {
        Some(org_id) if org_id == target.id => Ok(()),
        Some(org_id) if target.access_granted_ids.iter().any(|id| id == org_id) => Ok(()),
        _ => Err(Error::ForbiddenAction),
    })
}

/// Platform-entry check: inactive users are refused outright, active users
/// are refused while their organization is deactivated. The user check takes
/// precedence over the organization check.
pub fn can_access_platform(actor: &User, organization: Option<&Organization>) -> Result<(), Error> {
    if actor.status == UserStatus::Inactive {
        return Err(Error::InactiveUser);
    }

    if let Some(organization) = organization {
        if organization.status == OrganizationStatus::Inactive {
            return Err(Error::MemberOfInactiveOrganization);
        }
    }

    Ok(())
}

/// Self-service check: only the target user themself, or a superuser, passes.
pub fn is_user(actor: &User, target: &User) -> Result<(), Error> {
    super_user_or(actor, || {
        if actor.id == target.id {
            Ok(())
        } else {
            Err(Error::ForbiddenAction)
        }
    })
}
