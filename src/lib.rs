//! Guard and workflow core for a humanitarian-aid case-management platform.
//!
//! This crate models the organizations, users, beneficiaries, housings and
//! membership workflows of the platform, and enforces who may do what through
//! pure guard predicates. Persistence and delivery are abstracted behind
//! repository and service traits; HTTP, storage drivers and email transport
//! live outside this crate.
//!
//! Each business operation is an action struct generic over the repositories
//! it consumes. Actions load the entities they need, run guards, apply the
//! domain rules and write the result back.

pub mod actions;
pub mod entities;
pub mod guards;
pub mod repository;
pub mod services;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use repository::{
    BeneficiaryAllocationRepository, BeneficiaryRepository, HousingRepository,
    HousingRoomRepository, JoinOrganizationInviteRepository, JoinOrganizationRequestRepository,
    OrganizationDataAccessGrantRepository, OrganizationDataAccessRequestRepository,
    OrganizationRepository, Page, ProductTypeRepository, UpdateOrganizationTypeRequestRepository,
    UserRepository, VoluntaryPersonRepository,
};
pub use services::EmailSender;

#[cfg(any(test, feature = "mocks"))]
pub use mocks::{
    MockBeneficiaryAllocationRepository, MockBeneficiaryRepository, MockEmailSender,
    MockHousingRepository, MockHousingRoomRepository, MockJoinOrganizationInviteRepository,
    MockJoinOrganizationRequestRepository, MockOrganizationDataAccessGrantRepository,
    MockOrganizationDataAccessRequestRepository, MockOrganizationRepository,
    MockProductTypeRepository, MockUpdateOrganizationTypeRequestRepository, MockUserRepository,
    MockVoluntaryPersonRepository,
};

use std::fmt;

/// Errors surfaced by guards, actions and repository implementations.
///
/// The boundary layer is expected to map these onto response codes: the
/// `*NotFound` variants to 404, the forbidden family to 403, the conflict
/// family to 409 and the rest to 500. Use [`Error::is_forbidden`] and friends
/// instead of matching variants one by one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    UserNotFound,
    OrganizationNotFound,
    BeneficiaryNotFound,
    HousingNotFound,
    HousingRoomNotFound,
    JoinInviteNotFound,
    JoinRequestNotFound,
    DataAccessRequestNotFound,
    DataAccessGrantNotFound,
    OrgTypeRequestNotFound,
    VoluntaryPersonNotFound,
    ProductTypeNotFound,
    ForbiddenAction,
    InactiveUser,
    MemberOfInactiveOrganization,
    BeneficiaryAlreadyExists,
    VoluntaryPersonAlreadyExists,
    InviteAlreadyExists,
    InviteAlreadyResolved,
    InviteExpired,
    RequestAlreadyResolved,
    Database(String),
    Internal(String),
}

impl Error {
    /// True for guard failures that should surface as access-denied.
    pub fn is_forbidden(&self) -> bool {
        matches!(
            self,
            Error::ForbiddenAction | Error::InactiveUser | Error::MemberOfInactiveOrganization
        )
    }

    /// True for missing-entity lookups.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::UserNotFound
                | Error::OrganizationNotFound
                | Error::BeneficiaryNotFound
                | Error::HousingNotFound
                | Error::HousingRoomNotFound
                | Error::JoinInviteNotFound
                | Error::JoinRequestNotFound
                | Error::DataAccessRequestNotFound
                | Error::DataAccessGrantNotFound
                | Error::OrgTypeRequestNotFound
                | Error::VoluntaryPersonNotFound
                | Error::ProductTypeNotFound
        )
    }

    /// True for domain precondition violations. `InviteExpired` is included
    /// deliberately: an expired invite is a state conflict of the record, not
    /// an access decision, and the boundary maps it to 409 like the rest.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Error::BeneficiaryAlreadyExists
                | Error::VoluntaryPersonAlreadyExists
                | Error::InviteAlreadyExists
                | Error::InviteAlreadyResolved
                | Error::InviteExpired
                | Error::RequestAlreadyResolved
        )
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UserNotFound => write!(f, "user with given data not found"),
            Error::OrganizationNotFound => write!(f, "organization with given data not found"),
            Error::BeneficiaryNotFound => write!(f, "beneficiary with given data not found"),
            Error::HousingNotFound => write!(f, "housing with given data not found"),
            Error::HousingRoomNotFound => write!(f, "housing room with given data not found"),
            Error::JoinInviteNotFound => {
                write!(f, "join organization invite with given data not found")
            }
            Error::JoinRequestNotFound => {
                write!(f, "join organization request with given data not found")
            }
            Error::DataAccessRequestNotFound => {
                write!(f, "organization data access request with given data not found")
            }
            Error::DataAccessGrantNotFound => {
                write!(f, "organization data access grant with given data not found")
            }
            Error::OrgTypeRequestNotFound => {
                write!(f, "update organization type request with given data not found")
            }
            Error::VoluntaryPersonNotFound => {
                write!(f, "voluntary person with given data not found")
            }
            Error::ProductTypeNotFound => write!(f, "product type with given data not found"),
            Error::ForbiddenAction => write!(f, "actor is not allowed to perform this action"),
            Error::InactiveUser => write!(f, "user is inactive"),
            Error::MemberOfInactiveOrganization => {
                write!(f, "user is member of an inactive organization")
            }
            Error::BeneficiaryAlreadyExists => {
                write!(f, "beneficiary with given data already exists")
            }
            Error::VoluntaryPersonAlreadyExists => {
                write!(f, "voluntary person with given data already exists")
            }
            Error::InviteAlreadyExists => {
                write!(f, "a pending invite already exists for this user")
            }
            Error::InviteAlreadyResolved => write!(f, "invite has already been resolved"),
            Error::InviteExpired => write!(f, "invite has expired"),
            Error::RequestAlreadyResolved => write!(f, "request has already been resolved"),
            Error::Database(msg) => write!(f, "database error: {msg}"),
            Error::Internal(msg) => write!(f, "{msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_families() {
        assert!(Error::ForbiddenAction.is_forbidden());
        assert!(Error::InactiveUser.is_forbidden());
        assert!(!Error::UserNotFound.is_forbidden());

        assert!(Error::BeneficiaryNotFound.is_not_found());
        assert!(!Error::BeneficiaryAlreadyExists.is_not_found());

        assert!(Error::InviteAlreadyExists.is_conflict());
        assert!(Error::InviteExpired.is_conflict());
        assert!(!Error::InviteExpired.is_forbidden());
        assert!(!Error::Database("down".into()).is_conflict());
    }
}
