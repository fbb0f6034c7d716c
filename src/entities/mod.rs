//! Plain data records and the closed enums they carry.
//!
//! Entities have no behavior beyond small state queries; all business rules
//! live in guards and actions. IDs are document-store style strings assigned
//! by the repository layer.

mod address;
mod beneficiary;
mod housing;
mod membership;
mod organization;
mod products;
mod user;

pub use address::Address;
pub use beneficiary::{AllocationType, Beneficiary, BeneficiaryAllocation};
pub use housing::{Housing, HousingRoom};
pub use membership::{
    JoinOrganizationInvite, JoinOrganizationRequest, OrganizationDataAccessRequest, RequestStatus,
    UpdateOrganizationTypeRequest,
};
pub use organization::{
    Organization, OrganizationDataAccessGrant, OrganizationStatus, OrganizationType,
};
pub use products::{ProductType, VoluntaryPerson};
pub use user::{PlatformRole, User, UserStatus};
