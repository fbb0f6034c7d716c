//! One action per use case. Actions own their repositories, run the relevant
//! guard, then perform the writes; handlers above this crate only translate
//! transport concerns.

pub mod beneficiaries;
pub mod data_access;
pub mod housings;
pub mod join_invites;
pub mod join_requests;
pub mod org_type_requests;
pub mod organizations;
pub mod product_types;
pub mod reallocation;
pub mod voluntary_people;

pub use beneficiaries::{CreateBeneficiaryAction, ListBeneficiariesByOrganizationAction};
pub use data_access::{
    AcceptDataAccessRequestAction, CreateDataAccessRequestAction,
    ListDataAccessGrantsByTargetAction, ListDataAccessRequestsByRequesterAction,
    ListDataAccessRequestsByTargetAction, RejectDataAccessRequestAction,
    RevokeDataAccessGrantAction,
};
pub use housings::{
    CreateHousingAction, CreateHousingRoomsAction, ListHousingRoomsAction,
    ListHousingsByOrganizationAction,
};
pub use join_invites::{
    AcceptJoinInviteAction, CreateJoinInviteAction, InviteConfig,
    ListJoinInvitesByOrganizationAction, ListJoinInvitesByUserAction, RejectJoinInviteAction,
};
pub use join_requests::{
    AcceptJoinRequestAction, CreateJoinRequestAction, ListJoinRequestsByOrganizationAction,
    ListJoinRequestsByUserAction, RejectJoinRequestAction,
};
pub use org_type_requests::{
    AcceptOrgTypeRequestAction, CreateOrgTypeRequestAction, ListAllOrgTypeRequestsAction,
    ListOrgTypeRequestsByOrganizationAction, RejectOrgTypeRequestAction,
};
pub use organizations::{
    CreateOrganizationAction, GetOrganizationAction, ListOrganizationsAction,
    ReactivateOrganizationAction, UpdateOrganizationAction,
};
pub use product_types::{
    CreateProductTypeAction, DeleteProductTypeAction, ListProductTypesByOrganizationAction,
    UpdateProductTypeAction,
};
pub use reallocation::{
    CreateReallocationAction, ListAllocationsByBeneficiaryAction, ReallocationInput,
};
pub use voluntary_people::{
    CreateVoluntaryPersonAction, DeleteVoluntaryPersonAction,
    ListVoluntaryPeopleByOrganizationAction, UpdateVoluntaryPersonAction,
};
