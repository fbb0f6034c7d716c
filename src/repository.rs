//! Persistence contracts consumed by the actions.
//!
//! Concrete implementations live outside this crate (the platform backs them
//! with a document store); the in-memory versions in [`crate::mocks`] exist
//! for tests. Lookups return `Ok(None)` when the entity is absent and actions
//! map that to the per-entity `*NotFound` error. Creation takes a `New*` data
//! struct; the repository assigns the id and timestamps.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::{
    Address, AllocationType, Beneficiary, BeneficiaryAllocation, Housing, HousingRoom,
    JoinOrganizationInvite, JoinOrganizationRequest, Organization, OrganizationDataAccessGrant,
    OrganizationDataAccessRequest, OrganizationType, PlatformRole, ProductType,
    UpdateOrganizationTypeRequest, User, UserStatus, VoluntaryPerson,
};
use crate::Error;

/// One page of a paginated find, with the total match count alongside.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub total: u64,
    pub items: Vec<T>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phones: Vec<String>,
    pub platform_role: PlatformRole,
    pub organization_id: Option<String>,
    pub status: UserStatus,
}

#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub name: String,
    pub description: String,
    pub address: Address,
    pub org_type: OrganizationType,
}

#[derive(Debug, Clone)]
pub struct NewBeneficiary {
    pub full_name: String,
    pub email: String,
    pub birthdate: String,
    pub phones: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewAllocation {
    pub beneficiary_id: String,
    pub old_housing_id: Option<String>,
    pub old_room_id: Option<String>,
    pub housing_id: String,
    pub room_id: Option<String>,
    pub allocation_type: AllocationType,
    pub auditor_id: String,
}

#[derive(Debug, Clone)]
pub struct NewHousing {
    pub name: String,
    pub total_vacancies: i32,
    pub address: Address,
}

#[derive(Debug, Clone)]
pub struct NewHousingRoom {
    pub name: String,
    pub total_vacancies: i32,
}

#[derive(Debug, Clone)]
pub struct NewJoinInvite {
    pub user_id: String,
    pub organization_id: String,
    pub creator_id: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewJoinRequest {
    pub user_id: String,
    pub organization_id: String,
}

#[derive(Debug, Clone)]
pub struct NewDataAccessRequest {
    pub requester_id: String,
    pub requester_organization_id: String,
    pub target_organization_id: String,
}

#[derive(Debug, Clone)]
pub struct NewDataAccessGrant {
    pub organization_id: String,
    pub target_organization_id: String,
    pub auditor_id: String,
}

#[derive(Debug, Clone)]
pub struct NewOrgTypeRequest {
    pub organization_id: String,
    pub creator_id: String,
}

#[derive(Debug, Clone)]
pub struct NewVoluntaryPerson {
    pub full_name: String,
    pub email: String,
    pub phones: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewProductType {
    pub name: String,
    pub description: String,
    pub category: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, data: NewUser) -> Result<User, Error>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, Error>;
    async fn update(&self, id: &str, user: User) -> Result<(), Error>;
}

#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn create(&self, data: NewOrganization, owner_id: &str) -> Result<Organization, Error>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Organization>, Error>;
    async fn find_many_paginated(&self, offset: u64, limit: u64)
        -> Result<Page<Organization>, Error>;
    async fn update(&self, id: &str, organization: Organization) -> Result<(), Error>;
    async fn delete(&self, id: &str) -> Result<(), Error>;
}

#[async_trait]
pub trait BeneficiaryRepository: Send + Sync {
    async fn create(
        &self,
        data: NewBeneficiary,
        organization_id: &str,
    ) -> Result<Beneficiary, Error>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Beneficiary>, Error>;
    async fn count_by_email(&self, email: &str) -> Result<u64, Error>;
    async fn find_many_by_organization_paginated(
        &self,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<Beneficiary>, Error>;
    async fn update(&self, id: &str, beneficiary: Beneficiary) -> Result<(), Error>;
}

#[async_trait]
pub trait BeneficiaryAllocationRepository: Send + Sync {
    async fn create(&self, data: NewAllocation) -> Result<BeneficiaryAllocation, Error>;
    async fn find_many_by_beneficiary_paginated(
        &self,
        beneficiary_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<BeneficiaryAllocation>, Error>;
}

#[async_trait]
pub trait HousingRepository: Send + Sync {
    async fn create(&self, data: NewHousing, organization_id: &str) -> Result<Housing, Error>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Housing>, Error>;
    async fn find_many_by_organization_paginated(
        &self,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<Housing>, Error>;
    async fn update(&self, id: &str, housing: Housing) -> Result<(), Error>;
    async fn delete(&self, id: &str) -> Result<(), Error>;
}

#[async_trait]
pub trait HousingRoomRepository: Send + Sync {
    async fn create_many(
        &self,
        data: Vec<NewHousingRoom>,
        housing_id: &str,
    ) -> Result<Vec<HousingRoom>, Error>;
    async fn find_by_id(&self, id: &str) -> Result<Option<HousingRoom>, Error>;
    async fn find_many_by_housing_paginated(
        &self,
        housing_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<HousingRoom>, Error>;
    async fn delete(&self, id: &str) -> Result<(), Error>;
}

#[async_trait]
pub trait JoinOrganizationInviteRepository: Send + Sync {
    async fn create(&self, data: NewJoinInvite) -> Result<JoinOrganizationInvite, Error>;
    async fn find_by_id(&self, id: &str) -> Result<Option<JoinOrganizationInvite>, Error>;
    async fn count_pending_by_user(&self, user_id: &str) -> Result<u64, Error>;
    async fn find_many_by_organization_paginated(
        &self,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<JoinOrganizationInvite>, Error>;
    async fn find_many_by_user_paginated(
        &self,
        user_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<JoinOrganizationInvite>, Error>;
    async fn update(&self, id: &str, invite: JoinOrganizationInvite) -> Result<(), Error>;
}

#[async_trait]
pub trait JoinOrganizationRequestRepository: Send + Sync {
    async fn create(&self, data: NewJoinRequest) -> Result<JoinOrganizationRequest, Error>;
    async fn find_by_id(&self, id: &str) -> Result<Option<JoinOrganizationRequest>, Error>;
    async fn find_many_by_organization_paginated(
        &self,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<JoinOrganizationRequest>, Error>;
    async fn find_many_by_user_paginated(
        &self,
        user_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<JoinOrganizationRequest>, Error>;
    async fn update(&self, id: &str, request: JoinOrganizationRequest) -> Result<(), Error>;
}

#[async_trait]
pub trait OrganizationDataAccessRequestRepository: Send + Sync {
    async fn create(&self, data: NewDataAccessRequest)
        -> Result<OrganizationDataAccessRequest, Error>;
    async fn find_by_id(&self, id: &str) -> Result<Option<OrganizationDataAccessRequest>, Error>;
    async fn find_many_by_requester_organization_paginated(
        &self,
        requester_organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<OrganizationDataAccessRequest>, Error>;
    async fn find_many_by_target_organization_paginated(
        &self,
        target_organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<OrganizationDataAccessRequest>, Error>;
    async fn update(&self, id: &str, request: OrganizationDataAccessRequest) -> Result<(), Error>;
}

#[async_trait]
pub trait OrganizationDataAccessGrantRepository: Send + Sync {
    async fn create(&self, data: NewDataAccessGrant)
        -> Result<OrganizationDataAccessGrant, Error>;
    async fn find_by_id(&self, id: &str) -> Result<Option<OrganizationDataAccessGrant>, Error>;
    async fn find_many_by_target_organization_paginated(
        &self,
        target_organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<OrganizationDataAccessGrant>, Error>;
    async fn delete(&self, id: &str) -> Result<(), Error>;
}

#[async_trait]
pub trait UpdateOrganizationTypeRequestRepository: Send + Sync {
    async fn create(&self, data: NewOrgTypeRequest)
        -> Result<UpdateOrganizationTypeRequest, Error>;
    async fn find_by_id(&self, id: &str) -> Result<Option<UpdateOrganizationTypeRequest>, Error>;
    async fn find_many_paginated(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Page<UpdateOrganizationTypeRequest>, Error>;
    async fn find_many_by_organization_paginated(
        &self,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<UpdateOrganizationTypeRequest>, Error>;
    async fn update(&self, id: &str, request: UpdateOrganizationTypeRequest) -> Result<(), Error>;
}

#[async_trait]
pub trait VoluntaryPersonRepository: Send + Sync {
    async fn create(
        &self,
        data: NewVoluntaryPerson,
        organization_id: &str,
    ) -> Result<VoluntaryPerson, Error>;
    async fn find_by_id(&self, id: &str) -> Result<Option<VoluntaryPerson>, Error>;
    async fn count_by_email(&self, email: &str) -> Result<u64, Error>;
    async fn find_many_by_organization_paginated(
        &self,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<VoluntaryPerson>, Error>;
    async fn update(&self, id: &str, person: VoluntaryPerson) -> Result<(), Error>;
    async fn delete(&self, id: &str) -> Result<(), Error>;
}

#[async_trait]
pub trait ProductTypeRepository: Send + Sync {
    async fn create(&self, data: NewProductType, organization_id: &str)
        -> Result<ProductType, Error>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ProductType>, Error>;
    async fn find_many_by_organization_paginated(
        &self,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<ProductType>, Error>;
    async fn update(&self, id: &str, product_type: ProductType) -> Result<(), Error>;
    async fn delete(&self, id: &str) -> Result<(), Error>;
}
