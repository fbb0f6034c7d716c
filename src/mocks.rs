//! In-memory repositories and services for tests.
//!
//! Every store is a `RwLock<HashMap>` keyed by id; ids are freshly minted
//! UUIDs. State is public so tests can seed records directly, the same way
//! they would fixture a database.

#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{
    Beneficiary, BeneficiaryAllocation, Housing, HousingRoom, JoinOrganizationInvite,
    JoinOrganizationRequest, Organization, OrganizationDataAccessGrant,
    OrganizationDataAccessRequest, OrganizationStatus, ProductType, RequestStatus,
    UpdateOrganizationTypeRequest, User, VoluntaryPerson,
};
use crate::repository::{
    BeneficiaryAllocationRepository, BeneficiaryRepository, HousingRepository,
    HousingRoomRepository, JoinOrganizationInviteRepository, JoinOrganizationRequestRepository,
    NewAllocation, NewBeneficiary, NewDataAccessGrant, NewDataAccessRequest, NewHousing,
    NewHousingRoom, NewJoinInvite, NewJoinRequest, NewOrgTypeRequest, NewOrganization,
    NewProductType, NewUser, NewVoluntaryPerson, OrganizationDataAccessGrantRepository,
    OrganizationDataAccessRequestRepository, OrganizationRepository, Page, ProductTypeRepository,
    UpdateOrganizationTypeRequestRepository, UserRepository, VoluntaryPersonRepository,
};
use crate::services::EmailSender;
use crate::Error;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn poisoned<T>(_: T) -> Error {
    Error::Internal("lock poisoned".into())
}

/// Stable creation-order pagination for the in-memory stores.
fn page_of<T>(
    mut items: Vec<T>,
    offset: u64,
    limit: u64,
    key: impl Fn(&T) -> (DateTime<Utc>, String),
) -> Page<T> {
    items.sort_by(|a, b| key(a).cmp(&key(b)));
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    Page { total, items }
}

#[derive(Default, Clone)]
pub struct MockUserRepository {
    pub users: Arc<RwLock<HashMap<String, User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, data: NewUser) -> Result<User, Error> {
        let now = Utc::now();
        let user = User {
            id: new_id(),
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phones: data.phones,
            platform_role: data.platform_role,
            organization_id: data.organization_id,
            status: data.status,
            created_at: now,
            updated_at: now,
        };

        let mut users = self.users.write().map_err(poisoned)?;
        users.insert(user.id.clone(), user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, Error> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.get(id).cloned())
    }

    async fn update(&self, id: &str, mut user: User) -> Result<(), Error> {
        let mut users = self.users.write().map_err(poisoned)?;
        if !users.contains_key(id) {
            return Err(Error::UserNotFound);
        }
        user.updated_at = Utc::now();
        users.insert(id.to_owned(), user);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockOrganizationRepository {
    pub organizations: Arc<RwLock<HashMap<String, Organization>>>,
}

impl MockOrganizationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrganizationRepository for MockOrganizationRepository {
    async fn create(&self, data: NewOrganization, owner_id: &str) -> Result<Organization, Error> {
        let now = Utc::now();
        let organization = Organization {
            id: new_id(),
            name: data.name,
            description: data.description,
            address: data.address,
            org_type: data.org_type,
            owner_id: owner_id.to_owned(),
            status: OrganizationStatus::Active,
            access_granted_ids: vec![],
            created_at: now,
            updated_at: now,
        };

        let mut organizations = self.organizations.write().map_err(poisoned)?;
        organizations.insert(organization.id.clone(), organization.clone());

        Ok(organization)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Organization>, Error> {
        let organizations = self.organizations.read().map_err(poisoned)?;
        Ok(organizations.get(id).cloned())
    }

    async fn find_many_paginated(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Page<Organization>, Error> {
        let organizations = self.organizations.read().map_err(poisoned)?;
        Ok(page_of(
            organizations.values().cloned().collect(),
            offset,
            limit,
            |o| (o.created_at, o.id.clone()),
        ))
    }

    async fn update(&self, id: &str, mut organization: Organization) -> Result<(), Error> {
        let mut organizations = self.organizations.write().map_err(poisoned)?;
        if !organizations.contains_key(id) {
            return Err(Error::OrganizationNotFound);
        }
        organization.updated_at = Utc::now();
        organizations.insert(id.to_owned(), organization);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let mut organizations = self.organizations.write().map_err(poisoned)?;
        organizations.remove(id);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockBeneficiaryRepository {
    pub beneficiaries: Arc<RwLock<HashMap<String, Beneficiary>>>,
}

impl MockBeneficiaryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BeneficiaryRepository for MockBeneficiaryRepository {
    async fn create(
        &self,
        data: NewBeneficiary,
        organization_id: &str,
    ) -> Result<Beneficiary, Error> {
        let now = Utc::now();
        let beneficiary = Beneficiary {
            id: new_id(),
            full_name: data.full_name,
            email: data.email,
            birthdate: data.birthdate,
            phones: data.phones,
            current_organization_id: organization_id.to_owned(),
            current_housing_id: None,
            current_room_id: None,
            created_at: now,
            updated_at: now,
        };

        let mut beneficiaries = self.beneficiaries.write().map_err(poisoned)?;
        beneficiaries.insert(beneficiary.id.clone(), beneficiary.clone());

        Ok(beneficiary)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Beneficiary>, Error> {
        let beneficiaries = self.beneficiaries.read().map_err(poisoned)?;
        Ok(beneficiaries.get(id).cloned())
    }

    async fn count_by_email(&self, email: &str) -> Result<u64, Error> {
        let beneficiaries = self.beneficiaries.read().map_err(poisoned)?;
        Ok(beneficiaries.values().filter(|b| b.email == email).count() as u64)
    }

    async fn find_many_by_organization_paginated(
        &self,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<Beneficiary>, Error> {
        let beneficiaries = self.beneficiaries.read().map_err(poisoned)?;
        Ok(page_of(
            beneficiaries
                .values()
                .filter(|b| b.current_organization_id == organization_id)
                .cloned()
                .collect(),
            offset,
            limit,
            |b| (b.created_at, b.id.clone()),
        ))
    }

    async fn update(&self, id: &str, mut beneficiary: Beneficiary) -> Result<(), Error> {
        let mut beneficiaries = self.beneficiaries.write().map_err(poisoned)?;
        if !beneficiaries.contains_key(id) {
            return Err(Error::BeneficiaryNotFound);
        }
        beneficiary.updated_at = Utc::now();
        beneficiaries.insert(id.to_owned(), beneficiary);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockBeneficiaryAllocationRepository {
    pub allocations: Arc<RwLock<HashMap<String, BeneficiaryAllocation>>>,
    /// When set, the next `create` fails. Used to exercise the compensating
    /// write in the reallocation action.
    pub fail_next_create: Arc<AtomicBool>,
}

impl MockBeneficiaryAllocationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BeneficiaryAllocationRepository for MockBeneficiaryAllocationRepository {
    async fn create(&self, data: NewAllocation) -> Result<BeneficiaryAllocation, Error> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(Error::Database("insert failed".into()));
        }

        let allocation = BeneficiaryAllocation {
            id: new_id(),
            beneficiary_id: data.beneficiary_id,
            old_housing_id: data.old_housing_id,
            old_room_id: data.old_room_id,
            housing_id: data.housing_id,
            room_id: data.room_id,
            allocation_type: data.allocation_type,
            auditor_id: data.auditor_id,
            created_at: Utc::now(),
        };

        let mut allocations = self.allocations.write().map_err(poisoned)?;
        allocations.insert(allocation.id.clone(), allocation.clone());

        Ok(allocation)
    }

    async fn find_many_by_beneficiary_paginated(
        &self,
        beneficiary_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<BeneficiaryAllocation>, Error> {
        let allocations = self.allocations.read().map_err(poisoned)?;
        Ok(page_of(
            allocations
                .values()
                .filter(|a| a.beneficiary_id == beneficiary_id)
                .cloned()
                .collect(),
            offset,
            limit,
            |a| (a.created_at, a.id.clone()),
        ))
    }
}

#[derive(Default, Clone)]
pub struct MockHousingRepository {
    pub housings: Arc<RwLock<HashMap<String, Housing>>>,
}

impl MockHousingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HousingRepository for MockHousingRepository {
    async fn create(&self, data: NewHousing, organization_id: &str) -> Result<Housing, Error> {
        let now = Utc::now();
        let housing = Housing {
            id: new_id(),
            organization_id: organization_id.to_owned(),
            name: data.name,
            total_vacancies: data.total_vacancies,
            occupied_vacancies: 0,
            address: data.address,
            created_at: now,
            updated_at: now,
        };

        let mut housings = self.housings.write().map_err(poisoned)?;
        housings.insert(housing.id.clone(), housing.clone());

        Ok(housing)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Housing>, Error> {
        let housings = self.housings.read().map_err(poisoned)?;
        Ok(housings.get(id).cloned())
    }

    async fn find_many_by_organization_paginated(
        &self,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<Housing>, Error> {
        let housings = self.housings.read().map_err(poisoned)?;
        Ok(page_of(
            housings
                .values()
                .filter(|h| h.organization_id == organization_id)
                .cloned()
                .collect(),
            offset,
            limit,
            |h| (h.created_at, h.id.clone()),
        ))
    }

    async fn update(&self, id: &str, mut housing: Housing) -> Result<(), Error> {
        let mut housings = self.housings.write().map_err(poisoned)?;
        if !housings.contains_key(id) {
            return Err(Error::HousingNotFound);
        }
        housing.updated_at = Utc::now();
        housings.insert(id.to_owned(), housing);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let mut housings = self.housings.write().map_err(poisoned)?;
        housings.remove(id);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockHousingRoomRepository {
    pub rooms: Arc<RwLock<HashMap<String, HousingRoom>>>,
}

impl MockHousingRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HousingRoomRepository for MockHousingRoomRepository {
    async fn create_many(
        &self,
        data: Vec<NewHousingRoom>,
        housing_id: &str,
    ) -> Result<Vec<HousingRoom>, Error> {
        let now = Utc::now();
        let mut rooms = self.rooms.write().map_err(poisoned)?;

        let created: Vec<HousingRoom> = data
            .into_iter()
            .map(|room| HousingRoom {
                id: new_id(),
                housing_id: housing_id.to_owned(),
                name: room.name,
                total_vacancies: room.total_vacancies,
                available_vacancies: room.total_vacancies,
                created_at: now,
                updated_at: now,
            })
            .collect();

        for room in &created {
            rooms.insert(room.id.clone(), room.clone());
        }

        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<HousingRoom>, Error> {
        let rooms = self.rooms.read().map_err(poisoned)?;
        Ok(rooms.get(id).cloned())
    }

    async fn find_many_by_housing_paginated(
        &self,
        housing_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<HousingRoom>, Error> {
        let rooms = self.rooms.read().map_err(poisoned)?;
        Ok(page_of(
            rooms
                .values()
                .filter(|r| r.housing_id == housing_id)
                .cloned()
                .collect(),
            offset,
            limit,
            |r| (r.created_at, r.id.clone()),
        ))
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let mut rooms = self.rooms.write().map_err(poisoned)?;
        rooms.remove(id);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockJoinOrganizationInviteRepository {
    pub invites: Arc<RwLock<HashMap<String, JoinOrganizationInvite>>>,
}

impl MockJoinOrganizationInviteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JoinOrganizationInviteRepository for MockJoinOrganizationInviteRepository {
    async fn create(&self, data: NewJoinInvite) -> Result<JoinOrganizationInvite, Error> {
        let invite = JoinOrganizationInvite {
            id: new_id(),
            user_id: data.user_id,
            organization_id: data.organization_id,
            creator_id: data.creator_id,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            expires_at: data.expires_at,
            accepted_at: None,
            rejected_at: None,
            reject_reason: None,
        };

        let mut invites = self.invites.write().map_err(poisoned)?;
        invites.insert(invite.id.clone(), invite.clone());

        Ok(invite)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<JoinOrganizationInvite>, Error> {
        let invites = self.invites.read().map_err(poisoned)?;
        Ok(invites.get(id).cloned())
    }

    async fn count_pending_by_user(&self, user_id: &str) -> Result<u64, Error> {
        let invites = self.invites.read().map_err(poisoned)?;
        Ok(invites
            .values()
            .filter(|i| i.user_id == user_id && i.status == RequestStatus::Pending)
            .count() as u64)
    }

    async fn find_many_by_organization_paginated(
        &self,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<JoinOrganizationInvite>, Error> {
        let invites = self.invites.read().map_err(poisoned)?;
        Ok(page_of(
            invites
                .values()
                .filter(|i| i.organization_id == organization_id)
                .cloned()
                .collect(),
            offset,
            limit,
            |i| (i.created_at, i.id.clone()),
        ))
    }

    async fn find_many_by_user_paginated(
        &self,
        user_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<JoinOrganizationInvite>, Error> {
        let invites = self.invites.read().map_err(poisoned)?;
        Ok(page_of(
            invites
                .values()
                .filter(|i| i.user_id == user_id)
                .cloned()
                .collect(),
            offset,
            limit,
            |i| (i.created_at, i.id.clone()),
        ))
    }

    async fn update(&self, id: &str, invite: JoinOrganizationInvite) -> Result<(), Error> {
        let mut invites = self.invites.write().map_err(poisoned)?;
        if !invites.contains_key(id) {
            return Err(Error::JoinInviteNotFound);
        }
        invites.insert(id.to_owned(), invite);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockJoinOrganizationRequestRepository {
    pub requests: Arc<RwLock<HashMap<String, JoinOrganizationRequest>>>,
}

impl MockJoinOrganizationRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JoinOrganizationRequestRepository for MockJoinOrganizationRequestRepository {
    async fn create(&self, data: NewJoinRequest) -> Result<JoinOrganizationRequest, Error> {
        let request = JoinOrganizationRequest {
            id: new_id(),
            user_id: data.user_id,
            organization_id: data.organization_id,
            auditor_id: None,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            accepted_at: None,
            rejected_at: None,
            reject_reason: None,
        };

        let mut requests = self.requests.write().map_err(poisoned)?;
        requests.insert(request.id.clone(), request.clone());

        Ok(request)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<JoinOrganizationRequest>, Error> {
        let requests = self.requests.read().map_err(poisoned)?;
        Ok(requests.get(id).cloned())
    }

    async fn find_many_by_organization_paginated(
        &self,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<JoinOrganizationRequest>, Error> {
        let requests = self.requests.read().map_err(poisoned)?;
        Ok(page_of(
            requests
                .values()
                .filter(|r| r.organization_id == organization_id)
                .cloned()
                .collect(),
            offset,
            limit,
            |r| (r.created_at, r.id.clone()),
        ))
    }

    async fn find_many_by_user_paginated(
        &self,
        user_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<JoinOrganizationRequest>, Error> {
        let requests = self.requests.read().map_err(poisoned)?;
        Ok(page_of(
            requests
                .values()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect(),
            offset,
            limit,
            |r| (r.created_at, r.id.clone()),
        ))
    }

    async fn update(&self, id: &str, request: JoinOrganizationRequest) -> Result<(), Error> {
        let mut requests = self.requests.write().map_err(poisoned)?;
        if !requests.contains_key(id) {
            return Err(Error::JoinRequestNotFound);
        }
        requests.insert(id.to_owned(), request);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockOrganizationDataAccessRequestRepository {
    pub requests: Arc<RwLock<HashMap<String, OrganizationDataAccessRequest>>>,
}

impl MockOrganizationDataAccessRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrganizationDataAccessRequestRepository for MockOrganizationDataAccessRequestRepository {
    async fn create(
        &self,
        data: NewDataAccessRequest,
    ) -> Result<OrganizationDataAccessRequest, Error> {
        let request = OrganizationDataAccessRequest {
            id: new_id(),
            requester_id: data.requester_id,
            requester_organization_id: data.requester_organization_id,
            target_organization_id: data.target_organization_id,
            auditor_id: None,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            accepted_at: None,
            rejected_at: None,
            reject_reason: None,
        };

        let mut requests = self.requests.write().map_err(poisoned)?;
        requests.insert(request.id.clone(), request.clone());

        Ok(request)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<OrganizationDataAccessRequest>, Error> {
        let requests = self.requests.read().map_err(poisoned)?;
        Ok(requests.get(id).cloned())
    }

    async fn find_many_by_requester_organization_paginated(
        &self,
        requester_organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<OrganizationDataAccessRequest>, Error> {
        let requests = self.requests.read().map_err(poisoned)?;
        Ok(page_of(
            requests
                .values()
                .filter(|r| r.requester_organization_id == requester_organization_id)
                .cloned()
                .collect(),
            offset,
            limit,
            |r| (r.created_at, r.id.clone()),
        ))
    }

    async fn find_many_by_target_organization_paginated(
        &self,
        target_organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<OrganizationDataAccessRequest>, Error> {
        let requests = self.requests.read().map_err(poisoned)?;
        Ok(page_of(
            requests
                .values()
                .filter(|r| r.target_organization_id == target_organization_id)
                .cloned()
                .collect(),
            offset,
            limit,
            |r| (r.created_at, r.id.clone()),
        ))
    }

    async fn update(&self, id: &str, request: OrganizationDataAccessRequest) -> Result<(), Error> {
        let mut requests = self.requests.write().map_err(poisoned)?;
        if !requests.contains_key(id) {
            return Err(Error::DataAccessRequestNotFound);
        }
        requests.insert(id.to_owned(), request);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockOrganizationDataAccessGrantRepository {
    pub grants: Arc<RwLock<HashMap<String, OrganizationDataAccessGrant>>>,
}

impl MockOrganizationDataAccessGrantRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrganizationDataAccessGrantRepository for MockOrganizationDataAccessGrantRepository {
    async fn create(&self, data: NewDataAccessGrant) -> Result<OrganizationDataAccessGrant, Error> {
        let grant = OrganizationDataAccessGrant {
            id: new_id(),
            organization_id: data.organization_id,
            target_organization_id: data.target_organization_id,
            auditor_id: data.auditor_id,
            created_at: Utc::now(),
        };

        let mut grants = self.grants.write().map_err(poisoned)?;
        grants.insert(grant.id.clone(), grant.clone());

        Ok(grant)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<OrganizationDataAccessGrant>, Error> {
        let grants = self.grants.read().map_err(poisoned)?;
        Ok(grants.get(id).cloned())
    }

    async fn find_many_by_target_organization_paginated(
        &self,
        target_organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<OrganizationDataAccessGrant>, Error> {
        let grants = self.grants.read().map_err(poisoned)?;
        Ok(page_of(
            grants
                .values()
                .filter(|g| g.target_organization_id == target_organization_id)
                .cloned()
                .collect(),
            offset,
            limit,
            |g| (g.created_at, g.id.clone()),
        ))
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let mut grants = self.grants.write().map_err(poisoned)?;
        grants.remove(id);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockUpdateOrganizationTypeRequestRepository {
    pub requests: Arc<RwLock<HashMap<String, UpdateOrganizationTypeRequest>>>,
}

impl MockUpdateOrganizationTypeRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UpdateOrganizationTypeRequestRepository for MockUpdateOrganizationTypeRequestRepository {
    async fn create(
        &self,
        data: NewOrgTypeRequest,
    ) -> Result<UpdateOrganizationTypeRequest, Error> {
        let request = UpdateOrganizationTypeRequest {
            id: new_id(),
            organization_id: data.organization_id,
            creator_id: data.creator_id,
            auditor_id: None,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            accepted_at: None,
            rejected_at: None,
            reject_reason: None,
        };

        let mut requests = self.requests.write().map_err(poisoned)?;
        requests.insert(request.id.clone(), request.clone());

        Ok(request)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UpdateOrganizationTypeRequest>, Error> {
        let requests = self.requests.read().map_err(poisoned)?;
        Ok(requests.get(id).cloned())
    }

    async fn find_many_paginated(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Page<UpdateOrganizationTypeRequest>, Error> {
        let requests = self.requests.read().map_err(poisoned)?;
        Ok(page_of(
            requests.values().cloned().collect(),
            offset,
            limit,
            |r| (r.created_at, r.id.clone()),
        ))
    }

    async fn find_many_by_organization_paginated(
        &self,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<UpdateOrganizationTypeRequest>, Error> {
        let requests = self.requests.read().map_err(poisoned)?;
        Ok(page_of(
            requests
                .values()
                .filter(|r| r.organization_id == organization_id)
                .cloned()
                .collect(),
            offset,
            limit,
            |r| (r.created_at, r.id.clone()),
        ))
    }

    async fn update(&self, id: &str, request: UpdateOrganizationTypeRequest) -> Result<(), Error> {
        let mut requests = self.requests.write().map_err(poisoned)?;
        if !requests.contains_key(id) {
            return Err(Error::OrgTypeRequestNotFound);
        }
        requests.insert(id.to_owned(), request);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockVoluntaryPersonRepository {
    pub people: Arc<RwLock<HashMap<String, VoluntaryPerson>>>,
}

impl MockVoluntaryPersonRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoluntaryPersonRepository for MockVoluntaryPersonRepository {
    async fn create(
        &self,
        data: NewVoluntaryPerson,
        organization_id: &str,
    ) -> Result<VoluntaryPerson, Error> {
        let now = Utc::now();
        let person = VoluntaryPerson {
            id: new_id(),
            organization_id: organization_id.to_owned(),
            full_name: data.full_name,
            email: data.email,
            phones: data.phones,
            created_at: now,
            updated_at: now,
        };

        let mut people = self.people.write().map_err(poisoned)?;
        people.insert(person.id.clone(), person.clone());

        Ok(person)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<VoluntaryPerson>, Error> {
        let people = self.people.read().map_err(poisoned)?;
        Ok(people.get(id).cloned())
    }

    async fn count_by_email(&self, email: &str) -> Result<u64, Error> {
        let people = self.people.read().map_err(poisoned)?;
        Ok(people.values().filter(|p| p.email == email).count() as u64)
    }

    async fn find_many_by_organization_paginated(
        &self,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<VoluntaryPerson>, Error> {
        let people = self.people.read().map_err(poisoned)?;
        Ok(page_of(
            people
                .values()
                .filter(|p| p.organization_id == organization_id)
                .cloned()
                .collect(),
            offset,
            limit,
            |p| (p.created_at, p.id.clone()),
        ))
    }

    async fn update(&self, id: &str, mut person: VoluntaryPerson) -> Result<(), Error> {
        let mut people = self.people.write().map_err(poisoned)?;
        if !people.contains_key(id) {
            return Err(Error::VoluntaryPersonNotFound);
        }
        person.updated_at = Utc::now();
        people.insert(id.to_owned(), person);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let mut people = self.people.write().map_err(poisoned)?;
        people.remove(id);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockProductTypeRepository {
    pub product_types: Arc<RwLock<HashMap<String, ProductType>>>,
}

impl MockProductTypeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductTypeRepository for MockProductTypeRepository {
    async fn create(
        &self,
        data: NewProductType,
        organization_id: &str,
    ) -> Result<ProductType, Error> {
        let now = Utc::now();
        let product_type = ProductType {
            id: new_id(),
            organization_id: organization_id.to_owned(),
            name: data.name,
            description: data.description,
            category: data.category,
            total_in_storage: 0,
            created_at: now,
            updated_at: now,
        };

        let mut product_types = self.product_types.write().map_err(poisoned)?;
        product_types.insert(product_type.id.clone(), product_type.clone());

        Ok(product_type)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ProductType>, Error> {
        let product_types = self.product_types.read().map_err(poisoned)?;
        Ok(product_types.get(id).cloned())
    }

    async fn find_many_by_organization_paginated(
        &self,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<ProductType>, Error> {
        let product_types = self.product_types.read().map_err(poisoned)?;
        Ok(page_of(
            product_types
                .values()
                .filter(|p| p.organization_id == organization_id)
                .cloned()
                .collect(),
            offset,
            limit,
            |p| (p.created_at, p.id.clone()),
        ))
    }

    async fn update(&self, id: &str, mut product_type: ProductType) -> Result<(), Error> {
        let mut product_types = self.product_types.write().map_err(poisoned)?;
        if !product_types.contains_key(id) {
            return Err(Error::ProductTypeNotFound);
        }
        product_type.updated_at = Utc::now();
        product_types.insert(id.to_owned(), product_type);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let mut product_types = self.product_types.write().map_err(poisoned)?;
        product_types.remove(id);
        Ok(())
    }
}

/// Records every invite email instead of sending it. Flip `fail_next` to
/// exercise the best-effort delivery path.
#[derive(Default, Clone)]
pub struct MockEmailSender {
    pub sent: Arc<Mutex<Vec<String>>>,
    pub fail_next: Arc<AtomicBool>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send_join_invite(
        &self,
        invite: &JoinOrganizationInvite,
        _organization: &Organization,
    ) -> Result<(), Error> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(Error::Internal("email delivery failed".into()));
        }

        let mut sent = self.sent.lock().map_err(poisoned)?;
        sent.push(invite.id.clone());
        Ok(())
    }
}
