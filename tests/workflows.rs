#![cfg(feature = "mocks")]

//! Full journey through the platform workflows, against the in-memory
//! repositories: found an organization, grow the team, register a
//! beneficiary, shelter them, and get promoted to coordinator.

use reliefline::actions::{
    AcceptDataAccessRequestAction, AcceptJoinInviteAction, AcceptOrgTypeRequestAction,
    CreateBeneficiaryAction, CreateDataAccessRequestAction, CreateHousingAction,
    CreateHousingRoomsAction, CreateJoinInviteAction, CreateOrganizationAction,
    CreateOrgTypeRequestAction, CreateReallocationAction, InviteConfig,
    ListAllocationsByBeneficiaryAction, ListBeneficiariesByOrganizationAction, ReallocationInput,
    RevokeDataAccessGrantAction,
};
use reliefline::entities::{
    Address, AllocationType, OrganizationType, PlatformRole, User,
};
use reliefline::mocks::{
    MockBeneficiaryAllocationRepository, MockBeneficiaryRepository, MockEmailSender,
    MockHousingRepository, MockHousingRoomRepository, MockJoinOrganizationInviteRepository,
    MockOrganizationDataAccessGrantRepository, MockOrganizationDataAccessRequestRepository,
    MockOrganizationRepository, MockUpdateOrganizationTypeRequestRepository, MockUserRepository,
};
use reliefline::repository::{
    NewBeneficiary, NewHousing, NewHousingRoom, NewOrganization,
};

#[tokio::test]
async fn test_full_organization_lifecycle() {
    let user_repo = MockUserRepository::new();
    let organization_repo = MockOrganizationRepository::new();
    let invite_repo = MockJoinOrganizationInviteRepository::new();
    let beneficiary_repo = MockBeneficiaryRepository::new();
    let allocation_repo = MockBeneficiaryAllocationRepository::new();
    let housing_repo = MockHousingRepository::new();
    let room_repo = MockHousingRoomRepository::new();
    let org_type_request_repo = MockUpdateOrganizationTypeRequestRepository::new();
    let email_sender = MockEmailSender::new();

    // a fresh user founds an organization and becomes its admin
    let founder = User::mock("founder");
    user_repo
        .users
        .write()
        .unwrap()
        .insert(founder.id.clone(), founder.clone());

    let colleague = User::mock("colleague");
    user_repo
        .users
        .write()
        .unwrap()
        .insert(colleague.id.clone(), colleague.clone());

    let organization = CreateOrganizationAction::new(organization_repo.clone(), user_repo.clone())
        .execute(
            &founder,
            NewOrganization {
                name: "Shelter Aid".to_owned(),
                description: "Emergency housing for displaced families".to_owned(),
                address: Address::default(),
                org_type: OrganizationType::Manager,
            },
        )
        .await
        .unwrap();

    let admin = user_repo
        .users
        .read()
        .unwrap()
        .get("founder")
        .cloned()
        .unwrap();
    assert_eq!(admin.platform_role, PlatformRole::OrgAdmin);

    // the admin invites a colleague, who accepts and joins as member
    let invite = CreateJoinInviteAction::new(
        invite_repo.clone(),
        organization_repo.clone(),
        user_repo.clone(),
        email_sender.clone(),
        InviteConfig::default(),
    )
    .execute(&admin, &organization.id, "colleague")
    .await
    .unwrap();

    assert_eq!(email_sender.sent.lock().unwrap().len(), 1);

    AcceptJoinInviteAction::new(invite_repo.clone(), user_repo.clone())
        .execute(&colleague, &invite.id)
        .await
        .unwrap();

    let member = user_repo
        .users
        .read()
        .unwrap()
        .get("colleague")
        .cloned()
        .unwrap();
    assert_eq!(member.organization_id, Some(organization.id.clone()));
    assert_eq!(member.platform_role, PlatformRole::OrgMember);

    // register a beneficiary and build out shelter capacity
    let beneficiary = CreateBeneficiaryAction::new(
        beneficiary_repo.clone(),
        organization_repo.clone(),
    )
    .execute(
        &admin,
        &organization.id,
        NewBeneficiary {
            full_name: "Amira Haddad".to_owned(),
            email: "amira@example.org".to_owned(),
            birthdate: "1990-04-12".to_owned(),
            phones: vec![],
        },
    )
    .await
    .unwrap();

    let housing = CreateHousingAction::new(housing_repo.clone(), organization_repo.clone())
        .execute(
            &admin,
            NewHousing {
                name: "North Shelter".to_owned(),
                total_vacancies: 40,
                address: Address::default(),
            },
        )
        .await
        .unwrap();

    let rooms = CreateHousingRoomsAction::new(
        room_repo.clone(),
        housing_repo.clone(),
        organization_repo.clone(),
    )
    .execute(
        &admin,
        &housing.id,
        vec![NewHousingRoom {
            name: "A-1".to_owned(),
            total_vacancies: 4,
        }],
    )
    .await
    .unwrap();

    // place the beneficiary and verify the audit trail
    let allocation = CreateReallocationAction::new(
        allocation_repo.clone(),
        beneficiary_repo.clone(),
        organization_repo.clone(),
        housing_repo.clone(),
        room_repo.clone(),
    )
    .execute(
        &admin,
        &beneficiary.id,
        ReallocationInput {
            housing_id: housing.id.clone(),
            room_id: Some(rooms[0].id.clone()),
        },
    )
    .await
    .unwrap();

    assert_eq!(allocation.old_housing_id, None);
    assert_eq!(allocation.housing_id, housing.id);
    assert_eq!(allocation.allocation_type, AllocationType::Reallocation);
    assert_eq!(allocation.auditor_id, admin.id);

    let placed = beneficiary_repo
        .beneficiaries
        .read()
        .unwrap()
        .get(&beneficiary.id)
        .cloned()
        .unwrap();
    assert_eq!(placed.current_housing_id, Some(housing.id.clone()));
    assert_eq!(placed.current_room_id, Some(rooms[0].id.clone()));

    let history = ListAllocationsByBeneficiaryAction::new(
        allocation_repo.clone(),
        beneficiary_repo.clone(),
        organization_repo.clone(),
    )
    .execute(&admin, &beneficiary.id, 0, 10)
    .await
    .unwrap();
    assert_eq!(history.total, 1);

    // the admin asks for coordinator status, a superuser approves
    let request = CreateOrgTypeRequestAction::new(
        org_type_request_repo.clone(),
        organization_repo.clone(),
    )
    .execute(&admin)
    .await
    .unwrap();

    let superuser = User::mock_superuser("su");
    AcceptOrgTypeRequestAction::new(org_type_request_repo.clone(), organization_repo.clone())
        .execute(&superuser, &request.id)
        .await
        .unwrap();

    let promoted = organization_repo
        .organizations
        .read()
        .unwrap()
        .get(&organization.id)
        .cloned()
        .unwrap();
    assert_eq!(promoted.org_type, OrganizationType::Coordinator);
}

#[tokio::test]
async fn test_cross_organization_data_access_grant_lifecycle() {
    let organization_repo = MockOrganizationRepository::new();
    let beneficiary_repo = MockBeneficiaryRepository::new();
    let request_repo = MockOrganizationDataAccessRequestRepository::new();
    let grant_repo = MockOrganizationDataAccessGrantRepository::new();

    let mut organizations = organization_repo.organizations.write().unwrap();
    organizations.insert(
        "shelter".to_owned(),
        reliefline::entities::Organization::mock("shelter", "owner-a"),
    );
    organizations.insert(
        "medical".to_owned(),
        reliefline::entities::Organization::mock("medical", "owner-b"),
    );
    drop(organizations);

    let shelter_admin = User::mock_admin_of("sa", "shelter");
    let medical_admin = User::mock_admin_of("ma", "medical");

    CreateBeneficiaryAction::new(beneficiary_repo.clone(), organization_repo.clone())
        .execute(
            &shelter_admin,
            "shelter",
            NewBeneficiary {
                full_name: "Amira Haddad".to_owned(),
                email: "amira@example.org".to_owned(),
                birthdate: "1990-04-12".to_owned(),
                phones: vec![],
            },
        )
        .await
        .unwrap();

    let list_beneficiaries = ListBeneficiariesByOrganizationAction::new(
        beneficiary_repo.clone(),
        organization_repo.clone(),
    );

    // no grant yet: the medical organization is shut out
    assert!(list_beneficiaries
        .execute(&medical_admin, "shelter", 0, 10)
        .await
        .unwrap_err()
        .is_forbidden());

    // medical asks, shelter approves
    let request = CreateDataAccessRequestAction::new(
        request_repo.clone(),
        organization_repo.clone(),
    )
    .execute(&medical_admin, "shelter")
    .await
    .unwrap();

    AcceptDataAccessRequestAction::new(
        request_repo.clone(),
        grant_repo.clone(),
        organization_repo.clone(),
    )
    .execute(&shelter_admin, &request.id)
    .await
    .unwrap();

    let page = list_beneficiaries
        .execute(&medical_admin, "shelter", 0, 10)
        .await
        .unwrap();
    assert_eq!(page.total, 1);

    // shelter revokes; medical is shut out again
    let grant_id = grant_repo.grants.read().unwrap().keys().next().cloned().unwrap();
    RevokeDataAccessGrantAction::new(grant_repo.clone(), organization_repo.clone())
        .execute(&shelter_admin, &grant_id)
        .await
        .unwrap();

    assert!(list_beneficiaries
        .execute(&medical_admin, "shelter", 0, 10)
        .await
        .unwrap_err()
        .is_forbidden());
}
