use crate::entities::{Housing, HousingRoom, User};
use crate::repository::{
    HousingRepository, HousingRoomRepository, NewHousing, NewHousingRoom, OrganizationRepository,
    Page,
};
use crate::{guards, Error};

/// Action to register a housing under the actor's own organization.
pub struct CreateHousingAction<H, O>
where
    H: HousingRepository,
    O: OrganizationRepository,
{
    housing_repo: H,
    organization_repo: O,
}

impl<H, O> CreateHousingAction<H, O>
where
    H: HousingRepository,
    O: OrganizationRepository,
{
    pub fn new(housing_repo: H, organization_repo: O) -> Self {
        Self {
            housing_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_housing", skip_all, err)
    )]
    pub async fn execute(&self, actor: &User, data: NewHousing) -> Result<Housing, Error> {
        let organization_id = actor
            .organization_id
            .as_deref()
            .ok_or(Error::ForbiddenAction)?;

        let organization = self
            .organization_repo
            .find_by_id(organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        let housing = self.housing_repo.create(data, &organization.id).await?;

        log::info!(
            target: "reliefline",
            "msg=\"housing created\", housing_id={}, organization_id={}",
            housing.id,
            organization.id
        );

        Ok(housing)
    }
}

/// Housings of an organization, readable by anyone the organization has
/// granted data access to.
pub struct ListHousingsByOrganizationAction<H, O>
where
    H: HousingRepository,
    O: OrganizationRepository,
{
    housing_repo: H,
    organization_repo: O,
}

impl<H, O> ListHousingsByOrganizationAction<H, O>
where
    H: HousingRepository,
    O: OrganizationRepository,
{
    pub fn new(housing_repo: H, organization_repo: O) -> Self {
        Self {
            housing_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_housings_by_organization", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<Housing>, Error> {
        let organization = self
            .organization_repo
            .find_by_id(organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::has_access_to_organization_data(actor, &organization)?;

        self.housing_repo
            .find_many_by_organization_paginated(organization_id, offset, limit)
            .await
    }
}

/// Action to carve a housing into rooms, in one batch.
pub struct CreateHousingRoomsAction<R, H, O>
where
    R: HousingRoomRepository,
    H: HousingRepository,
    O: OrganizationRepository,
{
    room_repo: R,
    housing_repo: H,
    organization_repo: O,
}

impl<R, H, O> CreateHousingRoomsAction<R, H, O>
where
    R: HousingRoomRepository,
    H: HousingRepository,
    O: OrganizationRepository,
{
    pub fn new(room_repo: R, housing_repo: H, organization_repo: O) -> Self {
        Self {
            room_repo,
            housing_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_housing_rooms", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        housing_id: &str,
        data: Vec<NewHousingRoom>,
    ) -> Result<Vec<HousingRoom>, Error> {
        let housing = self
            .housing_repo
            .find_by_id(housing_id)
            .await?
            .ok_or(Error::HousingNotFound)?;

        let organization = self
            .organization_repo
            .find_by_id(&housing.organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        let rooms = self.room_repo.create_many(data, &housing.id).await?;

        log::info!(
            target: "reliefline",
            "msg=\"housing rooms created\", housing_id={}, count={}",
            housing.id,
            rooms.len()
        );

        Ok(rooms)
    }
}

/// Rooms of a housing, guarded the same way as the housing list.
pub struct ListHousingRoomsAction<R, H, O>
where
    R: HousingRoomRepository,
    H: HousingRepository,
    O: OrganizationRepository,
{
    room_repo: R,
    housing_repo: H,
    organization_repo: O,
}

impl<R, H, O> ListHousingRoomsAction<R, H, O>
where
    R: HousingRoomRepository,
    H: HousingRepository,
    O: OrganizationRepository,
{
    pub fn new(room_repo: R, housing_repo: H, organization_repo: O) -> Self {
        Self {
            room_repo,
            housing_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_housing_rooms", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        housing_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<HousingRoom>, Error> {
        let housing = self
            .housing_repo
            .find_by_id(housing_id)
            .await?
            .ok_or(Error::HousingNotFound)?;

        let organization = self
            .organization_repo
            .find_by_id(&housing.organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::has_access_to_organization_data(actor, &organization)?;

        self.room_repo
            .find_many_by_housing_paginated(housing_id, offset, limit)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Address, Organization};
    use crate::mocks::{
        MockHousingRepository, MockHousingRoomRepository, MockOrganizationRepository,
    };

    struct Fixture {
        housing_repo: MockHousingRepository,
        room_repo: MockHousingRoomRepository,
        organization_repo: MockOrganizationRepository,
    }

    impl Fixture {
        fn new() -> Self {
            let fixture = Self {
                housing_repo: MockHousingRepository::new(),
                room_repo: MockHousingRoomRepository::new(),
                organization_repo: MockOrganizationRepository::new(),
            };

            fixture
                .organization_repo
                .organizations
                .write()
                .unwrap()
                .insert("o1".to_owned(), Organization::mock("o1", "owner"));

            fixture
        }

        async fn create_housing(&self) -> Housing {
            let admin = User::mock_admin_of("u1", "o1");
            CreateHousingAction::new(self.housing_repo.clone(), self.organization_repo.clone())
                .execute(
                    &admin,
                    NewHousing {
                        name: "North Shelter".to_owned(),
                        total_vacancies: 40,
                        address: Address::default(),
                    },
                )
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn test_create_housing_under_own_organization() {
        let fixture = Fixture::new();
        let housing = fixture.create_housing().await;

        assert_eq!(housing.organization_id, "o1");
        assert_eq!(housing.occupied_vacancies, 0);
    }

    #[tokio::test]
    async fn test_create_housing_requires_admin() {
        let fixture = Fixture::new();
        let action =
            CreateHousingAction::new(fixture.housing_repo.clone(), fixture.organization_repo.clone());
        let data = NewHousing {
            name: "North Shelter".to_owned(),
            total_vacancies: 40,
            address: Address::default(),
        };

        let member = User::mock_member_of("u2", "o1");
        assert_eq!(
            action.execute(&member, data.clone()).await.unwrap_err(),
            Error::ForbiddenAction
        );

        let orgless = User::mock("u3");
        assert_eq!(
            action.execute(&orgless, data).await.unwrap_err(),
            Error::ForbiddenAction
        );
    }

    #[tokio::test]
    async fn test_create_rooms_in_batch() {
        let fixture = Fixture::new();
        let housing = fixture.create_housing().await;

        let admin = User::mock_admin_of("u1", "o1");
        let rooms = CreateHousingRoomsAction::new(
            fixture.room_repo.clone(),
            fixture.housing_repo.clone(),
            fixture.organization_repo.clone(),
        )
        .execute(
            &admin,
            &housing.id,
            vec![
                NewHousingRoom {
                    name: "A-1".to_owned(),
                    total_vacancies: 4,
                },
                NewHousingRoom {
                    name: "A-2".to_owned(),
                    total_vacancies: 6,
                },
            ],
        )
        .await
        .unwrap();

        assert_eq!(rooms.len(), 2);
        assert!(rooms.iter().all(|r| r.housing_id == housing.id));
        assert_eq!(rooms[0].available_vacancies, rooms[0].total_vacancies);
    }

    #[tokio::test]
    async fn test_create_rooms_requires_owning_org_admin() {
        let fixture = Fixture::new();
        let housing = fixture.create_housing().await;

        let foreign_admin = User::mock_admin_of("u2", "o2");
        let result = CreateHousingRoomsAction::new(
            fixture.room_repo.clone(),
            fixture.housing_repo.clone(),
            fixture.organization_repo.clone(),
        )
        .execute(
            &foreign_admin,
            &housing.id,
            vec![NewHousingRoom {
                name: "A-1".to_owned(),
                total_vacancies: 4,
            }],
        )
        .await;

        assert_eq!(result.unwrap_err(), Error::ForbiddenAction);
    }

    #[tokio::test]
    async fn test_list_housings_respects_access_grant() {
        let fixture = Fixture::new();
        fixture.create_housing().await;

        let action = ListHousingsByOrganizationAction::new(
            fixture.housing_repo.clone(),
            fixture.organization_repo.clone(),
        );

        let member = User::mock_member_of("u2", "o1");
        assert_eq!(action.execute(&member, "o1", 0, 10).await.unwrap().total, 1);

        let outsider = User::mock_member_of("u3", "o2");
        assert_eq!(
            action.execute(&outsider, "o1", 0, 10).await.unwrap_err(),
            Error::ForbiddenAction
        );

        fixture
            .organization_repo
            .organizations
            .write()
            .unwrap()
            .get_mut("o1")
            .unwrap()
            .access_granted_ids
            .push("o2".to_owned());

        assert_eq!(action.execute(&outsider, "o1", 0, 10).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_list_rooms_by_housing() {
        let fixture = Fixture::new();
        let housing = fixture.create_housing().await;

        let admin = User::mock_admin_of("u1", "o1");
        CreateHousingRoomsAction::new(
            fixture.room_repo.clone(),
            fixture.housing_repo.clone(),
            fixture.organization_repo.clone(),
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

        let list = ListHousingRoomsAction::new(
            fixture.room_repo.clone(),
            fixture.housing_repo.clone(),
            fixture.organization_repo.clone(),
        );

        let member = User::mock_member_of("u2", "o1");
        let page = list.execute(&member, &housing.id, 0, 10).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "A-1");

        let outsider = User::mock_member_of("u3", "o2");
        assert_eq!(
            list.execute(&outsider, &housing.id, 0, 10).await.unwrap_err(),
            Error::ForbiddenAction
        );
    }
}
