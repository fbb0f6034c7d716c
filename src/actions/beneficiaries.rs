use crate::entities::{Beneficiary, User};
use crate::repository::{BeneficiaryRepository, NewBeneficiary, OrganizationRepository, Page};
use crate::{guards, Error};

/// Action to register a beneficiary under an organization.
///
/// Admin-only. The email must be unused platform-wide; a beneficiary is
/// registered once and moved between housings, never duplicated.
pub struct CreateBeneficiaryAction<B, O>
where
    B: BeneficiaryRepository,
    O: OrganizationRepository,
{
    beneficiary_repo: B,
    organization_repo: O,
}

impl<B, O> CreateBeneficiaryAction<B, O>
where
    B: BeneficiaryRepository,
    O: OrganizationRepository,
{
    pub fn new(beneficiary_repo: B, organization_repo: O) -> Self {
        Self {
            beneficiary_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_beneficiary", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        organization_id: &str,
        data: NewBeneficiary,
    ) -> Result<Beneficiary, Error> {
        let organization = self
            .organization_repo
            .find_by_id(organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        if self.beneficiary_repo.count_by_email(&data.email).await? > 0 {
            return Err(Error::BeneficiaryAlreadyExists);
        }

        let beneficiary = self.beneficiary_repo.create(data, &organization.id).await?;

        log::info!(
            target: "reliefline",
            "msg=\"beneficiary registered\", beneficiary_id={}, organization_id={}",
            beneficiary.id,
            organization.id
        );

        Ok(beneficiary)
    }
}

/// Beneficiaries of an organization, readable under a data-access grant.
pub struct ListBeneficiariesByOrganizationAction<B, O>
where
    B: BeneficiaryRepository,
    O: OrganizationRepository,
{
    beneficiary_repo: B,
    organization_repo: O,
}

impl<B, O> ListBeneficiariesByOrganizationAction<B, O>
where
    B: BeneficiaryRepository,
    O: OrganizationRepository,
{
    pub fn new(beneficiary_repo: B, organization_repo: O) -> Self {
        Self {
            beneficiary_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_beneficiaries_by_organization", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<Beneficiary>, Error> {
        let organization = self
            .organization_repo
            .find_by_id(organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::has_access_to_organization_data(actor, &organization)?;

        self.beneficiary_repo
            .find_many_by_organization_paginated(organization_id, offset, limit)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Organization;
    use crate::mocks::{MockBeneficiaryRepository, MockOrganizationRepository};

    fn new_beneficiary(email: &str) -> NewBeneficiary {
        NewBeneficiary {
            full_name: "Amira Haddad".to_owned(),
            email: email.to_owned(),
            birthdate: "1990-04-12".to_owned(),
            phones: vec![],
        }
    }

    struct Fixture {
        beneficiary_repo: MockBeneficiaryRepository,
        organization_repo: MockOrganizationRepository,
    }

    impl Fixture {
        fn new() -> Self {
            let fixture = Self {
                beneficiary_repo: MockBeneficiaryRepository::new(),
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

        fn create_action(
            &self,
        ) -> CreateBeneficiaryAction<MockBeneficiaryRepository, MockOrganizationRepository> {
            CreateBeneficiaryAction::new(
                self.beneficiary_repo.clone(),
                self.organization_repo.clone(),
            )
        }
    }

    #[tokio::test]
    async fn test_create_registers_beneficiary_without_placement() {
        let fixture = Fixture::new();
        let admin = User::mock_admin_of("u1", "o1");

        let beneficiary = fixture
            .create_action()
            .execute(&admin, "o1", new_beneficiary("amira@example.org"))
            .await
            .unwrap();

        assert_eq!(beneficiary.current_organization_id, "o1");
        assert_eq!(beneficiary.current_housing_id, None);
        assert_eq!(beneficiary.current_room_id, None);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let fixture = Fixture::new();
        let admin = User::mock_admin_of("u1", "o1");
        let action = fixture.create_action();

        action
            .execute(&admin, "o1", new_beneficiary("amira@example.org"))
            .await
            .unwrap();

        assert_eq!(
            action
                .execute(&admin, "o1", new_beneficiary("amira@example.org"))
                .await
                .unwrap_err(),
            Error::BeneficiaryAlreadyExists
        );
    }

    #[tokio::test]
    async fn test_create_requires_admin_of_target_organization() {
        let fixture = Fixture::new();
        let action = fixture.create_action();

        let member = User::mock_member_of("u2", "o1");
        assert_eq!(
            action
                .execute(&member, "o1", new_beneficiary("amira@example.org"))
                .await
                .unwrap_err(),
            Error::ForbiddenAction
        );

        let foreign_admin = User::mock_admin_of("u3", "o2");
        assert_eq!(
            action
                .execute(&foreign_admin, "o1", new_beneficiary("amira@example.org"))
                .await
                .unwrap_err(),
            Error::ForbiddenAction
        );
    }

    #[tokio::test]
    async fn test_list_respects_access_grant() {
        let fixture = Fixture::new();
        let admin = User::mock_admin_of("u1", "o1");
        fixture
            .create_action()
            .execute(&admin, "o1", new_beneficiary("amira@example.org"))
            .await
            .unwrap();

        let list = ListBeneficiariesByOrganizationAction::new(
            fixture.beneficiary_repo.clone(),
            fixture.organization_repo.clone(),
        );

        let member = User::mock_member_of("u2", "o1");
        assert_eq!(list.execute(&member, "o1", 0, 10).await.unwrap().total, 1);

        let outsider = User::mock_member_of("u3", "o2");
        assert_eq!(
            list.execute(&outsider, "o1", 0, 10).await.unwrap_err(),
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

        assert_eq!(list.execute(&outsider, "o1", 0, 10).await.unwrap().total, 1);
    }
}
