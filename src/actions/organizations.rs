use crate::entities::{Organization, OrganizationStatus, PlatformRole, User};
use crate::repository::{NewOrganization, OrganizationRepository, Page, UserRepository};
use crate::{guards, Error};

/// Action to create an organization and seat its first admin.
///
/// This action:
/// 1. Verifies the actor may create an organization (no current membership)
/// 2. Creates the organization owned by the actor
/// 3. Promotes the actor to `OrgAdmin` of the new organization
///
/// The promotion is a second write; if it fails the freshly created
/// organization is deleted again so no organization is left without an admin.
pub struct CreateOrganizationAction<O, U>
where
    O: OrganizationRepository,
    U: UserRepository,
{
    organization_repo: O,
    user_repo: U,
}

impl<O, U> CreateOrganizationAction<O, U>
where
    O: OrganizationRepository,
    U: UserRepository,
{
    pub fn new(organization_repo: O, user_repo: U) -> Self {
        Self {
            organization_repo,
            user_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_organization", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        data: NewOrganization,
    ) -> Result<Organization, Error> {
        guards::authorize_create_organization(actor)?;

        let organization = self.organization_repo.create(data, &actor.id).await?;

        let mut promoted = actor.clone();
        promoted.organization_id = Some(organization.id.clone());
        promoted.platform_role = PlatformRole::OrgAdmin;

        if let Err(err) = self.user_repo.update(&actor.id, promoted).await {
            // undo the first write so the organization is not orphaned
            if let Err(rollback_err) = self.organization_repo.delete(&organization.id).await {
                log::error!(
                    target: "reliefline",
                    "msg=\"failed to roll back organization after promotion failure\", organization_id={}, error=\"{rollback_err}\"",
                    organization.id
                );
            }
            return Err(err);
        }

        log::info!(
            target: "reliefline",
            "msg=\"organization created\", organization_id={}, owner_id={}",
            organization.id,
            organization.owner_id
        );

        Ok(organization)
    }
}

pub struct GetOrganizationAction<O: OrganizationRepository> {
    organization_repo: O,
}

impl<O: OrganizationRepository> GetOrganizationAction<O> {
    pub fn new(organization_repo: O) -> Self {
        Self { organization_repo }
    }

    /// Organization profiles are a public directory; no guard applies.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "get_organization", skip_all, err)
    )]
    pub async fn execute(&self, id: &str) -> Result<Organization, Error> {
        self.organization_repo
            .find_by_id(id)
            .await?
            .ok_or(Error::OrganizationNotFound)
    }
}

pub struct ListOrganizationsAction<O: OrganizationRepository> {
    organization_repo: O,
}

impl<O: OrganizationRepository> ListOrganizationsAction<O> {
    pub fn new(organization_repo: O) -> Self {
        Self { organization_repo }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_organizations", skip_all, err)
    )]
    pub async fn execute(&self, offset: u64, limit: u64) -> Result<Page<Organization>, Error> {
        self.organization_repo.find_many_paginated(offset, limit).await
    }
}

/// Action to update an organization's profile, admin-only.
pub struct UpdateOrganizationAction<O: OrganizationRepository> {
    organization_repo: O,
}

impl<O: OrganizationRepository> UpdateOrganizationAction<O> {
    pub fn new(organization_repo: O) -> Self {
        Self { organization_repo }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "update_organization", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        id: &str,
        data: NewOrganization,
    ) -> Result<(), Error> {
        let organization = self
            .organization_repo
            .find_by_id(id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        let updated = Organization {
            name: data.name,
            description: data.description,
            address: data.address,
            org_type: data.org_type,
            ..organization
        };

        self.organization_repo.update(id, updated).await
    }
}

/// Action to reactivate a deactivated organization, superuser-only.
pub struct ReactivateOrganizationAction<O: OrganizationRepository> {
    organization_repo: O,
}

impl<O: OrganizationRepository> ReactivateOrganizationAction<O> {
    pub fn new(organization_repo: O) -> Self {
        Self { organization_repo }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "reactivate_organization", skip_all, err)
    )]
    pub async fn execute(&self, actor: &User, id: &str) -> Result<(), Error> {
        let mut organization = self
            .organization_repo
            .find_by_id(id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_super_user(actor)?;

        organization.status = OrganizationStatus::Active;

        self.organization_repo.update(id, organization).await?;

        log::info!(
            target: "reliefline",
            "msg=\"organization reactivated\", organization_id={id}, auditor_id={}",
            actor.id
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Address, OrganizationType};
    use crate::mocks::{MockOrganizationRepository, MockUserRepository};

    fn new_organization() -> NewOrganization {
        NewOrganization {
            name: "Shelter Aid".to_owned(),
            description: "Emergency housing".to_owned(),
            address: Address::default(),
            org_type: OrganizationType::Manager,
        }
    }

    #[tokio::test]
    async fn test_create_promotes_actor_to_admin() {
        let organization_repo = MockOrganizationRepository::new();
        let user_repo = MockUserRepository::new();

        let actor = User::mock("u1");
        user_repo
            .users
            .write()
            .unwrap()
            .insert(actor.id.clone(), actor.clone());

        let action = CreateOrganizationAction::new(organization_repo.clone(), user_repo.clone());
        let organization = action.execute(&actor, new_organization()).await.unwrap();

        assert_eq!(organization.owner_id, "u1");

        let promoted = user_repo.users.read().unwrap().get("u1").cloned().unwrap();
        assert_eq!(promoted.organization_id, Some(organization.id));
        assert_eq!(promoted.platform_role, PlatformRole::OrgAdmin);
    }

    #[tokio::test]
    async fn test_create_forbidden_for_existing_member() {
        let organization_repo = MockOrganizationRepository::new();
        let user_repo = MockUserRepository::new();

        let actor = User::mock_member_of("u1", "o1");
        let action = CreateOrganizationAction::new(organization_repo, user_repo);

        let result = action.execute(&actor, new_organization()).await;
        assert_eq!(result.unwrap_err(), Error::ForbiddenAction);
    }

    #[tokio::test]
    async fn test_create_rolls_back_when_promotion_fails() {
        let organization_repo = MockOrganizationRepository::new();
        let user_repo = MockUserRepository::new();

        // actor is not seeded, so the promotion write fails
        let actor = User::mock("ghost");
        let action = CreateOrganizationAction::new(organization_repo.clone(), user_repo);

        let result = action.execute(&actor, new_organization()).await;
        assert_eq!(result.unwrap_err(), Error::UserNotFound);
        assert!(organization_repo.organizations.read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_requires_admin_of_same_organization() {
        let organization_repo = MockOrganizationRepository::new();
        let organization = Organization::mock("o1", "owner");
        organization_repo
            .organizations
            .write()
            .unwrap()
            .insert("o1".to_owned(), organization);

        let action = UpdateOrganizationAction::new(organization_repo.clone());

        let outsider = User::mock_admin_of("u1", "o2");
        let result = action.execute(&outsider, "o1", new_organization()).await;
        assert_eq!(result.unwrap_err(), Error::ForbiddenAction);

        let admin = User::mock_admin_of("u2", "o1");
        action.execute(&admin, "o1", new_organization()).await.unwrap();

        let updated = organization_repo
            .organizations
            .read()
            .unwrap()
            .get("o1")
            .cloned()
            .unwrap();
        assert_eq!(updated.name, "Shelter Aid");
        // identity fields survive the wholesale update
        assert_eq!(updated.owner_id, "owner");
    }

    #[tokio::test]
    async fn test_reactivate_is_superuser_only() {
        let organization_repo = MockOrganizationRepository::new();
        let mut organization = Organization::mock("o1", "owner");
        organization.status = OrganizationStatus::Inactive;
        organization_repo
            .organizations
            .write()
            .unwrap()
            .insert("o1".to_owned(), organization);

        let action = ReactivateOrganizationAction::new(organization_repo.clone());

        let admin = User::mock_admin_of("u1", "o1");
        assert_eq!(
            action.execute(&admin, "o1").await.unwrap_err(),
            Error::ForbiddenAction
        );

        let superuser = User::mock_superuser("su");
        action.execute(&superuser, "o1").await.unwrap();

        let reactivated = organization_repo
            .organizations
            .read()
            .unwrap()
            .get("o1")
            .cloned()
            .unwrap();
        assert_eq!(reactivated.status, OrganizationStatus::Active);
    }
}
