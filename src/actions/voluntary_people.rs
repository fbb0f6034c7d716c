use crate::entities::{User, VoluntaryPerson};
use crate::repository::{NewVoluntaryPerson, OrganizationRepository, Page, VoluntaryPersonRepository};
use crate::{guards, Error};

/// Action to register a volunteer under an organization. Admin-only, with a
/// platform-wide unique email, like beneficiaries.
pub struct CreateVoluntaryPersonAction<V, O>
where
    V: VoluntaryPersonRepository,
    O: OrganizationRepository,
{
    person_repo: V,
    organization_repo: O,
}

impl<V, O> CreateVoluntaryPersonAction<V, O>
where
    V: VoluntaryPersonRepository,
    O: OrganizationRepository,
{
    pub fn new(person_repo: V, organization_repo: O) -> Self {
        Self {
            person_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_voluntary_person", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        organization_id: &str,
        data: NewVoluntaryPerson,
    ) -> Result<VoluntaryPerson, Error> {
        let organization = self
            .organization_repo
            .find_by_id(organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        if self.person_repo.count_by_email(&data.email).await? > 0 {
            return Err(Error::VoluntaryPersonAlreadyExists);
        }

        let person = self.person_repo.create(data, &organization.id).await?;

        log::info!(
            target: "reliefline",
            "msg=\"voluntary person registered\", person_id={}, organization_id={}",
            person.id,
            organization.id
        );

        Ok(person)
    }
}

/// Action to update a volunteer's contact details.
pub struct UpdateVoluntaryPersonAction<V, O>
where
    V: VoluntaryPersonRepository,
    O: OrganizationRepository,
{
    person_repo: V,
    organization_repo: O,
}

impl<V, O> UpdateVoluntaryPersonAction<V, O>
where
    V: VoluntaryPersonRepository,
    O: OrganizationRepository,
{
    pub fn new(person_repo: V, organization_repo: O) -> Self {
        Self {
            person_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "update_voluntary_person", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        id: &str,
        data: NewVoluntaryPerson,
    ) -> Result<(), Error> {
        let person = self
            .person_repo
            .find_by_id(id)
            .await?
            .ok_or(Error::VoluntaryPersonNotFound)?;

        let organization = self
            .organization_repo
            .find_by_id(&person.organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        let updated = VoluntaryPerson {
            full_name: data.full_name,
            email: data.email,
            phones: data.phones,
            ..person
        };

        self.person_repo.update(id, updated).await
    }
}

/// Action to remove a volunteer from an organization's roster.
pub struct DeleteVoluntaryPersonAction<V, O>
where
    V: VoluntaryPersonRepository,
    O: OrganizationRepository,
{
    person_repo: V,
    organization_repo: O,
}

impl<V, O> DeleteVoluntaryPersonAction<V, O>
where
    V: VoluntaryPersonRepository,
    O: OrganizationRepository,
{
    pub fn new(person_repo: V, organization_repo: O) -> Self {
        Self {
            person_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "delete_voluntary_person", skip_all, err)
    )]
    pub async fn execute(&self, actor: &User, id: &str) -> Result<(), Error> {
        let person = self
            .person_repo
            .find_by_id(id)
            .await?
            .ok_or(Error::VoluntaryPersonNotFound)?;

        let organization = self
            .organization_repo
            .find_by_id(&person.organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        self.person_repo.delete(id).await?;

        log::info!(
            target: "reliefline",
            "msg=\"voluntary person removed\", person_id={id}, organization_id={}",
            organization.id
        );

        Ok(())
    }
}

/// Volunteers of an organization, readable under a data-access grant.
pub struct ListVoluntaryPeopleByOrganizationAction<V, O>
where
    V: VoluntaryPersonRepository,
    O: OrganizationRepository,
{
    person_repo: V,
    organization_repo: O,
}

impl<V, O> ListVoluntaryPeopleByOrganizationAction<V, O>
where
    V: VoluntaryPersonRepository,
    O: OrganizationRepository,
{
    pub fn new(person_repo: V, organization_repo: O) -> Self {
        Self {
            person_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_voluntary_people_by_organization", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<VoluntaryPerson>, Error> {
        let organization = self
            .organization_repo
            .find_by_id(organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::has_access_to_organization_data(actor, &organization)?;

        self.person_repo
            .find_many_by_organization_paginated(organization_id, offset, limit)
            .await
    }
}
