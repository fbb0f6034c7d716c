use chrono::Utc;

use crate::entities::{
    OrganizationType, RequestStatus, UpdateOrganizationTypeRequest, User,
};
use crate::repository::{
    NewOrgTypeRequest, OrganizationRepository, Page, UpdateOrganizationTypeRequestRepository,
};
use crate::{guards, Error};

/// Action for an organization admin to request promotion of their
/// organization to `Coordinator` type. Only superusers resolve these.
pub struct CreateOrgTypeRequestAction<R, O>
where
    R: UpdateOrganizationTypeRequestRepository,
    O: OrganizationRepository,
{
    request_repo: R,
    organization_repo: O,
}

impl<R, O> CreateOrgTypeRequestAction<R, O>
where
    R: UpdateOrganizationTypeRequestRepository,
    O: OrganizationRepository,
{
    pub fn new(request_repo: R, organization_repo: O) -> Self {
        Self {
            request_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_org_type_request", skip_all, err)
    )]
    pub async fn execute(&self, actor: &User) -> Result<UpdateOrganizationTypeRequest, Error> {
        // the request always targets the actor's own organization
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

        let request = self
            .request_repo
            .create(NewOrgTypeRequest {
                organization_id: organization.id.clone(),
                creator_id: actor.id.clone(),
            })
            .await?;

        log::info!(
            target: "reliefline",
            "msg=\"organization type request created\", request_id={}, organization_id={}",
            request.id,
            organization.id
        );

        Ok(request)
    }
}

/// Action for a superuser to approve a promotion request.
///
/// Approval flips the organization's type to `Coordinator` and stamps the
/// superuser on the request as auditor.
pub struct AcceptOrgTypeRequestAction<R, O>
where
    R: UpdateOrganizationTypeRequestRepository,
    O: OrganizationRepository,
{
    request_repo: R,
    organization_repo: O,
}

impl<R, O> AcceptOrgTypeRequestAction<R, O>
where
    R: UpdateOrganizationTypeRequestRepository,
    O: OrganizationRepository,
{
    pub fn new(request_repo: R, organization_repo: O) -> Self {
        Self {
            request_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "accept_org_type_request", skip_all, err)
    )]
    pub async fn execute(&self, actor: &User, request_id: &str) -> Result<(), Error> {
        guards::is_super_user(actor)?;

        let mut request = self
            .request_repo
            .find_by_id(request_id)
            .await?
            .ok_or(Error::OrgTypeRequestNotFound)?;

        if request.is_resolved() {
            return Err(Error::RequestAlreadyResolved);
        }

        let mut organization = self
            .organization_repo
            .find_by_id(&request.organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        organization.org_type = OrganizationType::Coordinator;

        self.organization_repo
            .update(&request.organization_id, organization)
            .await?;

        request.status = RequestStatus::Accepted;
        request.accepted_at = Some(Utc::now());
        request.auditor_id = Some(actor.id.clone());

        self.request_repo.update(request_id, request.clone()).await?;

        log::info!(
            target: "reliefline",
            "msg=\"organization promoted to coordinator\", request_id={request_id}, organization_id={}, auditor_id={}",
            request.organization_id,
            actor.id
        );

        Ok(())
    }
}

/// Action for a superuser to turn a promotion request down.
pub struct RejectOrgTypeRequestAction<R>
where
    R: UpdateOrganizationTypeRequestRepository,
{
    request_repo: R,
}

impl<R> RejectOrgTypeRequestAction<R>
where
    R: UpdateOrganizationTypeRequestRepository,
{
    pub fn new(request_repo: R) -> Self {
        Self { request_repo }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "reject_org_type_request", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        request_id: &str,
        reason: Option<String>,
    ) -> Result<(), Error> {
        guards::is_super_user(actor)?;

        let mut request = self
            .request_repo
            .find_by_id(request_id)
            .await?
            .ok_or(Error::OrgTypeRequestNotFound)?;

        if request.is_resolved() {
            return Err(Error::RequestAlreadyResolved);
        }

        request.status = RequestStatus::Rejected;
        request.rejected_at = Some(Utc::now());
        request.reject_reason = reason;
        request.auditor_id = Some(actor.id.clone());

        self.request_repo.update(request_id, request).await
    }
}

/// Platform-wide review queue, superuser-only.
pub struct ListAllOrgTypeRequestsAction<R>
where
    R: UpdateOrganizationTypeRequestRepository,
{
    request_repo: R,
}

impl<R> ListAllOrgTypeRequestsAction<R>
where
    R: UpdateOrganizationTypeRequestRepository,
{
    pub fn new(request_repo: R) -> Self {
        Self { request_repo }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_all_org_type_requests", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        offset: u64,
        limit: u64,
    ) -> Result<Page<UpdateOrganizationTypeRequest>, Error> {
        guards::is_super_user(actor)?;

        self.request_repo.find_many_paginated(offset, limit).await
    }
}

/// An organization's own promotion requests, admin-only.
pub struct ListOrgTypeRequestsByOrganizationAction<R, O>
where
    R: UpdateOrganizationTypeRequestRepository,
    O: OrganizationRepository,
{
    request_repo: R,
    organization_repo: O,
}

impl<R, O> ListOrgTypeRequestsByOrganizationAction<R, O>
where
    R: UpdateOrganizationTypeRequestRepository,
    O: OrganizationRepository,
{
    pub fn new(request_repo: R, organization_repo: O) -> Self {
        Self {
            request_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_org_type_requests_by_organization", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<UpdateOrganizationTypeRequest>, Error> {
        let organization = self
            .organization_repo
            .find_by_id(organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        self.request_repo
            .find_many_by_organization_paginated(organization_id, offset, limit)
            .await
    }
}
