use chrono::Utc;

use crate::entities::{
    OrganizationDataAccessGrant, OrganizationDataAccessRequest, RequestStatus, User,
};
use crate::repository::{
    NewDataAccessGrant, NewDataAccessRequest, OrganizationDataAccessGrantRepository,
    OrganizationDataAccessRequestRepository, OrganizationRepository, Page,
};
use crate::{guards, Error};

/// Action for an organization to ask another for read access to its data.
///
/// Filed by an admin of the requesting organization against a target
/// organization; admins of the target resolve it.
pub struct CreateDataAccessRequestAction<R, O>
where
    R: OrganizationDataAccessRequestRepository,
    O: OrganizationRepository,
{
    request_repo: R,
    organization_repo: O,
}

impl<R, O> CreateDataAccessRequestAction<R, O>
where
    R: OrganizationDataAccessRequestRepository,
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
        tracing::instrument(name = "create_data_access_request", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        target_organization_id: &str,
    ) -> Result<OrganizationDataAccessRequest, Error> {
        let requester_organization_id = actor
            .organization_id
            .as_deref()
            .ok_or(Error::ForbiddenAction)?;

        let requester_organization = self
            .organization_repo
            .find_by_id(requester_organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &requester_organization)?;

        let target_organization = self
            .organization_repo
            .find_by_id(target_organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        let request = self
            .request_repo
            .create(NewDataAccessRequest {
                requester_id: actor.id.clone(),
                requester_organization_id: requester_organization.id.clone(),
                target_organization_id: target_organization.id.clone(),
            })
            .await?;

        log::info!(
            target: "reliefline",
            "msg=\"data access request created\", request_id={}, requester_organization_id={}, target_organization_id={}",
            request.id,
            requester_organization.id,
            target_organization.id
        );

        Ok(request)
    }
}

/// Action for an admin of the target organization to approve a data-access
/// request.
///
/// Approval leaves a grant record behind, adds the requester organization to
/// the target's granted list, then resolves the request. The grant insert and
/// the list update are two writes; if the list update fails, the grant record
/// is deleted again so the audit trail never claims an access that was not
/// actually granted.
pub struct AcceptDataAccessRequestAction<R, G, O>
where
    R: OrganizationDataAccessRequestRepository,
    G: OrganizationDataAccessGrantRepository,
    O: OrganizationRepository,
{
    request_repo: R,
    grant_repo: G,
    organization_repo: O,
}

impl<R, G, O> AcceptDataAccessRequestAction<R, G, O>
where
    R: OrganizationDataAccessRequestRepository,
    G: OrganizationDataAccessGrantRepository,
    O: OrganizationRepository,
{
    pub fn new(request_repo: R, grant_repo: G, organization_repo: O) -> Self {
        Self {
            request_repo,
            grant_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "accept_data_access_request", skip_all, err)
    )]
    pub async fn execute(&self, actor: &User, request_id: &str) -> Result<(), Error> {
        let mut request = self
            .request_repo
            .find_by_id(request_id)
            .await?
            .ok_or(Error::DataAccessRequestNotFound)?;

        let mut target_organization = self
            .organization_repo
            .find_by_id(&request.target_organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &target_organization)?;

        if request.is_resolved() {
            return Err(Error::RequestAlreadyResolved);
        }

        let requester_organization = self
            .organization_repo
            .find_by_id(&request.requester_organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        let grant = self
            .grant_repo
            .create(NewDataAccessGrant {
                organization_id: requester_organization.id.clone(),
                target_organization_id: target_organization.id.clone(),
                auditor_id: actor.id.clone(),
            })
            .await?;

        // the grant lives on the target: its granted list names the
        // organizations whose members may read its data
        target_organization
            .access_granted_ids
            .push(requester_organization.id.clone());

        if let Err(err) = self
            .organization_repo
            .update(&target_organization.id, target_organization.clone())
            .await
        {
            // take the grant record back so audit and permission agree
            if let Err(rollback_err) = self.grant_repo.delete(&grant.id).await {
                log::error!(
                    target: "reliefline",
                    "msg=\"failed to roll back grant after organization update failure\", grant_id={}, error=\"{rollback_err}\"",
                    grant.id
                );
            }
            return Err(err);
        }

        request.status = RequestStatus::Accepted;
        request.accepted_at = Some(Utc::now());
        request.auditor_id = Some(actor.id.clone());

        self.request_repo.update(request_id, request).await?;

        log::info!(
            target: "reliefline",
            "msg=\"data access granted\", grant_id={}, organization_id={}, target_organization_id={}, auditor_id={}",
            grant.id,
            requester_organization.id,
            target_organization.id,
            actor.id
        );

        Ok(())
    }
}

/// Action for an admin of the target organization to turn a data-access
/// request down. No grant is created and the target's granted list is
/// untouched.
pub struct RejectDataAccessRequestAction<R, O>
where
    R: OrganizationDataAccessRequestRepository,
    O: OrganizationRepository,
{
    request_repo: R,
    organization_repo: O,
}

impl<R, O> RejectDataAccessRequestAction<R, O>
where
    R: OrganizationDataAccessRequestRepository,
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
        tracing::instrument(name = "reject_data_access_request", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        request_id: &str,
        reason: Option<String>,
    ) -> Result<(), Error> {
        let mut request = self
            .request_repo
            .find_by_id(request_id)
            .await?
            .ok_or(Error::DataAccessRequestNotFound)?;

        let target_organization = self
            .organization_repo
            .find_by_id(&request.target_organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &target_organization)?;

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

/// Action to revoke a standing grant: removes the requester organization
/// from the target's granted list and deletes the grant record.
pub struct RevokeDataAccessGrantAction<G, O>
where
    G: OrganizationDataAccessGrantRepository,
    O: OrganizationRepository,
{
    grant_repo: G,
    organization_repo: O,
}

impl<G, O> RevokeDataAccessGrantAction<G, O>
where
    G: OrganizationDataAccessGrantRepository,
    O: OrganizationRepository,
{
    pub fn new(grant_repo: G, organization_repo: O) -> Self {
        Self {
            grant_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "revoke_data_access_grant", skip_all, err)
    )]
    pub async fn execute(&self, actor: &User, grant_id: &str) -> Result<(), Error> {
        let grant = self
            .grant_repo
            .find_by_id(grant_id)
            .await?
            .ok_or(Error::DataAccessGrantNotFound)?;

        let mut target_organization = self
            .organization_repo
            .find_by_id(&grant.target_organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &target_organization)?;

        target_organization
            .access_granted_ids
            .retain(|id| id != &grant.organization_id);

        self.organization_repo
            .update(&target_organization.id, target_organization.clone())
            .await?;

        self.grant_repo.delete(grant_id).await?;

        log::info!(
            target: "reliefline",
            "msg=\"data access grant revoked\", grant_id={grant_id}, organization_id={}, target_organization_id={}, auditor_id={}",
            grant.organization_id,
            target_organization.id,
            actor.id
        );

        Ok(())
    }
}

/// Outgoing requests of an organization, admin-only.
pub struct ListDataAccessRequestsByRequesterAction<R, O>
where
    R: OrganizationDataAccessRequestRepository,
    O: OrganizationRepository,
{
    request_repo: R,
    organization_repo: O,
}

impl<R, O> ListDataAccessRequestsByRequesterAction<R, O>
where
    R: OrganizationDataAccessRequestRepository,
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
        tracing::instrument(name = "list_data_access_requests_by_requester", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        requester_organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<OrganizationDataAccessRequest>, Error> {
        let organization = self
            .organization_repo
            .find_by_id(requester_organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        self.request_repo
            .find_many_by_requester_organization_paginated(requester_organization_id, offset, limit)
            .await
    }
}

/// Incoming requests against an organization, admin-only.
pub struct ListDataAccessRequestsByTargetAction<R, O>
where
    R: OrganizationDataAccessRequestRepository,
    O: OrganizationRepository,
{
    request_repo: R,
    organization_repo: O,
}

impl<R, O> ListDataAccessRequestsByTargetAction<R, O>
where
    R: OrganizationDataAccessRequestRepository,
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
        tracing::instrument(name = "list_data_access_requests_by_target", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        target_organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<OrganizationDataAccessRequest>, Error> {
        let organization = self
            .organization_repo
            .find_by_id(target_organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        self.request_repo
            .find_many_by_target_organization_paginated(target_organization_id, offset, limit)
            .await
    }
}

/// Standing grants over an organization's data, admin-only.
pub struct ListDataAccessGrantsByTargetAction<G, O>
where
    G: OrganizationDataAccessGrantRepository,
    O: OrganizationRepository,
{
    grant_repo: G,
    organization_repo: O,
}

impl<G, O> ListDataAccessGrantsByTargetAction<G, O>
where
    G: OrganizationDataAccessGrantRepository,
    O: OrganizationRepository,
{
    pub fn new(grant_repo: G, organization_repo: O) -> Self {
        Self {
            grant_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_data_access_grants_by_target", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        target_organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<OrganizationDataAccessGrant>, Error> {
        let organization = self
            .organization_repo
            .find_by_id(target_organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        self.grant_repo
            .find_many_by_target_organization_paginated(target_organization_id, offset, limit)
            .await
    }
}
