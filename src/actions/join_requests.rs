use chrono::Utc;

use crate::entities::{JoinOrganizationRequest, PlatformRole, RequestStatus, User};
use crate::repository::{
    JoinOrganizationRequestRepository, NewJoinRequest, OrganizationRepository, Page, UserRepository,
};
use crate::{guards, Error};

/// Action for a user to ask an organization to take them in. Any user may
/// file one; resolution is the admins' side of the workflow.
pub struct CreateJoinRequestAction<R, O>
where
    R: JoinOrganizationRequestRepository,
    O: OrganizationRepository,
{
    request_repo: R,
    organization_repo: O,
}

impl<R, O> CreateJoinRequestAction<R, O>
where
    R: JoinOrganizationRequestRepository,
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
        tracing::instrument(name = "create_join_request", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        organization_id: &str,
    ) -> Result<JoinOrganizationRequest, Error> {
        let organization = self
            .organization_repo
            .find_by_id(organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        let request = self
            .request_repo
            .create(NewJoinRequest {
                user_id: actor.id.clone(),
                organization_id: organization.id.clone(),
            })
            .await?;

        log::info!(
            target: "reliefline",
            "msg=\"join request created\", request_id={}, organization_id={}, user_id={}",
            request.id,
            organization.id,
            actor.id
        );

        Ok(request)
    }
}

/// Action for an organization admin to accept a join request.
///
/// Acceptance seats the requester as `OrgMember` and stamps the resolving
/// admin on the request as auditor.
pub struct AcceptJoinRequestAction<R, U, O>
where
    R: JoinOrganizationRequestRepository,
    U: UserRepository,
    O: OrganizationRepository,
{
    request_repo: R,
    user_repo: U,
    organization_repo: O,
}

impl<R, U, O> AcceptJoinRequestAction<R, U, O>
where
    R: JoinOrganizationRequestRepository,
    U: UserRepository,
    O: OrganizationRepository,
{
    pub fn new(request_repo: R, user_repo: U, organization_repo: O) -> Self {
        Self {
            request_repo,
            user_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "accept_join_request", skip_all, err)
    )]
    pub async fn execute(&self, actor: &User, request_id: &str) -> Result<(), Error> {
        let mut request = self
            .request_repo
            .find_by_id(request_id)
            .await?
            .ok_or(Error::JoinRequestNotFound)?;

        let organization = self
            .organization_repo
            .find_by_id(&request.organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        if request.is_resolved() {
            return Err(Error::RequestAlreadyResolved);
        }

        let requester = self
            .user_repo
            .find_by_id(&request.user_id)
            .await?
            .ok_or(Error::UserNotFound)?;

        let mut member = requester.clone();
        member.organization_id = Some(organization.id.clone());
        member.platform_role = PlatformRole::OrgMember;

        self.user_repo.update(&requester.id, member).await?;

        request.status = RequestStatus::Accepted;
        request.accepted_at = Some(Utc::now());
        request.auditor_id = Some(actor.id.clone());

        self.request_repo.update(request_id, request.clone()).await?;

        log::info!(
            target: "reliefline",
            "msg=\"join request accepted\", request_id={request_id}, organization_id={}, user_id={}, auditor_id={}",
            request.organization_id,
            request.user_id,
            actor.id
        );

        Ok(())
    }
}

/// Action for an organization admin to turn a join request down.
pub struct RejectJoinRequestAction<R, O>
where
    R: JoinOrganizationRequestRepository,
    O: OrganizationRepository,
{
    request_repo: R,
    organization_repo: O,
}

impl<R, O> RejectJoinRequestAction<R, O>
where
    R: JoinOrganizationRequestRepository,
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
        tracing::instrument(name = "reject_join_request", skip_all, err)
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
            .ok_or(Error::JoinRequestNotFound)?;

        let organization = self
            .organization_repo
            .find_by_id(&request.organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

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

/// Admin view over an organization's join requests.
pub struct ListJoinRequestsByOrganizationAction<R, O>
where
    R: JoinOrganizationRequestRepository,
    O: OrganizationRepository,
{
    request_repo: R,
    organization_repo: O,
}

impl<R, O> ListJoinRequestsByOrganizationAction<R, O>
where
    R: JoinOrganizationRequestRepository,
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
        tracing::instrument(name = "list_join_requests_by_organization", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<JoinOrganizationRequest>, Error> {
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

/// A user's own outgoing join requests.
pub struct ListJoinRequestsByUserAction<R, U>
where
    R: JoinOrganizationRequestRepository,
    U: UserRepository,
{
    request_repo: R,
    user_repo: U,
}

impl<R, U> ListJoinRequestsByUserAction<R, U>
where
    R: JoinOrganizationRequestRepository,
    U: UserRepository,
{
    pub fn new(request_repo: R, user_repo: U) -> Self {
        Self {
            request_repo,
            user_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_join_requests_by_user", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        user_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<JoinOrganizationRequest>, Error> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(Error::UserNotFound)?;

        guards::is_user(actor, &user)?;

        self.request_repo
            .find_many_by_user_paginated(user_id, offset, limit)
            .await
    }
}
