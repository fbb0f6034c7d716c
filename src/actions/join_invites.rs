use chrono::{Duration, Utc};

use crate::entities::{JoinOrganizationInvite, PlatformRole, RequestStatus, User};
use crate::repository::{
    JoinOrganizationInviteRepository, NewJoinInvite, OrganizationRepository, Page, UserRepository,
};
use crate::services::EmailSender;
use crate::{guards, Error};

/// Invite lifetime settings.
#[derive(Debug, Clone)]
pub struct InviteConfig {
    pub expiry_days: i64,
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self { expiry_days: 7 }
    }
}

/// Action to invite a user into an organization.
///
/// Admin-only. A user with a pending invite cannot be invited again until
/// that invite is resolved or expires. The notification email is best-effort;
/// a delivery failure is logged but never undoes the invite.
pub struct CreateJoinInviteAction<I, O, U, E>
where
    I: JoinOrganizationInviteRepository,
    O: OrganizationRepository,
    U: UserRepository,
    E: EmailSender,
{
    invite_repo: I,
    organization_repo: O,
    user_repo: U,
    email_sender: E,
    config: InviteConfig,
}

impl<I, O, U, E> CreateJoinInviteAction<I, O, U, E>
where
    I: JoinOrganizationInviteRepository,
    O: OrganizationRepository,
    U: UserRepository,
    E: EmailSender,
{
    pub fn new(
        invite_repo: I,
        organization_repo: O,
        user_repo: U,
        email_sender: E,
        config: InviteConfig,
    ) -> Self {
        Self {
            invite_repo,
            organization_repo,
            user_repo,
            email_sender,
            config,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_join_invite", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        organization_id: &str,
        user_id: &str,
    ) -> Result<JoinOrganizationInvite, Error> {
        let organization = self
            .organization_repo
            .find_by_id(organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        let invited = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(Error::UserNotFound)?;

        if self.invite_repo.count_pending_by_user(&invited.id).await? > 0 {
            return Err(Error::InviteAlreadyExists);
        }

        let invite = self
            .invite_repo
            .create(NewJoinInvite {
                user_id: invited.id.clone(),
                organization_id: organization.id.clone(),
                creator_id: actor.id.clone(),
                expires_at: Utc::now() + Duration::days(self.config.expiry_days),
            })
            .await?;

        if let Err(err) = self.email_sender.send_join_invite(&invite, &organization).await {
            log::error!(
                target: "reliefline",
                "msg=\"failed to send join invite email\", invite_id={}, user_id={}, error=\"{err}\"",
                invite.id,
                invited.id
            );
        }

        log::info!(
            target: "reliefline",
            "msg=\"join invite created\", invite_id={}, organization_id={}, user_id={}",
            invite.id,
            organization.id,
            invited.id
        );

        Ok(invite)
    }
}

/// Action for the invited user to accept an invite and join the organization.
///
/// Only the invited user (or a superuser) may accept. Already resolved and
/// expired invites are rejected up front. Acceptance seats the user as
/// `OrgMember` of the inviting organization.
pub struct AcceptJoinInviteAction<I, U>
where
    I: JoinOrganizationInviteRepository,
    U: UserRepository,
{
    invite_repo: I,
    user_repo: U,
}

impl<I, U> AcceptJoinInviteAction<I, U>
where
    I: JoinOrganizationInviteRepository,
    U: UserRepository,
{
    pub fn new(invite_repo: I, user_repo: U) -> Self {
        Self {
            invite_repo,
            user_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "accept_join_invite", skip_all, err)
    )]
    pub async fn execute(&self, actor: &User, invite_id: &str) -> Result<(), Error> {
        let mut invite = self
            .invite_repo
            .find_by_id(invite_id)
            .await?
            .ok_or(Error::JoinInviteNotFound)?;

        let invited = self
            .user_repo
            .find_by_id(&invite.user_id)
            .await?
            .ok_or(Error::UserNotFound)?;

        guards::is_user(actor, &invited)?;

        if invite.is_resolved() {
            return Err(Error::InviteAlreadyResolved);
        }
        if invite.is_expired() {
            return Err(Error::InviteExpired);
        }

        let mut member = invited.clone();
        member.organization_id = Some(invite.organization_id.clone());
        member.platform_role = PlatformRole::OrgMember;

        self.user_repo.update(&invited.id, member).await?;

        invite.status = RequestStatus::Accepted;
        invite.accepted_at = Some(Utc::now());

        self.invite_repo.update(invite_id, invite.clone()).await?;

        log::info!(
            target: "reliefline",
            "msg=\"join invite accepted\", invite_id={invite_id}, organization_id={}, user_id={}",
            invite.organization_id,
            invite.user_id
        );

        Ok(())
    }
}

/// Action for the invited user to decline an invite. The user's membership
/// is untouched; only the invite record moves to `Rejected`.
pub struct RejectJoinInviteAction<I, U>
where
    I: JoinOrganizationInviteRepository,
    U: UserRepository,
{
    invite_repo: I,
    user_repo: U,
}

impl<I, U> RejectJoinInviteAction<I, U>
where
    I: JoinOrganizationInviteRepository,
    U: UserRepository,
{
    pub fn new(invite_repo: I, user_repo: U) -> Self {
        Self {
            invite_repo,
            user_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "reject_join_invite", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        invite_id: &str,
        reason: Option<String>,
    ) -> Result<(), Error> {
        let mut invite = self
            .invite_repo
            .find_by_id(invite_id)
            .await?
            .ok_or(Error::JoinInviteNotFound)?;

        let invited = self
            .user_repo
            .find_by_id(&invite.user_id)
            .await?
            .ok_or(Error::UserNotFound)?;

        guards::is_user(actor, &invited)?;

        if invite.is_resolved() {
            return Err(Error::InviteAlreadyResolved);
        }

        invite.status = RequestStatus::Rejected;
        invite.rejected_at = Some(Utc::now());
        invite.reject_reason = reason;

        self.invite_repo.update(invite_id, invite).await
    }
}

/// Admin view over an organization's outstanding and past invites.
pub struct ListJoinInvitesByOrganizationAction<I, O>
where
    I: JoinOrganizationInviteRepository,
    O: OrganizationRepository,
{
    invite_repo: I,
    organization_repo: O,
}

impl<I, O> ListJoinInvitesByOrganizationAction<I, O>
where
    I: JoinOrganizationInviteRepository,
    O: OrganizationRepository,
{
    pub fn new(invite_repo: I, organization_repo: O) -> Self {
        Self {
            invite_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_join_invites_by_organization", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<JoinOrganizationInvite>, Error> {
        let organization = self
            .organization_repo
            .find_by_id(organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        self.invite_repo
            .find_many_by_organization_paginated(organization_id, offset, limit)
            .await
    }
}

/// A user's own inbox of invites.
pub struct ListJoinInvitesByUserAction<I, U>
where
    I: JoinOrganizationInviteRepository,
    U: UserRepository,
{
    invite_repo: I,
    user_repo: U,
}

impl<I, U> ListJoinInvitesByUserAction<I, U>
where
    I: JoinOrganizationInviteRepository,
    U: UserRepository,
{
    pub fn new(invite_repo: I, user_repo: U) -> Self {
        Self {
            invite_repo,
            user_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_join_invites_by_user", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        user_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<JoinOrganizationInvite>, Error> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(Error::UserNotFound)?;

        guards::is_user(actor, &user)?;

        self.invite_repo
            .find_many_by_user_paginated(user_id, offset, limit)
            .await
    }
}
