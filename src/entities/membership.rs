use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State of an invite or request. Transitions are one-way: `Pending` resolves
/// to exactly one of `Accepted` or `Rejected` and stays there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl Default for RequestStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// An organization admin inviting a user into their organization.
///
/// Only the invited user (or a superuser) may resolve it. Acceptance moves
/// the user into the organization as `OrgMember`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinOrganizationInvite {
    pub id: String,
    pub user_id: String,
    pub organization_id: String,
    pub creator_id: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub reject_reason: Option<String>,
}

impl JoinOrganizationInvite {
    pub fn is_resolved(&self) -> bool {
        self.status != RequestStatus::Pending
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// A user asking to join an organization. Resolved by an admin of the target
/// organization; acceptance stamps the resolving admin as auditor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinOrganizationRequest {
    pub id: String,
    pub user_id: String,
    pub organization_id: String,
    pub auditor_id: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub reject_reason: Option<String>,
}

impl JoinOrganizationRequest {
    pub fn is_resolved(&self) -> bool {
        self.status != RequestStatus::Pending
    }
}

/// One organization asking another for read access to its data.
///
/// Filed by an admin of the requesting organization, resolved by an admin of
/// the target organization. Acceptance adds the requester to the target's
/// granted list and leaves a grant record behind for later revocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationDataAccessRequest {
    pub id: String,
    pub requester_id: String,
    pub requester_organization_id: String,
    pub target_organization_id: String,
    pub auditor_id: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub reject_reason: Option<String>,
}

impl OrganizationDataAccessRequest {
    pub fn is_resolved(&self) -> bool {
        self.status != RequestStatus::Pending
    }
}

/// An organization admin asking for promotion to `Coordinator` type.
/// Only a platform superuser may resolve it; acceptance mutates the
/// organization's type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrganizationTypeRequest {
    pub id: String,
    pub organization_id: String,
    pub creator_id: String,
    pub auditor_id: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub reject_reason: Option<String>,
}

impl UpdateOrganizationTypeRequest {
    pub fn is_resolved(&self) -> bool {
        self.status != RequestStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_invite_expiry_and_resolution() {
        let now = Utc::now();
        let invite = JoinOrganizationInvite {
            id: "i1".to_owned(),
            user_id: "u1".to_owned(),
            organization_id: "o1".to_owned(),
            creator_id: "u2".to_owned(),
            status: RequestStatus::Pending,
            created_at: now,
            expires_at: now + Duration::days(7),
            accepted_at: None,
            rejected_at: None,
            reject_reason: None,
        };

        assert!(!invite.is_resolved());
        assert!(!invite.is_expired());

        let expired = JoinOrganizationInvite {
            expires_at: now - Duration::hours(1),
            ..invite.clone()
        };
        assert!(expired.is_expired());

        let rejected = JoinOrganizationInvite {
            status: RequestStatus::Rejected,
            ..invite
        };
        assert!(rejected.is_resolved());
    }
}
