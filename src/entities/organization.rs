use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizationStatus {
    Active,
    Inactive,
}

/// Organizations start out as `Manager` and may be promoted to `Coordinator`
/// through a superuser-approved type-change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizationType {
    Manager,
    Coordinator,
}

/// An aid organization operating on the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub description: String,
    pub address: Address,
    pub org_type: OrganizationType,
    pub owner_id: String,
    pub status: OrganizationStatus,
    /// IDs of organizations whose members were granted read access to this
    /// organization's data. The grant is unidirectional.
    pub access_granted_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Audit record of a standing cross-organization read grant. Created when a
/// data-access request is accepted, deleted when the grant is revoked; the
/// effective permission lives in the target's `access_granted_ids`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationDataAccessGrant {
    pub id: String,
    /// The organization whose members received read access.
    pub organization_id: String,
    /// The organization whose data is readable under this grant.
    pub target_organization_id: String,
    pub auditor_id: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(any(test, feature = "mocks"))]
impl Organization {
    pub fn mock(id: &str, owner_id: &str) -> Self {
        let now = Utc::now();
        Organization {
            id: id.to_owned(),
            name: "Test Organization".to_owned(),
            description: String::new(),
            address: Address::default(),
            org_type: OrganizationType::Manager,
            owner_id: owner_id.to_owned(),
            status: OrganizationStatus::Active,
            access_granted_ids: vec![],
            created_at: now,
            updated_at: now,
        }
    }
}
