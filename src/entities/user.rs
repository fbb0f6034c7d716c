use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform-wide role of a user.
///
/// The role and the organization membership are expected to stay consistent:
/// a user with an organization holds `OrgMember` or `OrgAdmin`, while
/// `RelifMember` superusers may belong to no organization at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformRole {
    NoOrg,
    OrgMember,
    OrgAdmin,
    RelifMember,
}

impl PlatformRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoOrg => "NO_ORG",
            Self::OrgMember => "ORG_MEMBER",
            Self::OrgAdmin => "ORG_ADMIN",
            Self::RelifMember => "RELIF_MEMBER",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "NO_ORG" => Some(Self::NoOrg),
            "ORG_MEMBER" => Some(Self::OrgMember),
            "ORG_ADMIN" => Some(Self::OrgAdmin),
            "RELIF_MEMBER" => Some(Self::RelifMember),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
}

/// A platform user. The acting user of every operation is one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phones: Vec<String>,
    pub platform_role: PlatformRole,
    /// The organization the user belongs to, if any.
    pub organization_id: Option<String>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(any(test, feature = "mocks"))]
impl User {
    /// An active user with no organization, eligible to create one.
    pub fn mock(id: &str) -> Self {
        let now = Utc::now();
        User {
            id: id.to_owned(),
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            email: format!("{id}@example.org"),
            phones: vec![],
            platform_role: PlatformRole::NoOrg,
            organization_id: None,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// An active admin of the given organization.
    pub fn mock_admin_of(id: &str, organization_id: &str) -> Self {
        User {
            platform_role: PlatformRole::OrgAdmin,
            organization_id: Some(organization_id.to_owned()),
            ..Self::mock(id)
        }
    }

    /// An active member (non-admin) of the given organization.
    pub fn mock_member_of(id: &str, organization_id: &str) -> Self {
        User {
            platform_role: PlatformRole::OrgMember,
            organization_id: Some(organization_id.to_owned()),
            ..Self::mock(id)
        }
    }

    /// A platform superuser without an organization.
    pub fn mock_superuser(id: &str) -> Self {
        User {
            platform_role: PlatformRole::RelifMember,
            ..Self::mock(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_role_roundtrip() {
        for role in [
            PlatformRole::NoOrg,
            PlatformRole::OrgMember,
            PlatformRole::OrgAdmin,
            PlatformRole::RelifMember,
        ] {
            assert_eq!(PlatformRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(PlatformRole::from_str("OWNER"), None);
    }
}
