use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A volunteer registered with an organization. Emails are unique across the
/// platform, checked with a count query before creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoluntaryPerson {
    pub id: String,
    pub organization_id: String,
    pub full_name: String,
    pub email: String,
    pub phones: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category of donated product tracked in an organization's inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductType {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub total_in_storage: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
