use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person assisted by an organization. Belongs to exactly one organization
/// at a time; the current housing and room must stay mutually consistent (a
/// beneficiary placed in a room is placed in that room's housing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beneficiary {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub birthdate: String,
    pub phones: Vec<String>,
    pub current_organization_id: String,
    pub current_housing_id: Option<String>,
    pub current_room_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Kind of placement event recorded for a beneficiary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationType {
    Entrance,
    Reallocation,
}

/// Immutable audit record of a placement event. Carries the placement before
/// and after the move; created once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeneficiaryAllocation {
    pub id: String,
    pub beneficiary_id: String,
    pub old_housing_id: Option<String>,
    pub old_room_id: Option<String>,
    pub housing_id: String,
    /// Destination room as requested by the caller. `None` means the caller
    /// did not specify a room, not that the beneficiary was vacated.
    pub room_id: Option<String>,
    pub allocation_type: AllocationType,
    pub auditor_id: String,
    pub created_at: DateTime<Utc>,
}
