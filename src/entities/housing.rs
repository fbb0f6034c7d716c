use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Address;

/// A shelter operated by an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Housing {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub total_vacancies: i32,
    pub occupied_vacancies: i32,
    pub address: Address,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A room inside a housing. Vacancy counts are bookkeeping only; occupancy
/// against allocations is not validated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HousingRoom {
    pub id: String,
    pub housing_id: String,
    pub name: String,
    pub total_vacancies: i32,
    pub available_vacancies: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
