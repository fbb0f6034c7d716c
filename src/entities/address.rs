use serde::{Deserialize, Serialize};

/// Postal address shared by organizations, housings and beneficiaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address_line_1: String,
    pub address_line_2: String,
    pub zip_code: String,
    pub district: String,
    pub city: String,
    pub country: String,
}
