use serde::{Deserialize, Serialize};

/// Sanitized snapshot of the form, the single source for both export formats.
///
/// Only [`crate::collect::collect`] builds one, so required fields are
/// non-empty and every string is free of markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BioRecord {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub nationality: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub health: Option<HealthStatistics>,
    pub captured_at: jiff::Timestamp,
}

/// Optional health block; present when any of its fields was filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatistics {
    pub height: String,
    pub weight: String,
    pub blood_type: String,
}

impl BioRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
