use serde::{Deserialize, Serialize};

use biodata_core::filenames;
use biodata_core::models::record::BioRecord;

use crate::error::ExportError;
use crate::sink::DownloadSink;

/// Shape of the downloaded JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BioDataDocument {
    pub personal_details: PersonalDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_statistics: Option<HealthDetails>,
    pub contact_information: ContactInformation,
    pub export_date: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub nationality: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDetails {
    pub height: String,
    pub weight: String,
    pub blood_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInformation {
    pub email: String,
    pub phone_number: String,
    pub address: String,
}

impl From<&BioRecord> for BioDataDocument {
    fn from(record: &BioRecord) -> Self {
        Self {
            personal_details: PersonalDetails {
                first_name: record.first_name.clone(),
                last_name: record.last_name.clone(),
                date_of_birth: record.date_of_birth.clone(),
                gender: record.gender.clone(),
                nationality: record.nationality.clone(),
            },
            health_statistics: record.health.as_ref().map(|h| HealthDetails {
                height: h.height.clone(),
                weight: h.weight.clone(),
                blood_type: h.blood_type.clone(),
            }),
            contact_information: ContactInformation {
                email: record.email.clone(),
                phone_number: record.phone.clone(),
                address: record.address.clone(),
            },
            export_date: record.captured_at,
        }
    }
}

/// Indented JSON text of the record.
pub fn render_json(record: &BioRecord) -> Result<String, ExportError> {
    let document = BioDataDocument::from(record);
    Ok(serde_json::to_string_pretty(&document)?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonExport {
    pub filename: String,
    pub location: String,
}

/// Serialize the record and hand it to the sink.
pub fn export_json(
    record: &BioRecord,
    sink: &mut dyn DownloadSink,
) -> Result<JsonExport, ExportError> {
    let filename = filenames::json(record);
    let json = render_json(record)?;
    let location = sink.save(&filename, json.as_bytes())?;

    tracing::info!(filename = %filename, bytes = json.len(), "json export saved");
    Ok(JsonExport { filename, location })
}
