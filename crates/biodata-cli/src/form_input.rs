//! Assembles a [`FormSnapshot`] from the ways the CLI accepts field values.
//!
//! Sources are layered: a JSON form file first, then `--field key=value`
//! pairs, then the dedicated per-field flags. Later layers win.

use std::path::Path;

use biodata_core::models::form::{FieldId, FormSnapshot};

use crate::cli::{ExportArgs, FieldArgs};

pub fn snapshot_from_args(args: &ExportArgs) -> eyre::Result<FormSnapshot> {
    let snapshot = match &args.form {
        Some(path) => read_form_file(path)?,
        None => FormSnapshot::new(),
    };

    let pairs = args.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()));
    let snapshot = snapshot.with_pairs(pairs)?;

    Ok(apply_field_flags(snapshot, &args.values))
}

pub fn read_form_file(path: &Path) -> eyre::Result<FormSnapshot> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read form file {}: {e}", path.display()))?;
    let snapshot = FormSnapshot::from_json_str(&contents)?;
    tracing::debug!(path = %path.display(), "form file loaded");
    Ok(snapshot)
}

pub fn apply_field_flags(mut snapshot: FormSnapshot, flags: &FieldArgs) -> FormSnapshot {
    for field in FieldId::ALL {
        if let Some(value) = flags.get(field) {
            snapshot = snapshot.with(field, value);
        }
    }
    snapshot
}

impl FieldArgs {
    pub fn get(&self, field: FieldId) -> Option<&str> {
        let value = match field {
            FieldId::FirstName => &self.first_name,
            FieldId::LastName => &self.last_name,
            FieldId::Birthdate => &self.birthdate,
            FieldId::Gender => &self.gender,
            FieldId::Country => &self.country,
            FieldId::Email => &self.email,
            FieldId::Phone => &self.phone,
            FieldId::AddressLine1 => &self.address_line1,
            FieldId::Height => &self.height,
            FieldId::Weight => &self.weight,
            FieldId::BloodType => &self.blood_type,
        };
        value.as_deref()
    }
}
