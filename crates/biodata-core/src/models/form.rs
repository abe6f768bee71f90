use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A named input on the biodata form.
///
/// Declaration order is the field-table order: validation walks fields in
/// this order and reports the first failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    FirstName,
    LastName,
    Birthdate,
    Gender,
    Country,
    Email,
    Phone,
    #[serde(rename = "address_line1")]
    AddressLine1,
    Height,
    Weight,
    BloodType,
}

impl FieldId {
    pub const ALL: [FieldId; 11] = [
        FieldId::FirstName,
        FieldId::LastName,
        FieldId::Birthdate,
        FieldId::Gender,
        FieldId::Country,
        FieldId::Email,
        FieldId::Phone,
        FieldId::AddressLine1,
        FieldId::Height,
        FieldId::Weight,
        FieldId::BloodType,
    ];

    /// Stable key used by snapshots, CLI flags and JSON form files.
    pub fn key(self) -> &'static str {
        match self {
            FieldId::FirstName => "first_name",
            FieldId::LastName => "last_name",
            FieldId::Birthdate => "birthdate",
            FieldId::Gender => "gender",
            FieldId::Country => "country",
            FieldId::Email => "email",
            FieldId::Phone => "phone",
            FieldId::AddressLine1 => "address_line1",
            FieldId::Height => "height",
            FieldId::Weight => "weight",
            FieldId::BloodType => "blood_type",
        }
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn is_required(self) -> bool {
        self.spec().required
    }

    pub fn spec(self) -> FieldSpec {
        use Constraint::*;

        let (label, required, constraint) = match self {
            FieldId::FirstName => ("First name", true, None),
            FieldId::LastName => ("Last name", true, None),
            FieldId::Birthdate => ("Date of birth", true, Some(IsoDate)),
            FieldId::Gender => ("Gender", true, None),
            FieldId::Country => ("Nationality", false, None),
            FieldId::Email => ("Email", true, Some(Email)),
            FieldId::Phone => ("Phone number", false, Some(Phone)),
            FieldId::AddressLine1 => ("Address", false, None),
            FieldId::Height => ("Height (cm)", false, Some(PositiveNumber)),
            FieldId::Weight => ("Weight (kg)", false, Some(PositiveNumber)),
            FieldId::BloodType => ("Blood type", false, Some(BloodType)),
        };

        FieldSpec {
            id: self,
            label,
            required,
            constraint,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FieldId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }
}

/// Declared shape of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: FieldId,
    pub label: &'static str,
    pub required: bool,
    pub constraint: Option<Constraint>,
}

/// Format rule applied to a non-empty field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// `YYYY-MM-DD`, not after the capture date.
    IsoDate,
    /// `local@domain.tld` with no whitespace.
    Email,
    /// 7 to 15 digits, optional leading `+`, separators ` -().`.
    Phone,
    /// Finite number greater than zero.
    PositiveNumber,
    /// ABO group with Rh sign.
    BloodType,
}

pub const BLOOD_TYPES: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// Immutable view of the form's field values, gathered once per export.
///
/// Fields that were never set read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSnapshot {
    values: BTreeMap<FieldId, String>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: FieldId, value: impl Into<String>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    pub fn get(&self, field: FieldId) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Set fields from `key = value` pairs, rejecting unknown keys.
    /// Later pairs overwrite earlier values.
    pub fn with_pairs<'a, I>(mut self, pairs: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in pairs {
            let field: FieldId = key.trim().parse()?;
            self.values.insert(field, value.to_string());
        }
        Ok(self)
    }

    /// Parse a JSON object of field keys to string values.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut snapshot = Self::new();
        for (key, value) in raw {
            let field: FieldId = key.parse()?;
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                serde_json::Value::Number(n) => n.to_string(),
                _ => return Err(CoreError::NonStringField(key)),
            };
            snapshot.values.insert(field, value);
        }
        Ok(snapshot)
    }
}
