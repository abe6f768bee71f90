//! Form snapshot → [`BioRecord`].

use std::sync::LazyLock;

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::Timestamp;
use regex::Regex;

use crate::error::{ValidationError, ValidationReason};
use crate::models::form::{BLOOD_TYPES, Constraint, FieldId, FormSnapshot};
use crate::models::record::{BioRecord, HealthStatistics};
use crate::sanitize::sanitize;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@<>]+@[^\s@<>.]+(\.[^\s@<>.]+)+$").expect("email pattern is a valid regex")
});

/// Validate the snapshot and build a sanitized record stamped with `now`.
///
/// Fields are checked in [`FieldId::ALL`] order and the first invalid one is
/// returned; no record is built in that case.
pub fn collect(snapshot: &FormSnapshot, now: Timestamp) -> Result<BioRecord, ValidationError> {
    let today = now.to_zoned(TimeZone::UTC).date();

    for field in FieldId::ALL {
        validate_field(field, snapshot.get(field), today)
            .map_err(|reason| ValidationError { field, reason })?;
    }

    let text = |field: FieldId| sanitize(snapshot.get(field));

    let height = text(FieldId::Height);
    let weight = text(FieldId::Weight);
    let blood_type = text(FieldId::BloodType);
    let health = if height.is_empty() && weight.is_empty() && blood_type.is_empty() {
        None
    } else {
        Some(HealthStatistics {
            height,
            weight,
            blood_type,
        })
    };

    Ok(BioRecord {
        first_name: text(FieldId::FirstName),
        last_name: text(FieldId::LastName),
        date_of_birth: text(FieldId::Birthdate),
        gender: text(FieldId::Gender),
        nationality: text(FieldId::Country),
        email: text(FieldId::Email),
        phone: text(FieldId::Phone),
        address: text(FieldId::AddressLine1),
        health,
        captured_at: now,
    })
}

fn validate_field(field: FieldId, raw: &str, today: Date) -> Result<(), ValidationReason> {
    let spec = field.spec();
    let value = raw.trim();

    if value.is_empty() {
        return if spec.required {
            Err(ValidationReason::Missing)
        } else {
            Ok(())
        };
    }

    match spec.constraint {
        Some(constraint) => check_constraint(constraint, value, today),
        None => Ok(()),
    }
}

fn check_constraint(constraint: Constraint, value: &str, today: Date) -> Result<(), ValidationReason> {
    let malformed = |msg: &str| Err(ValidationReason::Malformed(msg.to_string()));

    match constraint {
        Constraint::IsoDate => match value.parse::<Date>() {
            Ok(date) if date > today => malformed("date cannot be in the future"),
            Ok(_) => Ok(()),
            Err(_) => malformed("expected a date in YYYY-MM-DD form"),
        },
        Constraint::Email => {
            if EMAIL_PATTERN.is_match(value) {
                Ok(())
            } else {
                malformed("expected an email address such as name@example.com")
            }
        }
        Constraint::Phone => {
            let body = value.strip_prefix('+').unwrap_or(value);
            let allowed = body
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '.'));
            let digits = body.chars().filter(char::is_ascii_digit).count();
            if allowed && (7..=15).contains(&digits) {
                Ok(())
            } else {
                malformed("expected a phone number with 7 to 15 digits")
            }
        }
        Constraint::PositiveNumber => match value.parse::<f64>() {
            Ok(n) if n.is_finite() && n > 0.0 => Ok(()),
            _ => malformed("expected a positive number"),
        },
        Constraint::BloodType => {
            if BLOOD_TYPES.contains(&value) {
                Ok(())
            } else {
                malformed("expected one of A+, A-, B+, B-, AB+, AB-, O+, O-")
            }
        }
    }
}
