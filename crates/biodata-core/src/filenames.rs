//! Export filename conventions.
//!
//! Pure string functions: `{last}_{first}_{YYYYMMDD}_{HHMMSS}.{ext}`,
//! lower-cased, with the timestamp rendered in UTC.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::format::ExportFormat;
use crate::models::record::BioRecord;

static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&#?[0-9A-Za-z]+;").expect("entity pattern is a valid regex")
});

pub fn export_filename(record: &BioRecord, format: ExportFormat) -> String {
    format!("{}.{}", export_stem(record), format.extension())
}

pub fn json(record: &BioRecord) -> String {
    export_filename(record, ExportFormat::Json)
}

pub fn pdf(record: &BioRecord) -> String {
    export_filename(record, ExportFormat::Pdf)
}

/// Filename without extension.
pub fn export_stem(record: &BioRecord) -> String {
    format!(
        "{}_{}_{}",
        slug(&record.last_name),
        slug(&record.first_name),
        record.captured_at.strftime("%Y%m%d_%H%M%S"),
    )
}

/// Reduce a sanitized name to a filesystem-safe, lower-case component.
///
/// Entities left behind by the sanitizer are dropped, the rest is
/// transliterated to ASCII; whitespace runs become `-` and any other
/// punctuation is removed. Returns `unknown` if nothing survives.
pub fn slug(name: &str) -> String {
    let without_entities = ENTITY_PATTERN.replace_all(name, "");
    let ascii = deunicode::deunicode(&without_entities);

    let mut out = String::with_capacity(ascii.len());
    let mut pending_dash = false;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    if out.is_empty() {
        "unknown".to_string()
    } else {
        out
    }
}
