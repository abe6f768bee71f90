//! biodata-core
//!
//! Pure domain types for the biodata form: the field table, the immutable
//! form snapshot, the collector that turns a snapshot into a sanitized
//! [`models::record::BioRecord`], and export filename conventions.
//! No rendering or I/O lives here.

pub mod collect;
pub mod error;
pub mod filenames;
pub mod models;
pub mod sanitize;
