//! biodata-export
//!
//! JSON + PDF export of a collected [`biodata_core::models::record::BioRecord`].
//! The PDF path renders the record into an SVG template, rasterizes it and
//! slices the bitmap across letter pages.

pub mod context;
pub mod error;
pub mod json;
pub mod pdf;
pub mod raster;
pub mod render;
pub mod sink;
pub mod styles;
pub mod surface;
