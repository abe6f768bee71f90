#![allow(dead_code)]

use std::sync::Mutex;

use biodata_core::collect::collect;
use biodata_core::models::form::{FieldId, FormSnapshot};
use biodata_core::models::record::BioRecord;
use biodata_export::context::ExportContext;
use biodata_export::error::ExportError;
use biodata_export::raster::{Bitmap, BoxFuture, RasterOptions, Rasterizer};
use biodata_export::render::RenderedTemplate;

pub fn export_time() -> jiff::Timestamp {
    "2024-03-05T14:22:10Z".parse().unwrap()
}

pub fn jane_form() -> FormSnapshot {
    FormSnapshot::new()
        .with(FieldId::FirstName, "Jane")
        .with(FieldId::LastName, "Doe")
        .with(FieldId::Birthdate, "1990-01-01")
        .with(FieldId::Gender, "F")
        .with(FieldId::Email, "j@x.com")
        .with(FieldId::Phone, "5551234567")
        .with(FieldId::AddressLine1, "1 Main St")
}

pub fn jane() -> BioRecord {
    collect(&jane_form(), export_time()).unwrap()
}

pub fn utc_context() -> ExportContext {
    ExportContext {
        time_zone: jiff::tz::TimeZone::UTC,
        ..ExportContext::default()
    }
}

/// Returns a white bitmap of fixed size and remembers the markup it saw.
pub struct FixedRasterizer {
    pub width: u32,
    pub height: u32,
    pub seen: Mutex<Vec<String>>,
}

impl FixedRasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl Rasterizer for FixedRasterizer {
    fn rasterize<'a>(
        &'a self,
        template: &'a RenderedTemplate,
        _options: RasterOptions,
    ) -> BoxFuture<'a, Result<Bitmap, ExportError>> {
        Box::pin(async move {
            self.seen.lock().unwrap().push(template.markup.clone());
            Bitmap::filled(self.width, self.height, [255, 255, 255])
        })
    }
}

pub struct FailingRasterizer;

impl Rasterizer for FailingRasterizer {
    fn rasterize<'a>(
        &'a self,
        _template: &'a RenderedTemplate,
        _options: RasterOptions,
    ) -> BoxFuture<'a, Result<Bitmap, ExportError>> {
        Box::pin(async { Err(ExportError::Raster("tainted canvas".to_string())) })
    }
}
