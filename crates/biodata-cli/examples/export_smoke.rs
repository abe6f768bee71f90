//! Smoke test for the PDF export path with system fonts.
//!
//! Renders a sample record through resvg and writes the PDF and JSON
//! exports to the directory given as the first argument (default: `.`).
//!
//! Usage:
//!   cargo run -p biodata-cli --example export_smoke -- /tmp/biodata

use std::path::PathBuf;

use biodata_core::collect::collect;
use biodata_core::models::form::{FieldId, FormSnapshot};
use biodata_export::context::ExportContext;
use biodata_export::json::export_json;
use biodata_export::pdf::export_pdf;
use biodata_export::raster::ResvgRasterizer;
use biodata_export::sink::DirectorySink;
use biodata_export::surface::TemplateSurface;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt().with_env_filter("debug").init();

    let out = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let snapshot = FormSnapshot::new()
        .with(FieldId::FirstName, "Jane")
        .with(FieldId::LastName, "Doe")
        .with(FieldId::Birthdate, "1990-01-01")
        .with(FieldId::Gender, "Female")
        .with(FieldId::Country, "Canada")
        .with(FieldId::Email, "jane.doe@example.com")
        .with(FieldId::Phone, "+1 (555) 123-4567")
        .with(FieldId::AddressLine1, "1 Main St, Springfield")
        .with(FieldId::Height, "170")
        .with(FieldId::Weight, "62")
        .with(FieldId::BloodType, "O+");
    let record = collect(&snapshot, jiff::Timestamp::now())?;

    let mut sink = DirectorySink::new(&out);
    let json = export_json(&record, &mut sink)?;
    println!("json: {}", json.location);

    let mut surface = TemplateSurface::new();
    let pdf = export_pdf(
        &record,
        &mut surface,
        &ResvgRasterizer::new(),
        &ExportContext::default(),
        &mut sink,
    )
    .await?;
    println!("pdf:  {} ({} pages)", pdf.location, pdf.pages);

    Ok(())
}
