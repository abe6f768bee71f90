mod common;

use biodata_export::error::ExportError;
use biodata_export::pdf::export_pdf;
use biodata_export::raster::ResvgRasterizer;
use biodata_export::sink::{DirectorySink, MemorySink};
use biodata_export::surface::{ExportPhase, TemplateSurface};

use common::{FailingRasterizer, FixedRasterizer, jane, utc_context};

#[tokio::test]
async fn tall_raster_is_sliced_into_three_pages() {
    let mut surface = TemplateSurface::new();
    let mut sink = MemorySink::new();
    // 2.3 pages at the default letter layout.
    let rasterizer = FixedRasterizer::new(75, 253);

    let export = export_pdf(&jane(), &mut surface, &rasterizer, &utc_context(), &mut sink)
        .await
        .unwrap();

    assert_eq!(export.filename, "doe_jane_20240305_142210.pdf");
    assert_eq!(export.pages, 3);
    assert_eq!(export.location, "memory:doe_jane_20240305_142210.pdf");

    let bytes = sink.get(&export.filename).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(String::from_utf8_lossy(bytes).contains("/Count 3"));

    assert_eq!(surface.phase(), ExportPhase::Saved);
    assert!(!surface.is_visible());
    assert!(surface.content().is_none());
}

#[tokio::test]
async fn rasterizer_receives_populated_template() {
    let mut surface = TemplateSurface::new();
    let mut sink = MemorySink::new();
    let rasterizer = FixedRasterizer::new(75, 50);

    export_pdf(&jane(), &mut surface, &rasterizer, &utc_context(), &mut sink)
        .await
        .unwrap();

    let seen = rasterizer.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains("Jane Doe"));
    assert!(seen[0].contains("1 Main St"));
    assert!(seen[0].contains("Generated on: 2024-03-05 14:22:10 UTC"));
}

#[tokio::test]
async fn rasterizer_failure_hides_surface_and_saves_nothing() {
    let mut surface = TemplateSurface::new();
    let mut sink = MemorySink::new();

    let err = export_pdf(
        &jane(),
        &mut surface,
        &FailingRasterizer,
        &utc_context(),
        &mut sink,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ExportError::Raster(_)));
    assert!(sink.is_empty());
    assert!(!surface.is_visible());
    assert!(surface.content().is_none());
    assert_eq!(surface.phase(), ExportPhase::Failed);
}

#[tokio::test]
async fn surface_is_reusable_after_failure() {
    let mut surface = TemplateSurface::new();
    let mut sink = MemorySink::new();
    let context = utc_context();

    assert!(
        export_pdf(&jane(), &mut surface, &FailingRasterizer, &context, &mut sink)
            .await
            .is_err()
    );

    let rasterizer = FixedRasterizer::new(75, 100);
    let export = export_pdf(&jane(), &mut surface, &rasterizer, &context, &mut sink)
        .await
        .unwrap();
    assert_eq!(export.pages, 1);
    assert_eq!(surface.phase(), ExportPhase::Saved);
    assert_eq!(sink.files().len(), 1);
}

#[tokio::test]
async fn resvg_pipeline_writes_pdf_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::new(dir.path());
    let mut surface = TemplateSurface::new();
    let rasterizer = ResvgRasterizer::with_fonts(resvg::usvg::fontdb::Database::new());

    let export = export_pdf(&jane(), &mut surface, &rasterizer, &utc_context(), &mut sink)
        .await
        .unwrap();

    assert_eq!(export.pages, 1);
    let path = dir.path().join("doe_jane_20240305_142210.pdf");
    assert_eq!(export.location, path.display().to_string());
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers.len(), 1);
}
