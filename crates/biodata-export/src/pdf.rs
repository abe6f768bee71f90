use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};
use tracing::Instrument;
use uuid::Uuid;

use biodata_core::filenames;
use biodata_core::models::record::BioRecord;

use crate::context::ExportContext;
use crate::error::ExportError;
use crate::raster::{Bitmap, Rasterizer};
use crate::render::render_template;
use crate::sink::DownloadSink;
use crate::styles::{POINTS_PER_INCH, PageLayout};
use crate::surface::{ExportPhase, TemplateSurface};

const IMAGE_NAME: Name<'static> = Name(b"Im1");

/// Remaining heights at or below this many inches do not start a new page.
const PAGE_EPSILON: f64 = 1e-9;

/// Vertical paint offsets (inches from the page top) for slicing an image
/// of `scaled_height` across pages of `page_height`.
///
/// The first page paints at 0 and each further page one page height higher,
/// so `ceil(scaled_height / page_height)` pages come out, at least one. An
/// image exactly `k` pages tall gives `k` pages.
pub fn page_offsets(scaled_height: f64, page_height: f64) -> Vec<f64> {
    let mut offsets = vec![0.0];
    if !(page_height > 0.0) {
        return offsets;
    }

    let mut position = 0.0;
    let mut height_left = scaled_height - page_height;
    while height_left > PAGE_EPSILON {
        position -= page_height;
        offsets.push(position);
        height_left -= page_height;
    }
    offsets
}

/// Where the image is painted on one page, in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub x: f64,
    /// Image top below the page top: the top margin on the first page,
    /// one page height less on each page after it.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
pub struct PdfDocument {
    pub bytes: Vec<u8>,
    pub placements: Vec<PagePlacement>,
}

impl PdfDocument {
    pub fn page_count(&self) -> usize {
        self.placements.len()
    }
}

/// Build a portrait PDF that slices `bitmap` across as many pages as needed.
///
/// The bitmap is embedded once as a JPEG and painted on every page at that
/// page's offset; the page box clips the rest.
pub fn assemble_pdf(
    bitmap: &Bitmap,
    layout: &PageLayout,
    jpeg_quality: u8,
) -> Result<PdfDocument, ExportError> {
    layout.validate()?;

    let jpeg = bitmap.encode_jpeg(jpeg_quality)?;
    let image_height = layout.scaled_height(bitmap.width(), bitmap.height());
    let placements: Vec<PagePlacement> = page_offsets(image_height, layout.page_height)
        .into_iter()
        .map(|offset| PagePlacement {
            x: layout.image_x,
            y: layout.image_y + offset,
            width: layout.image_width,
            height: image_height,
        })
        .collect();

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let image_id = Ref::new(3);
    let info_id = Ref::new(4);
    let mut next_id = 5;
    let page_refs: Vec<(Ref, Ref)> = placements
        .iter()
        .map(|_| {
            let page = Ref::new(next_id);
            let content = Ref::new(next_id + 1);
            next_id += 2;
            (page, content)
        })
        .collect();

    let page_width = (layout.page_width * POINTS_PER_INCH) as f32;
    let page_height = (layout.page_height * POINTS_PER_INCH) as f32;

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_refs.iter().map(|(page, _)| *page))
        .count(page_refs.len() as i32);
    pdf.document_info(info_id)
        .title(TextStr("Bio-Data"))
        .creator(TextStr("biodata"));

    for (placement, (page_id, content_id)) in placements.iter().zip(&page_refs) {
        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, page_width, page_height));
        page.parent(page_tree_id);
        page.contents(*content_id);
        page.resources().x_objects().pair(IMAGE_NAME, image_id);
        page.finish();

        let width = (placement.width * POINTS_PER_INCH) as f32;
        let height = (placement.height * POINTS_PER_INCH) as f32;
        let x = (placement.x * POINTS_PER_INCH) as f32;
        // PDF space grows upwards from the bottom-left corner.
        let y = page_height - ((placement.y * POINTS_PER_INCH) as f32 + height);

        let mut content = Content::new();
        content
            .save_state()
            .transform([width, 0.0, 0.0, height, x, y])
            .x_object(IMAGE_NAME)
            .restore_state();
        pdf.stream(*content_id, &content.finish());
    }

    let mut image = pdf.image_xobject(image_id, &jpeg);
    image.filter(Filter::DctDecode);
    image.width(bitmap.width() as i32);
    image.height(bitmap.height() as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    Ok(PdfDocument {
        bytes: pdf.finish(),
        placements,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfExport {
    pub filename: String,
    pub location: String,
    pub pages: usize,
}

/// Render, rasterize, paginate and save one record as a PDF.
///
/// The surface is held for the whole attempt and released on every exit
/// path. Nothing reaches the sink unless the document was fully built.
pub async fn export_pdf<R>(
    record: &BioRecord,
    surface: &mut TemplateSurface,
    rasterizer: &R,
    context: &ExportContext,
    sink: &mut dyn DownloadSink,
) -> Result<PdfExport, ExportError>
where
    R: Rasterizer + ?Sized,
{
    let export_id = Uuid::new_v4();
    let span = tracing::info_span!("pdf_export", %export_id);

    let result = run_pdf_export(record, surface, rasterizer, context, sink)
        .instrument(span.clone())
        .await;

    span.in_scope(|| match &result {
        Ok(export) => tracing::info!(
            filename = %export.filename,
            pages = export.pages,
            "pdf export saved"
        ),
        Err(e) => tracing::error!(error = %e, phase = ?surface.phase(), "pdf export failed"),
    });
    result
}

async fn run_pdf_export<R>(
    record: &BioRecord,
    surface: &mut TemplateSurface,
    rasterizer: &R,
    context: &ExportContext,
    sink: &mut dyn DownloadSink,
) -> Result<PdfExport, ExportError>
where
    R: Rasterizer + ?Sized,
{
    let mut lease = surface.acquire();

    let rendered = render_template(record, &context.styles, &context.time_zone)?;
    // The rasterizer reads its own copy while the lease keeps the surface.
    let rendered = lease.populate(rendered).clone();

    lease.advance(ExportPhase::Rasterizing);
    let bitmap = rasterizer.rasterize(&rendered, context.raster).await?;

    lease.advance(ExportPhase::Paginating);
    let document = assemble_pdf(&bitmap, &context.layout, context.jpeg_quality)?;

    let filename = filenames::pdf(record);
    let location = sink.save(&filename, &document.bytes)?;
    lease.advance(ExportPhase::Saved);

    Ok(PdfExport {
        filename,
        location,
        pages: document.page_count(),
    })
}
