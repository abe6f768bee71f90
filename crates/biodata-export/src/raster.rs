use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use resvg::tiny_skia;
use resvg::usvg;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::render::RenderedTemplate;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterOptions {
    /// Output pixels per template pixel. Oversampling keeps print sharp.
    pub scale: f32,
    /// Refuse to allocate bitmaps larger than this many pixels.
    pub max_pixels: u64,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            max_pixels: 64_000_000,
        }
    }
}

/// Opaque RGB8 bitmap produced by a [`Rasterizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Wrap raw RGB8 pixels, row-major.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ExportError> {
        let expected = width as usize * height as usize * 3;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(ExportError::Raster(format!(
                "bitmap {width}x{height} needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A bitmap filled with one color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Result<Self, ExportError> {
        let count = width as usize * height as usize;
        let pixels = rgb.iter().copied().cycle().take(count * 3).collect();
        Self::new(width, height, pixels)
    }

    /// Drop the alpha channel of RGBA pixels. The caller guarantees the
    /// image is opaque, so premultiplication does not matter.
    pub fn from_opaque_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, ExportError> {
        let pixels = rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, ExportError> {
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
            .encode(&self.pixels, self.width, self.height, ExtendedColorType::Rgb8)
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        Ok(buf)
    }

    /// `data:image/jpeg;base64,...` form of the bitmap.
    pub fn to_data_uri(&self, quality: u8) -> Result<String, ExportError> {
        let jpeg = self.encode_jpeg(quality)?;
        Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg)))
    }
}

/// Renders a populated template surface into a bitmap.
///
/// May fail on unparsable or oversized content.
pub trait Rasterizer: Send + Sync {
    fn rasterize<'a>(
        &'a self,
        template: &'a RenderedTemplate,
        options: RasterOptions,
    ) -> BoxFuture<'a, Result<Bitmap, ExportError>>;
}

/// [`Rasterizer`] backed by resvg, run on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct ResvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl ResvgRasterizer {
    /// Rasterizer using the system's installed fonts.
    pub fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self::with_fonts(db)
    }

    pub fn with_fonts(fontdb: usvg::fontdb::Database) -> Self {
        Self {
            fontdb: Arc::new(fontdb),
        }
    }
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for ResvgRasterizer {
    fn rasterize<'a>(
        &'a self,
        template: &'a RenderedTemplate,
        options: RasterOptions,
    ) -> BoxFuture<'a, Result<Bitmap, ExportError>> {
        let markup = template.markup.clone();
        let fontdb = Arc::clone(&self.fontdb);
        Box::pin(async move {
            tokio::task::spawn_blocking(move || rasterize_svg(&markup, fontdb, options))
                .await
                .map_err(|e| ExportError::Raster(format!("rasterizer task failed: {e}")))?
        })
    }
}

fn rasterize_svg(
    markup: &str,
    fontdb: Arc<usvg::fontdb::Database>,
    options: RasterOptions,
) -> Result<Bitmap, ExportError> {
    if !(options.scale.is_finite() && options.scale > 0.0) {
        return Err(ExportError::Raster(format!(
            "scale must be positive, got {}",
            options.scale
        )));
    }

    let mut usvg_options = usvg::Options::default();
    usvg_options.fontdb = fontdb;

    let tree = usvg::Tree::from_str(markup, &usvg_options)
        .map_err(|e| ExportError::Raster(format!("failed to parse template markup: {e}")))?;

    let size = tree.size();
    let width = (size.width() * options.scale).ceil() as u32;
    let height = (size.height() * options.scale).ceil() as u32;
    let pixels = u64::from(width) * u64::from(height);
    if pixels > options.max_pixels {
        return Err(ExportError::Raster(format!(
            "{width}x{height} bitmap exceeds the {} pixel limit",
            options.max_pixels
        )));
    }

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ExportError::Raster(format!("cannot allocate {width}x{height} bitmap")))?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(options.scale, options.scale),
        &mut pixmap.as_mut(),
    );

    tracing::debug!(width, height, scale = options.scale, "template rasterized");
    Bitmap::from_opaque_rgba(width, height, pixmap.data())
}
