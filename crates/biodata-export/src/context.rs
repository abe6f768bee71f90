use jiff::tz::TimeZone;

use crate::raster::RasterOptions;
use crate::styles::{DocumentStyles, PageLayout};

/// Everything an export needs besides the record itself.
///
/// Passed explicitly into each export instead of living in globals.
#[derive(Debug, Clone)]
pub struct ExportContext {
    pub styles: DocumentStyles,
    pub layout: PageLayout,
    pub raster: RasterOptions,
    /// JPEG quality (1-100) of the bitmap embedded in the PDF.
    pub jpeg_quality: u8,
    /// Zone used for the "Generated on" footer.
    pub time_zone: TimeZone,
}

impl Default for ExportContext {
    fn default() -> Self {
        Self {
            styles: DocumentStyles::default(),
            layout: PageLayout::default(),
            raster: RasterOptions::default(),
            jpeg_quality: 100,
            time_zone: TimeZone::system(),
        }
    }
}
