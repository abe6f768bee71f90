use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Visual styling of the rendered template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStyles {
    /// Font family for body text.
    pub body_font: String,

    /// Font family for the title and section headings.
    pub heading_font: String,

    /// Body text size in px.
    pub body_size: f32,

    /// Section heading size in px.
    pub heading_size: f32,

    /// Title size in px.
    pub title_size: f32,

    /// Footer ("Generated on") size in px.
    pub footer_size: f32,

    /// Title, rule and heading color.
    pub accent_color: String,

    /// Fixed template width in px. Height follows the content.
    pub template_width: u32,

    /// Inner padding on every side, in px.
    pub padding: f32,

    /// Width of the label column, in px.
    pub label_width: f32,
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            body_font: "sans-serif".to_string(),
            heading_font: "sans-serif".to_string(),
            body_size: 14.0,
            heading_size: 18.0,
            title_size: 28.0,
            footer_size: 11.0,
            accent_color: "#007bff".to_string(),
            template_width: 794,
            padding: 40.0,
            label_width: 150.0,
        }
    }
}

impl DocumentStyles {
    pub fn line_height(&self) -> f32 {
        self.body_size * 1.6
    }
}

/// Page geometry of the generated PDF, in inches.
///
/// Defaults to portrait letter with the image spanning 7.5 in at 0.5 in
/// left and top margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub page_width: f64,
    pub page_height: f64,
    pub image_x: f64,
    /// Top margin of the first page. Later pages shift by the same amount,
    /// so slicing is unaffected.
    pub image_y: f64,
    pub image_width: f64,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width: 8.5,
            page_height: 11.0,
            image_x: 0.5,
            image_y: 0.5,
            image_width: 7.5,
        }
    }
}

pub const POINTS_PER_INCH: f64 = 72.0;

impl PageLayout {
    pub fn validate(&self) -> Result<(), ExportError> {
        let positive = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("image_width", self.image_width),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ExportError::Layout(format!("{name} must be positive, got {value}")));
            }
        }
        if !(self.image_x.is_finite() && self.image_x >= 0.0) {
            return Err(ExportError::Layout(format!(
                "image_x must not be negative, got {}",
                self.image_x
            )));
        }
        if !(self.image_y.is_finite() && self.image_y >= 0.0 && self.image_y < self.page_height) {
            return Err(ExportError::Layout(format!(
                "image_y must lie within the page, got {}",
                self.image_y
            )));
        }
        if self.image_x + self.image_width > self.page_width + 1e-9 {
            return Err(ExportError::Layout(format!(
                "image ({} in at x={} in) does not fit a {} in page",
                self.image_width, self.image_x, self.page_width
            )));
        }
        Ok(())
    }

    /// Height of a `width × height` px bitmap once scaled to `image_width`,
    /// preserving aspect ratio.
    pub fn scaled_height(&self, width_px: u32, height_px: u32) -> f64 {
        if width_px == 0 {
            return 0.0;
        }
        f64::from(height_px) * self.image_width / f64::from(width_px)
    }
}
