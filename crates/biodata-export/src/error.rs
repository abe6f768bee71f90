use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    #[error("template parse error: {0}")]
    TemplateParse(String),

    #[error("rasterization failed: {0}")]
    Raster(String),

    #[error("image encoding failed: {0}")]
    Encode(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("invalid page layout: {0}")]
    Layout(String),

    #[error("failed to save {filename}: {source}")]
    Sink {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<tera::Error> for ExportError {
    fn from(e: tera::Error) -> Self {
        ExportError::TemplateRender(e.to_string())
    }
}
