use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterizeError {
    #[error("No PDF rasterizer configured")]
    NotAvailable,
    #[error("PDF has no pages")]
    NoPages,
    #[error("PDF render failed: {0}")]
    Render(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterizeOptions {
    /// Zoom applied to the page's natural size; OCR accuracy drops sharply
    /// below about 2x on typical receipt fonts.
    pub scale: f32,
}

impl Default for RasterizeOptions {
    fn default() -> Self {
        Self { scale: 2.5 }
    }
}

/// Turns the first page of a PDF into an encoded image the OCR backend can read.
pub trait PdfRasterizer: Send + Sync {
    fn render_first_page(
        &self,
        pdf_bytes: &[u8],
        options: RasterizeOptions,
    ) -> Result<Vec<u8>, RasterizeError>;
}

/// Rejects every PDF. Used when no rasterizer has been wired in.
pub struct NoRasterizer;

impl PdfRasterizer for NoRasterizer {
    fn render_first_page(
        &self,
        _pdf_bytes: &[u8],
        _options: RasterizeOptions,
    ) -> Result<Vec<u8>, RasterizeError> {
        Err(RasterizeError::NotAvailable)
    }
}
