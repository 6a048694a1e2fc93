use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ScanConfig;
use crate::extract;
use crate::rasterize::{PdfRasterizer, RasterizeError};
use crate::recognizer::{OcrBackend, OcrError};
use crate::types::ReceiptScan;
use crate::upload::{self, MediaKind, UploadError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Upload rejected: {0}")]
    Upload(#[from] UploadError),
    #[error("PDF rasterization failed: {0}")]
    Rasterize(#[from] RasterizeError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Orchestrates: detect → (rasterize first PDF page) → OCR → total extraction.
///
/// The rasterizer and recognizer are blocking and run on tokio's blocking
/// pool. A receipt without a recognizable total is still a successful scan.
pub struct ReceiptPipeline<R: OcrBackend, P: PdfRasterizer> {
    recognizer: Arc<R>,
    rasterizer: Arc<P>,
    config: ScanConfig,
}

impl<R, P> ReceiptPipeline<R, P>
where
    R: OcrBackend + 'static,
    P: PdfRasterizer + 'static,
{
    pub fn new(recognizer: R, rasterizer: P, config: ScanConfig) -> Self {
        Self {
            recognizer: Arc::new(recognizer),
            rasterizer: Arc::new(rasterizer),
            config,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Process a file on disk; its extension serves as the type hint.
    pub async fn process_file<F>(&self, path: &Path, progress: F) -> Result<ReceiptScan, PipelineError>
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        let bytes = tokio::fs::read(path).await?;
        let ext = path.extension().and_then(|e| e.to_str());
        self.process_bytes(bytes, ext, progress).await
    }

    /// Process an uploaded receipt. `hint` is a MIME type or file extension.
    pub async fn process_bytes<F>(
        &self,
        data: Vec<u8>,
        hint: Option<&str>,
        progress: F,
    ) -> Result<ReceiptScan, PipelineError>
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        let kind = upload::detect(&data, hint, self.config.max_upload_bytes)?;
        tracing::info!("Processing {kind} receipt ({})", upload::human_size(data.len() as u64));

        let image = match kind {
            MediaKind::Image => data,
            MediaKind::Pdf => {
                let rasterizer = Arc::clone(&self.rasterizer);
                let options = self.config.rasterize_options();
                tokio::task::spawn_blocking(move || rasterizer.render_first_page(&data, options))
                    .await?
                    .inspect_err(|e| tracing::warn!("PDF processing failed: {e}"))?
            }
        };

        let recognizer = Arc::clone(&self.recognizer);
        let text = tokio::task::spawn_blocking(move || {
            recognizer.recognize(&image, &|p| progress(p.clamp(0.0, 1.0)))
        })
        .await?
        .inspect_err(|e| tracing::warn!("OCR processing failed: {e}"))?;

        let matched = extract::find_total(&text);
        match &matched {
            Some(m) => tracing::info!("Receipt total {} (keyword {:?})", m.amount, m.keyword),
            None => tracing::info!("No total found in {} chars of OCR text", text.len()),
        }

        Ok(ReceiptScan {
            kind,
            amount: matched.as_ref().map(|m| m.amount),
            matched,
            text,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
