use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available — build with `tesseract` feature")]
    NotAvailable,
}

/// Abstraction over an OCR backend.
///
/// Implementations accept encoded image bytes (PNG/JPEG/…) and return the
/// recognized text. `progress` is called with the completed fraction of the
/// page, in `[0, 1]`, as recognition advances.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_bytes: &[u8], progress: &dyn Fn(f32)) -> Result<String, OcrError>;
}

/// Converts a progress fraction to the whole percentage shown to users.
pub fn percent(fraction: f32) -> u8 {
    if fraction.is_nan() {
        return 0;
    }
    (fraction.clamp(0.0, 1.0) * 100.0).floor() as u8
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set string, for exercising the pipeline without an OCR
/// engine installed.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8], progress: &dyn Fn(f32)) -> Result<String, OcrError> {
        progress(0.0);
        progress(1.0);
        Ok(self.text.clone())
    }
}

/// Stand-in used when the binary was built without an OCR engine.
pub struct UnavailableRecognizer;

impl OcrBackend for UnavailableRecognizer {
    fn recognize(&self, _image_bytes: &[u8], _progress: &dyn Fn(f32)) -> Result<String, OcrError> {
        Err(OcrError::NotAvailable)
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use leptess::LepTess;

    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>, lang: &str) -> Self {
            Self { data_path, lang: lang.to_string() }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        // leptess exposes no progress monitor, so only start and end are reported.
        fn recognize(&self, image_bytes: &[u8], progress: &dyn Fn(f32)) -> Result<String, OcrError> {
            progress(0.0);
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            let text = lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))?;
            progress(1.0);
            Ok(text)
        }
    }
}
