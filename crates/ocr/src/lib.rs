pub mod config;
pub mod extract;
pub mod pipeline;
pub mod rasterize;
pub mod recognizer;
pub mod types;
pub mod upload;

pub use config::{ConfigError, ScanConfig};
pub use extract::{clean_amount, extract_total, find_total};
pub use pipeline::{PipelineError, ReceiptPipeline};
pub use rasterize::{NoRasterizer, PdfRasterizer, RasterizeError, RasterizeOptions};
pub use recognizer::{percent, MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer};
pub use types::{PatternFamily, ReceiptScan, TotalMatch};
pub use upload::{detect, human_size, MediaKind, UploadError};
