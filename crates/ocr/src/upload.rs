use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Uploads bigger than this are refused unless configured otherwise.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Uploaded file is empty")]
    Empty,
    #[error("File is {size}, larger than the {limit} limit")]
    TooLarge { size: String, limit: String },
    #[error("Unsupported file type: expected an image or a PDF")]
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Pdf,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Pdf => write!(f, "pdf"),
        }
    }
}

impl MediaKind {
    /// `image/*` or `application/pdf`; parameters such as `; charset=` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next()?.trim().to_ascii_lowercase();
        if essence == "application/pdf" {
            Some(MediaKind::Pdf)
        } else if essence.starts_with("image/") {
            Some(MediaKind::Image)
        } else {
            None
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(MediaKind::Pdf),
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "tif" | "tiff" => {
                Some(MediaKind::Image)
            }
            _ => None,
        }
    }

    /// Identify the content from its leading magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"%PDF-") {
            return Some(MediaKind::Pdf);
        }
        image::guess_format(data).ok().map(|_| MediaKind::Image)
    }
}

/// Decide how to treat an upload. The content itself wins over the caller's
/// hint (a MIME type or file extension), which only breaks ties when the bytes
/// are unrecognizable.
pub fn detect(data: &[u8], hint: Option<&str>, max_bytes: u64) -> Result<MediaKind, UploadError> {
    if data.is_empty() {
        return Err(UploadError::Empty);
    }
    let size = data.len() as u64;
    if size > max_bytes {
        return Err(UploadError::TooLarge {
            size: human_size(size),
            limit: human_size(max_bytes),
        });
    }

    MediaKind::sniff(data)
        .or_else(|| {
            let hint = hint?;
            if hint.contains('/') {
                MediaKind::from_mime(hint)
            } else {
                MediaKind::from_extension(hint)
            }
        })
        .ok_or(UploadError::Unsupported)
}

/// File size in megabytes with two decimals, e.g. `"1.50 MB"`.
pub fn human_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}
