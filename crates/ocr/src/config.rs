use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::rasterize::RasterizeOptions;
use crate::upload::DEFAULT_MAX_UPLOAD_BYTES;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Receipt scanning settings, read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Tesseract language code.
    pub language: String,
    /// Directory holding `*.traineddata`; the engine default when unset.
    pub tessdata_path: Option<String>,
    pub pdf_render_scale: f32,
    pub max_upload_bytes: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            tessdata_path: None,
            pdf_render_scale: RasterizeOptions::default().scale,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ScanConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ScanConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Like [`ScanConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn rasterize_options(&self) -> RasterizeOptions {
        RasterizeOptions { scale: self.pdf_render_scale }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.language.trim().is_empty() {
            return Err(ConfigError::Invalid("language must not be empty".into()));
        }
        if !(self.pdf_render_scale.is_finite() && self.pdf_render_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "pdf_render_scale must be positive, got {}",
                self.pdf_render_scale
            )));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid("max_upload_bytes must be positive".into()));
        }
        Ok(())
    }
}
