//! Configuration structures for the intake pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Environment variable overriding [`OcrConfig::tesseract_path`].
pub const ENV_TESSERACT_PATH: &str = "INTAKE_TESSERACT_PATH";
/// Environment variable overriding [`PdfConfig::pdftoppm_path`].
pub const ENV_PDFTOPPM_PATH: &str = "INTAKE_PDFTOPPM_PATH";
/// Environment variable overriding [`StoreConfig::database_path`].
pub const ENV_DATABASE_PATH: &str = "INTAKE_DATABASE_PATH";

/// Main configuration for the intake pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// PDF rasterization configuration.
    pub pdf: PdfConfig,

    /// Page image normalization.
    pub preprocessing: PreprocessingConfig,

    /// Text assembly and parsing.
    pub parsing: ParsingConfig,

    /// Record storage.
    pub store: StoreConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Path to (or name of) the tesseract binary.
    pub tesseract_path: PathBuf,

    /// Tesseract language code.
    pub language: String,

    /// Tesseract page segmentation mode. 6 = single uniform block of text.
    pub page_segmentation_mode: u8,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            page_segmentation_mode: 6,
        }
    }
}

/// PDF rasterization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Path to (or name of) the pdftoppm binary.
    pub pdftoppm_path: PathBuf,

    /// DPI for rendering PDF pages to images.
    pub render_dpi: u32,

    /// Maximum pages to rasterize (0 = unlimited).
    pub max_pages: u32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            pdftoppm_path: PathBuf::from("pdftoppm"),
            render_dpi: 200,
            max_pages: 0,
        }
    }
}

/// Page image normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Apply the 5x5 Gaussian blur before thresholding.
    pub denoise: bool,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self { denoise: true }
    }
}

/// Text assembly configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Inserted between consecutive pages of a multi-page document.
    pub page_separator: String,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            page_separator: "\n\n".to_string(),
        }
    }
}

/// Record storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file.
    pub database_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("intake.db"),
        }
    }
}

impl IntakeConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Resolve the effective configuration at startup: the file (if any),
    /// then environment overrides.
    pub fn resolve(path: Option<&Path>) -> Result<Self, std::io::Error> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(&std::env::vars().collect())
    }

    /// Apply overrides from a provided variable map (useful for testing).
    pub fn with_overrides_from(mut self, env: &HashMap<String, String>) -> Self {
        let lookup = |name: &str| {
            env.get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };

        if let Some(path) = lookup(ENV_TESSERACT_PATH) {
            debug!("{} overrides tesseract path: {}", ENV_TESSERACT_PATH, path.display());
            self.ocr.tesseract_path = path;
        }
        if let Some(path) = lookup(ENV_PDFTOPPM_PATH) {
            debug!("{} overrides pdftoppm path: {}", ENV_PDFTOPPM_PATH, path.display());
            self.pdf.pdftoppm_path = path;
        }
        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            debug!("{} overrides database path: {}", ENV_DATABASE_PATH, path.display());
            self.store.database_path = path;
        }

        self
    }
}
