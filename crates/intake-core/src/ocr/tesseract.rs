//! Tesseract OCR engine driven through its command-line binary.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use image::{GrayImage, ImageFormat};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::OcrEngine;

/// OCR engine backed by an external `tesseract` binary.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    language: String,
    page_segmentation_mode: u8,
}

impl TesseractEngine {
    /// Create an engine for the given binary with English, single-block
    /// segmentation.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            language: "eng".to_string(),
            page_segmentation_mode: 6,
        }
    }

    /// Create an engine from configuration.
    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(&config.tesseract_path)
            .with_language(&config.language)
            .with_page_segmentation_mode(config.page_segmentation_mode)
    }

    /// Set the tesseract language code.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the page segmentation mode.
    pub fn with_page_segmentation_mode(mut self, psm: u8) -> Self {
        self.page_segmentation_mode = psm;
        self
    }

    /// Path of the configured binary.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Check whether the binary can be started.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn command_args(&self, image_path: &Path) -> Vec<OsString> {
        vec![
            image_path.as_os_str().to_os_string(),
            "stdout".into(),
            "-l".into(),
            self.language.clone().into(),
            "--psm".into(),
            self.page_segmentation_mode.to_string().into(),
        ]
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &GrayImage) -> Result<String, OcrError> {
        let start = Instant::now();

        // Removed when `staged` drops, on success or error.
        let staged = tempfile::Builder::new()
            .prefix("intake-ocr-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::TempFile(e.to_string()))?;

        image
            .save_with_format(staged.path(), ImageFormat::Png)
            .map_err(|e| OcrError::TempFile(e.to_string()))?;

        debug!(
            "Running {} on {}x{} page",
            self.binary.display(),
            image.width(),
            image.height()
        );

        let output = Command::new(&self.binary)
            .args(self.command_args(staged.path()))
            .output()
            .map_err(|e| OcrError::EngineUnavailable {
                path: self.binary.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();

        info!(
            "OCR complete: {} chars in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_command_args() {
        let engine = TesseractEngine::new("/usr/bin/tesseract");
        let args = engine.command_args(Path::new("/tmp/page.png"));
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, ["/tmp/page.png", "stdout", "-l", "eng", "--psm", "6"]);
    }

    #[test]
    fn test_from_config() {
        let config = OcrConfig {
            tesseract_path: PathBuf::from("/opt/tesseract"),
            language: "eng".to_string(),
            page_segmentation_mode: 4,
        };
        let engine = TesseractEngine::from_config(&config);
        assert_eq!(engine.binary(), Path::new("/opt/tesseract"));
        assert_eq!(engine.page_segmentation_mode, 4);
    }

    #[test]
    fn test_missing_binary_is_fatal() {
        let engine = TesseractEngine::new("/nonexistent/intake/tesseract");
        assert!(!engine.is_available());

        let page = GrayImage::from_pixel(4, 4, Luma([255]));
        assert!(matches!(
            engine.recognize(&page),
            Err(OcrError::EngineUnavailable { .. })
        ));
    }
}
