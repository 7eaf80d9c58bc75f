//! Normalize-then-recognize for a single page.

use image::DynamicImage;
use tracing::debug;

use crate::error::OcrError;

use super::{sanitize_ocr_text, ImageNormalizer, OcrEngine};

/// Runs one page through the normalizer, the OCR engine and sanitization.
pub struct TextExtractor<E: OcrEngine> {
    engine: E,
    normalizer: ImageNormalizer,
}

impl<E: OcrEngine> TextExtractor<E> {
    /// Create an extractor with the default normalizer.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            normalizer: ImageNormalizer::new(),
        }
    }

    /// Replace the normalizer.
    pub fn with_normalizer(mut self, normalizer: ImageNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Extract sanitized text from one page image.
    pub fn extract(&self, page: &DynamicImage) -> Result<String, OcrError> {
        let normalized = self.normalizer.normalize(page)?;
        let raw = self.engine.recognize(&normalized)?;
        let text = sanitize_ocr_text(&raw);

        debug!("Extracted text:\n{}", text);

        Ok(text)
    }
}
