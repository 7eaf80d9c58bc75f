//! Page normalization and OCR text extraction.

mod extractor;
mod preprocessing;
mod sanitize;
mod tesseract;

pub use extractor::TextExtractor;
pub use preprocessing::{binarize, gaussian_blur_5x5, otsu_threshold, ImageNormalizer};
pub use sanitize::sanitize_ocr_text;
pub use tesseract::TesseractEngine;

use image::GrayImage;

use crate::error::OcrError;

/// An OCR engine: binarized page in, raw text out.
///
/// The engine is treated as a black box. Implementations block until the
/// text is available and report any failure as fatal for the page.
pub trait OcrEngine {
    /// Recognize the text on a normalized page image.
    fn recognize(&self, image: &GrayImage) -> Result<String, OcrError>;
}

impl<E: OcrEngine + ?Sized> OcrEngine for &E {
    fn recognize(&self, image: &GrayImage) -> Result<String, OcrError> {
        (**self).recognize(image)
    }
}

impl<E: OcrEngine + ?Sized> OcrEngine for Box<E> {
    fn recognize(&self, image: &GrayImage) -> Result<String, OcrError> {
        (**self).recognize(image)
    }
}
