//! Error types for the intake-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the intake library.
///
/// Field-level extraction misses never show up here: the parser resolves them
/// to default values. Only input, OCR and persistence failures are surfaced.
#[derive(Error, Debug)]
pub enum IntakeError {
    /// The input document does not exist.
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// PDF loading or rasterization error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR engine error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Persistence error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntakeError {
    /// Whether the error was caused by the input document itself
    /// (missing, undecodable, unconvertible) rather than a collaborator.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::InputNotFound(_) | Self::Image(_) => true,
            Self::Pdf(err) => matches!(
                err,
                PdfError::Parse(_) | PdfError::Encrypted | PdfError::NoPages | PdfError::NoImages
            ),
            Self::Ocr(OcrError::InvalidImage(_)) => true,
            _ => false,
        }
    }
}

/// Errors related to PDF handling and page rasterization.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The rasterizer binary could not be started.
    #[error("rasterizer unavailable at {}: {reason}", .path.display())]
    RasterizerUnavailable { path: PathBuf, reason: String },

    /// The rasterizer ran but reported a failure.
    #[error("rasterization failed: {0}")]
    Rasterize(String),

    /// Rasterization produced no page images.
    #[error("rasterizer produced no page images")]
    NoImages,
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR engine binary could not be started.
    #[error("OCR engine unavailable at {}: {reason}", .path.display())]
    EngineUnavailable { path: PathBuf, reason: String },

    /// The OCR engine ran but reported a failure.
    #[error("OCR engine failed: {0}")]
    Engine(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Failed to stage the page image for the engine.
    #[error("failed to write temporary page image: {0}")]
    TempFile(String),
}

/// Errors related to record persistence.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error.
    #[cfg(feature = "sqlite")]
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to encode or decode the record document.
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No record stored under the requested patient id.
    #[error("no record for patient {0}")]
    NotFound(i64),
}

/// Result type for the intake library.
pub type Result<T> = std::result::Result<T, IntakeError>;
