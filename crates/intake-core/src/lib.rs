//! Core library for medical intake form digitization.
//!
//! This crate provides:
//! - PDF page rasterization (pdftoppm, preflighted with lopdf)
//! - Page normalization (Gaussian denoise + Otsu binarization) and Tesseract OCR
//! - Rule-based extraction of intake fields into a fully shaped record
//! - Record persistence (SQLite)

pub mod error;
pub mod form;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod store;

#[cfg(test)]
mod testing;

pub use error::{IntakeError, OcrError, PdfError, Result, StoreError};
pub use form::{Field, FormParser, IntakeFormParser, ParsedForm};
pub use models::config::IntakeConfig;
pub use models::record::{PainSymptoms, PatientRecord, VitalSigns, YesNo};
pub use ocr::{ImageNormalizer, OcrEngine, TesseractEngine, TextExtractor};
pub use pdf::{PageRasterizer, PdftoppmRasterizer, RasterizedDocument};
pub use pipeline::{DocumentKind, DocumentProcessor, ProcessedDocument, StoredDocument};
pub use store::{RecordStore, StoredPatient};
#[cfg(feature = "sqlite")]
pub use store::SqliteRecordStore;
