//! Document orchestration: file in, structured record out.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{IntakeError, Result};
use crate::form::{FormParser, IntakeFormParser, ParsedForm};
use crate::models::config::IntakeConfig;
use crate::ocr::{ImageNormalizer, OcrEngine, TesseractEngine, TextExtractor};
use crate::pdf::{PageRasterizer, PdftoppmRasterizer};
use crate::store::RecordStore;

/// How an input file is handled, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Rasterized page by page.
    Pdf,
    /// Any other file is decoded as a single raster image.
    Image,
}

impl DocumentKind {
    /// `.pdf` in any case is a PDF; everything else is an image.
    pub fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => Self::Pdf,
            _ => Self::Image,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document that went through OCR and parsing.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub source: PathBuf,
    pub kind: DocumentKind,
    pub page_count: usize,
    /// Sanitized text of all pages, joined with the page separator.
    pub text: String,
    pub form: ParsedForm,
    /// Total time in milliseconds, OCR included.
    pub processing_time_ms: u64,
}

/// A processed document whose record was persisted.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub patient_id: i64,
    pub document: ProcessedDocument,
}

/// Runs the full pipeline for one file at a time.
pub struct DocumentProcessor<E: OcrEngine, R: PageRasterizer> {
    extractor: TextExtractor<E>,
    rasterizer: R,
    parser: IntakeFormParser,
    page_separator: String,
}

impl DocumentProcessor<TesseractEngine, PdftoppmRasterizer> {
    /// Build the production pipeline from configuration.
    pub fn from_config(config: &IntakeConfig) -> Self {
        let normalizer = ImageNormalizer::new().with_denoise(config.preprocessing.denoise);
        Self::new(
            TesseractEngine::from_config(&config.ocr),
            PdftoppmRasterizer::from_config(&config.pdf),
        )
        .with_normalizer(normalizer)
        .with_page_separator(config.parsing.page_separator.clone())
    }
}

impl<E: OcrEngine, R: PageRasterizer> DocumentProcessor<E, R> {
    pub fn new(engine: E, rasterizer: R) -> Self {
        Self {
            extractor: TextExtractor::new(engine),
            rasterizer,
            parser: IntakeFormParser::new(),
            page_separator: "\n\n".to_string(),
        }
    }

    /// Replace the page normalizer.
    pub fn with_normalizer(mut self, normalizer: ImageNormalizer) -> Self {
        self.extractor = self.extractor.with_normalizer(normalizer);
        self
    }

    /// Set the text inserted between pages.
    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = separator.into();
        self
    }

    /// The OCR engine in use.
    pub fn engine(&self) -> &E {
        self.extractor.engine()
    }

    /// The PDF rasterizer in use.
    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Sanitized text of the whole document.
    pub fn extract_text(&self, path: &Path) -> Result<String> {
        let pages = self.extract_pages(path, &mut |_, _| {})?;
        Ok(pages.join(&self.page_separator))
    }

    /// Sanitized text of each page, in page order.
    ///
    /// `progress` is called with `(page, total)` after each page, 1-based.
    pub fn extract_pages(
        &self,
        path: &Path,
        progress: &mut dyn FnMut(usize, usize),
    ) -> Result<Vec<String>> {
        if !path.is_file() {
            return Err(IntakeError::InputNotFound(path.to_path_buf()));
        }

        match DocumentKind::from_path(path) {
            DocumentKind::Pdf => self.extract_pdf_pages(path, progress),
            DocumentKind::Image => {
                let image = image::open(path)?;
                let text = self.extractor.extract(&image)?;
                progress(1, 1);
                Ok(vec![text])
            }
        }
    }

    fn extract_pdf_pages(
        &self,
        path: &Path,
        progress: &mut dyn FnMut(usize, usize),
    ) -> Result<Vec<String>> {
        // Rasters are removed when `document` drops, on success or error.
        let document = self.rasterizer.rasterize(path)?;
        let total = document.page_count();
        info!("Extracting text from {} pages of {}", total, path.display());

        let mut pages = Vec::with_capacity(total);
        for index in 0..total {
            let image = document.load_page(index)?;
            let text = self.extractor.extract(&image)?;
            drop(image);
            document.discard_page(index)?;

            debug!("Page {}/{}: {} characters", index + 1, total, text.len());
            pages.push(text);
            progress(index + 1, total);
        }

        Ok(pages)
    }

    /// OCR and parse a document without persisting it.
    pub fn process(&self, path: &Path) -> Result<ProcessedDocument> {
        self.process_with_progress(path, &mut |_, _| {})
    }

    /// [`process`](Self::process) with a per-page progress callback.
    pub fn process_with_progress(
        &self,
        path: &Path,
        progress: &mut dyn FnMut(usize, usize),
    ) -> Result<ProcessedDocument> {
        let start = Instant::now();
        let kind = DocumentKind::from_path(path);
        info!("Processing {} as {}", path.display(), kind);

        let pages = self.extract_pages(path, progress)?;
        let text = pages.join(&self.page_separator);
        let form = self.parser.parse(&text);

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Processed {} ({} pages) in {}ms",
            path.display(),
            pages.len(),
            processing_time_ms
        );

        Ok(ProcessedDocument {
            source: path.to_path_buf(),
            kind,
            page_count: pages.len(),
            text,
            form,
            processing_time_ms,
        })
    }

    /// Full pipeline: OCR, parse, then persist the record.
    pub fn process_and_store<S: RecordStore>(
        &self,
        path: &Path,
        store: &S,
    ) -> Result<StoredDocument> {
        let document = self.process(path)?;
        self.store(document, store)
    }

    /// Persist the record of an already processed document.
    pub fn store<S: RecordStore>(
        &self,
        document: ProcessedDocument,
        store: &S,
    ) -> Result<StoredDocument> {
        let patient_id = store.save(&document.form.record)?;
        info!("Saved {} as patient {}", document.source.display(), patient_id);

        Ok(StoredDocument {
            patient_id,
            document,
        })
    }
}
