//! In-process fakes for the OCR and rasterizer collaborators.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};

use crate::error::{OcrError, PdfError};
use crate::ocr::OcrEngine;
use crate::pdf::{PageRasterizer, RasterizedDocument};

/// Returns scripted text, one entry per call, in order.
pub struct ScriptedOcr {
    responses: RefCell<VecDeque<Result<String, String>>>,
    seen: RefCell<Vec<GrayImage>>,
}

impl ScriptedOcr {
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: RefCell::new(pages.into_iter().map(|p| Ok(p.into())).collect()),
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self::from_results([Err(message.to_string())])
    }

    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = Result<String, String>>,
    {
        Self {
            responses: RefCell::new(results.into_iter().collect()),
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn seen_images(&self) -> Vec<GrayImage> {
        self.seen.borrow().clone()
    }

    pub fn calls(&self) -> usize {
        self.seen.borrow().len()
    }
}

impl OcrEngine for ScriptedOcr {
    fn recognize(&self, image: &GrayImage) -> Result<String, OcrError> {
        self.seen.borrow_mut().push(image.clone());
        match self.responses.borrow_mut().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(OcrError::Engine(message)),
            None => Err(OcrError::Engine("no scripted response left".to_string())),
        }
    }
}

/// Writes `pages` blank PNG rasters into a scoped temp dir.
pub struct BlankPageRasterizer {
    pages: usize,
    last_dir: RefCell<Option<PathBuf>>,
}

impl BlankPageRasterizer {
    pub fn new(pages: usize) -> Self {
        Self {
            pages,
            last_dir: RefCell::new(None),
        }
    }

    /// Directory used by the most recent rasterization.
    pub fn last_dir(&self) -> Option<PathBuf> {
        self.last_dir.borrow().clone()
    }
}

impl PageRasterizer for BlankPageRasterizer {
    fn rasterize(&self, _pdf_path: &Path) -> Result<RasterizedDocument, PdfError> {
        let dir = tempfile::tempdir().map_err(|e| PdfError::Rasterize(e.to_string()))?;
        let mut pages = Vec::with_capacity(self.pages);
        for i in 1..=self.pages {
            let path = dir.path().join(format!("page-{}.png", i));
            GrayImage::from_pixel(12, 12, Luma([255]))
                .save(&path)
                .map_err(|e| PdfError::Rasterize(e.to_string()))?;
            pages.push(path);
        }
        *self.last_dir.borrow_mut() = Some(dir.path().to_path_buf());
        Ok(RasterizedDocument::new(dir, pages))
    }
}

/// Write a small light-gray PNG page and return its path.
pub fn write_page_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    GrayImage::from_pixel(12, 12, Luma([240])).save(&path).unwrap();
    path
}
