//! PDF page rasterization.

mod rasterizer;

pub use rasterizer::PdftoppmRasterizer;

use std::path::{Path, PathBuf};

use image::DynamicImage;
use tempfile::TempDir;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Renders the pages of a PDF to raster images.
pub trait PageRasterizer {
    /// Render every page, in page order.
    fn rasterize(&self, pdf_path: &Path) -> Result<RasterizedDocument>;
}

impl<R: PageRasterizer + ?Sized> PageRasterizer for &R {
    fn rasterize(&self, pdf_path: &Path) -> Result<RasterizedDocument> {
        (**self).rasterize(pdf_path)
    }
}

impl<R: PageRasterizer + ?Sized> PageRasterizer for Box<R> {
    fn rasterize(&self, pdf_path: &Path) -> Result<RasterizedDocument> {
        (**self).rasterize(pdf_path)
    }
}

/// Page rasters living in a scoped temporary directory.
///
/// The directory and anything left in it are removed when this value drops,
/// including when processing stops early on an error.
#[derive(Debug)]
pub struct RasterizedDocument {
    pages: Vec<PathBuf>,
    dir: TempDir,
}

impl RasterizedDocument {
    /// Wrap page files (in page order) that live inside `dir`.
    pub fn new(dir: TempDir, pages: Vec<PathBuf>) -> Self {
        Self { pages, dir }
    }

    /// Number of rendered pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page raster paths in page order.
    pub fn pages(&self) -> &[PathBuf] {
        &self.pages
    }

    /// The temporary directory holding the rasters.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Decode the raster of page `index` (0-based).
    pub fn load_page(&self, index: usize) -> std::result::Result<DynamicImage, image::ImageError> {
        let path = self.pages.get(index).ok_or_else(|| {
            image::ImageError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no rendered page at index {}", index),
            ))
        })?;
        image::open(path)
    }

    /// Delete the raster of page `index` once its text has been extracted.
    pub fn discard_page(&self, index: usize) -> std::io::Result<()> {
        match self.pages.get(index) {
            Some(path) if path.exists() => std::fs::remove_file(path),
            _ => Ok(()),
        }
    }
}
