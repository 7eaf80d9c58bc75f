//! PDF rasterization with poppler's `pdftoppm`, preflighted with lopdf.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use lopdf::Document;
use tracing::{debug, info, warn};

use super::{PageRasterizer, RasterizedDocument, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// Renders PDF pages to PNG files by running `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    binary: PathBuf,
    dpi: u32,
    max_pages: u32,
}

impl PdftoppmRasterizer {
    /// Create a rasterizer for the given binary at 200 DPI.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            dpi: 200,
            max_pages: 0,
        }
    }

    /// Create a rasterizer from configuration.
    pub fn from_config(config: &PdfConfig) -> Self {
        Self::new(&config.pdftoppm_path)
            .with_dpi(config.render_dpi)
            .with_max_pages(config.max_pages)
    }

    /// Set render resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Limit the number of rendered pages (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Check whether the binary can be started.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary).arg("-v").output().is_ok()
    }

    /// Parse the PDF and return its page count.
    ///
    /// Encrypted documents are accepted only when the empty user password
    /// opens them.
    pub fn inspect(&self, pdf_path: &Path) -> Result<u32> {
        let mut doc = Document::load(pdf_path).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let page_count = doc.get_pages().len() as u32;
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(page_count)
    }

    fn expected_pages(&self, page_count: u32) -> u32 {
        if self.max_pages > 0 {
            page_count.min(self.max_pages)
        } else {
            page_count
        }
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize(&self, pdf_path: &Path) -> Result<RasterizedDocument> {
        let start = Instant::now();
        // lopdf is stricter than poppler: a parse failure alone is not fatal
        let (expected, preflight_error) = match self.inspect(pdf_path) {
            Ok(page_count) => (Some(self.expected_pages(page_count)), None),
            Err(PdfError::Parse(reason)) => {
                warn!(
                    "lopdf could not parse {}: {}; trying pdftoppm",
                    pdf_path.display(),
                    reason
                );
                (None, Some(reason))
            }
            Err(e) => return Err(e),
        };

        let dir = tempfile::Builder::new()
            .prefix("intake-pages-")
            .tempdir()
            .map_err(|e| PdfError::Rasterize(format!("failed to create temp dir: {}", e)))?;
        let prefix = dir.path().join("page");

        let mut command = Command::new(&self.binary);
        command.arg("-r").arg(self.dpi.to_string()).arg("-png");
        if self.max_pages > 0 {
            command.arg("-l").arg(self.max_pages.to_string());
        }
        command.arg(pdf_path).arg(&prefix);

        let output = command.output().map_err(|e| PdfError::RasterizerUnavailable {
            path: self.binary.clone(),
            reason: e.to_string(),
        })?;

        if !output.status.success() {
            if let Some(reason) = preflight_error {
                return Err(PdfError::Parse(reason));
            }
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PdfError::Rasterize(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        let pages = collect_page_files(dir.path())
            .map_err(|e| PdfError::Rasterize(format!("failed to list rendered pages: {}", e)))?;

        if pages.is_empty() {
            return Err(PdfError::NoImages);
        }
        if let Some(expected) = expected.filter(|&n| n != pages.len() as u32) {
            warn!(
                "pdftoppm rendered {} pages, expected {}",
                pages.len(),
                expected
            );
        }

        info!(
            "Rasterized {} pages at {} DPI in {}ms",
            pages.len(),
            self.dpi,
            start.elapsed().as_millis()
        );

        Ok(RasterizedDocument::new(dir, pages))
    }
}

/// PNG files in `dir`, ordered by the page number pdftoppm appends.
fn collect_page_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut pages: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("png"))
                .unwrap_or(false)
        })
        .collect();

    pages.sort_by(|a, b| {
        page_number(a)
            .cmp(&page_number(b))
            .then_with(|| a.cmp(b))
    });
    Ok(pages)
}

/// `page-07.png` -> 7
fn page_number(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    stem.rsplit('-').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Object, Stream};

    fn write_pdf(path: &Path, pages: usize) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids = Vec::new();
        for _ in 0..pages {
            let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::from(page_id));
        }

        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_inspect_counts_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.pdf");
        write_pdf(&path, 2);

        let rasterizer = PdftoppmRasterizer::new("pdftoppm");
        assert_eq!(rasterizer.inspect(&path).unwrap(), 2);
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let rasterizer = PdftoppmRasterizer::new("pdftoppm");
        assert!(matches!(rasterizer.inspect(&path), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_missing_binary_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.pdf");
        write_pdf(&path, 1);

        let rasterizer = PdftoppmRasterizer::new("/nonexistent/intake/pdftoppm");
        assert!(!rasterizer.is_available());
        assert!(matches!(
            rasterizer.rasterize(&path),
            Err(PdfError::RasterizerUnavailable { .. })
        ));
    }

    #[test]
    fn test_unparseable_pdf_still_goes_to_pdftoppm() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let rasterizer = PdftoppmRasterizer::new("/nonexistent/intake/pdftoppm");
        assert!(matches!(
            rasterizer.rasterize(&path),
            Err(PdfError::RasterizerUnavailable { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_unparseable_pdf_rendered_by_pdftoppm() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lenient.pdf");
        std::fs::write(&path, b"%PDF-1.4 with a broken xref").unwrap();

        // Stand-in binary that writes one page next to the output prefix.
        let fake = dir.path().join("fake-pdftoppm");
        let script = "#!/bin/sh\nfor last; do :; done\n: > \"$last-1.png\"\n";
        std::fs::write(&fake, script).unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let document = PdftoppmRasterizer::new(&fake).rasterize(&path).unwrap();
        assert_eq!(document.page_count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_unparseable_pdf_rejected_by_pdftoppm_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let rasterizer = PdftoppmRasterizer::new("false");
        assert!(matches!(rasterizer.rasterize(&path), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_page_files_sorted_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["page-10.png", "page-2.png", "page-1.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let pages = collect_page_files(dir.path()).unwrap();
        let names: Vec<_> = pages
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["page-1.png", "page-2.png", "page-10.png"]);
    }

    #[test]
    fn test_expected_pages() {
        let rasterizer = PdftoppmRasterizer::new("pdftoppm").with_max_pages(3);
        assert_eq!(rasterizer.expected_pages(10), 3);
        assert_eq!(rasterizer.expected_pages(2), 2);
        assert_eq!(PdftoppmRasterizer::new("pdftoppm").expected_pages(10), 10);
    }
}
