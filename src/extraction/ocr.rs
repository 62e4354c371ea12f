//! Page rasterization and character recognition for scanned PDFs.
//!
//! Both collaborators are traits so the fallback path can be exercised without external tools.
//! The default implementations shell out to poppler's `pdftoppm` and to `tesseract`.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::config::Config;

use super::types::ExtractionError;

/// A rendered page image on disk. The file is deleted when the value is dropped.
#[derive(Debug)]
pub struct RenderedPage {
    path: PathBuf,
    page: u32,
}

impl RenderedPage {
    /// Wrap an image file produced for `page`.
    pub fn new(path: PathBuf, page: u32) -> Self {
        Self { path, page }
    }

    /// Location of the image file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }
}

impl Drop for RenderedPage {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %self.path.display(), error = %err, "Failed to remove page image");
            }
        }
    }
}

/// Renders a single PDF page to an image.
pub trait PageRasterizer: Send + Sync {
    /// Render 1-based `page` of `pdf` into `workdir`.
    fn render_page(
        &self,
        pdf: &Path,
        page: u32,
        workdir: &Path,
    ) -> Result<RenderedPage, ExtractionError>;
}

/// Recognizes text in a page image.
pub trait OcrEngine: Send + Sync {
    /// Return whatever text the engine recognizes, possibly empty.
    fn recognize(&self, image: &RenderedPage) -> Result<String, ExtractionError>;
}

/// Rasterizer backed by poppler's `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    command: PathBuf,
    dpi: u32,
}

impl PdftoppmRasterizer {
    /// Build a rasterizer that invokes `command` at `dpi`.
    pub fn new(command: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            command: command.into(),
            dpi: dpi.max(1),
        }
    }

    /// Build a rasterizer from runtime configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.pdftoppm_cmd.clone(), config.ocr_dpi)
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn render_page(
        &self,
        pdf: &Path,
        page: u32,
        workdir: &Path,
    ) -> Result<RenderedPage, ExtractionError> {
        let prefix = workdir.join(format!("page-{page}"));
        let page_arg = page.to_string();
        tracing::debug!(page, dpi = self.dpi, "Rasterizing PDF page");
        let output = Command::new(&self.command)
            .arg("-r")
            .arg(self.dpi.to_string())
            .args(["-png", "-singlefile", "-f", &page_arg, "-l", &page_arg])
            .arg(pdf)
            .arg(&prefix)
            .output()
            .map_err(|err| ExtractionError::Rasterizer {
                page,
                message: spawn_failure(&self.command, &err),
            })?;
        ensure_success(&output).map_err(|message| ExtractionError::Rasterizer { page, message })?;

        let image = prefix.with_extension("png");
        if !image.exists() {
            return Err(ExtractionError::Rasterizer {
                page,
                message: format!("expected output {} was not produced", image.display()),
            });
        }
        Ok(RenderedPage::new(image, page))
    }
}

/// OCR engine backed by the `tesseract` command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    command: PathBuf,
    language: String,
}

impl TesseractOcr {
    /// Build an engine that invokes `command` with language `language`.
    pub fn new(command: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }

    /// Build an engine from runtime configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tesseract_cmd.clone(), config.ocr_language.clone())
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &RenderedPage) -> Result<String, ExtractionError> {
        let page = image.page();
        let output = Command::new(&self.command)
            .arg(image.path())
            .arg("stdout")
            .args(["-l", &self.language])
            .output()
            .map_err(|err| ExtractionError::Ocr {
                page,
                message: spawn_failure(&self.command, &err),
            })?;
        ensure_success(&output).map_err(|message| ExtractionError::Ocr { page, message })?;

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!(page, chars = text.chars().count(), "Recognized page text");
        Ok(text)
    }
}

fn spawn_failure(command: &Path, err: &std::io::Error) -> String {
    if err.kind() == std::io::ErrorKind::NotFound {
        format!("`{}` was not found on PATH", command.display())
    } else {
        format!("failed to run `{}`: {err}", command.display())
    }
}

fn ensure_success(output: &Output) -> Result<(), String> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(format!("exited with {}: {}", output.status, stderr.trim()))
}
