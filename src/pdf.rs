//! Fixed-layout PDF conversion seam.
//!
//! The crate never paginates anything itself — it guarantees the HTML/CSS
//! contract (forced page breaks, image max-height bound, print font family)
//! and hands the print artifact to an external layout engine behind the
//! [`LayoutEngine`] trait. The production implementation shells out to the
//! WeasyPrint CLI; tests swap in a recording mock.
//!
//! An absent engine is not an error: [`write_pdf`] returns `Ok(None)` and
//! the caller ships HTML-only artifacts. Only a failed conversion from a
//! present engine is.

use crate::naming;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Auxiliary page-box stylesheet handed to the engine alongside the print
/// HTML.
const PAGE_CSS: &str = include_str!("../static/page.css");

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("layout engine failed: {0}")]
    EngineFailed(String),
}

/// A document-layout engine that turns paginated HTML into a PDF.
pub trait LayoutEngine {
    /// Name used in log messages and hints.
    fn name(&self) -> &str;

    /// Whether the engine can run at all on this machine.
    fn available(&self) -> bool;

    /// Convert `html` to `pdf`, honoring `stylesheet` as an extra
    /// user-agent stylesheet.
    fn convert(&self, html: &Path, stylesheet: &Path, pdf: &Path) -> Result<(), PdfError>;
}

/// The WeasyPrint CLI (`weasyprint input.html output.pdf -s page.css`).
pub struct WeasyPrint {
    command: String,
}

impl WeasyPrint {
    pub fn new(command: impl Into<String>) -> Self {
        WeasyPrint {
            command: command.into(),
        }
    }
}

impl LayoutEngine for WeasyPrint {
    fn name(&self) -> &str {
        &self.command
    }

    fn available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    fn convert(&self, html: &Path, stylesheet: &Path, pdf: &Path) -> Result<(), PdfError> {
        let output = Command::new(&self.command)
            .arg(html)
            .arg(pdf)
            .arg("-s")
            .arg(stylesheet)
            .output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(PdfError::EngineFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }
}

/// Convert a rendered print artifact to `{safe_prompt}_print.pdf` in the
/// story directory.
///
/// Writes the auxiliary page stylesheet next to the HTML first, so the
/// engine invocation is reproducible by hand. `Ok(None)` means the engine
/// is not installed and the HTML artifacts stand alone.
pub fn write_pdf(
    engine: &dyn LayoutEngine,
    html_path: &Path,
    dir: &Path,
    prompt: &str,
) -> Result<Option<PathBuf>, PdfError> {
    if !engine.available() {
        log::warn!(
            "layout engine '{}' not found; keeping HTML-only artifacts",
            engine.name()
        );
        return Ok(None);
    }

    let stylesheet = dir.join("page.css");
    fs::write(&stylesheet, PAGE_CSS)?;

    let pdf_path = dir.join(naming::print_pdf_name(prompt));
    engine.convert(html_path, &stylesheet, &pdf_path)?;
    Ok(Some(pdf_path))
}
