//! Export pipeline: PDF download, print flow and the messaging text.
//!
//! Capture, composition and printing sit behind traits so the pipeline can be
//! driven with fakes in tests. `AppState` holds the production implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::models::resume::CanonicalResume;
use crate::render::html::to_html;
use crate::render::Document;

pub mod capture;
pub mod pdf;
pub mod print;
pub mod whatsapp;

use capture::NodeCapture;
use pdf::PdfComposer;
use print::{PrintDriver, PRINT_ON_LOAD};

const FALLBACK_NAME: &str = "Resume";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("PDF composition failed: {0}")]
    Compose(String),

    #[error("Print failed: {0}")]
    Print(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// `"<full name>.pdf"`, or `"Resume.pdf"` without a name.
pub fn export_file_name(resume: &CanonicalResume) -> String {
    let name = sanitize_filename::sanitize(resume.full_name().unwrap_or(FALLBACK_NAME));
    if name.trim().is_empty() {
        format!("{FALLBACK_NAME}.pdf")
    } else {
        format!("{name}.pdf")
    }
}

/// Document title for the print job: `"<full name>_Resume"`.
pub fn print_title(resume: &CanonicalResume) -> String {
    format!("{}_Resume", resume.full_name().unwrap_or(FALLBACK_NAME))
}

#[derive(Clone)]
pub struct Exporter {
    capture: Arc<dyn NodeCapture>,
    composer: Arc<dyn PdfComposer>,
    printer: Arc<dyn PrintDriver>,
}

impl Exporter {
    pub fn new(
        capture: Arc<dyn NodeCapture>,
        composer: Arc<dyn PdfComposer>,
        printer: Arc<dyn PrintDriver>,
    ) -> Self {
        Self {
            capture,
            composer,
            printer,
        }
    }

    /// Captures `doc`, composes it into a PDF and writes it under `out_dir`.
    /// Returns the written path. Failures are logged and returned, never panicked on.
    pub fn to_file(
        &self,
        resume: &CanonicalResume,
        doc: &Document,
        out_dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        let file_name = export_file_name(resume);

        let result = self
            .capture
            .capture(doc)
            .and_then(|image| self.composer.compose(&image, &file_name))
            .and_then(|bytes| {
                let path = out_dir.join(&file_name);
                std::fs::write(&path, bytes)?;
                Ok(path)
            });

        match &result {
            Ok(path) => info!("Resume written to {}", path.display()),
            Err(e) => error!("Error generating PDF: {e}"),
        }
        result
    }

    pub fn print(&self, resume: &CanonicalResume, doc: &Document) -> Result<(), ExportError> {
        let title = print_title(resume);
        let html = to_html(doc, &title, PRINT_ON_LOAD);
        self.printer.print(&html, &title).map_err(|e| {
            error!("Error starting print: {e}");
            e
        })
    }
}
