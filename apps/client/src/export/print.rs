//! Native print flow.

use std::path::PathBuf;

use tracing::info;

use super::ExportError;

/// Loaded into the page head so the browser opens its print dialog on load.
pub const PRINT_ON_LOAD: &str = "<script>window.addEventListener('load',function(){window.print();});</script>";

/// "Invoke the platform print flow for this page."
pub trait PrintDriver: Send + Sync {
    /// `html` is a complete page; `title` becomes the print job's document title.
    fn print(&self, html: &str, title: &str) -> Result<(), ExportError>;
}

/// Writes the page to a temp file and opens it with the platform's default
/// browser, which prints it on load.
#[derive(Debug, Default)]
pub struct BrowserPrint;

impl BrowserPrint {
    fn write_page(html: &str, title: &str) -> Result<PathBuf, ExportError> {
        let prefix = format!("{}-", sanitize_filename::sanitize(title));
        let file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".html")
            .tempfile()?;
        std::fs::write(file.path(), html)?;
        // the browser reads the file after we return, so it must outlive this call
        let (_, path) = file.keep().map_err(|e| ExportError::Io(e.error))?;
        Ok(path)
    }
}

impl PrintDriver for BrowserPrint {
    fn print(&self, html: &str, title: &str) -> Result<(), ExportError> {
        let path = Self::write_page(html, title)?;
        info!("Opening {} for printing", path.display());
        open::that_detached(&path).map_err(|e| ExportError::Print(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_page_keeps_file_with_title_prefix() {
        let path = BrowserPrint::write_page("<html></html>", "Jane Doe_Resume").unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("Jane Doe_Resume-"));
        assert!(name.ends_with(".html"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
        std::fs::remove_file(path).unwrap();
    }
}
