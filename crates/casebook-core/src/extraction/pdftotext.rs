use crate::error::CasebookError;
use crate::extraction::poppler::run_tool;
use crate::extraction::{PageContent, PdfExtractor};
use std::path::Path;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` to preserve whitespace alignment of tables.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_path: &Path) -> Result<Vec<PageContent>, CasebookError> {
        let stdout = run_tool(
            "pdftotext",
            Command::new("pdftotext")
                .arg("-layout")
                .arg(pdf_path)
                .arg("-"), // output to stdout
        )?;

        Ok(split_pages(&String::from_utf8_lossy(&stdout)))
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Split pdftotext output into pages (form feed \x0c separates pages).
///
/// The trailing form feed leaves an empty final chunk, which is dropped.
fn split_pages(text: &str) -> Vec<PageContent> {
    text.split('\x0c')
        .enumerate()
        .map(|(i, page_text)| {
            let lines: Vec<String> = page_text.lines().map(|l| l.trim_end().to_string()).collect();
            PageContent::new(i + 1, lines)
        })
        .filter(|p| !p.lines.is_empty() || p.page_number == 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pages_on_form_feed() {
        let pages = split_pages("Case 1: Acme\nYour client is Acme.\x0cEXHIBIT 1\n  A   B\x0c");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[0].lines[1], "Your client is Acme.");
        assert_eq!(pages[1].page_number, 2);
        assert_eq!(pages[1].lines[0], "EXHIBIT 1");
    }

    #[test]
    fn test_empty_document_keeps_first_page() {
        let pages = split_pages("");
        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines.is_empty());
    }

    #[test]
    fn test_trailing_whitespace_trimmed() {
        let pages = split_pages("Prompt:      \n");
        assert_eq!(pages[0].lines[0], "Prompt:");
    }
}
