pub mod pdftotext;
pub mod poppler;
pub mod table;

use crate::error::CasebookError;
use crate::model::{PageTable, VisualAsset};
use crate::parsing::patterns::compile;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Markers of a page that shows an exhibit.
static EXHIBIT_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(r"(?i)EXHIBIT\s+\d+"),
        compile(r"(?i)TABLE\s+\d+"),
        compile(r"(?i)FIGURE\s+\d+"),
        compile(r"(?i)Variable\s+[A-Z]:"),
        compile(r"(?i)Pool\s+Options"),
        compile(r"(?i)Hotel\s+Stories"),
    ]
});

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
    /// Tables reconstructed from the page layout (see [`table::attach_tables`]).
    pub tables: Vec<PageTable>,
}

impl PageContent {
    pub fn new(page_number: usize, lines: Vec<String>) -> Self {
        PageContent {
            page_number,
            lines,
            tables: Vec::new(),
        }
    }

    /// The page as one linearized text block.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from a PDF file, returning one PageContent per page.
    fn extract_pages(&self, pdf_path: &Path) -> Result<Vec<PageContent>, CasebookError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Trait for visual-asset backends: embedded images and page screenshots.
///
/// File paths in the returned assets point at the files written into `out_dir`.
pub trait VisualExtractor: Send + Sync {
    /// Extract every embedded image of the document into `out_dir`.
    ///
    /// Images that cannot be written or decoded are skipped, not reported as errors.
    fn extract_images(
        &self,
        pdf_path: &Path,
        out_dir: &Path,
    ) -> Result<Vec<VisualAsset>, CasebookError>;

    /// Rasterize a single page (1-based) into `out_dir`.
    fn render_page(
        &self,
        pdf_path: &Path,
        page_number: usize,
        out_dir: &Path,
    ) -> Result<VisualAsset, CasebookError>;

    fn backend_name(&self) -> &str;
}

/// Whether a page carries an exhibit: a marker in its text or a
/// reconstructed table.
pub fn is_exhibit_page(page: &PageContent) -> bool {
    if !page.tables.is_empty() {
        return true;
    }
    let text = page.text();
    EXHIBIT_MARKERS.iter().any(|re| re.is_match(&text))
}

/// Page numbers of the exhibit pages, ascending and unique.
pub fn exhibit_pages(pages: &[PageContent]) -> Vec<usize> {
    let mut numbers: Vec<usize> = pages
        .iter()
        .filter(|p| is_exhibit_page(p))
        .map(|p| p.page_number)
        .collect();
    numbers.sort_unstable();
    numbers.dedup();
    numbers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: usize, lines: &[&str]) -> PageContent {
        PageContent::new(number, lines.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_exhibit_markers() {
        assert!(is_exhibit_page(&page(1, &["See Exhibit 3 below"])));
        assert!(is_exhibit_page(&page(1, &["figure 2: churn by cohort"])));
        assert!(is_exhibit_page(&page(1, &["Variable C: unit cost"])));
        assert!(!is_exhibit_page(&page(1, &["Exhibits are at the end"])));
    }

    #[test]
    fn test_pages_with_tables_are_exhibit_pages() {
        let mut pages = vec![
            page(2, &["  Region     Sales", "  North      10"]),
            page(1, &["Hotel Stories"]),
            page(3, &["plain prose"]),
        ];
        table::attach_tables(&mut pages);
        assert_eq!(exhibit_pages(&pages), vec![1, 2]);
    }
}
