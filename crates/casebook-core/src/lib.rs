pub mod database;
pub mod error;
pub mod extraction;
pub mod library;
pub mod model;
pub mod parsing;
pub mod scoring;
pub mod source;
pub mod store;

use chrono::Utc;
use error::CasebookError;
use extraction::{exhibit_pages, PageContent, PdfExtractor, VisualExtractor};
use model::{
    CaseStats, CasebookExtraction, ExtractedCase, ExtractionMetadata, ExtractionReport,
    VisualAsset, VisualAssets,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Backends and output location for an extraction run.
pub struct ExtractOptions<'a> {
    pub text: &'a dyn PdfExtractor,
    /// `None` skips image extraction and page screenshots.
    pub visuals: Option<&'a dyn VisualExtractor>,
    /// Assets of each PDF go to `<exhibits_dir>/<pdf stem>/`.
    pub exhibits_dir: PathBuf,
}

impl ExtractOptions<'_> {
    pub fn features(&self) -> Vec<String> {
        let mut features = vec!["text_extraction", "table_extraction"];
        if self.visuals.is_some() {
            features.extend(["image_extraction", "exhibit_screenshots"]);
        }
        features.into_iter().map(String::from).collect()
    }
}

/// Extract every case from a single casebook PDF.
pub fn extract_casebook(
    pdf_path: &Path,
    options: &ExtractOptions<'_>,
) -> Result<CasebookExtraction, CasebookError> {
    let filename = file_name(pdf_path);
    let stem = file_stem(pdf_path);
    info!("processing {} with {}", filename, options.text.backend_name());

    let mut pages = options.text.extract_pages(pdf_path)?;
    extraction::table::attach_tables(&mut pages);
    debug!("{} page(s) extracted from {}", pages.len(), filename);

    let assets = match options.visuals {
        Some(visuals) => {
            extract_visuals(visuals, pdf_path, &pages, &options.exhibits_dir.join(&stem))
        }
        None => VisualAssets::default(),
    };

    let cases = parse_cases(&pages, &assets, &filename);
    info!(
        "{}: {} case(s), {} image(s), {} screenshot(s)",
        filename,
        cases.len(),
        assets.images.len(),
        assets.screenshots.len()
    );

    Ok(CasebookExtraction {
        source: filename,
        cases,
        total_images: assets.images.len(),
        total_screenshots: assets.screenshots.len(),
    })
}

/// Segment a document and parse each segment into a case.
///
/// Case ids are `<stem>_case_<n>` where `n` is the segment position, so a
/// dropped segment leaves a gap in the numbering. Each case gets the assets
/// on the pages it spans.
pub fn parse_cases(
    pages: &[PageContent],
    assets: &VisualAssets,
    filename: &str,
) -> Vec<ExtractedCase> {
    let stem = file_stem(Path::new(filename));
    let segments = parsing::split_into_cases(pages);
    debug!("{} segment(s) in {}", segments.len(), filename);

    segments
        .iter()
        .enumerate()
        .filter_map(|(idx, segment)| {
            let Some(parsed) = parsing::parse_case(segment, pages) else {
                debug!("segment {} of {} has no prompt or questions", idx + 1, filename);
                return None;
            };
            let visual_assets = assets.within(segment.pages);
            Some(ExtractedCase {
                case_id: format!("{}_case_{}", stem, idx + 1),
                source: filename.to_string(),
                pages: segment.pages,
                raw_text: segment.text.clone(),
                stats: CaseStats::new(&parsed.content, &visual_assets),
                content: parsed.content,
                metadata: parsed.metadata,
                visual_assets,
            })
        })
        .collect()
}

fn extract_visuals(
    visuals: &dyn VisualExtractor,
    pdf_path: &Path,
    pages: &[PageContent],
    out_dir: &Path,
) -> VisualAssets {
    let images = visuals.extract_images(pdf_path, out_dir).unwrap_or_else(|e| {
        warn!("image extraction failed for {}: {}", pdf_path.display(), e);
        Vec::new()
    });

    let mut screenshots: Vec<VisualAsset> = Vec::new();
    for page in exhibit_pages(pages) {
        match visuals.render_page(pdf_path, page, out_dir) {
            Ok(asset) => screenshots.push(asset),
            Err(e @ CasebookError::ToolNotFound { .. }) => {
                warn!("no page screenshots: {}", e);
                break;
            }
            Err(e) => warn!("could not render page {}: {}", page, e),
        }
    }

    VisualAssets {
        images,
        screenshots,
    }
}

/// Extract every `*.pdf` in `dir`, in file name order.
///
/// A document that fails is logged and left out of the report.
pub fn extract_directory(
    dir: &Path,
    options: &ExtractOptions<'_>,
) -> Result<ExtractionReport, CasebookError> {
    let mut pdfs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_pdf(p))
        .collect();
    pdfs.sort();

    if pdfs.is_empty() {
        return Err(CasebookError::NoInput(dir.to_path_buf()));
    }
    info!("found {} PDF file(s) in {}", pdfs.len(), dir.display());

    let mut sources = Vec::new();
    let mut cases = Vec::new();
    let (mut total_images, mut total_screenshots) = (0, 0);

    for pdf in &pdfs {
        match extract_casebook(pdf, options) {
            Ok(extraction) => {
                total_images += extraction.total_images;
                total_screenshots += extraction.total_screenshots;
                sources.push(extraction.source);
                cases.extend(extraction.cases);
            }
            Err(e) => warn!("skipping {}: {}", pdf.display(), e),
        }
    }

    info!(
        "extracted {} case(s) from {} of {} PDF(s)",
        cases.len(),
        sources.len(),
        pdfs.len()
    );

    Ok(ExtractionReport {
        metadata: ExtractionMetadata {
            extraction_date: Utc::now(),
            total_pdfs: pdfs.len(),
            total_cases: cases.len(),
            total_images,
            total_screenshots,
            features: options.features(),
        },
        sources,
        cases,
    })
}

impl ExtractionReport {
    pub fn load(path: &Path) -> Result<Self, CasebookError> {
        store::read_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), CasebookError> {
        store::write_json(path, self)
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}
