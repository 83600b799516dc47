use casebook_core::error::CasebookError;
use casebook_core::extraction::pdftotext::PdftotextExtractor;
use casebook_core::extraction::poppler::PopplerVisualExtractor;
use casebook_core::extraction::VisualExtractor;
use casebook_core::{extract_directory, ExtractOptions};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(
    input_dir: &Path,
    out: &Path,
    exhibits_dir: PathBuf,
    no_visuals: bool,
) -> Result<(), CasebookError> {
    if !PdftotextExtractor::is_available() {
        return Err(CasebookError::ToolNotFound { tool: "pdftotext" });
    }

    let text = PdftotextExtractor::new();
    let visuals = PopplerVisualExtractor::new();
    if no_visuals {
        info!("visual extraction disabled");
    }

    let options = ExtractOptions {
        text: &text,
        visuals: (!no_visuals).then_some(&visuals as &dyn VisualExtractor),
        exhibits_dir,
    };

    let report = extract_directory(input_dir, &options)?;
    report.save(out)?;

    eprintln!(
        "Extracted {} case(s) from {} PDF(s), written to {}",
        report.metadata.total_cases,
        report.sources.len(),
        out.display()
    );
    eprintln!(
        "  {} image(s), {} exhibit screenshot(s)",
        report.metadata.total_images, report.metadata.total_screenshots
    );
    if report.sources.len() < report.metadata.total_pdfs {
        eprintln!(
            "  {} PDF(s) skipped, see warnings above",
            report.metadata.total_pdfs - report.sources.len()
        );
    }

    Ok(())
}
