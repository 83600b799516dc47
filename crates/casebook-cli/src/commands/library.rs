use casebook_core::error::CasebookError;
use casebook_core::library::{CaseFilter, CaseLibrary, LibraryBuilder};
use casebook_core::model::ExtractionReport;
use std::path::Path;

use crate::output;

pub fn build(input: &Path, library_dir: &Path) -> Result<(), CasebookError> {
    let report = ExtractionReport::load(input)?;
    let index = LibraryBuilder::new(library_dir).build(&report)?;

    eprintln!(
        "Library of {} case(s) written to {}",
        index.total_cases,
        library_dir.display()
    );
    let skipped = report.cases.len() - index.total_cases;
    if skipped > 0 {
        eprintln!("  {} case(s) skipped, see warnings above", skipped);
    }
    print!("{}", output::table::format_statistics(&index.statistics));

    Ok(())
}

pub fn list(
    library_dir: &Path,
    filter: &CaseFilter,
    limit: usize,
    output_format: &str,
) -> Result<(), CasebookError> {
    let library = CaseLibrary::open(library_dir)?;
    let entries = library.list(filter, limit);

    match output_format {
        "json" => output::json::print(&entries)?,
        _ => print!("{}", output::table::format_entries(&entries)),
    }
    Ok(())
}

pub fn search(
    library_dir: &Path,
    query: &str,
    limit: usize,
    output_format: &str,
) -> Result<(), CasebookError> {
    let library = CaseLibrary::open(library_dir)?;
    let entries = library.search(query, limit);

    match output_format {
        "json" => output::json::print(&entries)?,
        _ => print!("{}", output::table::format_entries(&entries)),
    }
    Ok(())
}

pub fn show(library_dir: &Path, case_id: &str, output_format: &str) -> Result<(), CasebookError> {
    let library = CaseLibrary::open(library_dir)?;
    let case = library.load_case(case_id)?;

    match output_format {
        "json" => output::json::print(&case)?,
        _ => {
            let title = library
                .entry(case_id)
                .map(|e| e.title.as_str())
                .unwrap_or_default();
            print!("{}", output::table::format_case(&case, title));
        }
    }
    Ok(())
}

pub fn stats(library_dir: &Path, output_format: &str) -> Result<(), CasebookError> {
    let library = CaseLibrary::open(library_dir)?;

    match output_format {
        "json" => output::json::print(&serde_json::json!({
            "total_cases": library.total_cases(),
            "last_updated": library.last_updated(),
            "by_type": library.statistics().by_type,
            "by_difficulty": library.statistics().by_difficulty,
            "by_industry": library.statistics().by_industry,
        }))?,
        _ => {
            println!(
                "{} case(s), last updated {}\n",
                library.total_cases(),
                library.last_updated().format("%Y-%m-%d %H:%M")
            );
            print!("{}", output::table::format_statistics(library.statistics()));
        }
    }
    Ok(())
}
