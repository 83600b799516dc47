use casebook_core::database::build_database;
use casebook_core::error::CasebookError;
use casebook_core::model::ExtractionReport;
use std::path::Path;

use crate::output;

pub fn run(input: &Path, out: &Path, output_format: &str) -> Result<(), CasebookError> {
    let report = ExtractionReport::load(input)?;
    let db = build_database(&report);
    db.save(out)?;

    eprintln!("Database of {} case(s) written to {}", db.total_cases, out.display());

    match output_format {
        "json" => output::json::print(&db.metadata)?,
        _ => print!("{}", output::table::format_database_summary(&db)),
    }

    Ok(())
}
