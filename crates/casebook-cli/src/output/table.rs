use casebook_core::database::CaseDatabase;
use casebook_core::library::{IndexEntry, LibraryCase, LibraryStatistics};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Counts sorted by count, largest first, ties by name.
fn by_count(counts: &BTreeMap<String, usize>) -> Vec<(&str, usize)> {
    let mut sorted: Vec<(&str, usize)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    sorted
}

fn write_counts(out: &mut String, heading: &str, counts: &BTreeMap<String, usize>, top: usize) {
    let _ = writeln!(out, "{}:", heading);
    for (name, count) in by_count(counts).into_iter().take(top) {
        let _ = writeln!(out, "  {}: {}", name, count);
    }
    out.push('\n');
}

pub fn format_database_summary(db: &CaseDatabase) -> String {
    let mut out = String::new();
    let stats = &db.metadata;

    let _ = writeln!(out, "Total: {} case(s)\n", db.total_cases);
    write_counts(&mut out, "By firm", &stats.by_firm, usize::MAX);
    write_counts(&mut out, "By source type", &stats.by_source_type, usize::MAX);
    write_counts(&mut out, "By case type", &stats.by_type, 10);

    // Difficulty reads best in its natural order.
    let _ = writeln!(out, "By difficulty:");
    for (name, count) in &stats.by_difficulty {
        let _ = writeln!(out, "  {}: {}", name, count);
    }
    out.push('\n');

    write_counts(&mut out, "By industry", &stats.by_industry, 10);
    out
}

pub fn format_statistics(stats: &LibraryStatistics) -> String {
    let mut out = String::new();
    write_counts(&mut out, "By type", &stats.by_type, usize::MAX);
    write_counts(&mut out, "By difficulty", &stats.by_difficulty, usize::MAX);
    write_counts(&mut out, "By industry", &stats.by_industry, 10);
    out
}

pub fn format_entries(entries: &[&IndexEntry]) -> String {
    if entries.is_empty() {
        return "No matching cases.\n".to_string();
    }

    let id_width = entries.iter().map(|e| e.case_id.len()).max().unwrap_or(10);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<id_width$}  {:>7}  {:<20}  {:<6}  {:<18}  TITLE",
        "ID", "QUALITY", "TYPE", "LEVEL", "INDUSTRY",
    );
    for e in entries {
        let _ = writeln!(
            out,
            "  {:<id_width$}  {:>7}  {:<20}  {:<6}  {:<18}  {}",
            e.case_id,
            e.quality_score,
            e.case_type.as_str(),
            e.difficulty.as_str(),
            e.industry.as_str(),
            e.title,
        );
    }
    out
}

pub fn format_case(case: &LibraryCase, title: &str) -> String {
    let mut out = String::new();
    let meta = &case.metadata;
    let content = &case.content;

    let _ = writeln!(out, "=== {} ===\n", case.case_id);
    if !title.is_empty() {
        let _ = writeln!(out, "  Title:      {}", title);
    }
    let _ = writeln!(out, "  Source:     {}", case.source);
    let _ = writeln!(
        out,
        "  Type:       {} / {} / {}\n",
        meta.case_type.label(),
        meta.industry,
        meta.difficulty
    );

    if let Some(prompt) = &content.prompt {
        let _ = writeln!(out, "Prompt:\n  {}\n", prompt);
    }
    if let Some(clarifying) = &content.clarifying_information {
        let _ = writeln!(out, "Clarifying information:\n  {}\n", clarifying);
    }
    if !content.framework.is_empty() {
        let _ = writeln!(out, "Frameworks: {}\n", content.framework.join(", "));
    }

    if !content.questions.is_empty() {
        let _ = writeln!(out, "Questions:");
        for q in &content.questions {
            let calc = if q.has_calculation { " [calc]" } else { "" };
            let _ = writeln!(out, "  {}. {}{}", q.number, q.text, calc);
        }
        out.push('\n');
    }

    if !content.exhibits.is_empty() {
        let _ = writeln!(out, "Exhibits:");
        for ex in &content.exhibits {
            let _ = writeln!(
                out,
                "  {} ({:?}): {}",
                ex.exhibit_number,
                ex.kind,
                ex.content.lines().next().unwrap_or_default()
            );
            if !ex.headers.is_empty() {
                let _ = writeln!(out, "    {}", ex.headers.join(" | "));
            }
        }
        out.push('\n');
    }

    if let Some(conclusion) = &content.conclusion {
        let _ = writeln!(out, "Conclusion:\n  {}\n", conclusion);
    }

    let assets = case
        .visual_assets
        .images
        .iter()
        .chain(case.visual_assets.screenshots.iter());
    let mut any_asset = false;
    for asset in assets {
        if !any_asset {
            let _ = writeln!(out, "Visual assets:");
            any_asset = true;
        }
        let _ = writeln!(
            out,
            "  page {:>3}  {}x{}  {}",
            asset.page,
            asset.width,
            asset.height,
            asset.filepath.display()
        );
    }

    out
}
