use crate::extraction::PageContent;
use crate::model::PageTable;
use std::collections::BTreeMap;

/// Reconstruct tables from pdftotext -layout output.
///
/// pdftotext -layout preserves column alignment using spaces, so a table
/// shows up as a run of consecutive lines that each split into two or more
/// cells on wide whitespace gaps. The first line of a run is its header.
pub fn extract_tables(lines: &[String]) -> Vec<PageTable> {
    let mut tables = Vec::new();
    let mut run: Vec<Vec<String>> = Vec::new();

    for line in lines {
        let cells = split_cells(line);
        if cells.len() >= 2 && !is_page_footer(line) {
            run.push(cells);
            continue;
        }
        flush_run(&mut run, &mut tables);
    }
    flush_run(&mut run, &mut tables);

    tables
}

/// Fill in `tables` on every page.
pub fn attach_tables(pages: &mut [PageContent]) {
    for page in pages.iter_mut() {
        page.tables = extract_tables(&page.lines);
    }
}

fn flush_run(run: &mut Vec<Vec<String>>, tables: &mut Vec<PageTable>) {
    // A header alone is not a table.
    if run.len() < 2 {
        run.clear();
        return;
    }

    let mut rows = std::mem::take(run);
    let headers = rows.remove(0);

    let data = rows
        .iter()
        .filter(|row| row.len() == headers.len())
        .map(|row| {
            headers
                .iter()
                .zip(row.iter())
                .filter(|(h, _)| !h.is_empty())
                .map(|(h, cell)| (h.clone(), cell.clone()))
                .collect::<BTreeMap<String, String>>()
        })
        .filter(|m| !m.is_empty())
        .collect();

    tables.push(PageTable {
        table_index: tables.len(),
        headers,
        rows,
        data,
    });
}

fn split_cells(line: &str) -> Vec<String> {
    split_by_whitespace_gaps(line.trim())
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_page_footer(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("Page ") || trimmed.starts_with("---")
}

/// Split a line by gaps of 2+ whitespace characters.
pub fn split_by_whitespace_gaps(line: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = None;
    let mut space_count = 0;
    let mut gap_start = 0;

    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            space_count += 1;
            if space_count == 1 {
                gap_start = i;
            } else if space_count == 2 {
                if let Some(s) = start {
                    segments.push(&line[s..gap_start]);
                    start = None;
                }
            }
        } else {
            if start.is_none() {
                start = Some(i);
            }
            space_count = 0;
        }
    }

    if let Some(s) = start {
        segments.push(line[s..].trim_end());
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_by_whitespace_gaps() {
        let segments = split_by_whitespace_gaps("Segment     Revenue ($M)     Growth");
        assert_eq!(segments, vec!["Segment", "Revenue ($M)", "Growth"]);
    }

    #[test]
    fn test_single_spaces_do_not_split() {
        let segments = split_by_whitespace_gaps("Your client is a regional bank");
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_extract_table_with_header() {
        let page = lines(&[
            "EXHIBIT 1: Revenue by segment",
            "",
            "  Segment        2022      2023",
            "  Retail         120       140",
            "  Wholesale      80        75",
            "",
            "Source: company data",
        ]);

        let tables = extract_tables(&page);
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.headers, vec!["Segment", "2022", "2023"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.data.len(), 2);
        assert_eq!(t.data[0].get("Segment").map(String::as_str), Some("Retail"));
        assert_eq!(t.data[1].get("2023").map(String::as_str), Some("75"));
    }

    #[test]
    fn test_ragged_rows_kept_but_not_keyed() {
        let page = lines(&[
            "  Option      Cost     Benefit",
            "  A           10       20",
            "  B           15",
        ]);
        let tables = extract_tables(&page);
        assert_eq!(tables[0].rows.len(), 2);
        assert_eq!(tables[0].data.len(), 1);
    }

    #[test]
    fn test_lone_columnar_line_is_not_a_table() {
        let page = lines(&["Prompt:", "  Client     Acme", "", "Some prose here."]);
        assert!(extract_tables(&page).is_empty());
    }

    #[test]
    fn test_table_indices_are_sequential() {
        let page = lines(&[
            "  A     B",
            "  1     2",
            "",
            "  C     D",
            "  3     4",
        ]);
        let tables = extract_tables(&page);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].table_index, 1);
    }
}
