//! Independent field extractors over one case segment.
//!
//! Each extractor runs its own ordered pattern list against the segment and
//! never looks at another field's result.

use super::patterns::{compile, first_capture, numbered_sections, PatternList};
use crate::extraction::PageContent;
use crate::model::{Exhibit, ExhibitKind, PageSpan, PageTable, Question};
use regex::Regex;
use std::sync::LazyLock;

pub const MAX_PROMPT_CHARS: usize = 1000;
pub const MAX_QUESTION_CHARS: usize = 500;
pub const MAX_EXHIBIT_CHARS: usize = 500;
pub const MAX_CONCLUSION_CHARS: usize = 500;

static PROMPT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(r"(?is)Prompt:\s*\n(.*?)(?:\n\n|Clarifying)"),
        compile(r"(?is)Your client (?:is|has|wants)(.*?)(?:\n\n|\?)"),
        compile(r"(?is)(?:Client|Situation):\s*(.*?)(?:\n\n|Question:)"),
        compile(r"(?is)^(Our client.*?)\n\n"),
    ]
});

static CLARIFYING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![compile(
        r"(?is)Clarifying\s*(?:Information|Questions?):\s*(.*?)(?:\n\n|Framework|Question)",
    )]
});

static CONCLUSION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![compile(
        r"(?is)(?:Conclusion|Recommendation|Summary):\s*(.*?)(?:\n\n\n|$)",
    )]
});

static FRAMEWORKS: LazyLock<PatternList<&'static str>> = LazyLock::new(|| {
    PatternList::new(&[
        ("MECE", r"(?i)MECE"),
        ("Issue Tree", r"(?i)Issue Tree"),
        ("Porter's 5 Forces", r"(?i)Porter.*5 Forces"),
        ("3Cs", r"(?i)3Cs"),
        ("4Ps", r"(?i)4Ps"),
        ("Revenue/Cost", r"(?i)Revenue.*Cost"),
        ("Market Attractiveness", r"(?i)Market Attractiveness"),
        ("Value Chain", r"(?i)Value Chain"),
        ("Segmentation", r"(?i)Segmentation"),
        ("SWOT", r"(?i)SWOT"),
        ("BCG Matrix", r"(?i)BCG Matrix"),
    ])
});

static QUESTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(?:Question|Q)\s*(\d+)[:.]?\s*"));
static QUESTION_STOP: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(?:Question|Q)\s*\d+|Solution|Exhibit"));
static CALCULATION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)calculate|compute|×|÷|\+|-|="));

static EXHIBIT_HEADER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)EXHIBIT\s+(\d+)[:.]?\s*"));
static EXHIBIT_STOP: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)EXHIBIT|\n\n\n"));

/// Opening statement of the case.
pub fn extract_prompt(text: &str) -> Option<String> {
    first_capture(&PROMPT_PATTERNS, text).and_then(|s| clean(s, MAX_PROMPT_CHARS))
}

pub fn extract_clarifying(text: &str) -> Option<String> {
    first_capture(&CLARIFYING_PATTERNS, text).and_then(|s| clean(s, usize::MAX))
}

pub fn extract_conclusion(text: &str) -> Option<String> {
    first_capture(&CONCLUSION_PATTERNS, text).and_then(|s| clean(s, MAX_CONCLUSION_CHARS))
}

/// Names of the known frameworks mentioned in the text, in list order.
pub fn extract_frameworks(text: &str) -> Vec<String> {
    FRAMEWORKS
        .all(text)
        .into_iter()
        .map(String::from)
        .collect()
}

/// Numbered questions ("Question 1: ...", "Q2. ...").
pub fn extract_questions(text: &str) -> Vec<Question> {
    numbered_sections(&QUESTION_HEADER, &QUESTION_STOP, text)
        .into_iter()
        .map(|s| Question {
            number: s.number,
            text: truncate(s.body, MAX_QUESTION_CHARS),
            has_calculation: CALCULATION.is_match(s.body),
        })
        .collect()
}

/// Numbered exhibits ("EXHIBIT 1: ...").
///
/// An exhibit is typed as a table when the page that names it carries a
/// reconstructed table. Pages inside `span` are searched first, then the
/// rest of the document.
pub fn extract_exhibits(text: &str, pages: &[PageContent], span: PageSpan) -> Vec<Exhibit> {
    numbered_sections(&EXHIBIT_HEADER, &EXHIBIT_STOP, text)
        .into_iter()
        .map(|s| {
            let table = find_exhibit_table(s.number, pages, span);
            let (kind, headers, data) = match table {
                Some(t) => (ExhibitKind::Table, t.headers.clone(), t.data.clone()),
                None => (ExhibitKind::Text, Vec::new(), Vec::new()),
            };
            Exhibit {
                exhibit_number: s.number,
                kind,
                content: truncate(s.body, MAX_EXHIBIT_CHARS),
                headers,
                data,
            }
        })
        .collect()
}

/// First table on the first page naming `EXHIBIT <number>`, pages inside
/// `span` before the rest of the document.
fn find_exhibit_table(number: u32, pages: &[PageContent], span: PageSpan) -> Option<&PageTable> {
    let marker = format!("EXHIBIT {}", number);
    let (inside, outside): (Vec<&PageContent>, Vec<&PageContent>) =
        pages.iter().partition(|p| span.contains(p.page_number));

    inside
        .into_iter()
        .chain(outside)
        .find(|p| p.text().to_uppercase().contains(&marker))
        .and_then(|p| p.tables.first())
}

fn clean(s: &str, max_chars: usize) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(truncate(s, max_chars))
    }
}

/// Truncate to at most `max_chars` characters (not bytes).
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(first: usize, last: usize) -> PageSpan {
        PageSpan { first, last }
    }

    #[test]
    fn test_prompt_after_label() {
        let text = "Prompt:\nA regional bank is losing deposits.\n\nClarifying Information: none";
        assert_eq!(
            extract_prompt(text).as_deref(),
            Some("A regional bank is losing deposits.")
        );
    }

    #[test]
    fn test_prompt_your_client() {
        let text = "Your client is a mid-size airline facing falling margins. What should it do?";
        assert_eq!(
            extract_prompt(text).as_deref(),
            Some("a mid-size airline facing falling margins. What should it do")
        );
    }

    #[test]
    fn test_prompt_label_beats_later_patterns() {
        let text = "Situation: ignored\n\nPrompt:\nUse this one\n\n";
        assert_eq!(extract_prompt(text).as_deref(), Some("Use this one"));
    }

    #[test]
    fn test_prompt_our_client_at_start() {
        let text = "Our client runs 40 gyms in Paris.\n\nMore text";
        assert_eq!(
            extract_prompt(text).as_deref(),
            Some("Our client runs 40 gyms in Paris.")
        );
    }

    #[test]
    fn test_prompt_truncated() {
        let long = format!("Prompt:\n{}\n\n", "x".repeat(1500));
        assert_eq!(extract_prompt(&long).unwrap().chars().count(), MAX_PROMPT_CHARS);
    }

    #[test]
    fn test_no_prompt() {
        assert!(extract_prompt("Nothing recognisable").is_none());
    }

    #[test]
    fn test_clarifying_stops_at_framework() {
        let text = "Clarifying Questions: The client only sells in France. Framework: profit tree";
        assert_eq!(
            extract_clarifying(text).as_deref(),
            Some("The client only sells in France.")
        );
    }

    #[test]
    fn test_conclusion_runs_to_end() {
        let text = "Q1 blah\nRecommendation: Enter the market via acquisition.\n";
        assert_eq!(
            extract_conclusion(text).as_deref(),
            Some("Enter the market via acquisition.")
        );
    }

    #[test]
    fn test_frameworks_in_list_order() {
        let text = "Use a SWOT then a value chain view; keep it mece.";
        assert_eq!(extract_frameworks(text), vec!["MECE", "Value Chain", "SWOT"]);
    }

    #[test]
    fn test_frameworks_match_within_a_line() {
        assert_eq!(
            extract_frameworks("Apply Porter's 5 Forces here."),
            vec!["Porter's 5 Forces"]
        );
        assert!(extract_frameworks("Porter's\n5 Forces").is_empty());
        assert!(extract_frameworks("Revenue grew last year.\nFixed cost per store is high.").is_empty());
    }

    #[test]
    fn test_two_questions_no_exhibits() {
        let text = "Question 1: What is the market size?\nQuestion 2: How would you enter?";
        let questions = extract_questions(text);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].number, 1);
        assert_eq!(questions[0].text, "What is the market size?");
        assert_eq!(questions[1].text, "How would you enter?");
        assert!(extract_exhibits(text, &[], span(1, 1)).is_empty());
    }

    #[test]
    fn test_question_stops_at_solution() {
        let text = "Q1. Calculate the break-even volume.\nSolution: 12,000 units";
        let questions = extract_questions(text);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Calculate the break-even volume.");
        assert!(questions[0].has_calculation);
    }

    #[test]
    fn test_question_without_arithmetic() {
        let questions = extract_questions("Question 3: Why now");
        assert!(!questions[0].has_calculation);
    }

    #[test]
    fn test_exhibits_text_and_table() {
        let mut page = PageContent::new(
            2,
            vec![
                "EXHIBIT 2: Costs".into(),
                "  Item      Cost".into(),
                "  Rent      10".into(),
            ],
        );
        crate::extraction::table::attach_tables(std::slice::from_mut(&mut page));

        let text = "EXHIBIT 1: Market shares by player\n\n\nEXHIBIT 2: Costs\n  Item      Cost";
        let exhibits = extract_exhibits(text, &[page], span(1, 2));
        assert_eq!(exhibits.len(), 2);
        assert_eq!(exhibits[0].exhibit_number, 1);
        assert_eq!(exhibits[0].kind, ExhibitKind::Text);
        assert_eq!(exhibits[0].content, "Market shares by player");
        assert_eq!(exhibits[1].kind, ExhibitKind::Table);
        assert_eq!(exhibits[1].headers, vec!["Item", "Cost"]);
        assert_eq!(exhibits[1].data.len(), 1);
    }

    #[test]
    fn test_exhibit_table_prefers_pages_in_span() {
        let mut pages = vec![
            PageContent::new(1, vec!["EXHIBIT 1".into(), "  A     B".into(), "  1     2".into()]),
            PageContent::new(5, vec!["EXHIBIT 1".into(), "  C     D".into(), "  3     4".into()]),
        ];
        crate::extraction::table::attach_tables(&mut pages);

        let exhibits = extract_exhibits("EXHIBIT 1: second case", &pages, span(4, 6));
        assert_eq!(exhibits[0].headers, vec!["C", "D"]);
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
