pub mod categories;
pub mod fields;
pub mod patterns;

use crate::extraction::PageContent;
use crate::model::{CaseContent, CaseMetadata, PageSpan};
use crate::scoring::{estimate_difficulty, DifficultySignals};
use categories::{classify_case_type, classify_industry};
use patterns::{compile, split_points};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Segments whose trimmed text is not longer than this are treated as noise.
pub const MIN_SEGMENT_CHARS: usize = 200;

/// Case boundaries, tried in order. Each split happens before the match.
static BOUNDARIES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(r"CASE\s*:"),
        compile(r"Case\s+\d+"),
        compile(r"(?m)^\d+\s*\|\s*"),
        compile(r"(?m)^Page\s+\d+.*CASE"),
    ]
});

/// A page closes the current case in the page-grouping fallback.
static CASE_END: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)Conclusion|Recommendation|End of Case"));

/// A candidate case cut out of the document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub pages: PageSpan,
}

/// Fields parsed out of one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCase {
    pub content: CaseContent,
    pub metadata: CaseMetadata,
}

/// The document text with pages joined by a blank line, remembering where
/// each page starts.
struct DocumentText {
    text: String,
    /// (byte offset, page number), ascending.
    page_starts: Vec<(usize, usize)>,
}

impl DocumentText {
    fn new(pages: &[PageContent]) -> Self {
        let mut text = String::new();
        let mut page_starts = Vec::with_capacity(pages.len());

        for (i, page) in pages.iter().enumerate() {
            if i > 0 {
                text.push_str("\n\n");
            }
            page_starts.push((text.len(), page.page_number));
            text.push_str(&page.text());
        }

        DocumentText { text, page_starts }
    }

    fn page_at(&self, offset: usize) -> usize {
        let idx = self.page_starts.partition_point(|(start, _)| *start <= offset);
        self.page_starts
            .get(idx.saturating_sub(1))
            .map(|(_, page)| *page)
            .unwrap_or(1)
    }

    /// Trimmed segment for the byte range `start..end`.
    fn segment(&self, start: usize, end: usize) -> Segment {
        let raw = &self.text[start..end];
        let lead = raw.len() - raw.trim_start().len();
        let trimmed = raw.trim();
        let first = start + lead;
        let last = (first + trimmed.len()).saturating_sub(1).max(first);

        Segment {
            text: trimmed.to_string(),
            pages: PageSpan {
                first: self.page_at(first),
                last: self.page_at(last),
            },
        }
    }
}

/// Split a document into candidate case segments.
///
/// The first boundary pattern that splits the text decides the segmentation;
/// pieces not longer than [`MIN_SEGMENT_CHARS`] are dropped. If no pattern
/// splits the text, or every piece was noise, pages are grouped instead.
pub fn split_into_cases(pages: &[PageContent]) -> Vec<Segment> {
    let doc = DocumentText::new(pages);

    for (i, boundary) in BOUNDARIES.iter().enumerate() {
        let points = split_points(boundary, &doc.text);
        if points.is_empty() {
            continue;
        }

        debug!("boundary pattern {} split the text at {} point(s)", i, points.len());

        let mut cuts = vec![0];
        cuts.extend(points.into_iter().filter(|&p| p > 0));
        cuts.push(doc.text.len());

        let segments: Vec<Segment> = cuts
            .windows(2)
            .map(|w| doc.segment(w[0], w[1]))
            .filter(|s| s.text.chars().count() > MIN_SEGMENT_CHARS)
            .collect();

        if !segments.is_empty() {
            return segments;
        }
        // Only the first splitting pattern is considered.
        break;
    }

    debug!("no usable case boundary, grouping pages");
    group_pages(pages)
}

/// Fallback segmentation: consecutive pages form one case, closed by any
/// page that mentions a conclusion.
fn group_pages(pages: &[PageContent]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current: Vec<&PageContent> = Vec::new();

    for page in pages {
        current.push(page);
        if CASE_END.is_match(&page.text()) {
            segments.push(join_pages(&current));
            current.clear();
        }
    }

    if !current.is_empty() {
        segments.push(join_pages(&current));
    }

    segments
}

fn join_pages(pages: &[&PageContent]) -> Segment {
    let text = pages
        .iter()
        .map(|p| p.text())
        .collect::<Vec<_>>()
        .join("\n\n");
    let first = pages.first().map(|p| p.page_number).unwrap_or(1);
    let last = pages.last().map(|p| p.page_number).unwrap_or(first);

    Segment {
        text,
        pages: PageSpan { first, last },
    }
}

/// Extract every field from a segment.
///
/// Returns `None` when the segment has neither a prompt nor any question.
pub fn parse_case(segment: &Segment, pages: &[PageContent]) -> Option<ParsedCase> {
    let text = segment.text.as_str();

    let content = CaseContent {
        prompt: fields::extract_prompt(text),
        clarifying_information: fields::extract_clarifying(text),
        framework: fields::extract_frameworks(text),
        questions: fields::extract_questions(text),
        exhibits: fields::extract_exhibits(text, pages, segment.pages),
        conclusion: fields::extract_conclusion(text),
    };

    if content.prompt.is_none() && content.questions.is_empty() {
        return None;
    }

    let case_type = classify_case_type(text);
    let industry = classify_industry(text);
    let difficulty = estimate_difficulty(&DifficultySignals::new(
        text, &content, case_type, industry,
    ));

    Some(ParsedCase {
        content,
        metadata: CaseMetadata {
            case_type,
            industry,
            difficulty,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CaseType, Difficulty};

    fn page(number: usize, text: &str) -> PageContent {
        PageContent::new(number, text.lines().map(String::from).collect())
    }

    fn filler(words: usize) -> String {
        vec!["lorem"; words].join(" ")
    }

    #[test]
    fn test_split_on_case_colon() {
        let text = format!(
            "Cover page\nCASE: Airline\n{}\nCASE: Bank\n{}",
            filler(60),
            filler(60)
        );
        let segments = split_into_cases(&[page(1, &text)]);
        assert_eq!(segments.len(), 2);
        assert!(segments[0].text.starts_with("CASE: Airline"));
        assert!(segments[1].text.starts_with("CASE: Bank"));
    }

    #[test]
    fn test_short_segments_are_dropped() {
        let text = format!("CASE: Short one\nCASE: Long one\n{}", filler(60));
        let segments = split_into_cases(&[page(1, &text)]);
        assert_eq!(segments.len(), 1);
        assert!(segments[0].text.starts_with("CASE: Long one"));
        assert!(segments
            .iter()
            .all(|s| s.text.chars().count() > MIN_SEGMENT_CHARS));
    }

    #[test]
    fn test_first_splitting_pattern_wins() {
        // "Case 1"/"Case 2" would split too, but "CASE:" comes first.
        let text = format!("CASE: A\nCase 1 {}\nCase 2 {}", filler(60), filler(60));
        let segments = split_into_cases(&[page(1, &text)]);
        assert_eq!(segments.len(), 1);
        assert!(segments[0].text.contains("Case 2"));
    }

    #[test]
    fn test_no_boundary_falls_back_to_page_groups() {
        let pages = vec![
            page(1, "Your client is a bakery chain."),
            page(2, "Question 1: size the market"),
            page(3, "Conclusion: expand north"),
            page(4, "Your client is a telecom operator."),
            page(5, "Question 1: why are margins falling"),
        ];
        let segments = split_into_cases(&pages);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].pages, PageSpan { first: 1, last: 3 });
        assert_eq!(segments[1].pages, PageSpan { first: 4, last: 5 });
        assert!(segments[1].text.contains("telecom"));
    }

    #[test]
    fn test_all_noise_falls_back_to_page_groups() {
        let pages = vec![page(1, "CASE: tiny"), page(2, "Recommendation: none")];
        let segments = split_into_cases(&pages);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].pages, PageSpan { first: 1, last: 2 });
    }

    #[test]
    fn test_segment_page_span() {
        let pages = vec![
            page(1, "Intro"),
            page(2, &format!("Case 1 Airline\n{}", filler(50))),
            page(3, &format!("Case 2 Bank\n{}", filler(50))),
            page(4, &filler(50)),
        ];
        let segments = split_into_cases(&pages);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].pages, PageSpan { first: 2, last: 2 });
        assert_eq!(segments[1].pages, PageSpan { first: 3, last: 4 });
    }

    #[test]
    fn test_parse_case_fields() {
        let segment = Segment {
            text: "Prompt:\nYour client is a software firm whose profit is falling.\n\n\
                   Question 1: What drives revenue?\nQuestion 2: Calculate the margin.\n\
                   Conclusion: Raise prices."
                .into(),
            pages: PageSpan { first: 1, last: 1 },
        };
        let parsed = parse_case(&segment, &[]).unwrap();
        assert_eq!(
            parsed.content.prompt.as_deref(),
            Some("Your client is a software firm whose profit is falling.")
        );
        assert_eq!(parsed.content.questions.len(), 2);
        assert!(parsed.content.exhibits.is_empty());
        assert_eq!(parsed.content.conclusion.as_deref(), Some("Raise prices."));
        assert_eq!(parsed.metadata.case_type, CaseType::Profitability);
        // questions +1, Tech +1, conclusion +1
        assert_eq!(parsed.metadata.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_segment_without_prompt_or_questions_is_dropped() {
        let segment = Segment {
            text: filler(80),
            pages: PageSpan { first: 1, last: 1 },
        };
        assert!(parse_case(&segment, &[]).is_none());
    }
}
