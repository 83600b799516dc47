use regex::Regex;

/// Compile a built-in pattern.
///
/// Only used on string literals, all of which are exercised by the tests.
pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

/// An ordered list of (value, pattern) pairs.
///
/// `first` implements first-match-wins: patterns are tried in list order
/// and the value of the first one that matches is returned.
pub struct PatternList<T> {
    rules: Vec<(T, Regex)>,
}

impl<T: Clone> PatternList<T> {
    pub fn new(rules: &[(T, &str)]) -> Self {
        PatternList {
            rules: rules
                .iter()
                .map(|(value, pattern)| (value.clone(), compile(pattern)))
                .collect(),
        }
    }

    /// Value of the first pattern that matches `text`.
    pub fn first(&self, text: &str) -> Option<T> {
        self.rules
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(value, _)| value.clone())
    }

    /// Values of every pattern that matches `text`, in list order.
    pub fn all(&self, text: &str) -> Vec<T> {
        self.rules
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(value, _)| value.clone())
            .collect()
    }
}

/// Capture group 1 of the first pattern (in order) that matches `text`.
pub fn first_capture<'t>(patterns: &[Regex], text: &'t str) -> Option<&'t str> {
    patterns
        .iter()
        .find_map(|re| re.captures(text).and_then(|c| c.get(1)))
        .map(|m| m.as_str())
}

/// A numbered block of text, e.g. the body of "Question 2: ...".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedSection<'t> {
    pub number: u32,
    pub body: &'t str,
}

/// Scan `text` for `header` matches (capture group 1 must be the number).
///
/// Each body starts right after its header and ends at the first `stop`
/// match at or after that point, or at the end of the text. Scanning for the
/// next header resumes where the previous body ended.
pub fn numbered_sections<'t>(header: &Regex, stop: &Regex, text: &'t str) -> Vec<NumberedSection<'t>> {
    let mut sections = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        let Some(caps) = header.captures_at(text, pos) else {
            break;
        };
        let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
            break;
        };

        let body_start = whole.end();
        let body_end = stop
            .find_at(text, body_start)
            .map(|m| m.start())
            .unwrap_or(text.len());

        if let Ok(number) = number.as_str().parse() {
            sections.push(NumberedSection {
                number,
                body: text[body_start..body_end].trim(),
            });
        }

        // Headers are never empty, so this always advances.
        pos = body_end.max(whole.end());
    }

    sections
}

/// Byte offsets of every `pattern` match start, i.e. the cut points of a
/// split that keeps the delimiter at the head of each piece.
pub fn split_points(pattern: &Regex, text: &str) -> Vec<usize> {
    pattern.find_iter(text).map(|m| m.start()).collect()
}
