//! Provenance of a casebook, read off its file name.

use crate::parsing::patterns::compile;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

pub const UNKNOWN_FIRM: &str = "unknown";
pub const BUSINESS_SCHOOL: &str = "Business School";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// Debrief of a real interview.
    #[serde(rename = "REX")]
    Rex,
    Casebook,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Rex => "REX",
            SourceKind::Casebook => "Casebook",
            SourceKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub filename: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub firm: String,
    pub round: Option<String>,
    pub process_type: Option<String>,
    pub year: Option<String>,
    pub candidate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
}

static ROUND: LazyLock<Regex> = LazyLock::new(|| compile(r"T(\d+)"));
static YEAR: LazyLock<Regex> = LazyLock::new(|| compile(r"20\d{2}"));

/// Candidate name patterns, tried in order. The last one runs on the file
/// stem so the extension does not hide a trailing name.
static CANDIDATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(r"REX-[^-]+-([A-Z][a-z]+-[A-Z][a-z]+)"),
        compile(r"Rex-([A-Z][a-z]+-[A-Z][a-z]+-[A-Z][a-z]+)"),
        compile(r"-([A-Z][a-z]+-[A-Z][a-z]+)$"),
    ]
});

const CASEBOOK_MARKERS: [&str; 6] = ["Casebook", "Case", "Darden", "Stern", "Columbia", "ESADE"];

const SCHOOLS: [(&str, &str); 4] = [
    ("Darden", "Darden"),
    ("Stern", "Stern (NYU)"),
    ("Columbia", "Columbia"),
    ("ESADE", "ESADE"),
];

/// Classify a casebook by its file name.
pub fn classify_source(filename: &str) -> SourceDescriptor {
    let mut source = SourceDescriptor {
        filename: filename.to_string(),
        kind: SourceKind::Unknown,
        firm: UNKNOWN_FIRM.to_string(),
        round: None,
        process_type: None,
        year: None,
        candidate: None,
        school: None,
    };

    if filename.to_uppercase().starts_with("REX") {
        source.kind = SourceKind::Rex;
        if let Some(firm) = rex_firm(filename) {
            source.firm = firm.to_string();
        }
        source.round = ROUND
            .captures(filename)
            .and_then(|c| c.get(1))
            .map(|m| format!("T{}", m.as_str()));
        source.process_type = if filename.contains("Stage") || filename.contains("SFE") {
            Some("Stage".to_string())
        } else if filename.contains("CDI") {
            Some("CDI".to_string())
        } else {
            None
        };
        source.year = year(filename);
        source.candidate = candidate(filename);
    } else if CASEBOOK_MARKERS.iter().any(|m| filename.contains(m)) {
        source.kind = SourceKind::Casebook;
        source.firm = BUSINESS_SCHOOL.to_string();
        source.school = SCHOOLS
            .iter()
            .find(|(marker, _)| filename.contains(marker))
            .map(|(_, school)| school.to_string());
        source.year = year(filename);
    } else if let Some(firm) = named_firm(filename) {
        source.firm = firm.to_string();
    }

    source
}

fn rex_firm(filename: &str) -> Option<&'static str> {
    if filename.contains("MCK") || filename.contains("MK_") {
        return Some("McKinsey");
    }
    named_firm(filename).or_else(|| filename.contains("Kea").then_some("Kea & Partners"))
}

fn named_firm(filename: &str) -> Option<&'static str> {
    ["McKinsey", "BCG", "Bain"]
        .into_iter()
        .find(|firm| filename.contains(firm))
}

fn year(filename: &str) -> Option<String> {
    YEAR.find(filename).map(|m| m.as_str().to_string())
}

fn candidate(filename: &str) -> Option<String> {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    let (stem_pattern, name_patterns) = CANDIDATE.split_last()?;
    name_patterns
        .iter()
        .find_map(|re| re.captures(filename))
        .or_else(|| stem_pattern.captures(stem))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
