//! The flat, queryable case database (`cases_database.json`).

use crate::error::CasebookError;
use crate::model::{CaseType, Difficulty, ExtractedCase, ExtractionReport, Industry, Question};
use crate::parsing::fields::truncate;
use crate::source::{classify_source, SourceDescriptor, SourceKind};
use crate::store::write_json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

pub const DATABASE_VERSION: &str = "1.0";

const MAX_TITLE_CHARS: usize = 100;
const MAX_PROMPT_CHARS: usize = 500;
const MAX_FULL_TEXT_CHARS: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDatabase {
    pub build_date: DateTime<Utc>,
    pub total_cases: usize,
    pub version: String,
    pub cases: Vec<DatabaseCase>,
    pub metadata: DatabaseStatistics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseCase {
    /// `case_<NNNN>`, numbered from 1 in report order.
    pub case_id: String,
    pub title: String,
    pub case_type: CaseType,
    pub industry: Industry,
    pub difficulty: Difficulty,
    pub source: SourceDescriptor,
    pub content: DatabaseContent,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseContent {
    pub prompt: String,
    pub full_text: String,
    pub clarifying_info: Option<String>,
    pub framework: Vec<String>,
    pub questions: Vec<Question>,
    pub conclusion: Option<String>,
}

/// Case counts per category value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseStatistics {
    pub by_type: BTreeMap<String, usize>,
    pub by_firm: BTreeMap<String, usize>,
    pub by_difficulty: BTreeMap<String, usize>,
    pub by_industry: BTreeMap<String, usize>,
    pub by_source_type: BTreeMap<String, usize>,
}

impl CaseDatabase {
    pub fn save(&self, path: &Path) -> Result<(), CasebookError> {
        write_json(path, self)
    }
}

/// Restructure an extraction report into the case database.
pub fn build_database(report: &ExtractionReport) -> CaseDatabase {
    let mut stats = DatabaseStatistics::default();
    let mut cases = Vec::with_capacity(report.cases.len());

    for (idx, case) in report.cases.iter().enumerate() {
        let entry = database_case(idx + 1, case);

        *stats.by_type.entry(entry.case_type.to_string()).or_default() += 1;
        *stats.by_firm.entry(entry.source.firm.clone()).or_default() += 1;
        *stats.by_difficulty.entry(entry.difficulty.to_string()).or_default() += 1;
        *stats.by_industry.entry(entry.industry.to_string()).or_default() += 1;
        *stats.by_source_type.entry(entry.source.kind.to_string()).or_default() += 1;

        cases.push(entry);
    }

    info!("structured {} cases", cases.len());

    CaseDatabase {
        build_date: Utc::now(),
        total_cases: cases.len(),
        version: DATABASE_VERSION.to_string(),
        cases,
        metadata: stats,
    }
}

fn database_case(number: usize, case: &ExtractedCase) -> DatabaseCase {
    let source = classify_source(&case.source);
    let tags = source_tags(&source);
    let content = &case.content;

    DatabaseCase {
        case_id: format!("case_{:04}", number),
        title: case_title(case),
        case_type: case.metadata.case_type,
        industry: case.metadata.industry,
        difficulty: case.metadata.difficulty,
        source,
        content: DatabaseContent {
            prompt: truncate(content.prompt.as_deref().unwrap_or_default(), MAX_PROMPT_CHARS),
            full_text: truncate(&case.raw_text, MAX_FULL_TEXT_CHARS),
            clarifying_info: content.clarifying_information.clone(),
            framework: content.framework.clone(),
            questions: content.questions.clone(),
            conclusion: content.conclusion.clone(),
        },
        tags,
    }
}

/// First sentence of the prompt, else "<Industry> - <Case Type>".
pub fn case_title(case: &ExtractedCase) -> String {
    let sentence = case
        .content
        .prompt
        .as_deref()
        .and_then(|p| p.split('.').next())
        .map(|s| truncate(s, MAX_TITLE_CHARS).trim().to_string())
        .filter(|s| !s.is_empty());

    sentence.unwrap_or_else(|| {
        format!(
            "{} - {}",
            case.metadata.industry,
            case.metadata.case_type.label()
        )
    })
}

fn source_tags(source: &SourceDescriptor) -> Vec<String> {
    let mut tags = Vec::new();
    match source.kind {
        SourceKind::Rex => {
            tags.push("real_interview".to_string());
            tags.push(source.firm.to_lowercase());
        }
        SourceKind::Casebook => tags.push("casebook".to_string()),
        SourceKind::Unknown => {}
    }
    if let Some(process) = &source.process_type {
        tags.push(process.to_lowercase());
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CaseContent, CaseMetadata, CaseStats, ExtractionMetadata, PageSpan, VisualAssets,
    };

    fn case(source: &str, prompt: Option<&str>, difficulty: Difficulty) -> ExtractedCase {
        let content = CaseContent {
            prompt: prompt.map(String::from),
            ..Default::default()
        };
        ExtractedCase {
            case_id: "x_case_1".into(),
            source: source.into(),
            pages: PageSpan { first: 1, last: 1 },
            raw_text: "y".repeat(2500),
            stats: CaseStats::new(&content, &VisualAssets::default()),
            content,
            metadata: CaseMetadata {
                case_type: CaseType::MarketEntry,
                industry: Industry::Energy,
                difficulty,
            },
            visual_assets: VisualAssets::default(),
        }
    }

    fn report(cases: Vec<ExtractedCase>) -> ExtractionReport {
        ExtractionReport {
            metadata: ExtractionMetadata {
                extraction_date: Utc::now(),
                total_pdfs: 2,
                total_cases: cases.len(),
                total_images: 0,
                total_screenshots: 0,
                features: vec![],
            },
            sources: vec![],
            cases,
        }
    }

    #[test]
    fn test_ids_tags_and_aggregates() {
        let db = build_database(&report(vec![
            case("REX-BCG-T2-Stage-2022.pdf", Some("A utility. More"), Difficulty::Hard),
            case("Columbia_Casebook_2021.pdf", None, Difficulty::Easy),
            case("Columbia_Casebook_2021.pdf", None, Difficulty::Easy),
        ]));

        assert_eq!(db.total_cases, 3);
        assert_eq!(db.version, DATABASE_VERSION);
        assert_eq!(db.cases[0].case_id, "case_0001");
        assert_eq!(db.cases[2].case_id, "case_0003");
        assert_eq!(db.cases[0].tags, vec!["real_interview", "bcg", "stage"]);
        assert_eq!(db.cases[1].tags, vec!["casebook"]);

        assert_eq!(db.metadata.by_firm["BCG"], 1);
        assert_eq!(db.metadata.by_firm["Business School"], 2);
        assert_eq!(db.metadata.by_source_type["REX"], 1);
        assert_eq!(db.metadata.by_source_type["Casebook"], 2);
        assert_eq!(db.metadata.by_difficulty["easy"], 2);
        assert_eq!(db.metadata.by_type["market_entry"], 3);
        assert_eq!(db.metadata.by_industry["Energy"], 3);
    }

    #[test]
    fn test_titles() {
        let db = build_database(&report(vec![
            case("a.pdf", Some("A utility wants to build wind farms. Help it."), Difficulty::Easy),
            case("b.pdf", None, Difficulty::Easy),
        ]));
        assert_eq!(db.cases[0].title, "A utility wants to build wind farms");
        assert_eq!(db.cases[1].title, "Energy - Market Entry");
    }

    #[test]
    fn test_content_is_truncated() {
        let long_prompt = "p".repeat(800);
        let db = build_database(&report(vec![case("a.pdf", Some(&long_prompt), Difficulty::Easy)]));
        let content = &db.cases[0].content;
        assert_eq!(content.prompt.chars().count(), MAX_PROMPT_CHARS);
        assert_eq!(content.full_text.chars().count(), MAX_FULL_TEXT_CHARS);
        assert_eq!(db.cases[0].title.chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn test_save_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases_database.json");
        let db = build_database(&report(vec![case("a.pdf", None, Difficulty::Medium)]));
        db.save(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["total_cases"], 1);
        assert_eq!(json["cases"][0]["difficulty"], "medium");
        assert_eq!(json["cases"][0]["source"]["type"], "unknown");
    }
}
