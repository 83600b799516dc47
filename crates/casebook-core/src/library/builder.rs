use super::{
    CaseFileMetadata, CaseFiles, CaseOrigin, IndexEntry, LibraryCase, LibraryIndex,
    LibraryStatistics, CASES_DIR, CASE_FILE, EXHIBITS_DIR, INDEX_FILE, LIBRARY_VERSION,
    METADATA_FILE,
};
use crate::error::CasebookError;
use crate::model::{CaseContent, CaseMetadata, ExtractedCase, ExtractionReport, VisualAsset};
use crate::parsing::fields::truncate;
use crate::parsing::patterns::compile;
use crate::scoring::quality_score;
use crate::store::write_json;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

const MAX_TITLE_CHARS: usize = 50;
const MAX_TAGS: usize = 10;

static CLIENT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)(?:client|company)(?:\s+is|\s+named)?\s+([A-Z][a-zA-Z\s]+)")
});

/// Keyword tags, matched case-insensitively against the serialized content.
const KEYWORD_TAGS: [(&str, &[&str]); 6] = [
    ("quantitative", &["calculate", "compute", "×", "÷", "equation"]),
    ("qualitative", &["brainstorm", "discuss", "factors", "considerations"]),
    ("market_sizing", &["market size", "tam", "addressable market"]),
    ("financial_analysis", &["revenue", "cost", "profit", "margin", "npv", "irr"]),
    ("competitive_analysis", &["competitor", "market share", "rivalry"]),
    ("strategy", &["strategic", "positioning", "competitive advantage"]),
];

/// Writes extracted cases into a library directory.
pub struct LibraryBuilder {
    root: PathBuf,
    counters: HashMap<String, u32>,
    stats: LibraryStatistics,
}

impl LibraryBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LibraryBuilder {
            root: root.into(),
            counters: HashMap::new(),
            stats: LibraryStatistics::default(),
        }
    }

    /// Write every case of `report` and the library index.
    ///
    /// A case that cannot be written is logged and left out of the index.
    pub fn build(mut self, report: &ExtractionReport) -> Result<LibraryIndex, CasebookError> {
        fs::create_dir_all(self.root.join(CASES_DIR))?;
        info!(
            "building library in {} from {} cases",
            self.root.display(),
            report.cases.len()
        );

        let extraction_date = report.metadata.extraction_date;
        let mut entries = Vec::new();
        for (idx, case) in report.cases.iter().enumerate() {
            match self.add_case(case, extraction_date) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("skipping case {} ({}): {}", idx + 1, case.case_id, e),
            }
        }

        let index = LibraryIndex {
            library_version: LIBRARY_VERSION.to_string(),
            last_updated: Utc::now(),
            total_cases: entries.len(),
            statistics: self.stats,
            cases: entries,
        };
        write_json(&self.root.join(INDEX_FILE), &index)?;

        info!("library built with {} cases", index.total_cases);
        Ok(index)
    }

    fn add_case(
        &mut self,
        case: &ExtractedCase,
        extraction_date: DateTime<Utc>,
    ) -> Result<IndexEntry, CasebookError> {
        let metadata = case.metadata;
        let case_id = self.next_id(&metadata);
        let relative: PathBuf = [
            CASES_DIR,
            metadata.case_type.as_str(),
            metadata.difficulty.as_str(),
            case_id.as_str(),
        ]
        .iter()
        .collect();
        let case_dir = self.root.join(&relative);
        let exhibits_dir = case_dir.join(EXHIBITS_DIR);
        fs::create_dir_all(&exhibits_dir)?;

        let title = case_title(&case.content, &case.case_id);
        let tags = case_tags(case)?;

        let mut visual_assets = case.visual_assets.clone();
        for asset in visual_assets
            .images
            .iter_mut()
            .chain(visual_assets.screenshots.iter_mut())
        {
            asset.filepath = Path::new(EXHIBITS_DIR).join(&asset.filename);
        }

        let library_case = LibraryCase {
            case_id: case_id.clone(),
            source: case.source.clone(),
            metadata,
            content: case.content.clone(),
            visual_assets,
            stats: case.stats.clone(),
            created_at: Utc::now(),
            version: LIBRARY_VERSION.to_string(),
        };
        write_json(&case_dir.join(CASE_FILE), &library_case)?;

        let file_metadata = CaseFileMetadata {
            case_id: case_id.clone(),
            title: title.clone(),
            case_type: metadata.case_type,
            difficulty: metadata.difficulty,
            industry: metadata.industry,
            tags: tags.clone(),
            statistics: case.stats.clone(),
            files: CaseFiles {
                case_json: CASE_FILE.to_string(),
                exhibits_folder: format!("{}/", EXHIBITS_DIR),
            },
            source: CaseOrigin {
                pdf: case.source.clone(),
                extraction_date,
                extraction_version: LIBRARY_VERSION.to_string(),
            },
        };
        write_json(&case_dir.join(METADATA_FILE), &file_metadata)?;

        copy_assets(
            case.visual_assets
                .images
                .iter()
                .chain(case.visual_assets.screenshots.iter()),
            &exhibits_dir,
        );

        self.stats.record(&metadata);
        debug!("wrote {} to {}", case_id, case_dir.display());

        Ok(IndexEntry {
            case_id,
            title,
            case_type: metadata.case_type,
            difficulty: metadata.difficulty,
            industry: metadata.industry,
            tags,
            path: relative,
            has_exhibits: !case.content.exhibits.is_empty(),
            has_visuals: case.stats.has_visual_assets,
            quality_score: quality_score(&case.content, &case.visual_assets),
        })
    }

    /// `case_<type[..4]>_<difficulty[..4]>_<NNN>`, numbered per prefix.
    fn next_id(&mut self, metadata: &CaseMetadata) -> String {
        let key = format!(
            "{}_{}",
            truncate(metadata.case_type.as_str(), 4),
            truncate(metadata.difficulty.as_str(), 4)
        );
        let counter = self.counters.entry(key.clone()).or_insert(0);
        *counter += 1;
        format!("case_{}_{:03}", key, counter)
    }
}

/// Client or company name from the prompt, else the start of the prompt,
/// else `Case <extraction id>`.
pub fn case_title(content: &CaseContent, case_id: &str) -> String {
    let Some(prompt) = content.prompt.as_deref() else {
        return format!("Case {}", case_id);
    };

    if let Some(name) = CLIENT_NAME.captures(prompt).and_then(|c| c.get(1)) {
        return truncate(name.as_str().trim(), MAX_TITLE_CHARS);
    }

    format!("{}...", truncate(prompt, MAX_TITLE_CHARS).trim())
}

/// Case type, industry slug and content keyword tags; unique, at most ten.
pub fn case_tags(case: &ExtractedCase) -> Result<Vec<String>, CasebookError> {
    let mut tags = vec![
        case.metadata.case_type.as_str().to_string(),
        case.metadata.industry.slug(),
    ];

    let content_text = serde_json::to_string(&case.content)?.to_lowercase();
    for (tag, keywords) in KEYWORD_TAGS {
        if keywords.iter().any(|k| content_text.contains(k)) {
            tags.push(tag.to_string());
        }
    }

    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique.truncate(MAX_TAGS);
    Ok(unique)
}

fn copy_assets<'a>(assets: impl Iterator<Item = &'a VisualAsset>, exhibits_dir: &Path) {
    for asset in assets {
        if !asset.filepath.exists() {
            warn!(
                "visual asset {} not found at {}",
                asset.filename,
                asset.filepath.display()
            );
            continue;
        }
        if let Err(e) = fs::copy(&asset.filepath, exhibits_dir.join(&asset.filename)) {
            warn!("could not copy {}: {}", asset.filename, e);
        }
    }
}
