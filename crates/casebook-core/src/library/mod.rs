//! The on-disk case library: one directory per case under
//! `cases/<type>/<difficulty>/<id>/`, plus a top-level `index.json`.

pub mod builder;
pub mod query;

pub use builder::LibraryBuilder;
pub use query::{CaseFilter, CaseLibrary};

use crate::model::{
    CaseContent, CaseMetadata, CaseStats, CaseType, Difficulty, Industry, VisualAssets,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const LIBRARY_VERSION: &str = "1.0";
pub const INDEX_FILE: &str = "index.json";
pub const CASE_FILE: &str = "case.json";
pub const METADATA_FILE: &str = "metadata.json";
pub const EXHIBITS_DIR: &str = "exhibits";
pub const CASES_DIR: &str = "cases";

/// Case counts per type, difficulty and industry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryStatistics {
    pub by_type: BTreeMap<String, usize>,
    pub by_difficulty: BTreeMap<String, usize>,
    pub by_industry: BTreeMap<String, usize>,
}

impl LibraryStatistics {
    fn record(&mut self, metadata: &CaseMetadata) {
        *self.by_type.entry(metadata.case_type.to_string()).or_default() += 1;
        *self
            .by_difficulty
            .entry(metadata.difficulty.to_string())
            .or_default() += 1;
        *self
            .by_industry
            .entry(metadata.industry.to_string())
            .or_default() += 1;
    }
}

/// `index.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryIndex {
    pub library_version: String,
    pub last_updated: DateTime<Utc>,
    pub total_cases: usize,
    pub statistics: LibraryStatistics,
    pub cases: Vec<IndexEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub case_id: String,
    pub title: String,
    pub case_type: CaseType,
    pub difficulty: Difficulty,
    pub industry: Industry,
    pub tags: Vec<String>,
    /// Case directory, relative to the library root.
    pub path: PathBuf,
    pub has_exhibits: bool,
    pub has_visuals: bool,
    pub quality_score: u32,
}

/// `case.json`: the complete case.
///
/// Asset paths are stored relative to the case directory and resolved to
/// absolute paths by [`CaseLibrary::load_case`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryCase {
    pub case_id: String,
    /// File name of the source PDF.
    pub source: String,
    pub metadata: CaseMetadata,
    pub content: CaseContent,
    pub visual_assets: VisualAssets,
    pub stats: CaseStats,
    pub created_at: DateTime<Utc>,
    pub version: String,
}

/// `metadata.json`: a lightweight summary next to `case.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFileMetadata {
    pub case_id: String,
    pub title: String,
    pub case_type: CaseType,
    pub difficulty: Difficulty,
    pub industry: Industry,
    pub tags: Vec<String>,
    pub statistics: CaseStats,
    pub files: CaseFiles,
    pub source: CaseOrigin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFiles {
    pub case_json: String,
    pub exhibits_folder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOrigin {
    pub pdf: String,
    pub extraction_date: DateTime<Utc>,
    pub extraction_version: String,
}
