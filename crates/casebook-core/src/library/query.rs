use super::{
    IndexEntry, LibraryCase, LibraryIndex, LibraryStatistics, CASE_FILE, EXHIBITS_DIR, INDEX_FILE,
};
use crate::error::CasebookError;
use crate::model::{CaseType, Difficulty, Industry};
use crate::store::read_json;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Criteria for [`CaseLibrary::list`]. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    pub case_type: Option<CaseType>,
    pub difficulty: Option<Difficulty>,
    pub industry: Option<Industry>,
    /// Every listed tag must be present on the case.
    pub tags: Vec<String>,
    pub min_quality: u32,
}

impl CaseFilter {
    pub fn matches(&self, entry: &IndexEntry) -> bool {
        self.case_type.map_or(true, |t| entry.case_type == t)
            && self.difficulty.map_or(true, |d| entry.difficulty == d)
            && self.industry.map_or(true, |i| entry.industry == i)
            && self.tags.iter().all(|t| entry.tags.contains(t))
            && entry.quality_score >= self.min_quality
    }
}

/// Read-only access to a built library.
#[derive(Debug)]
pub struct CaseLibrary {
    root: PathBuf,
    index: LibraryIndex,
}

impl CaseLibrary {
    /// Load the library index under `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, CasebookError> {
        let root = root.as_ref();
        let index: LibraryIndex = read_json(&root.join(INDEX_FILE))?;
        let root = fs::canonicalize(root)?;
        debug!("opened library with {} cases", index.total_cases);
        Ok(CaseLibrary { root, index })
    }

    pub fn index(&self) -> &LibraryIndex {
        &self.index
    }

    pub fn total_cases(&self) -> usize {
        self.index.total_cases
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.index.last_updated
    }

    pub fn statistics(&self) -> &LibraryStatistics {
        &self.index.statistics
    }

    /// Cases matching `filter`, best quality first.
    pub fn list(&self, filter: &CaseFilter, limit: usize) -> Vec<&IndexEntry> {
        let mut results: Vec<&IndexEntry> = self
            .index
            .cases
            .iter()
            .filter(|e| filter.matches(e))
            .collect();
        results.sort_by_key(|e| Reverse(e.quality_score));
        results.truncate(limit);
        results
    }

    /// Case-insensitive substring search over title, tags and industry.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&IndexEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.index
            .cases
            .iter()
            .filter(|e| {
                e.title.to_lowercase().contains(&query)
                    || e.tags.iter().any(|t| t.to_lowercase().contains(&query))
                    || e.industry.as_str().to_lowercase().contains(&query)
            })
            .take(limit)
            .collect()
    }

    pub fn entry(&self, case_id: &str) -> Option<&IndexEntry> {
        self.index.cases.iter().find(|e| e.case_id == case_id)
    }

    /// Load `case.json` with asset paths resolved inside the case's
    /// `exhibits/` directory.
    pub fn load_case(&self, case_id: &str) -> Result<LibraryCase, CasebookError> {
        let entry = self
            .entry(case_id)
            .ok_or_else(|| CasebookError::CaseNotFound(case_id.to_string()))?;
        let case_dir = self.root.join(&entry.path);

        let mut case: LibraryCase = read_json(&case_dir.join(CASE_FILE))?;
        let exhibits = case_dir.join(EXHIBITS_DIR);
        for asset in case
            .visual_assets
            .images
            .iter_mut()
            .chain(case.visual_assets.screenshots.iter_mut())
        {
            asset.filepath = exhibits.join(&asset.filename);
        }

        Ok(case)
    }

    /// Case types present in the library.
    pub fn case_types(&self) -> Vec<&str> {
        self.index.statistics.by_type.keys().map(String::as_str).collect()
    }

    pub fn difficulties(&self) -> Vec<&str> {
        self.index
            .statistics
            .by_difficulty
            .keys()
            .map(String::as_str)
            .collect()
    }

    pub fn industries(&self) -> Vec<&str> {
        self.index
            .statistics
            .by_industry
            .keys()
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::LIBRARY_VERSION;

    fn entry(id: &str, case_type: CaseType, quality: u32, tags: &[&str]) -> IndexEntry {
        IndexEntry {
            case_id: id.into(),
            title: format!("Title of {}", id),
            case_type,
            difficulty: Difficulty::Medium,
            industry: Industry::Retail,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            path: PathBuf::from(format!("cases/x/medium/{}", id)),
            has_exhibits: false,
            has_visuals: false,
            quality_score: quality,
        }
    }

    fn library() -> CaseLibrary {
        let cases = vec![
            entry("a", CaseType::Pricing, 40, &["pricing", "quantitative"]),
            entry("b", CaseType::Pricing, 90, &["pricing"]),
            entry("c", CaseType::Growth, 70, &["growth", "strategy"]),
        ];
        CaseLibrary {
            root: PathBuf::from("/lib"),
            index: LibraryIndex {
                library_version: LIBRARY_VERSION.into(),
                last_updated: Utc::now(),
                total_cases: cases.len(),
                statistics: LibraryStatistics::default(),
                cases,
            },
        }
    }

    fn ids(entries: &[&IndexEntry]) -> Vec<String> {
        entries.iter().map(|e| e.case_id.clone()).collect()
    }

    #[test]
    fn test_list_sorted_by_quality() {
        let lib = library();
        assert_eq!(ids(&lib.list(&CaseFilter::default(), 10)), vec!["b", "c", "a"]);
        assert_eq!(ids(&lib.list(&CaseFilter::default(), 1)), vec!["b"]);
    }

    #[test]
    fn test_list_filters() {
        let lib = library();
        let filter = CaseFilter {
            case_type: Some(CaseType::Pricing),
            ..Default::default()
        };
        assert_eq!(ids(&lib.list(&filter, 10)), vec!["b", "a"]);

        let filter = CaseFilter {
            tags: vec!["pricing".into(), "quantitative".into()],
            ..Default::default()
        };
        assert_eq!(ids(&lib.list(&filter, 10)), vec!["a"]);

        let filter = CaseFilter {
            min_quality: 60,
            ..Default::default()
        };
        assert_eq!(ids(&lib.list(&filter, 10)), vec!["b", "c"]);

        let filter = CaseFilter {
            industry: Some(Industry::Energy),
            ..Default::default()
        };
        assert!(lib.list(&filter, 10).is_empty());
    }

    #[test]
    fn test_search_title_tags_industry() {
        let lib = library();
        assert_eq!(ids(&lib.search("STRAT", 10)), vec!["c"]);
        assert_eq!(ids(&lib.search("title of b", 10)), vec!["b"]);
        assert_eq!(lib.search("retail", 2).len(), 2);
        assert!(lib.search("  ", 10).is_empty());
    }

    #[test]
    fn test_unknown_case_id() {
        let err = library().load_case("zzz").unwrap_err();
        assert!(matches!(err, CasebookError::CaseNotFound(id) if id == "zzz"));
    }

    #[test]
    fn test_open_missing_library() {
        let dir = tempfile::tempdir().unwrap();
        let err = CaseLibrary::open(dir.path()).unwrap_err();
        assert!(matches!(err, CasebookError::Load { .. }));
    }
}
