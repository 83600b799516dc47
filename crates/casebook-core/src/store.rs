use crate::error::CasebookError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Write `value` as pretty-printed JSON, replacing any existing file.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CasebookError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a JSON document, reporting which file could not be loaded.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CasebookError> {
    let load_err = |reason: String| CasebookError::Load {
        path: path.to_path_buf(),
        reason,
    };
    let json = fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
    serde_json::from_str(&json).map_err(|e| load_err(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/counts.json");
        let counts: BTreeMap<String, usize> = [("hard".to_string(), 2)].into();

        write_json(&path, &counts).unwrap();
        let back: BTreeMap<String, usize> = read_json(&path).unwrap();
        assert_eq!(back, counts);
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let err = read_json::<BTreeMap<String, usize>>(Path::new("/nonexistent/index.json"))
            .unwrap_err();
        assert!(matches!(err, CasebookError::Load { .. }));
        assert!(err.to_string().contains("/nonexistent/index.json"));
    }
}
