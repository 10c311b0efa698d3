//! Dataset file location, validation and reading.
//!
//! The MCP `load_dataset` tool accepts arbitrary paths from the client, so
//! every path goes through [`validate_dataset_path`] before it is read:
//!
//! 1. The path must exist and be a regular file
//! 2. It must carry a `.json` extension
//! 3. Well-known credential files are refused even though they are JSON
//! 4. Its size must stay under the configured limit

use crate::error::{DatasetError, DatasetResult, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// JSON files that hold secrets rather than directory data.
const SENSITIVE_JSON: &[(&str, &str)] = &[
    ("credentials.json", "credentials file"),
    ("secrets.json", "secrets file"),
    ("gcloud-credentials.json", "GCloud credentials"),
    ("service-account.json", "service account key"),
    ("auth.json", "auth tokens"),
];

/// Returns the reason a file name is sensitive, if it is.
#[must_use]
pub fn is_sensitive_file(path: &Path) -> Option<&'static str> {
    let name = path.file_name()?.to_str()?.to_lowercase();
    SENSITIVE_JSON
        .iter()
        .find(|(pattern, _)| *pattern == name)
        .map(|(_, reason)| *reason)
}

/// Validates a dataset path and returns its canonical form.
///
/// # Errors
///
/// Returns a `DatasetError` describing the first failed check.
pub fn validate_dataset_path(path: &Path, max_bytes: u64) -> DatasetResult<PathBuf> {
    let metadata = fs::metadata(path).map_err(|_| DatasetError::NotFound {
        path: path.to_path_buf(),
    })?;
    if !metadata.is_file() {
        return Err(DatasetError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(DatasetError::NotJson {
            path: path.to_path_buf(),
        });
    }

    if let Some(reason) = is_sensitive_file(path) {
        return Err(DatasetError::Sensitive {
            path: path.to_path_buf(),
            reason,
        });
    }

    if metadata.len() > max_bytes {
        return Err(DatasetError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit: max_bytes,
        });
    }

    // Strips the Windows \\?\ prefix that std canonicalize adds
    Ok(dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()))
}

/// Validates and reads a dataset file.
///
/// # Errors
///
/// Returns `DirectoryError::Dataset` if validation fails and
/// `DirectoryError::Io` if the file cannot be read.
pub fn read_dataset(path: &Path, max_bytes: u64) -> Result<String> {
    let path = validate_dataset_path(path, max_bytes)?;
    Ok(fs::read_to_string(path)?)
}

/// Content fingerprint of a dataset: xxh3-64 as 16 hex characters.
#[must_use]
pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:016x}", xxhash_rust::xxh3::xxh3_64(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_accepts_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icn-data.json");
        fs::write(&path, "[]").unwrap();

        let resolved = validate_dataset_path(&path, 1024).unwrap();
        assert!(resolved.ends_with("icn-data.json"));
        assert_eq!(read_dataset(&path, 1024).unwrap(), "[]");
    }

    #[test]
    fn test_validate_rejections() {
        let dir = TempDir::new().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            validate_dataset_path(&missing, 1024),
            Err(DatasetError::NotFound { .. })
        ));

        assert!(matches!(
            validate_dataset_path(dir.path(), 1024),
            Err(DatasetError::NotAFile { .. })
        ));

        let csv = dir.path().join("data.csv");
        fs::write(&csv, "a,b").unwrap();
        assert!(matches!(
            validate_dataset_path(&csv, 1024),
            Err(DatasetError::NotJson { .. })
        ));

        let creds = dir.path().join("credentials.json");
        fs::write(&creds, "{}").unwrap();
        assert!(matches!(
            validate_dataset_path(&creds, 1024),
            Err(DatasetError::Sensitive { .. })
        ));

        let big = dir.path().join("big.json");
        fs::write(&big, "[1,2,3,4,5,6,7,8,9]").unwrap();
        assert!(matches!(
            validate_dataset_path(&big, 4),
            Err(DatasetError::TooLarge { size: 19, limit: 4, .. })
        ));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(fingerprint(b"[]"), fingerprint(b"[]"));
        assert_ne!(fingerprint(b"[]"), fingerprint(b"[{}]"));
        assert_eq!(fingerprint(b"[]").len(), 16);
    }
}
