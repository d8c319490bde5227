//! Atomic file writes for crash-safe snapshots.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{PersistError, Result};

/// Writes data to a file atomically.
///
/// The data is written to a temporary file in the same directory, then
/// renamed over the target path. A crash mid-write leaves the previous
/// snapshot intact rather than a truncated file.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| PersistError::Directory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    // Temp file must live in the same directory for the rename to stay
    // on one filesystem.
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut temp_file =
        tempfile::NamedTempFile::new_in(dir).map_err(|source| PersistError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    temp_file
        .write_all(data)
        .map_err(|source| PersistError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    temp_file.flush().map_err(|source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    temp_file.persist(path).map_err(|e| PersistError::Write {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}

/// Serializes a value as pretty-printed JSON and writes it atomically.
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, json.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");

        atomic_write(&path, b"{}").unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/data.json");

        atomic_write(&path, b"{}").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");

        atomic_write(&path, b"old").unwrap();
        atomic_write(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_atomic_write_json_is_pretty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");

        let value = serde_json::json!({"a": 1, "b": [2, 3]});
        atomic_write_json(&path, &value).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, value);
    }
}
