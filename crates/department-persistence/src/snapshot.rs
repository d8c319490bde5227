//! The on-disk snapshot format and its store.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use department_models::{Employee, Project};

use crate::atomic::atomic_write_json;
use crate::error::Result;

/// The complete persisted state of a department.
///
/// Record maps are keyed by id; since ids are allocated monotonically,
/// id order is also insertion order. JSON object keys come out as the
/// decimal string form of the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentSnapshot {
    /// Next employee id to allocate. Starts at 1, never reused.
    #[serde(default = "first_id")]
    pub next_employee_id: u32,

    /// Next project id to allocate. Starts at 1, never reused.
    #[serde(default = "first_id")]
    pub next_project_id: u32,

    /// All employees, keyed by id.
    #[serde(default)]
    pub employees: BTreeMap<u32, Employee>,

    /// All projects, keyed by id.
    #[serde(default)]
    pub projects: BTreeMap<u32, Project>,
}

fn first_id() -> u32 {
    1
}

impl DepartmentSnapshot {
    /// An empty snapshot with both counters at 1.
    pub fn empty() -> Self {
        Self {
            next_employee_id: 1,
            next_project_id: 1,
            employees: BTreeMap::new(),
            projects: BTreeMap::new(),
        }
    }
}

/// How a snapshot load went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    /// No snapshot file existed; starting from an empty department.
    Fresh,
    /// The snapshot was read back in full.
    Loaded,
    /// Parts of the snapshot were missing or malformed and fell back to
    /// defaults. The reasons describe what was lost.
    Degraded { reasons: Vec<String> },
}

impl LoadReport {
    /// Returns true if anything fell back to a default.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// A loaded snapshot together with its load report.
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub snapshot: DepartmentSnapshot,
    pub report: LoadReport,
}

/// Reads and writes the department snapshot file.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Creates a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the snapshot, degrading gracefully instead of failing.
    ///
    /// Each top-level key is decoded independently, so a malformed
    /// record map costs only that map while the counters and the other
    /// map survive. The report tells the caller what, if anything, was
    /// dropped.
    pub fn load(&self) -> LoadedSnapshot {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return LoadedSnapshot {
                    snapshot: DepartmentSnapshot::empty(),
                    report: LoadReport::Fresh,
                };
            }
            Err(e) => {
                return LoadedSnapshot {
                    snapshot: DepartmentSnapshot::empty(),
                    report: LoadReport::Degraded {
                        reasons: vec![format!("failed to read {}: {}", self.path.display(), e)],
                    },
                };
            }
        };

        let mut root = match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(other) => {
                return LoadedSnapshot {
                    snapshot: DepartmentSnapshot::empty(),
                    report: LoadReport::Degraded {
                        reasons: vec![format!(
                            "snapshot root is {} instead of an object",
                            value_kind(&other)
                        )],
                    },
                };
            }
            Err(e) => {
                return LoadedSnapshot {
                    snapshot: DepartmentSnapshot::empty(),
                    report: LoadReport::Degraded {
                        reasons: vec![format!("invalid JSON: {}", e)],
                    },
                };
            }
        };

        let mut reasons = Vec::new();
        let snapshot = DepartmentSnapshot {
            next_employee_id: decode_key(&mut root, "next_employee_id", 1, &mut reasons),
            next_project_id: decode_key(&mut root, "next_project_id", 1, &mut reasons),
            employees: decode_key(&mut root, "employees", BTreeMap::new(), &mut reasons),
            projects: decode_key(&mut root, "projects", BTreeMap::new(), &mut reasons),
        };

        let report = if reasons.is_empty() {
            LoadReport::Loaded
        } else {
            LoadReport::Degraded { reasons }
        };

        LoadedSnapshot { snapshot, report }
    }

    /// Writes the whole snapshot atomically as pretty-printed JSON.
    pub fn save(&self, snapshot: &DepartmentSnapshot) -> Result<()> {
        atomic_write_json(&self.path, snapshot)
    }
}

/// Decodes one top-level key, falling back to a default on absence or
/// decode failure and recording why.
fn decode_key<T: DeserializeOwned>(
    root: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
    default: T,
    reasons: &mut Vec<String>,
) -> T {
    match root.remove(key) {
        Some(value) => match serde_json::from_value(value) {
            Ok(decoded) => decoded,
            Err(e) => {
                reasons.push(format!("malformed '{}': {}", key, e));
                default
            }
        },
        None => {
            reasons.push(format!("missing '{}'", key));
            default
        }
    }
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_snapshot() -> DepartmentSnapshot {
        let mut snapshot = DepartmentSnapshot::empty();
        let emp = Employee::new(1, "Ana", "Developer", "a@x.com", vec!["Python".to_string()]);
        let mut proj = Project::new(1, "Apollo", "x", vec!["Go".to_string()], "Planning");
        proj.team_members.push(1);
        snapshot.employees.insert(1, emp);
        snapshot.projects.insert(1, proj);
        snapshot.next_employee_id = 2;
        snapshot.next_project_id = 2;
        snapshot
    }

    #[test]
    fn test_load_missing_file_is_fresh() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("missing.json"));

        let loaded = store.load();

        assert_eq!(loaded.report, LoadReport::Fresh);
        assert_eq!(loaded.snapshot, DepartmentSnapshot::empty());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("data.json"));

        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();
        let loaded = store.load();

        assert_eq!(loaded.report, LoadReport::Loaded);
        assert_eq!(loaded.snapshot, snapshot);
    }

    #[test]
    fn test_record_maps_use_decimal_string_keys() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("data.json"));

        store.save(&sample_snapshot()).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value["employees"]["1"].is_object());
        assert!(value["projects"]["1"].is_object());
        assert_eq!(value["next_employee_id"], 2);
    }

    #[test]
    fn test_load_invalid_json_degrades_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{ not json").unwrap();

        let loaded = SnapshotStore::new(&path).load();

        assert!(loaded.report.is_degraded());
        assert_eq!(loaded.snapshot, DepartmentSnapshot::empty());
    }

    #[test]
    fn test_load_non_object_root_degrades() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let loaded = SnapshotStore::new(&path).load();

        assert!(loaded.report.is_degraded());
        assert_eq!(loaded.snapshot, DepartmentSnapshot::empty());
    }

    #[test]
    fn test_load_missing_keys_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"next_employee_id": 5}"#).unwrap();

        let loaded = SnapshotStore::new(&path).load();

        assert_eq!(loaded.snapshot.next_employee_id, 5);
        assert_eq!(loaded.snapshot.next_project_id, 1);
        assert!(loaded.snapshot.employees.is_empty());
        match loaded.report {
            LoadReport::Degraded { reasons } => assert_eq!(reasons.len(), 3),
            other => panic!("expected degraded report, got {:?}", other),
        }
    }

    #[test]
    fn test_load_malformed_key_keeps_the_rest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");

        // Employees map is garbage; counters and projects must survive.
        let text = r#"{
            "next_employee_id": 3,
            "next_project_id": 2,
            "employees": "oops",
            "projects": {}
        }"#;
        fs::write(&path, text).unwrap();

        let loaded = SnapshotStore::new(&path).load();

        assert!(loaded.report.is_degraded());
        assert_eq!(loaded.snapshot.next_employee_id, 3);
        assert_eq!(loaded.snapshot.next_project_id, 2);
        assert!(loaded.snapshot.employees.is_empty());
    }
}
