//! Persistence layer for the department manager.
//!
//! The entire department state lives in one JSON snapshot file which is
//! rewritten atomically (write to temp file, then rename) after every
//! mutation. Loading never fails hard: missing or malformed pieces of
//! the file fall back to defaults and the damage is described in a
//! [`LoadReport`] for the caller to surface.
//!
//! # Example
//!
//! ```no_run
//! use department_persistence::{DepartmentSnapshot, SnapshotStore};
//!
//! let store = SnapshotStore::new("department_data.json");
//!
//! let loaded = store.load();
//! let mut snapshot = loaded.snapshot;
//! snapshot.next_employee_id += 1;
//! store.save(&snapshot).unwrap();
//! ```

pub mod atomic;
pub mod error;
pub mod snapshot;

pub use error::{PersistError, Result};
pub use snapshot::{DepartmentSnapshot, LoadReport, LoadedSnapshot, SnapshotStore};
