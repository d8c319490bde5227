//! Core data models for the department manager.
//!
//! This crate provides the two record types tracked by the department,
//! employees and projects, plus the patch types used to apply partial
//! updates to them.

pub mod employee;
pub mod project;
pub mod update;

// Re-export main types
pub use employee::Employee;
pub use project::{Project, DEFAULT_PROJECT_STATUS, PROJECT_STATUSES};
pub use update::{EmployeeUpdate, ProjectUpdate};

/// Returns the current local date as a `YYYY-MM-DD` string.
///
/// Used as the default for hire and start dates.
pub(crate) fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
