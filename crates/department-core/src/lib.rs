//! Core department logic.
//!
//! The [`Department`] store owns every employee and project record,
//! allocates ids, keeps the employee/project assignment relationship
//! consistent from both sides, and mirrors every mutation to the
//! snapshot file. The aggregate reports used by the console live in
//! [`reports`].

pub mod department;
pub mod error;
pub mod reports;

pub use department::Department;
pub use error::{DepartmentError, Result};
pub use reports::DepartmentOverview;

// Callers need the load report to surface degraded loads.
pub use department_persistence::LoadReport;
