//! Employee records.

use serde::{Deserialize, Serialize};

use crate::today;

/// An employee tracked by the department.
///
/// The id is allocated by the store and never changes; `current_project`
/// is only ever written by the store's assignment operations so that it
/// stays consistent with the owning project's team list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier, assigned sequentially by the store.
    pub id: u32,

    /// Full name.
    pub name: String,

    /// Role within the department (e.g., "Developer", "QA").
    pub role: String,

    /// Contact email.
    pub email: String,

    /// Skills in insertion order. Duplicates are allowed.
    #[serde(default)]
    pub skills: Vec<String>,

    /// Hire date as `YYYY-MM-DD`. Defaults to the creation date.
    #[serde(default = "today")]
    pub hire_date: String,

    /// Id of the project this employee is assigned to, if any.
    #[serde(default)]
    pub current_project: Option<u32>,
}

impl Employee {
    /// Creates a new, unassigned employee hired today.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        role: impl Into<String>,
        email: impl Into<String>,
        skills: Vec<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            role: role.into(),
            email: email.into(),
            skills,
            hire_date: today(),
            current_project: None,
        }
    }

    /// Returns true if the employee is assigned to a project.
    pub fn is_assigned(&self) -> bool {
        self.current_project.is_some()
    }
}
