//! Project records.

use serde::{Deserialize, Serialize};

use crate::today;

/// The informal set of project statuses offered by the console.
///
/// This is advisory only: any string is accepted as a status.
pub const PROJECT_STATUSES: &[&str] = &["Planning", "Active", "Testing", "Completed", "On Hold"];

/// Status given to newly created projects.
pub const DEFAULT_PROJECT_STATUS: &str = "Planning";

/// A project tracked by the department.
///
/// `team_members` holds employee ids in assignment order, without
/// duplicates. It is only ever edited by the store's assignment and
/// removal operations, which keep it consistent with each member's
/// `current_project`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier, assigned sequentially by the store.
    pub id: u32,

    /// Project name.
    pub name: String,

    /// Free-text description.
    pub description: String,

    /// Status string, normally one of [`PROJECT_STATUSES`].
    #[serde(default = "default_status")]
    pub status: String,

    /// Start date as `YYYY-MM-DD`. Defaults to the creation date.
    #[serde(default = "today")]
    pub start_date: String,

    /// End date, unset until the project wraps up.
    #[serde(default)]
    pub end_date: Option<String>,

    /// Employee ids in assignment order.
    #[serde(default)]
    pub team_members: Vec<u32>,

    /// Technologies used, in insertion order.
    #[serde(default)]
    pub technologies: Vec<String>,
}

fn default_status() -> String {
    DEFAULT_PROJECT_STATUS.to_string()
}

impl Project {
    /// Creates a new project with an empty team, starting today.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        description: impl Into<String>,
        technologies: Vec<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            status: status.into(),
            start_date: today(),
            end_date: None,
            team_members: Vec::new(),
            technologies,
        }
    }

    /// Returns true if the given employee id is on the team.
    pub fn has_member(&self, employee_id: u32) -> bool {
        self.team_members.contains(&employee_id)
    }

    /// Number of employees on the team.
    pub fn team_size(&self) -> usize {
        self.team_members.len()
    }
}
