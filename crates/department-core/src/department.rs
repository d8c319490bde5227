//! The department store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use department_models::{Employee, EmployeeUpdate, Project, ProjectUpdate};
use department_persistence::{DepartmentSnapshot, LoadReport, SnapshotStore};

use crate::error::Result;

/// Owns all employee and project records.
///
/// Every mutating operation updates the in-memory maps and then
/// synchronously rewrites the whole snapshot file, so the on-disk state
/// is always at most one operation behind. Ids are allocated from
/// monotonically increasing counters and never reused, which also means
/// id order equals insertion order for listing.
///
/// The bidirectional assignment invariant (an employee's
/// `current_project` and the project's `team_members` always agree) is
/// maintained by construction: only the operations here may touch
/// either side of the relationship.
pub struct Department {
    store: SnapshotStore,
    employees: BTreeMap<u32, Employee>,
    projects: BTreeMap<u32, Project>,
    next_employee_id: u32,
    next_project_id: u32,
}

impl Department {
    /// Opens the department backed by the given snapshot file.
    ///
    /// A missing file starts an empty department; a damaged file keeps
    /// whatever could be decoded. The report says which case applied,
    /// leaving it to the caller how to surface a degraded load.
    pub fn open(path: impl Into<PathBuf>) -> (Self, LoadReport) {
        let store = SnapshotStore::new(path);
        let loaded = store.load();
        let snapshot = loaded.snapshot;

        let department = Self {
            store,
            employees: snapshot.employees,
            projects: snapshot.projects,
            next_employee_id: snapshot.next_employee_id,
            next_project_id: snapshot.next_project_id,
        };

        (department, loaded.report)
    }

    /// Path of the backing snapshot file.
    pub fn data_path(&self) -> &Path {
        self.store.path()
    }

    // Employee management

    /// Adds a new employee and returns it.
    pub fn add_employee(
        &mut self,
        name: impl Into<String>,
        role: impl Into<String>,
        email: impl Into<String>,
        skills: Vec<String>,
    ) -> Result<&Employee> {
        let id = self.next_employee_id;
        self.next_employee_id += 1;

        let employee = Employee::new(id, name, role, email, skills);
        self.employees.insert(id, employee);
        self.persist()?;

        Ok(&self.employees[&id])
    }

    /// Looks up an employee by id.
    pub fn get_employee(&self, employee_id: u32) -> Option<&Employee> {
        self.employees.get(&employee_id)
    }

    /// All employees in id order.
    pub fn list_employees(&self) -> Vec<&Employee> {
        self.employees.values().collect()
    }

    /// Applies a patch to an employee.
    ///
    /// Returns `Ok(false)` if the id is unknown, in which case nothing
    /// is written to disk.
    pub fn update_employee(&mut self, employee_id: u32, update: EmployeeUpdate) -> Result<bool> {
        let Some(employee) = self.employees.get_mut(&employee_id) else {
            return Ok(false);
        };

        update.apply(employee);
        self.persist()?;
        Ok(true)
    }

    /// Removes an employee, taking them off their project's team first.
    ///
    /// Returns `Ok(false)` if the id is unknown. The freed id is never
    /// reused.
    pub fn remove_employee(&mut self, employee_id: u32) -> Result<bool> {
        let Some(employee) = self.employees.get(&employee_id) else {
            return Ok(false);
        };

        // The project may already be gone; that's fine.
        if let Some(project_id) = employee.current_project {
            if let Some(project) = self.projects.get_mut(&project_id) {
                project.team_members.retain(|&member| member != employee_id);
            }
        }

        self.employees.remove(&employee_id);
        self.persist()?;
        Ok(true)
    }

    // Project management

    /// Adds a new project with an empty team and returns it.
    pub fn add_project(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        technologies: Vec<String>,
        status: impl Into<String>,
    ) -> Result<&Project> {
        let id = self.next_project_id;
        self.next_project_id += 1;

        let project = Project::new(id, name, description, technologies, status);
        self.projects.insert(id, project);
        self.persist()?;

        Ok(&self.projects[&id])
    }

    /// Looks up a project by id.
    pub fn get_project(&self, project_id: u32) -> Option<&Project> {
        self.projects.get(&project_id)
    }

    /// All projects in id order.
    pub fn list_projects(&self) -> Vec<&Project> {
        self.projects.values().collect()
    }

    /// Applies a patch to a project.
    ///
    /// Returns `Ok(false)` if the id is unknown, in which case nothing
    /// is written to disk.
    pub fn update_project(&mut self, project_id: u32, update: ProjectUpdate) -> Result<bool> {
        let Some(project) = self.projects.get_mut(&project_id) else {
            return Ok(false);
        };

        update.apply(project);
        self.persist()?;
        Ok(true)
    }

    /// Removes a project, unassigning every employee on its team.
    ///
    /// Returns `Ok(false)` if the id is unknown.
    pub fn remove_project(&mut self, project_id: u32) -> Result<bool> {
        let Some(project) = self.projects.get(&project_id) else {
            return Ok(false);
        };

        for member_id in project.team_members.clone() {
            if let Some(employee) = self.employees.get_mut(&member_id) {
                if employee.current_project == Some(project_id) {
                    employee.current_project = None;
                }
            }
        }

        self.projects.remove(&project_id);
        self.persist()?;
        Ok(true)
    }

    // Assignment management

    /// Assigns an employee to a project, moving them off any previous
    /// project first.
    ///
    /// Returns `Ok(false)` if either id is unknown. Re-assigning to the
    /// same project leaves the team list untouched.
    pub fn assign_to_project(&mut self, employee_id: u32, project_id: u32) -> Result<bool> {
        if !self.employees.contains_key(&employee_id) || !self.projects.contains_key(&project_id) {
            return Ok(false);
        }

        let previous = self.employees[&employee_id].current_project;
        if let Some(old_project_id) = previous {
            if old_project_id != project_id {
                // The old project may have been removed already.
                if let Some(old_project) = self.projects.get_mut(&old_project_id) {
                    old_project.team_members.retain(|&member| member != employee_id);
                }
            }
        }

        if let Some(employee) = self.employees.get_mut(&employee_id) {
            employee.current_project = Some(project_id);
        }
        if let Some(project) = self.projects.get_mut(&project_id) {
            if !project.has_member(employee_id) {
                project.team_members.push(employee_id);
            }
        }

        self.persist()?;
        Ok(true)
    }

    /// Takes an employee off their current project.
    ///
    /// Returns `Ok(false)` if the employee is unknown or already
    /// unassigned.
    pub fn unassign_from_project(&mut self, employee_id: u32) -> Result<bool> {
        let Some(employee) = self.employees.get(&employee_id) else {
            return Ok(false);
        };
        let Some(project_id) = employee.current_project else {
            return Ok(false);
        };

        if let Some(project) = self.projects.get_mut(&project_id) {
            project.team_members.retain(|&member| member != employee_id);
        }
        if let Some(employee) = self.employees.get_mut(&employee_id) {
            employee.current_project = None;
        }

        self.persist()?;
        Ok(true)
    }

    /// Resolves a project's team to employee records.
    ///
    /// Ids with no matching employee are silently dropped; an unknown
    /// project yields an empty list.
    pub fn get_project_team(&self, project_id: u32) -> Vec<&Employee> {
        let Some(project) = self.projects.get(&project_id) else {
            return Vec::new();
        };

        project
            .team_members
            .iter()
            .filter_map(|member_id| self.employees.get(member_id))
            .collect()
    }

    /// Rewrites the snapshot file from the current in-memory state.
    fn persist(&self) -> Result<()> {
        let snapshot = DepartmentSnapshot {
            next_employee_id: self.next_employee_id,
            next_project_id: self.next_project_id,
            employees: self.employees.clone(),
            projects: self.projects.clone(),
        };
        self.store.save(&snapshot)?;
        debug!(path = %self.store.path().display(), "snapshot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_department(dir: &tempfile::TempDir) -> Department {
        let (department, report) = Department::open(dir.path().join("data.json"));
        assert_eq!(report, LoadReport::Fresh);
        department
    }

    fn hire(department: &mut Department, name: &str) -> u32 {
        department
            .add_employee(name, "Developer", format!("{}@x.com", name), Vec::new())
            .unwrap()
            .id
    }

    fn start_project(department: &mut Department, name: &str) -> u32 {
        department
            .add_project(name, "desc", Vec::new(), "Planning")
            .unwrap()
            .id
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let dir = tempdir().unwrap();
        let mut department = open_department(&dir);

        let ids: Vec<u32> = (0..4).map(|i| hire(&mut department, &format!("e{}", i))).collect();

        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_ids_never_reused_after_removal() {
        let dir = tempdir().unwrap();
        let mut department = open_department(&dir);

        let first = hire(&mut department, "a");
        let second = hire(&mut department, "b");
        assert!(department.remove_employee(first).unwrap());
        assert!(department.remove_employee(second).unwrap());

        let third = hire(&mut department, "c");
        assert_eq!(third, 3);
    }

    #[test]
    fn test_get_and_list_employees() {
        let dir = tempdir().unwrap();
        let mut department = open_department(&dir);

        hire(&mut department, "a");
        hire(&mut department, "b");

        assert_eq!(department.get_employee(1).unwrap().name, "a");
        assert!(department.get_employee(99).is_none());

        let names: Vec<&str> = department
            .list_employees()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_update_employee_patches_only_named_fields() {
        let dir = tempdir().unwrap();
        let mut department = open_department(&dir);

        let id = hire(&mut department, "a");
        let updated = department
            .update_employee(id, EmployeeUpdate::new().role("QA"))
            .unwrap();

        assert!(updated);
        let employee = department.get_employee(id).unwrap();
        assert_eq!(employee.role, "QA");
        assert_eq!(employee.name, "a");
    }

    #[test]
    fn test_update_unknown_employee_is_false_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let mut department = open_department(&dir);

        let updated = department
            .update_employee(99, EmployeeUpdate::new().name("X"))
            .unwrap();

        assert!(!updated);
        // No mutation succeeded, so no snapshot file should exist yet.
        assert!(!department.data_path().exists());
    }

    #[test]
    fn test_assignment_sets_both_sides_exactly_once() {
        let dir = tempdir().unwrap();
        let mut department = open_department(&dir);

        let emp = hire(&mut department, "a");
        let proj = start_project(&mut department, "Apollo");

        assert!(department.assign_to_project(emp, proj).unwrap());

        assert_eq!(department.get_employee(emp).unwrap().current_project, Some(proj));
        let team = &department.get_project(proj).unwrap().team_members;
        assert_eq!(team.iter().filter(|&&m| m == emp).count(), 1);
    }

    #[test]
    fn test_assignment_unknown_ids_fail() {
        let dir = tempdir().unwrap();
        let mut department = open_department(&dir);

        let emp = hire(&mut department, "a");
        let proj = start_project(&mut department, "Apollo");

        assert!(!department.assign_to_project(99, proj).unwrap());
        assert!(!department.assign_to_project(emp, 99).unwrap());
    }

    #[test]
    fn test_reassignment_moves_between_teams() {
        let dir = tempdir().unwrap();
        let mut department = open_department(&dir);

        let emp = hire(&mut department, "a");
        let first = start_project(&mut department, "Apollo");
        let second = start_project(&mut department, "Borealis");

        department.assign_to_project(emp, first).unwrap();
        department.assign_to_project(emp, second).unwrap();

        assert!(!department.get_project(first).unwrap().has_member(emp));
        assert!(department.get_project(second).unwrap().has_member(emp));
        assert_eq!(department.get_employee(emp).unwrap().current_project, Some(second));
    }

    #[test]
    fn test_reassignment_to_same_project_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut department = open_department(&dir);

        let emp = hire(&mut department, "a");
        let proj = start_project(&mut department, "Apollo");

        assert!(department.assign_to_project(emp, proj).unwrap());
        assert!(department.assign_to_project(emp, proj).unwrap());

        assert_eq!(department.get_project(proj).unwrap().team_members, vec![emp]);
    }

    #[test]
    fn test_unassign_clears_both_sides() {
        let dir = tempdir().unwrap();
        let mut department = open_department(&dir);

        let emp = hire(&mut department, "a");
        let proj = start_project(&mut department, "Apollo");
        department.assign_to_project(emp, proj).unwrap();

        assert!(department.unassign_from_project(emp).unwrap());

        assert!(department.get_employee(emp).unwrap().current_project.is_none());
        assert!(department.get_project(proj).unwrap().team_members.is_empty());
    }

    #[test]
    fn test_unassign_unknown_or_unassigned_is_false() {
        let dir = tempdir().unwrap();
        let mut department = open_department(&dir);

        let emp = hire(&mut department, "a");

        assert!(!department.unassign_from_project(99).unwrap());
        assert!(!department.unassign_from_project(emp).unwrap());
    }

    #[test]
    fn test_remove_project_unassigns_whole_team() {
        let dir = tempdir().unwrap();
        let mut department = open_department(&dir);

        let a = hire(&mut department, "a");
        let b = hire(&mut department, "b");
        let proj = start_project(&mut department, "Apollo");
        department.assign_to_project(a, proj).unwrap();
        department.assign_to_project(b, proj).unwrap();

        assert!(department.remove_project(proj).unwrap());

        assert!(department.get_project(proj).is_none());
        assert!(department.get_employee(a).unwrap().current_project.is_none());
        assert!(department.get_employee(b).unwrap().current_project.is_none());
    }

    #[test]
    fn test_remove_employee_leaves_team_without_them() {
        let dir = tempdir().unwrap();
        let mut department = open_department(&dir);

        let emp = hire(&mut department, "a");
        let proj = start_project(&mut department, "Apollo");
        department.assign_to_project(emp, proj).unwrap();

        assert!(department.remove_employee(emp).unwrap());

        assert!(department.get_employee(emp).is_none());
        assert!(department.get_project(proj).unwrap().team_members.is_empty());
    }

    #[test]
    fn test_remove_unknown_ids_fail() {
        let dir = tempdir().unwrap();
        let mut department = open_department(&dir);

        assert!(!department.remove_employee(1).unwrap());
        assert!(!department.remove_project(1).unwrap());
    }

    #[test]
    fn test_project_team_resolution() {
        let dir = tempdir().unwrap();
        let mut department = open_department(&dir);

        let a = hire(&mut department, "a");
        let b = hire(&mut department, "b");
        let proj = start_project(&mut department, "Apollo");
        department.assign_to_project(a, proj).unwrap();
        department.assign_to_project(b, proj).unwrap();

        let team: Vec<&str> = department
            .get_project_team(proj)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(team, vec!["a", "b"]);
    }

    #[test]
    fn test_project_team_unknown_project_is_empty() {
        let dir = tempdir().unwrap();
        let department = open_department(&dir);

        assert!(department.get_project_team(42).is_empty());
    }

    #[test]
    fn test_reopen_reproduces_state_and_counters() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");

        {
            let (mut department, _) = Department::open(&path);
            let emp = department
                .add_employee("Ana", "Developer", "a@x.com", vec!["Python".to_string()])
                .unwrap()
                .id;
            let proj = department
                .add_project("Apollo", "x", vec!["Go".to_string()], "Active")
                .unwrap()
                .id;
            department.assign_to_project(emp, proj).unwrap();
            department.remove_employee(emp).unwrap();
        }

        let (department, report) = Department::open(&path);
        assert_eq!(report, LoadReport::Loaded);
        assert!(department.list_employees().is_empty());
        assert_eq!(department.list_projects().len(), 1);

        // Counters survive the round trip: the next hire gets id 2.
        let mut department = department;
        let rehired = department
            .add_employee("Bo", "QA", "b@x.com", Vec::new())
            .unwrap()
            .id;
        assert_eq!(rehired, 2);
    }

    #[test]
    fn test_ana_apollo_scenario() {
        let dir = tempdir().unwrap();
        let mut department = open_department(&dir);

        let ana = department
            .add_employee("Ana", "Developer", "a@x.com", vec!["Python".to_string()])
            .unwrap()
            .id;
        assert_eq!(ana, 1);

        let apollo = department
            .add_project("Apollo", "x", vec!["Go".to_string()], "Planning")
            .unwrap()
            .id;
        assert_eq!(apollo, 1);

        assert!(department.assign_to_project(1, 1).unwrap());
        assert_eq!(department.get_project(1).unwrap().team_members, vec![1]);

        assert!(department.remove_employee(1).unwrap());
        assert!(department.get_project(1).unwrap().team_members.is_empty());
    }

    #[test]
    fn test_open_degraded_file_keeps_going() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "not json at all").unwrap();

        let (mut department, report) = Department::open(&path);
        assert!(report.is_degraded());

        // The department is usable and overwrites the bad file on the
        // next mutation.
        let id = hire(&mut department, "a");
        assert_eq!(id, 1);

        let (reopened, report) = Department::open(&path);
        assert_eq!(report, LoadReport::Loaded);
        assert_eq!(reopened.list_employees().len(), 1);
    }
}
