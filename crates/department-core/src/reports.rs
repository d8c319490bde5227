//! Aggregate reports over the department.

use std::collections::BTreeMap;

use serde::Serialize;

use department_models::{Employee, Project};

use crate::department::Department;

/// Status string counted as "active" in the overview.
const ACTIVE_STATUS: &str = "Active";

/// Headline numbers for the whole department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentOverview {
    pub total_employees: usize,
    pub assigned_employees: usize,
    pub unassigned_employees: usize,
    pub total_projects: usize,
    pub active_projects: usize,
}

impl Department {
    /// Computes the department overview.
    pub fn overview(&self) -> DepartmentOverview {
        let employees = self.list_employees();
        let projects = self.list_projects();

        let assigned = employees.iter().filter(|e| e.is_assigned()).count();
        let active = projects.iter().filter(|p| p.status == ACTIVE_STATUS).count();

        DepartmentOverview {
            total_employees: employees.len(),
            assigned_employees: assigned,
            unassigned_employees: employees.len() - assigned,
            total_projects: projects.len(),
            active_projects: active,
        }
    }

    /// Groups employees by role, roles sorted alphabetically.
    pub fn employees_by_role(&self) -> BTreeMap<String, Vec<&Employee>> {
        let mut by_role: BTreeMap<String, Vec<&Employee>> = BTreeMap::new();
        for employee in self.list_employees() {
            by_role.entry(employee.role.clone()).or_default().push(employee);
        }
        by_role
    }

    /// Groups projects by status, statuses sorted alphabetically.
    pub fn projects_by_status(&self) -> BTreeMap<String, Vec<&Project>> {
        let mut by_status: BTreeMap<String, Vec<&Project>> = BTreeMap::new();
        for project in self.list_projects() {
            by_status.entry(project.status.clone()).or_default().push(project);
        }
        by_status
    }

    /// Employees with no current project, in id order.
    pub fn unassigned_employees(&self) -> Vec<&Employee> {
        self.list_employees()
            .into_iter()
            .filter(|e| !e.is_assigned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_department(dir: &tempfile::TempDir) -> Department {
        let (mut department, _) = Department::open(dir.path().join("data.json"));

        department
            .add_employee("Ana", "Developer", "a@x.com", Vec::new())
            .unwrap();
        department
            .add_employee("Bo", "Developer", "b@x.com", Vec::new())
            .unwrap();
        department.add_employee("Cy", "QA", "c@x.com", Vec::new()).unwrap();

        department
            .add_project("Apollo", "x", Vec::new(), "Active")
            .unwrap();
        department
            .add_project("Borealis", "y", Vec::new(), "Planning")
            .unwrap();

        department.assign_to_project(1, 1).unwrap();
        department
    }

    #[test]
    fn test_overview_counts() {
        let dir = tempdir().unwrap();
        let department = sample_department(&dir);

        let overview = department.overview();

        assert_eq!(overview.total_employees, 3);
        assert_eq!(overview.assigned_employees, 1);
        assert_eq!(overview.unassigned_employees, 2);
        assert_eq!(overview.total_projects, 2);
        assert_eq!(overview.active_projects, 1);
    }

    #[test]
    fn test_employees_by_role_groups_and_sorts() {
        let dir = tempdir().unwrap();
        let department = sample_department(&dir);

        let by_role = department.employees_by_role();

        let roles: Vec<&str> = by_role.keys().map(String::as_str).collect();
        assert_eq!(roles, vec!["Developer", "QA"]);
        assert_eq!(by_role["Developer"].len(), 2);
        assert_eq!(by_role["QA"][0].name, "Cy");
    }

    #[test]
    fn test_projects_by_status() {
        let dir = tempdir().unwrap();
        let department = sample_department(&dir);

        let by_status = department.projects_by_status();

        assert_eq!(by_status["Active"][0].name, "Apollo");
        assert_eq!(by_status["Planning"][0].name, "Borealis");
    }

    #[test]
    fn test_unassigned_employees() {
        let dir = tempdir().unwrap();
        let department = sample_department(&dir);

        let names: Vec<&str> = department
            .unassigned_employees()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Bo", "Cy"]);
    }

    #[test]
    fn test_overview_empty_department() {
        let dir = tempdir().unwrap();
        let (department, _) = Department::open(dir.path().join("data.json"));

        let overview = department.overview();

        assert_eq!(overview.total_employees, 0);
        assert_eq!(overview.total_projects, 0);
    }
}
