//! Command handlers for CLI subcommands.

use std::path::Path;

use tracing::{info, warn};

use department_core::{Department, DepartmentOverview};
use department_models::{Employee, EmployeeUpdate, Project, ProjectUpdate};

use crate::cli::{Commands, EmployeeCommand, OutputFormat, ProjectCommand, ReportKind};

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Opens the department, surfacing a degraded load as warnings.
pub fn open_department(data_file: &Path) -> Department {
    let (department, report) = Department::open(data_file);
    if let department_core::LoadReport::Degraded { reasons } = &report {
        for reason in reasons {
            warn!(%reason, "data file partially recovered");
            eprintln!("Warning: {}", reason);
        }
    }
    department
}

/// Execute a CLI command.
pub fn execute(command: Commands, data_file: &Path) -> Result<()> {
    let mut department = open_department(data_file);

    match command {
        Commands::Employee { command } => execute_employee(&mut department, command),
        Commands::Project { command } => execute_project(&mut department, command),
        Commands::Assign { employee, project } => cmd_assign(&mut department, employee, project),
        Commands::Unassign { employee } => cmd_unassign(&mut department, employee),
        Commands::Team { project } => cmd_team(&department, project),
        Commands::Report { kind } => cmd_report(&department, kind),
        Commands::Repl => {
            // REPL is handled separately in main
            Ok(())
        }
    }
}

fn execute_employee(department: &mut Department, command: EmployeeCommand) -> Result<()> {
    match command {
        EmployeeCommand::Add { name, role, email, skills } => {
            let employee = department.add_employee(name, role, email, skills)?;
            info!(id = employee.id, "employee added");
            println!("Added employee #{}", employee.id);
            print_employee(employee);
            Ok(())
        }
        EmployeeCommand::List { format } => {
            let employees = department.list_employees();
            match format {
                OutputFormat::Table => {
                    if employees.is_empty() {
                        println!("No employees found.");
                        return Ok(());
                    }
                    println!("{:<4}  {:<20}  {:<14}  {:<10}  EMAIL", "ID", "NAME", "ROLE", "PROJECT");
                    println!("{}", "-".repeat(70));
                    for employee in &employees {
                        println!(
                            "{:<4}  {:<20}  {:<14}  {:<10}  {}",
                            employee.id,
                            truncate(&employee.name, 20),
                            truncate(&employee.role, 14),
                            employee
                                .current_project
                                .map_or_else(|| "-".to_string(), |p| format!("#{}", p)),
                            employee.email
                        );
                    }
                    println!("\n{} employee(s)", employees.len());
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&employees)?);
                }
                OutputFormat::Brief => {
                    for employee in &employees {
                        println!("{}\t{}", employee.id, employee.name);
                    }
                }
            }
            Ok(())
        }
        EmployeeCommand::Show { id } => {
            match department.get_employee(id) {
                Some(employee) => print_employee(employee),
                None => println!("Employee #{} not found.", id),
            }
            Ok(())
        }
        EmployeeCommand::Update { id, name, role, email, skills, hire_date } => {
            let update = EmployeeUpdate {
                name,
                role,
                email,
                skills,
                hire_date,
            };
            if update.is_empty() {
                println!("No changes given.");
                return Ok(());
            }
            if department.update_employee(id, update)? {
                info!(id, "employee updated");
                println!("Updated employee #{}", id);
            } else {
                println!("Employee #{} not found.", id);
            }
            Ok(())
        }
        EmployeeCommand::Remove { id } => {
            if department.remove_employee(id)? {
                info!(id, "employee removed");
                println!("Removed employee #{}", id);
            } else {
                println!("Employee #{} not found.", id);
            }
            Ok(())
        }
    }
}

fn execute_project(department: &mut Department, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::Add { name, description, technologies, status } => {
            let project = department.add_project(name, description, technologies, status)?;
            info!(id = project.id, "project added");
            println!("Added project #{}", project.id);
            print_project(project);
            Ok(())
        }
        ProjectCommand::List { format } => {
            let projects = department.list_projects();
            match format {
                OutputFormat::Table => {
                    if projects.is_empty() {
                        println!("No projects found.");
                        return Ok(());
                    }
                    println!("{:<4}  {:<20}  {:<10}  {:<5}  START", "ID", "NAME", "STATUS", "TEAM");
                    println!("{}", "-".repeat(60));
                    for project in &projects {
                        println!(
                            "{:<4}  {:<20}  {:<10}  {:<5}  {}",
                            project.id,
                            truncate(&project.name, 20),
                            truncate(&project.status, 10),
                            project.team_size(),
                            project.start_date
                        );
                    }
                    println!("\n{} project(s)", projects.len());
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&projects)?);
                }
                OutputFormat::Brief => {
                    for project in &projects {
                        println!("{}\t{}", project.id, project.name);
                    }
                }
            }
            Ok(())
        }
        ProjectCommand::Show { id } => {
            match department.get_project(id) {
                Some(project) => {
                    print_project(project);
                    let team = department.get_project_team(id);
                    if !team.is_empty() {
                        println!("  Team:");
                        for member in team {
                            println!("    - {} ({})", member.name, member.role);
                        }
                    }
                }
                None => println!("Project #{} not found.", id),
            }
            Ok(())
        }
        ProjectCommand::Update {
            id,
            name,
            description,
            status,
            start_date,
            end_date,
            technologies,
        } => {
            let update = ProjectUpdate {
                name,
                description,
                status,
                start_date,
                end_date,
                technologies,
            };
            if update.is_empty() {
                println!("No changes given.");
                return Ok(());
            }
            if department.update_project(id, update)? {
                info!(id, "project updated");
                println!("Updated project #{}", id);
            } else {
                println!("Project #{} not found.", id);
            }
            Ok(())
        }
        ProjectCommand::Remove { id } => {
            if department.remove_project(id)? {
                info!(id, "project removed");
                println!("Removed project #{}", id);
            } else {
                println!("Project #{} not found.", id);
            }
            Ok(())
        }
    }
}

pub fn cmd_assign(department: &mut Department, employee: u32, project: u32) -> Result<()> {
    if department.assign_to_project(employee, project)? {
        info!(employee, project, "employee assigned");
        println!("Assigned employee #{} to project #{}", employee, project);
    } else {
        println!("Failed to assign: check that employee #{} and project #{} exist.", employee, project);
    }
    Ok(())
}

pub fn cmd_unassign(department: &mut Department, employee: u32) -> Result<()> {
    if department.unassign_from_project(employee)? {
        info!(employee, "employee unassigned");
        println!("Unassigned employee #{}", employee);
    } else {
        println!("Failed to unassign: employee #{} is unknown or not on a project.", employee);
    }
    Ok(())
}

pub fn cmd_team(department: &Department, project: u32) -> Result<()> {
    let Some(record) = department.get_project(project) else {
        println!("Project #{} not found.", project);
        return Ok(());
    };

    println!("Project: {} [{}]", record.name, record.status);
    let team = department.get_project_team(project);
    if team.is_empty() {
        println!("No team members assigned.");
    } else {
        for member in team {
            print_employee(member);
        }
    }
    Ok(())
}

pub fn cmd_report(department: &Department, kind: ReportKind) -> Result<()> {
    match kind {
        ReportKind::Overview => print_overview(&department.overview()),
        ReportKind::Roles => {
            for (role, employees) in department.employees_by_role() {
                println!("{} ({}):", role, employees.len());
                for employee in employees {
                    let assignment = employee
                        .current_project
                        .map_or_else(|| "[Unassigned]".to_string(), |p| format!("[Project #{}]", p));
                    println!("  - {} {}", employee.name, assignment);
                }
            }
        }
        ReportKind::Statuses => {
            for (status, projects) in department.projects_by_status() {
                println!("{} ({}):", status, projects.len());
                for project in projects {
                    println!("  - {} [Team: {}]", project.name, project.team_size());
                }
            }
        }
        ReportKind::Unassigned => {
            let unassigned = department.unassigned_employees();
            if unassigned.is_empty() {
                println!("All employees are assigned to projects.");
            } else {
                println!("{} unassigned employee(s):", unassigned.len());
                for employee in unassigned {
                    println!("  - {} ({})", employee.name, employee.role);
                }
            }
        }
    }
    Ok(())
}

fn print_overview(overview: &DepartmentOverview) {
    println!("Total Employees:      {}", overview.total_employees);
    println!("Assigned Employees:   {}", overview.assigned_employees);
    println!("Unassigned Employees: {}", overview.unassigned_employees);
    println!("Total Projects:       {}", overview.total_projects);
    println!("Active Projects:      {}", overview.active_projects);
}

/// Prints one employee in the multi-line detail format.
pub fn print_employee(employee: &Employee) {
    println!("ID: {} | Name: {} | Role: {}", employee.id, employee.name, employee.role);
    println!("  Email: {}", employee.email);
    println!("  Skills: {}", join_or_none(&employee.skills));
    println!("  Hire Date: {}", employee.hire_date);
    println!(
        "  Current Project: {}",
        employee
            .current_project
            .map_or_else(|| "Unassigned".to_string(), |p| format!("#{}", p))
    );
}

/// Prints one project in the multi-line detail format.
pub fn print_project(project: &Project) {
    println!("ID: {} | Name: {}", project.id, project.name);
    println!("  Status: {}", project.status);
    println!("  Description: {}", project.description);
    println!("  Technologies: {}", join_or_none(&project.technologies));
    println!("  Team Size: {}", project.team_size());
    println!("  Start Date: {}", project.start_date);
    println!(
        "  End Date: {}",
        project.end_date.as_deref().unwrap_or("Not set")
    );
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

/// Truncates a string to the given length, adding "..." if truncated.
/// Counts chars, not bytes, so multibyte names never split mid-character.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_execute_employee_roundtrip() {
        let dir = tempdir().unwrap();
        let data_file = dir.path().join("data.json");

        execute(
            Commands::Employee {
                command: EmployeeCommand::Add {
                    name: "Ana".to_string(),
                    role: "Developer".to_string(),
                    email: "a@x.com".to_string(),
                    skills: vec!["Python".to_string()],
                },
            },
            &data_file,
        )
        .unwrap();

        let department = open_department(&data_file);
        assert_eq!(department.list_employees().len(), 1);
    }

    #[test]
    fn test_execute_remove_unknown_is_not_an_error() {
        let dir = tempdir().unwrap();
        let data_file = dir.path().join("data.json");

        // Not-found is reported to the user, not an error exit.
        execute(
            Commands::Employee {
                command: EmployeeCommand::Remove { id: 99 },
            },
            &data_file,
        )
        .unwrap();
    }

    #[test]
    fn test_cmd_report_empty_department() {
        let dir = tempdir().unwrap();
        let department = open_department(&dir.path().join("data.json"));

        cmd_report(&department, ReportKind::Overview).unwrap();
        cmd_report(&department, ReportKind::Unassigned).unwrap();
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hi", 2), "hi");
    }

    #[test]
    fn test_truncate_multibyte_names() {
        // Names are free text; cutting must land on a char boundary.
        assert_eq!(truncate("Grzegorz Brzęczyszczykiewicz", 20), "Grzegorz Brzęczys...");
        assert_eq!(truncate("Åsa Öström", 20), "Åsa Öström");
        assert_eq!(truncate("ログラミング言語の開発者です", 10), "ログラミング言...");
    }
}
