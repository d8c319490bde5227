//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Department - console tool for tracking employees and projects
#[derive(Parser, Debug)]
#[command(name = "department")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the JSON data file
    #[arg(short, long, env = "DEPARTMENT_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage employees
    Employee {
        #[command(subcommand)]
        command: EmployeeCommand,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    /// Assign an employee to a project
    Assign {
        /// Employee ID
        employee: u32,
        /// Project ID
        project: u32,
    },

    /// Unassign an employee from their current project
    Unassign {
        /// Employee ID
        employee: u32,
    },

    /// Show a project's team
    Team {
        /// Project ID
        project: u32,
    },

    /// Produce an aggregate report
    Report {
        /// Which report to produce
        #[arg(value_enum, default_value = "overview")]
        kind: ReportKind,
    },

    /// Start the interactive console
    Repl,
}

#[derive(Subcommand, Debug)]
pub enum EmployeeCommand {
    /// Add a new employee
    Add {
        /// Full name
        name: String,

        /// Role (e.g., Developer, QA, Manager)
        #[arg(short, long)]
        role: String,

        /// Contact email
        #[arg(short, long)]
        email: String,

        /// Comma-separated skills
        #[arg(short, long, value_delimiter = ',')]
        skills: Vec<String>,
    },

    /// List all employees
    List {
        /// Output format (table, json, brief)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one employee
    Show {
        /// Employee ID
        id: u32,
    },

    /// Update fields of an employee (unset fields are left untouched)
    Update {
        /// Employee ID
        id: u32,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Comma-separated skills (replaces the whole list)
        #[arg(long, value_delimiter = ',')]
        skills: Option<Vec<String>>,

        /// Hire date as YYYY-MM-DD
        #[arg(long)]
        hire_date: Option<String>,
    },

    /// Remove an employee
    Remove {
        /// Employee ID
        id: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Add a new project
    Add {
        /// Project name
        name: String,

        /// Description
        #[arg(short, long)]
        description: String,

        /// Comma-separated technologies
        #[arg(short, long, value_delimiter = ',')]
        technologies: Vec<String>,

        /// Status (Planning, Active, Testing, Completed, On Hold)
        #[arg(short, long, default_value = "Planning")]
        status: String,
    },

    /// List all projects
    List {
        /// Output format (table, json, brief)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one project and its team
    Show {
        /// Project ID
        id: u32,
    },

    /// Update fields of a project (unset fields are left untouched)
    Update {
        /// Project ID
        id: u32,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        status: Option<String>,

        /// Start date as YYYY-MM-DD
        #[arg(long)]
        start_date: Option<String>,

        /// End date as YYYY-MM-DD
        #[arg(long)]
        end_date: Option<String>,

        /// Comma-separated technologies (replaces the whole list)
        #[arg(long, value_delimiter = ',')]
        technologies: Option<Vec<String>>,
    },

    /// Remove a project
    Remove {
        /// Project ID
        id: u32,
    },
}

/// Output format for list commands.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Brief,
}

/// Aggregate reports offered by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportKind {
    /// Headline department numbers
    #[default]
    Overview,
    /// Employees grouped by role
    Roles,
    /// Projects grouped by status
    Statuses,
    /// Employees with no current project
    Unassigned,
}

impl ReportKind {
    /// Parses a report name as typed in the REPL.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "overview" => Some(Self::Overview),
            "roles" => Some(Self::Roles),
            "statuses" => Some(Self::Statuses),
            "unassigned" => Some(Self::Unassigned),
            _ => None,
        }
    }
}

impl Cli {
    /// Returns the data file path, using the default if not specified.
    pub fn data_file(&self) -> PathBuf {
        self.data_file.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".department").join("department.json"))
                .unwrap_or_else(|| PathBuf::from("department_data.json"))
        })
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parses_employee_add() {
        let cli = Cli::parse_from([
            "department", "employee", "add", "Ana", "-r", "Developer", "-e", "a@x.com", "-s",
            "Python,Go",
        ]);

        match cli.command {
            Some(Commands::Employee {
                command: EmployeeCommand::Add { name, role, email, skills },
            }) => {
                assert_eq!(name, "Ana");
                assert_eq!(role, "Developer");
                assert_eq!(email, "a@x.com");
                assert_eq!(skills, vec!["Python", "Go"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_report_default() {
        let cli = Cli::parse_from(["department", "report"]);
        match cli.command {
            Some(Commands::Report { kind }) => assert_eq!(kind, ReportKind::Overview),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_data_file_override() {
        let cli = Cli::parse_from(["department", "--data-file", "/tmp/dept.json"]);
        assert_eq!(cli.data_file(), PathBuf::from("/tmp/dept.json"));
    }

    #[test]
    fn test_report_kind_parse() {
        assert_eq!(ReportKind::parse("roles"), Some(ReportKind::Roles));
        assert_eq!(ReportKind::parse("bogus"), None);
    }

    #[test]
    fn test_log_level_from_verbosity() {
        let cli = Cli::parse_from(["department"]);
        assert_eq!(cli.log_level(), "warn");

        let cli = Cli::parse_from(["department", "-vv"]);
        assert_eq!(cli.log_level(), "debug");
    }
}
