//! Interactive console (REPL) for the department manager.

use std::path::{Path, PathBuf};

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper, Result as RlResult};
use tracing::debug;

use department_core::Department;
use department_models::{EmployeeUpdate, ProjectUpdate};

use crate::cli::ReportKind;
use crate::commands::{self, print_employee, print_project};
use crate::parse_csv_list;

/// Help information for a console command.
pub struct CommandHelp {
    /// Command name (e.g., "hire").
    pub name: &'static str,
    /// Command aliases.
    pub aliases: &'static [&'static str],
    /// Brief one-line description.
    pub brief: &'static str,
    /// Usage syntax.
    pub usage: &'static str,
}

/// Static help entries for all commands.
static COMMAND_HELP: &[CommandHelp] = &[
    CommandHelp {
        name: "employees",
        aliases: &["ee"],
        brief: "List all employees",
        usage: "employees",
    },
    CommandHelp {
        name: "employee",
        aliases: &[],
        brief: "Show one employee",
        usage: "employee <id>",
    },
    CommandHelp {
        name: "hire",
        aliases: &[],
        brief: "Add a new employee",
        usage: "hire <name> -r <role> -e <email> [-s skill,skill]",
    },
    CommandHelp {
        name: "update-employee",
        aliases: &["ue"],
        brief: "Update fields of an employee",
        usage: "update-employee <id> [-n name] [-r role] [-e email] [-s skill,skill] [--hired date]",
    },
    CommandHelp {
        name: "remove-employee",
        aliases: &["re"],
        brief: "Remove an employee",
        usage: "remove-employee <id>",
    },
    CommandHelp {
        name: "projects",
        aliases: &["pp"],
        brief: "List all projects",
        usage: "projects",
    },
    CommandHelp {
        name: "project",
        aliases: &[],
        brief: "Show one project and its team",
        usage: "project <id>",
    },
    CommandHelp {
        name: "add-project",
        aliases: &["ap"],
        brief: "Add a new project",
        usage: "add-project <name> -d <description> [-t tech,tech] [-s status]",
    },
    CommandHelp {
        name: "update-project",
        aliases: &["up"],
        brief: "Update fields of a project",
        usage: "update-project <id> [-n name] [-d description] [-s status] [-t tech,tech] [--start date] [--end date]",
    },
    CommandHelp {
        name: "remove-project",
        aliases: &["rp"],
        brief: "Remove a project",
        usage: "remove-project <id>",
    },
    CommandHelp {
        name: "assign",
        aliases: &[],
        brief: "Assign an employee to a project",
        usage: "assign <employee-id> <project-id>",
    },
    CommandHelp {
        name: "unassign",
        aliases: &[],
        brief: "Unassign an employee from their project",
        usage: "unassign <employee-id>",
    },
    CommandHelp {
        name: "team",
        aliases: &[],
        brief: "Show a project's team",
        usage: "team <project-id>",
    },
    CommandHelp {
        name: "report",
        aliases: &[],
        brief: "Produce a report",
        usage: "report [overview|roles|statuses|unassigned]",
    },
    CommandHelp {
        name: "help",
        aliases: &["h", "?"],
        brief: "Show help",
        usage: "help [command]",
    },
    CommandHelp {
        name: "quit",
        aliases: &["q", "exit"],
        brief: "Exit the console",
        usage: "quit",
    },
];

/// Tab completion for console commands.
struct CommandCompleter;

impl CommandCompleter {
    const COMMANDS: &'static [&'static str] = &[
        "add-project",
        "assign",
        "employee",
        "employees",
        "help",
        "hire",
        "project",
        "projects",
        "quit",
        "remove-employee",
        "remove-project",
        "report",
        "team",
        "unassign",
        "update-employee",
        "update-project",
    ];
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Only complete the first word.
        if line[..pos].contains(' ') {
            return Ok((0, vec![]));
        }

        let prefix = &line[..pos];
        let matches: Vec<Pair> = Self::COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Console commands.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// List all employees
    Employees,
    /// Show one employee
    ShowEmployee(u32),
    /// Add an employee
    Hire {
        name: String,
        role: String,
        email: String,
        skills: Vec<String>,
    },
    /// Patch an employee
    UpdateEmployee(u32, EmployeeUpdate),
    /// Remove an employee
    RemoveEmployee(u32),
    /// List all projects
    Projects,
    /// Show one project
    ShowProject(u32),
    /// Add a project
    AddProject {
        name: String,
        description: String,
        technologies: Vec<String>,
        status: String,
    },
    /// Patch a project
    UpdateProject(u32, ProjectUpdate),
    /// Remove a project
    RemoveProject(u32),
    /// Assign employee to project
    Assign(u32, u32),
    /// Unassign employee
    Unassign(u32),
    /// Show a project team
    Team(u32),
    /// Produce a report
    Report(ReportKind),
    /// Show help (optionally for a specific command)
    Help(Option<String>),
    /// Quit the console
    Quit,
    /// Anything unparseable, with a message for the user
    Unknown(String),
    /// Blank line
    Empty,
}

/// Split command arguments into positionals and flag/value pairs.
///
/// A flag's value runs until the next flag, so multi-word names work
/// without quoting: `hire Ana Maria -r Developer -e am@x.com`.
#[derive(Debug, Default)]
struct ParsedArgs {
    positional: Vec<String>,
    flags: Vec<(String, String)>,
}

impl ParsedArgs {
    fn parse(input: &str) -> Self {
        let mut args = Self::default();
        let mut current_flag: Option<String> = None;
        let mut current_value: Vec<&str> = Vec::new();

        for token in input.split_whitespace() {
            let bytes = token.as_bytes();
            if bytes[0] == b'-' && bytes.len() > 1 && !bytes[1].is_ascii_digit() {
                if let Some(flag) = current_flag.take() {
                    args.flags.push((flag, current_value.join(" ")));
                    current_value.clear();
                }
                current_flag = Some(token.trim_start_matches('-').to_string());
            } else if current_flag.is_some() {
                current_value.push(token);
            } else {
                args.positional.push(token.to_string());
            }
        }
        if let Some(flag) = current_flag {
            args.flags.push((flag, current_value.join(" ")));
        }

        args
    }

    fn flag(&self, names: &[&str]) -> Option<&str> {
        self.flags
            .iter()
            .find(|(flag, _)| names.contains(&flag.as_str()))
            .map(|(_, value)| value.as_str())
    }

    fn positional_joined(&self) -> String {
        self.positional.join(" ")
    }

    fn id_at(&self, index: usize) -> Option<u32> {
        self.positional.get(index)?.parse().ok()
    }
}

impl ReplCommand {
    /// Parses one console line.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return ReplCommand::Empty;
        }

        let (cmd, rest) = match input.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (input, ""),
        };
        let args = ParsedArgs::parse(rest);

        match cmd {
            "employees" | "ee" => ReplCommand::Employees,
            "employee" => match args.id_at(0) {
                Some(id) => ReplCommand::ShowEmployee(id),
                None => ReplCommand::Unknown("usage: employee <id>".to_string()),
            },
            "hire" => Self::parse_hire(&args),
            "update-employee" | "ue" => Self::parse_update_employee(&args),
            "remove-employee" | "re" => match args.id_at(0) {
                Some(id) => ReplCommand::RemoveEmployee(id),
                None => ReplCommand::Unknown("usage: remove-employee <id>".to_string()),
            },
            "projects" | "pp" => ReplCommand::Projects,
            "project" => match args.id_at(0) {
                Some(id) => ReplCommand::ShowProject(id),
                None => ReplCommand::Unknown("usage: project <id>".to_string()),
            },
            "add-project" | "ap" => Self::parse_add_project(&args),
            "update-project" | "up" => Self::parse_update_project(&args),
            "remove-project" | "rp" => match args.id_at(0) {
                Some(id) => ReplCommand::RemoveProject(id),
                None => ReplCommand::Unknown("usage: remove-project <id>".to_string()),
            },
            "assign" => match (args.id_at(0), args.id_at(1)) {
                (Some(employee), Some(project)) => ReplCommand::Assign(employee, project),
                _ => ReplCommand::Unknown("usage: assign <employee-id> <project-id>".to_string()),
            },
            "unassign" => match args.id_at(0) {
                Some(id) => ReplCommand::Unassign(id),
                None => ReplCommand::Unknown("usage: unassign <employee-id>".to_string()),
            },
            "team" => match args.id_at(0) {
                Some(id) => ReplCommand::Team(id),
                None => ReplCommand::Unknown("usage: team <project-id>".to_string()),
            },
            "report" => {
                let name = args.positional_joined();
                if name.is_empty() {
                    ReplCommand::Report(ReportKind::Overview)
                } else {
                    match ReportKind::parse(&name) {
                        Some(kind) => ReplCommand::Report(kind),
                        None => ReplCommand::Unknown(format!(
                            "unknown report '{}': use overview, roles, statuses or unassigned",
                            name
                        )),
                    }
                }
            }
            "help" | "h" | "?" => {
                let topic = args.positional_joined();
                ReplCommand::Help(if topic.is_empty() { None } else { Some(topic) })
            }
            "quit" | "q" | "exit" => ReplCommand::Quit,
            other => ReplCommand::Unknown(format!("unknown command: {}", other)),
        }
    }

    fn parse_hire(args: &ParsedArgs) -> Self {
        let name = args.positional_joined();
        if name.is_empty() {
            return ReplCommand::Unknown("hire requires a name".to_string());
        }
        let Some(role) = args.flag(&["r", "role"]) else {
            return ReplCommand::Unknown("hire requires -r <role>".to_string());
        };
        let Some(email) = args.flag(&["e", "email"]) else {
            return ReplCommand::Unknown("hire requires -e <email>".to_string());
        };
        let skills = args.flag(&["s", "skills"]).map(parse_csv_list).unwrap_or_default();

        ReplCommand::Hire {
            name,
            role: role.to_string(),
            email: email.to_string(),
            skills,
        }
    }

    fn parse_update_employee(args: &ParsedArgs) -> Self {
        let Some(id) = args.id_at(0) else {
            return ReplCommand::Unknown("usage: update-employee <id> [flags]".to_string());
        };

        let mut update = EmployeeUpdate::new();
        if let Some(name) = args.flag(&["n", "name"]) {
            update = update.name(name);
        }
        if let Some(role) = args.flag(&["r", "role"]) {
            update = update.role(role);
        }
        if let Some(email) = args.flag(&["e", "email"]) {
            update = update.email(email);
        }
        if let Some(skills) = args.flag(&["s", "skills"]) {
            update = update.skills(parse_csv_list(skills));
        }
        if let Some(hired) = args.flag(&["hired"]) {
            update = update.hire_date(hired);
        }

        if update.is_empty() {
            return ReplCommand::Unknown("update-employee: no changes given".to_string());
        }
        ReplCommand::UpdateEmployee(id, update)
    }

    fn parse_add_project(args: &ParsedArgs) -> Self {
        let name = args.positional_joined();
        if name.is_empty() {
            return ReplCommand::Unknown("add-project requires a name".to_string());
        }
        let Some(description) = args.flag(&["d", "description"]) else {
            return ReplCommand::Unknown("add-project requires -d <description>".to_string());
        };
        let technologies = args
            .flag(&["t", "technologies"])
            .map(parse_csv_list)
            .unwrap_or_default();
        let status = args
            .flag(&["s", "status"])
            .unwrap_or(department_models::DEFAULT_PROJECT_STATUS);

        ReplCommand::AddProject {
            name,
            description: description.to_string(),
            technologies,
            status: status.to_string(),
        }
    }

    fn parse_update_project(args: &ParsedArgs) -> Self {
        let Some(id) = args.id_at(0) else {
            return ReplCommand::Unknown("usage: update-project <id> [flags]".to_string());
        };

        let mut update = ProjectUpdate::new();
        if let Some(name) = args.flag(&["n", "name"]) {
            update = update.name(name);
        }
        if let Some(description) = args.flag(&["d", "description"]) {
            update = update.description(description);
        }
        if let Some(status) = args.flag(&["s", "status"]) {
            update = update.status(status);
        }
        if let Some(technologies) = args.flag(&["t", "technologies"]) {
            update = update.technologies(parse_csv_list(technologies));
        }
        if let Some(start) = args.flag(&["start"]) {
            update = update.start_date(start);
        }
        if let Some(end) = args.flag(&["end"]) {
            update = update.end_date(end);
        }

        if update.is_empty() {
            return ReplCommand::Unknown("update-project: no changes given".to_string());
        }
        ReplCommand::UpdateProject(id, update)
    }
}

/// Console state.
pub struct Repl {
    editor: Editor<CommandCompleter, DefaultHistory>,
    department: Department,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Creates a new console over the given data file.
    pub fn new(data_file: &Path) -> RlResult<Self> {
        let config = rustyline::Config::builder()
            .completion_type(rustyline::CompletionType::List)
            .build();
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(CommandCompleter));

        let department = commands::open_department(data_file);

        // History lives next to the data file.
        let history_path = data_file.parent().map(|dir| dir.join("repl_history.txt"));
        if let Some(path) = &history_path {
            if path.exists() {
                let _ = editor.load_history(path);
            }
        }

        Ok(Self {
            editor,
            department,
            history_path,
        })
    }

    /// Runs the console loop.
    pub fn run(&mut self) -> RlResult<()> {
        println!("Department console v{}", env!("CARGO_PKG_VERSION"));
        println!("Data file: {}", self.department.data_path().display());
        println!("Type 'help' for commands, 'quit' to exit");
        println!();

        loop {
            match self.editor.readline("department> ") {
                Ok(line) => {
                    self.editor.add_history_entry(&line)?;

                    let cmd = ReplCommand::parse(&line);
                    debug!(?cmd, "parsed command");

                    match self.handle_command(cmd) {
                        Ok(true) => break, // Quit requested
                        Ok(false) => {}
                        Err(e) => eprintln!("Error: {}", e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("^D");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(path) = &self.history_path {
            let _ = self.editor.save_history(path);
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Handles a console command. Returns Ok(true) if the loop should end.
    fn handle_command(&mut self, cmd: ReplCommand) -> Result<bool, Box<dyn std::error::Error>> {
        match cmd {
            ReplCommand::Employees => {
                let employees = self.department.list_employees();
                if employees.is_empty() {
                    println!("No employees.");
                } else {
                    for employee in employees {
                        print_employee(employee);
                    }
                }
            }
            ReplCommand::ShowEmployee(id) => match self.department.get_employee(id) {
                Some(employee) => print_employee(employee),
                None => println!("Employee #{} not found.", id),
            },
            ReplCommand::Hire { name, role, email, skills } => {
                let employee = self.department.add_employee(name, role, email, skills)?;
                println!("Hired employee #{} ({})", employee.id, employee.name);
            }
            ReplCommand::UpdateEmployee(id, update) => {
                if self.department.update_employee(id, update)? {
                    println!("Updated employee #{}", id);
                } else {
                    println!("Employee #{} not found.", id);
                }
            }
            ReplCommand::RemoveEmployee(id) => {
                if self.department.remove_employee(id)? {
                    println!("Removed employee #{}", id);
                } else {
                    println!("Employee #{} not found.", id);
                }
            }
            ReplCommand::Projects => {
                let projects = self.department.list_projects();
                if projects.is_empty() {
                    println!("No projects.");
                } else {
                    for project in projects {
                        print_project(project);
                    }
                }
            }
            ReplCommand::ShowProject(id) => match self.department.get_project(id) {
                Some(project) => {
                    print_project(project);
                    let team = self.department.get_project_team(id);
                    if !team.is_empty() {
                        println!("  Team:");
                        for member in team {
                            println!("    - {} ({})", member.name, member.role);
                        }
                    }
                }
                None => println!("Project #{} not found.", id),
            },
            ReplCommand::AddProject { name, description, technologies, status } => {
                let project = self
                    .department
                    .add_project(name, description, technologies, status)?;
                println!("Added project #{} ({})", project.id, project.name);
            }
            ReplCommand::UpdateProject(id, update) => {
                if self.department.update_project(id, update)? {
                    println!("Updated project #{}", id);
                } else {
                    println!("Project #{} not found.", id);
                }
            }
            ReplCommand::RemoveProject(id) => {
                if self.department.remove_project(id)? {
                    println!("Removed project #{}", id);
                } else {
                    println!("Project #{} not found.", id);
                }
            }
            ReplCommand::Assign(employee, project) => {
                commands::cmd_assign(&mut self.department, employee, project)?;
            }
            ReplCommand::Unassign(employee) => {
                commands::cmd_unassign(&mut self.department, employee)?;
            }
            ReplCommand::Team(project) => {
                commands::cmd_team(&self.department, project)?;
            }
            ReplCommand::Report(kind) => {
                commands::cmd_report(&self.department, kind)?;
            }
            ReplCommand::Help(topic) => print_help(topic.as_deref()),
            ReplCommand::Quit => return Ok(true),
            ReplCommand::Unknown(message) => println!("{}", message),
            ReplCommand::Empty => {}
        }
        Ok(false)
    }
}

fn print_help(topic: Option<&str>) {
    match topic {
        Some(name) => {
            let entry = COMMAND_HELP
                .iter()
                .find(|h| h.name == name || h.aliases.contains(&name));
            match entry {
                Some(help) => {
                    println!("{} - {}", help.name, help.brief);
                    if !help.aliases.is_empty() {
                        println!("  Aliases: {}", help.aliases.join(", "));
                    }
                    println!("  Usage: {}", help.usage);
                }
                None => println!("No such command: {}", name),
            }
        }
        None => {
            println!("Commands:");
            for help in COMMAND_HELP {
                println!("  {:<16} {}", help.name, help.brief);
            }
            println!("\nUse 'help <command>' for usage details.");
        }
    }
}
