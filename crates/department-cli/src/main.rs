//! Department CLI entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use department_cli::cli::{Cli, Commands};
use department_cli::commands;
use department_cli::repl::Repl;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    let data_file = cli.data_file();

    // Handle command or enter the console
    let result = match cli.command {
        Some(Commands::Repl) | None => run_repl(&data_file),
        Some(cmd) => commands::execute(cmd, &data_file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_repl(data_file: &std::path::Path) -> commands::Result<()> {
    let mut repl = Repl::new(data_file)?;
    repl.run()?;
    Ok(())
}
