//! figenv CLI
//!
//! Resolves settings declared on the command line against the process
//! environment.

mod cli;
mod commands;
mod error;

use std::io::Write;

use clap::Parser;
use colored::Colorize;
use figenv::{Config, StdEnv};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| CliError::user(format!("failed to set tracing subscriber: {e}")))?;
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        println!("{} environment-backed settings", "figenv".green().bold());
        println!();
        println!("Run {} for available commands.", "figenv --help".cyan());
        return Ok(());
    };

    let config = commands::build_config(&cli.declaration)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = execute_command(command, &config, &mut out);
    out.flush()?;
    result
}

fn execute_command(cmd: Commands, config: &Config, out: &mut dyn Write) -> Result<()> {
    match cmd {
        Commands::Get { name, json } => commands::run_get(config, &StdEnv, &name, json, out),
        Commands::Keys => commands::run_keys(config, &StdEnv, out),
        Commands::Dump { json } => commands::run_dump(config, &StdEnv, json, out),
        Commands::Check => commands::run_check(config, &StdEnv, out),
        Commands::Set { name, value } => commands::run_set(config, &name, &value),
    }
}
