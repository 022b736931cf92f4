//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};

/// figenv - Resolve environment-backed settings from the command line
#[derive(Parser, Debug)]
#[command(name = "figenv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub declaration: DeclarationArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags describing the declaration every command resolves against
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct DeclarationArgs {
    /// Name of the declaration, used in error messages
    #[arg(long = "name", value_name = "NAME", global = true, default_value = "figenv")]
    pub config_name: String,

    /// Prefix prepended to every setting name when reading the environment
    #[arg(long, global = true, env = "FIGENV_PREFIX", default_value = "")]
    pub prefix: String,

    /// Resolve undeclared names directly from the environment
    #[arg(long, global = true)]
    pub load_all: bool,

    /// Declare a setting with a literal default
    #[arg(
        short = 'd',
        long = "default",
        value_name = "NAME=VALUE",
        value_parser = parse_assignment,
        global = true
    )]
    pub defaults: Vec<(String, String)>,

    /// Annotate a setting with a type (bool, int, float, dict, list, str)
    #[arg(
        short = 't',
        long = "type",
        value_name = "NAME=TYPE",
        value_parser = parse_assignment,
        global = true
    )]
    pub types: Vec<(String, String)>,

    /// Declare a setting that must come from the environment
    #[arg(short = 'r', long = "require", value_name = "NAME", global = true)]
    pub required: Vec<String>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the resolved value of one setting
    ///
    /// Strings are printed as-is; other values as JSON.
    Get {
        /// Name of the setting
        name: String,

        /// Always print the value as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the declared setting names
    Keys,

    /// Print every declared setting with its resolved value
    Dump {
        /// Output as JSON, including where each value came from
        #[arg(long)]
        json: bool,
    },

    /// Verify that every declared setting resolves
    Check,

    /// Attempt to override a setting (always refused)
    ///
    /// Declarations are immutable; settings are overridden through
    /// environment variables.
    Set {
        /// Name of the setting
        name: String,

        /// Value that would be assigned
        value: String,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    if name.is_empty() {
        return Err(format!("missing setting name in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}
