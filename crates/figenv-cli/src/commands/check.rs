//! Check command: resolve every declared setting and report failures

use std::io::Write;

use colored::Colorize;
use figenv::{Config, EnvSource};

use crate::error::{CliError, Result};

/// Resolve every declared setting, listing the ones that fail.
///
/// Fails when at least one setting does not resolve.
pub fn run_check(config: &Config, env: &dyn EnvSource, out: &mut dyn Write) -> Result<()> {
    let results = config.settings(env).resolve_all();
    let total = results.len();

    writeln!(
        out,
        "{} Checking {total} settings of {}...",
        "=>".blue().bold(),
        config.name()
    )?;
    let mut failed = 0;

    for (name, result) in &results {
        match result {
            Ok(resolved) => {
                tracing::debug!(setting = %name, source = ?resolved.source, "Setting resolved");
            }
            Err(err) => {
                failed += 1;
                writeln!(out, "   {} {}: {}", "!".red(), name.cyan(), err)?;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::user(format!(
            "{failed} of {total} settings failed to resolve"
        )));
    }

    writeln!(out, "{} All {total} settings resolve.", "OK".green().bold())?;
    Ok(())
}
