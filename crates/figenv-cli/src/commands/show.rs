//! Read-only commands: get, keys, dump

use std::io::Write;

use figenv::{Config, EnvSource, Resolved};
use serde_json::Value;

use crate::error::Result;

/// Render a resolved value for plain output: strings as-is, the rest as JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Print the resolved value of `name`.
pub fn run_get(
    config: &Config,
    env: &dyn EnvSource,
    name: &str,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let value = config.resolve(env, name)?;
    if json {
        writeln!(out, "{value}")?;
    } else {
        writeln!(out, "{}", render(&value))?;
    }
    Ok(())
}

/// Print the declared setting names, one per line.
pub fn run_keys(config: &Config, env: &dyn EnvSource, out: &mut dyn Write) -> Result<()> {
    for key in config.settings(env).keys() {
        writeln!(out, "{key}")?;
    }
    Ok(())
}

/// Print every declared setting with its value.
///
/// Stops at the first setting that fails to resolve; use `check` to see
/// every failure at once.
pub fn run_dump(
    config: &Config,
    env: &dyn EnvSource,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let settings = config.settings(env);

    if json {
        let resolved = settings
            .resolve_all()
            .into_iter()
            .map(|(_, result)| result)
            .collect::<figenv::Result<Vec<Resolved>>>()?;
        serde_json::to_writer_pretty(&mut *out, &resolved)?;
        writeln!(out)?;
        return Ok(());
    }

    for entry in &settings {
        let (name, value) = entry?;
        writeln!(out, "{name}={}", render(&value))?;
    }
    Ok(())
}
