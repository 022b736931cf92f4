//! Turning command-line flags into a declaration

use std::collections::HashSet;

use figenv::{BuiltinKind, Config, TypeTag};

use crate::cli::DeclarationArgs;
use crate::error::{CliError, Result};

/// Build the [`Config`] described by the declaration flags.
///
/// Defaults are declared as literal strings and are coerced exactly like
/// environment values. Type names must be one of the built-ins, since
/// custom coercers cannot be supplied from the command line.
pub fn build_config(args: &DeclarationArgs) -> Result<Config> {
    let defaulted: HashSet<&str> = args.defaults.iter().map(|(name, _)| name.as_str()).collect();
    if let Some(name) = args.required.iter().find(|name| defaulted.contains(name.as_str())) {
        return Err(CliError::user(format!(
            "setting '{name}' is both required and given a default"
        )));
    }

    let mut builder = Config::builder(&args.config_name)
        .env_prefix(&args.prefix)
        .env_load_all(args.load_all);

    for (name, value) in &args.defaults {
        builder = builder.literal(name, value.as_str());
    }
    for name in &args.required {
        builder = builder.required(name, None);
    }
    for (name, type_name) in &args.types {
        let kind: BuiltinKind = type_name.parse().map_err(|reason: String| {
            CliError::user(format!("invalid type for setting '{name}': {reason}"))
        })?;
        builder = builder.annotate(name, TypeTag::from(kind));
    }

    let config = builder.build()?;
    tracing::debug!(config = ?config, "Built declaration from flags");
    Ok(config)
}
