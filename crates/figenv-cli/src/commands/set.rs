//! Set command: declarations refuse assignment

use figenv::Config;

use crate::error::Result;

/// Attempt to assign `value` to `name`.
///
/// Always fails with the declaration's immutability error.
pub fn run_set(config: &Config, name: &str, value: &str) -> Result<()> {
    config.assign(name, value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use figenv::Error;

    #[test]
    fn assignment_is_refused() {
        let config = Config::builder("Cli").literal("HOST", "localhost").build().unwrap();

        let err = run_set(&config, "HOST", "example.com").unwrap_err();
        assert!(matches!(
            err,
            CliError::Config(Error::ImmutableDeclaration { .. })
        ));
        assert_eq!(
            err.to_string(),
            "Cli is an immutable configuration; override 'HOST' using environment variables"
        );
    }
}
