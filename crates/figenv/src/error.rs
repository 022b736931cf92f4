//! Error types for figenv

/// Result type for figenv operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while declaring or resolving settings
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Setting is neither declared nor loadable from the environment
    #[error("type object {config} has no setting '{name}'")]
    UnknownSetting { config: String, name: String },

    /// Setting is known but has neither a default nor an environment value
    #[error("{}", missing_message(.name, .message.as_deref()))]
    MissingConfiguration {
        name: String,
        message: Option<String>,
    },

    /// A coercion function rejected the source string
    #[error("Cannot coerce '{value}' to {type_name} for setting '{name}': {reason}")]
    Coercion {
        name: String,
        type_name: String,
        value: String,
        reason: String,
    },

    /// Attempt to assign onto a built declaration
    #[error("{config} is an immutable configuration; override '{name}' using environment variables")]
    ImmutableDeclaration { config: String, name: String },

    /// Indexed lookup found nothing to return
    #[error("Setting not found: {name}")]
    NotFound {
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// A reserved metadata key was declared as a regular setting
    #[error("'{name}' is reserved and cannot be declared as a setting")]
    ReservedName { name: String },

    /// A factory default reported an error of its own
    #[error("Factory for setting '{name}' failed: {message}")]
    Factory { name: String, message: String },
}

fn missing_message(name: &str, message: Option<&str>) -> String {
    match message {
        Some(message) => message.to_string(),
        None => format!("Configuration '{name}' is not present in environment"),
    }
}

impl Error {
    /// Missing-configuration error with the default message
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingConfiguration {
            name: name.into(),
            message: None,
        }
    }

    /// Missing-configuration error with a custom message
    pub fn missing_with_message(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MissingConfiguration {
            name: name.into(),
            message: Some(message.into()),
        }
    }

    /// Error raised from inside a factory closure
    pub fn factory(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Factory {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Name of the setting this error concerns
    pub fn setting_name(&self) -> &str {
        match self {
            Self::UnknownSetting { name, .. }
            | Self::MissingConfiguration { name, .. }
            | Self::Coercion { name, .. }
            | Self::ImmutableDeclaration { name, .. }
            | Self::NotFound { name, .. }
            | Self::ReservedName { name }
            | Self::Factory { name, .. } => name,
        }
    }

    /// True for the two conditions a defaulted lookup recovers from
    pub fn is_absent(&self) -> bool {
        matches!(
            self,
            Self::UnknownSetting { .. } | Self::MissingConfiguration { .. }
        )
    }
}
