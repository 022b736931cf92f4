//! Resolution of a single setting
//!
//! Precedence, for a setting `NAME` on a declaration with prefix `P`:
//!
//! 1. The environment variable `P` + `NAME`, unless the default is a strict
//!    factory.
//! 2. The factory default, invoked with this resolver as context.
//! 3. The literal default.
//!
//! String results are then coerced by annotation or heuristic; any other
//! value is returned unchanged. Nothing is cached.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce;
use crate::declaration::Config;
use crate::definition::{Factory, SettingValue};
use crate::env::EnvSource;
use crate::error::{Error, Result};

static ABSENT: SettingValue = SettingValue::Absent;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Environment,
    Default,
    Factory,
}

/// A resolved setting together with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolved {
    pub name: String,
    pub value: Value,
    pub source: Source,
    /// Environment variable consulted for this setting
    pub env_key: String,
    /// Coercion applied to a string source, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coercion: Option<String>,
}

/// Nesting limit for factories resolving other settings.
///
/// Exceeding it means the factories form a cycle.
pub const MAX_FACTORY_DEPTH: usize = 64;

/// A declaration bound to an environment.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    config: &'a Config,
    env: &'a dyn EnvSource,
    depth: usize,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a Config, env: &'a dyn EnvSource) -> Self {
        Self {
            config,
            env,
            depth: 0,
        }
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    pub fn env(&self) -> &'a dyn EnvSource {
        self.env
    }

    /// Whether `name` is declared, or loadable from the environment.
    pub fn is_visible(&self, name: &str) -> bool {
        self.config.is_declared(name)
            || (self.config.env_load_all() && self.env.contains(&self.config.env_key(name)))
    }

    /// Resolve `name` to its typed value.
    pub fn resolve(&self, name: &str) -> Result<Value> {
        self.resolve_detailed(name).map(|resolved| resolved.value)
    }

    /// Resolve `name` and render it as a string.
    ///
    /// Strings are returned as is; other values use their JSON text.
    pub fn resolve_string(&self, name: &str) -> Result<String> {
        Ok(match self.resolve(name)? {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    /// Resolve `name`, reporting where the value came from.
    pub fn resolve_detailed(&self, name: &str) -> Result<Resolved> {
        let env_key = self.config.env_key(name);
        let env_value = self.env.get(&env_key);
        let definition = self.config.definition(name);

        if definition.is_none() && !(self.config.env_load_all() && env_value.is_some()) {
            return Err(Error::UnknownSetting {
                config: self.config.name().to_string(),
                name: name.to_string(),
            });
        }

        let raw = match definition {
            Some(definition) => &definition.value,
            None => &ABSENT,
        };
        let annotation = definition.and_then(|d| d.effective_annotation());
        let overridable = !raw.as_factory().is_some_and(|f| f.is_strict());

        let (source_value, source) = match (env_value.filter(|_| overridable), raw) {
            (Some(value), _) => (Value::String(value), Source::Environment),
            (None, SettingValue::Factory(factory)) => {
                (self.call_factory(name, factory)?, Source::Factory)
            }
            (None, SettingValue::Literal(value)) => (value.clone(), Source::Default),
            (None, SettingValue::Absent) => {
                tracing::debug!(setting = name, env_key = %env_key, "No value for setting");
                return Err(Error::missing(name));
            }
        };

        let Value::String(text) = source_value else {
            tracing::trace!(setting = name, ?source, "Resolved non-string value");
            return Ok(Resolved {
                name: name.to_string(),
                value: source_value,
                source,
                env_key,
                coercion: None,
            });
        };

        let coercion = coerce::select(&text, annotation, |key| self.config.coercer(key));
        let value = match &coercion {
            Some(coercion) => coercion.apply(&text).map_err(|reason| Error::Coercion {
                name: name.to_string(),
                type_name: coercion.type_name().to_string(),
                value: text.clone(),
                reason,
            })?,
            None => Value::String(text),
        };

        tracing::debug!(
            setting = name,
            ?source,
            coercion = coercion.as_ref().map(|c| c.type_name()),
            "Resolved setting"
        );

        Ok(Resolved {
            name: name.to_string(),
            value,
            source,
            env_key,
            coercion: coercion.map(|c| c.type_name().to_string()),
        })
    }

    fn call_factory(&self, name: &str, factory: &Factory) -> Result<Value> {
        if self.depth >= MAX_FACTORY_DEPTH {
            tracing::warn!(setting = name, depth = self.depth, "Factory nesting limit reached");
            return Err(Error::factory(
                name,
                format!("factories nested deeper than {MAX_FACTORY_DEPTH}; they likely form a cycle"),
            ));
        }
        let nested = Self {
            depth: self.depth + 1,
            ..*self
        };
        factory.call(&nested)
    }
}

/// Resolve `name` on `config` against `env`.
pub fn resolve(config: &Config, env: &dyn EnvSource, name: &str) -> Result<Value> {
    Resolver::new(config, env).resolve(name)
}
