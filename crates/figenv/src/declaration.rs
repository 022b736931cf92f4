//! Configuration declarations and the builder that creates them
//!
//! A [`Config`] is the immutable table of setting definitions for one
//! configuration type. It is produced once by [`ConfigBuilder::build`], which
//! merges the tables of any ancestors (in order, later ancestors winning) and
//! then overlays the declaration's own entries.
//!
//! # Example
//!
//! ```
//! use figenv::{BuiltinKind, Config, MapEnv};
//! use serde_json::json;
//!
//! let base = Config::builder("Base")
//!     .env_prefix("APP_")
//!     .literal("HOST", "localhost")
//!     .literal("PORT", 8080)
//!     .build()
//!     .unwrap();
//!
//! let prod = Config::builder("Prod")
//!     .inherit(&base)
//!     .literal("HOST", "example.com")
//!     .annotate("PORT", BuiltinKind::Int)
//!     .build()
//!     .unwrap();
//!
//! let env = MapEnv::from_pairs([("APP_PORT", "9000")]);
//! assert_eq!(prod.resolve(&env, "HOST").unwrap(), json!("example.com"));
//! assert_eq!(prod.resolve(&env, "PORT").unwrap(), json!(9000));
//! assert_eq!(base.resolve(&env, "HOST").unwrap(), json!("localhost"));
//! ```

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::coerce::{Coerce, TypeTag};
use crate::definition::{Factory, SettingDefinition, SettingValue};
use crate::env::EnvSource;
use crate::error::{Error, Result};
use crate::resolver::Resolver;
use crate::settings::Settings;

/// Names that hold declaration metadata and can never be settings.
pub const RESERVED_NAMES: [&str; 3] = ["ENV_PREFIX", "ENV_LOAD_ALL", "name"];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// An immutable configuration declaration.
///
/// Holds no resolved values: every access goes back to the environment.
#[derive(Clone)]
pub struct Config {
    name: String,
    definitions: IndexMap<String, SettingDefinition>,
    env_prefix: Option<String>,
    env_load_all: Option<bool>,
    coercers: IndexMap<String, Arc<dyn Coerce>>,
}

impl Config {
    /// Start declaring a configuration named `name`.
    pub fn builder(name: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prefix prepended to setting names when reading the environment.
    pub fn env_prefix(&self) -> &str {
        self.env_prefix.as_deref().unwrap_or_default()
    }

    /// Whether undeclared names may be resolved purely from the environment.
    pub fn env_load_all(&self) -> bool {
        self.env_load_all.unwrap_or(false)
    }

    /// Environment variable consulted for `name`.
    pub fn env_key(&self, name: &str) -> String {
        format!("{}{}", self.env_prefix(), name)
    }

    pub fn definition(&self, name: &str) -> Option<&SettingDefinition> {
        self.definitions.get(name)
    }

    /// All definitions, in declaration order.
    pub fn definitions(&self) -> impl Iterator<Item = &SettingDefinition> {
        self.definitions.values()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Declaration-level coercer for a lower-cased type name.
    pub fn coercer(&self, type_key: &str) -> Option<&Arc<dyn Coerce>> {
        self.coercers.get(type_key)
    }

    /// Bind this declaration to an environment for resolution.
    pub fn resolver<'a>(&'a self, env: &'a dyn EnvSource) -> Resolver<'a> {
        Resolver::new(self, env)
    }

    /// Enumeration and lookup over this declaration.
    pub fn settings<'a>(&'a self, env: &'a dyn EnvSource) -> Settings<'a> {
        Settings::new(self, env)
    }

    /// Resolve a single setting against `env`.
    pub fn resolve(&self, env: &dyn EnvSource, name: &str) -> Result<Value> {
        self.resolver(env).resolve(name)
    }

    /// Declarations cannot be changed after they are built.
    ///
    /// Always fails with [`Error::ImmutableDeclaration`]; values are
    /// overridden through the environment or by declaring a new
    /// configuration that inherits from this one.
    pub fn assign(&self, name: &str, _value: impl Into<SettingValue>) -> Result<()> {
        tracing::warn!(config = %self.name, setting = name, "Rejected assignment to declaration");
        Err(Error::ImmutableDeclaration {
            config: self.name.clone(),
            name: name.to_string(),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("name", &self.name)
            .field("env_prefix", &self.env_prefix())
            .field("env_load_all", &self.env_load_all())
            .field("definitions", &self.definitions.keys().collect::<Vec<_>>())
            .field("coercers", &self.coercers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects the entries of a declaration and builds the [`Config`].
pub struct ConfigBuilder {
    name: String,
    ancestors: Vec<Config>,
    entries: IndexMap<String, SettingValue>,
    annotations: IndexMap<String, TypeTag>,
    env_prefix: Option<String>,
    env_load_all: Option<bool>,
    coercers: IndexMap<String, Arc<dyn Coerce>>,
}

impl ConfigBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ancestors: Vec::new(),
            entries: IndexMap::new(),
            annotations: IndexMap::new(),
            env_prefix: None,
            env_load_all: None,
            coercers: IndexMap::new(),
        }
    }

    /// Inherit from `ancestor`. Later ancestors override earlier ones.
    pub fn inherit(mut self, ancestor: &Config) -> Self {
        self.ancestors.push(ancestor.clone());
        self
    }

    /// Declare a setting with a default. Redeclaring a name replaces it.
    pub fn setting(mut self, name: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    /// Declare a setting with a literal default.
    pub fn literal(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.setting(name, SettingValue::Literal(value.into()))
    }

    /// Declare a setting computed on access.
    pub fn factory(self, name: impl Into<String>, factory: Factory) -> Self {
        self.setting(name, SettingValue::Factory(factory))
    }

    /// Annotate a setting's type.
    ///
    /// An annotated name with no default of its own is declared as absent,
    /// unless an ancestor already provides a default for it.
    pub fn annotate(mut self, name: impl Into<String>, tag: impl Into<TypeTag>) -> Self {
        self.annotations.insert(name.into(), tag.into());
        self
    }

    /// Declare a setting with no default, optionally annotated.
    pub fn required(self, name: impl Into<String>, tag: Option<TypeTag>) -> Self {
        let name = name.into();
        let builder = self.setting(name.clone(), SettingValue::Absent);
        match tag {
            Some(tag) => builder.annotate(name, tag),
            None => builder,
        }
    }

    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn env_load_all(mut self, load_all: bool) -> Self {
        self.env_load_all = Some(load_all);
        self
    }

    /// Register a coercion function for annotations naming `type_name`.
    ///
    /// Matching is case-insensitive and takes precedence over the built-in
    /// of the same name.
    pub fn coercer<F>(self, type_name: &str, coercer: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        self.shared_coercer(type_name, Arc::new(coercer))
    }

    pub fn shared_coercer(mut self, type_name: &str, coercer: Arc<dyn Coerce>) -> Self {
        self.coercers.insert(type_name.to_lowercase(), coercer);
        self
    }

    /// Merge ancestors and own entries into the finished declaration.
    pub fn build(self) -> Result<Config> {
        if let Some(name) = self
            .entries
            .keys()
            .chain(self.annotations.keys())
            .find(|name| is_reserved(name))
        {
            return Err(Error::ReservedName { name: name.clone() });
        }

        let mut definitions: IndexMap<String, SettingDefinition> = IndexMap::new();
        let mut env_prefix = None;
        let mut env_load_all = None;
        let mut coercers: IndexMap<String, Arc<dyn Coerce>> = IndexMap::new();

        for ancestor in &self.ancestors {
            for definition in ancestor.definitions.values() {
                definitions.insert(definition.name.clone(), definition.clone());
            }
            if ancestor.env_prefix.is_some() {
                env_prefix.clone_from(&ancestor.env_prefix);
            }
            if ancestor.env_load_all.is_some() {
                env_load_all = ancestor.env_load_all;
            }
            for (key, coercer) in &ancestor.coercers {
                coercers.insert(key.clone(), Arc::clone(coercer));
            }
        }

        let mut annotations = self.annotations;
        for (name, value) in self.entries {
            let annotation = annotations.shift_remove(&name);
            definitions.insert(name.clone(), SettingDefinition::new(name, value, annotation));
        }

        // Annotations without an own value keep any inherited default.
        for (name, tag) in annotations {
            match definitions.get_mut(&name) {
                Some(inherited) => inherited.annotation = Some(tag),
                None => {
                    definitions.insert(
                        name.clone(),
                        SettingDefinition::new(name, SettingValue::Absent, Some(tag)),
                    );
                }
            }
        }

        coercers.extend(self.coercers);

        let config = Config {
            name: self.name,
            definitions,
            env_prefix: self.env_prefix.or(env_prefix),
            env_load_all: self.env_load_all.or(env_load_all),
            coercers,
        };

        tracing::debug!(
            config = %config.name,
            ancestors = self.ancestors.len(),
            settings = config.definitions.len(),
            env_prefix = config.env_prefix(),
            env_load_all = config.env_load_all(),
            "Built configuration declaration"
        );

        Ok(config)
    }
}
