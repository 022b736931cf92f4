//! Enumeration and mapping-style lookup over a declaration
//!
//! [`Settings`] is a thin layer over [`Resolver`]: every key it yields or
//! looks up is resolved again, so iterating twice may observe different
//! environment values.

use serde_json::{Map, Value};

use crate::declaration::Config;
use crate::env::EnvSource;
use crate::error::{Error, Result};
use crate::resolver::{Resolved, Resolver};

/// Whether `name` follows the uppercase naming convention of settings.
///
/// Requires at least one cased character and no lowercase ones, so
/// `DB_URL_2` qualifies while `name` and `_internal` do not.
pub fn is_setting_name(name: &str) -> bool {
    name.chars().any(char::is_uppercase) && !name.chars().any(char::is_lowercase)
}

/// Collection and mapping view of a declaration bound to an environment.
///
/// # Example
///
/// ```
/// use figenv::{Config, MapEnv};
/// use serde_json::json;
///
/// let config = Config::builder("App")
///     .literal("NAME", "test")
///     .literal("RETRIES", 3)
///     .build()
///     .unwrap();
/// let env = MapEnv::from_pairs([("RETRIES", "5")]);
/// let settings = config.settings(&env);
///
/// assert_eq!(settings.keys(), vec!["NAME", "RETRIES"]);
/// assert_eq!(settings.lookup("RETRIES").unwrap(), json!(5));
/// assert_eq!(settings.lookup_or("UNSET", json!("fallback")).unwrap(), json!("fallback"));
///
/// let pairs: Vec<(String, serde_json::Value)> =
///     settings.iter().collect::<Result<_, _>>().unwrap();
/// assert_eq!(pairs[0], ("NAME".to_string(), json!("test")));
/// ```
#[derive(Clone, Copy)]
pub struct Settings<'a> {
    resolver: Resolver<'a>,
}

impl<'a> Settings<'a> {
    pub fn new(config: &'a Config, env: &'a dyn EnvSource) -> Self {
        Self {
            resolver: Resolver::new(config, env),
        }
    }

    pub fn resolver(&self) -> &Resolver<'a> {
        &self.resolver
    }

    /// Setting names of the declaration, in declaration order.
    ///
    /// Only uppercase-styled names are listed. Settings reachable solely
    /// through `ENV_LOAD_ALL` are not.
    pub fn keys(&self) -> Vec<&'a str> {
        self.resolver
            .config()
            .definitions()
            .map(|definition| definition.name.as_str())
            .filter(|name| is_setting_name(name))
            .collect()
    }

    /// Resolve every key in turn.
    pub fn iter(&self) -> Iter<'a> {
        Iter {
            resolver: self.resolver,
            keys: self.keys().into_iter(),
        }
    }

    /// Resolve `name`.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.resolver.resolve(name)
    }

    /// Indexed lookup.
    ///
    /// Unknown and missing settings fail with [`Error::NotFound`], carrying
    /// the underlying error as its source.
    pub fn lookup(&self, name: &str) -> Result<Value> {
        self.resolver.resolve(name).map_err(|err| {
            if err.is_absent() {
                Error::NotFound {
                    name: name.to_string(),
                    source: Box::new(err),
                }
            } else {
                err
            }
        })
    }

    /// Indexed lookup with a fallback for unknown and missing settings.
    ///
    /// Coercion and factory errors are still returned.
    pub fn lookup_or(&self, name: &str, default: Value) -> Result<Value> {
        match self.resolver.resolve(name) {
            Err(err) if err.is_absent() => Ok(default),
            other => other,
        }
    }

    /// Whether `name` resolves to a value.
    ///
    /// Unknown and missing settings are `Ok(false)`. Coercion and factory
    /// errors are returned rather than reported as absence.
    pub fn contains(&self, name: &str) -> Result<bool> {
        match self.resolver.resolve(name) {
            Ok(_) => Ok(true),
            Err(err) if err.is_absent() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Resolve every key into a JSON object.
    pub fn to_map(&self) -> Result<Map<String, Value>> {
        self.iter().collect()
    }

    /// Resolve every key, keeping provenance.
    pub fn resolve_all(&self) -> Vec<(String, Result<Resolved>)> {
        self.keys()
            .into_iter()
            .map(|name| (name.to_string(), self.resolver.resolve_detailed(name)))
            .collect()
    }
}

impl<'a> IntoIterator for &Settings<'a> {
    type Item = Result<(String, Value)>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(name, value)` pairs, resolving lazily.
pub struct Iter<'a> {
    resolver: Resolver<'a>,
    keys: std::vec::IntoIter<&'a str>,
}

impl Iterator for Iter<'_> {
    type Item = Result<(String, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.keys.next()?;
        Some(
            self.resolver
                .resolve(name)
                .map(|value| (name.to_string(), value)),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}
