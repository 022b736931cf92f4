//! Environment sources
//!
//! Resolution never reads the process environment directly; it goes through
//! an [`EnvSource`] so that tests (and callers wanting a consistent view
//! across several settings) can substitute a snapshot.

use indexmap::IndexMap;
use std::collections::HashMap;

/// Read-only, string-keyed view of environment variables.
pub trait EnvSource {
    /// Get the value of an environment variable by name.
    fn get(&self, name: &str) -> Option<String>;

    /// Iterate over all environment variables.
    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_>;

    /// Whether a variable with this name is present.
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// The live process environment.
///
/// Every call re-reads the environment, so changes made by other code are
/// visible on the next resolution. Variables whose value is not valid
/// Unicode are treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv;

impl EnvSource for StdEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        Box::new(std::env::vars_os().filter_map(|(k, v)| {
            Some((k.into_string().ok()?, v.into_string().ok()?))
        }))
    }
}

/// An owned set of environment variables.
///
/// # Example
///
/// ```
/// use figenv::{EnvSource, MapEnv};
///
/// let mut env = MapEnv::from_pairs([("APP_DEBUG", "true")]);
/// env.set("APP_PORT", "8080");
/// assert_eq!(env.get("APP_PORT").as_deref(), Some("8080"));
/// assert!(!env.contains("PORT"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: IndexMap<String, String>,
}

impl MapEnv {
    /// Create a new empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the current process environment.
    pub fn snapshot() -> Self {
        Self {
            vars: StdEnv.vars().collect(),
        }
    }

    /// Create an environment from an iterator of key-value pairs.
    pub fn from_pairs<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set a variable, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Remove a variable, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.vars.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl EnvSource for MapEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        Box::new(self.vars.iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }

    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}

impl EnvSource for IndexMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        IndexMap::get(self, name).cloned()
    }

    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}

impl<E: EnvSource + ?Sized> EnvSource for &E {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }

    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        (**self).vars()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_env_set_and_remove() {
        let mut env = MapEnv::new();
        assert!(env.is_empty());

        env.set("A", "1");
        env.set("B", "2");
        env.set("A", "3");
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("A").as_deref(), Some("3"));

        assert_eq!(env.remove("A").as_deref(), Some("3"));
        assert!(!env.contains("A"));
    }

    #[test]
    fn map_env_preserves_insertion_order() {
        let env = MapEnv::from_pairs([("Z", "1"), ("A", "2"), ("M", "3")]);
        let names: Vec<String> = env.vars().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
    }

    #[test]
    fn hash_map_is_an_env_source() {
        let mut map = HashMap::new();
        map.insert("KEY".to_string(), "value".to_string());
        assert_eq!(EnvSource::get(&map, "KEY").as_deref(), Some("value"));
        assert!(!EnvSource::contains(&map, "OTHER"));
    }

    #[test]
    fn snapshot_sees_process_path() {
        // PATH is set in every environment the test suite runs in
        let snapshot = MapEnv::snapshot();
        assert_eq!(snapshot.get("PATH"), StdEnv.get("PATH"));
    }
}
