//! Setting definitions: the declared default of a single setting
//!
//! A default is either a literal value, a factory computed on access, or
//! [`SettingValue::Absent`] for a setting declared without any default.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::coerce::TypeTag;
use crate::error::Result;
use crate::resolver::Resolver;

/// Printable marker for a setting declared without a default.
pub const MISSING_MARKER: &str = "<MISSING CONFIGURATION>";

type FactoryFn = dyn Fn(&Resolver<'_>) -> Result<Value> + Send + Sync;

/// A default computed each time the setting is resolved.
///
/// The closure receives a [`Resolver`] bound to the declaring configuration,
/// so it can derive its value from other settings.
///
/// # Example
///
/// ```
/// use figenv::{Config, Factory, MapEnv};
///
/// let config = Config::builder("App")
///     .literal("HOST", "localhost")
///     .factory("URL", Factory::new(|cfg| {
///         Ok(format!("http://{}", cfg.resolve_string("HOST")?))
///     }))
///     .build()
///     .unwrap();
///
/// let env = MapEnv::new();
/// let url = config.resolve(&env, "URL").unwrap();
/// assert_eq!(url, "http://localhost");
/// ```
#[derive(Clone)]
pub struct Factory {
    func: Arc<FactoryFn>,
    strict: bool,
    returns: Option<TypeTag>,
}

impl Factory {
    pub fn new<F, T>(func: F) -> Self
    where
        F: Fn(&Resolver<'_>) -> Result<T> + Send + Sync + 'static,
        T: Into<Value>,
    {
        Self {
            func: erase(move |resolver| func(resolver).map(Into::into)),
            strict: false,
            returns: None,
        }
    }

    /// Never let the environment override this setting.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Declare the type this factory returns.
    ///
    /// Used to coerce string results (and environment overrides) when the
    /// setting itself carries no annotation.
    pub fn returns(mut self, tag: impl Into<TypeTag>) -> Self {
        self.returns = Some(tag.into());
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn return_type(&self) -> Option<&TypeTag> {
        self.returns.as_ref()
    }

    pub(crate) fn call(&self, resolver: &Resolver<'_>) -> Result<Value> {
        (self.func)(resolver)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("strict", &self.strict)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

fn erase<F>(func: F) -> Arc<FactoryFn>
where
    F: Fn(&Resolver<'_>) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(func)
}

/// Mark a factory default as exempt from environment override.
pub fn strict(factory: Factory) -> Factory {
    factory.strict()
}

/// The declared default of a setting.
#[derive(Debug, Clone)]
pub enum SettingValue {
    Literal(Value),
    Factory(Factory),
    /// Declared, but with no default
    Absent,
}

impl SettingValue {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_factory(&self) -> Option<&Factory> {
        match self {
            Self::Factory(factory) => Some(factory),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Factory(factory) if factory.is_strict() => f.write_str("<strict factory>"),
            Self::Factory(_) => f.write_str("<factory>"),
            Self::Absent => f.write_str(MISSING_MARKER),
        }
    }
}

impl From<Value> for SettingValue {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<Factory> for SettingValue {
    fn from(factory: Factory) -> Self {
        Self::Factory(factory)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Literal(Value::from(value))
    }
}

/// A named setting with its default and optional annotation.
#[derive(Debug, Clone)]
pub struct SettingDefinition {
    pub name: String,
    pub value: SettingValue,
    pub annotation: Option<TypeTag>,
}

impl SettingDefinition {
    pub fn new(name: impl Into<String>, value: SettingValue, annotation: Option<TypeTag>) -> Self {
        Self {
            name: name.into(),
            value,
            annotation,
        }
    }

    /// Annotation used for coercion: the setting's own, or the factory's
    /// declared return type.
    pub fn effective_annotation(&self) -> Option<&TypeTag> {
        self.annotation
            .as_ref()
            .or_else(|| self.value.as_factory().and_then(Factory::return_type))
    }
}
