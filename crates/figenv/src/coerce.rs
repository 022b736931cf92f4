//! Coercion of environment strings into typed values
//!
//! Two dispatch paths exist:
//!
//! - **Annotated**: a [`TypeTag`] names the target type. A custom coercer on
//!   the tag wins, then a coercer registered on the declaration under the
//!   lower-cased type name, then the built-in of that name. If nothing
//!   matches, the raw string is kept.
//! - **Heuristic**: with no annotation, the shape of the string picks
//!   `bool`, `float`, `int` or leaves it as a string. See [`guess`].
//!
//! The heuristic only recognises the literals `true`/`false`, while the
//! `bool` built-in also accepts `yes` and `1`. Both rules are intentional.

use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A coercion capability: turns a raw string into a typed value.
///
/// Errors are plain messages; the resolver wraps them into
/// [`Error::Coercion`](crate::Error::Coercion) together with the setting
/// name.
pub trait Coerce: Send + Sync {
    fn coerce(&self, raw: &str) -> Result<Value, String>;
}

impl<F> Coerce for F
where
    F: Fn(&str) -> Result<Value, String> + Send + Sync,
{
    fn coerce(&self, raw: &str) -> Result<Value, String> {
        self(raw)
    }
}

/// Built-in coercion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    Bool,
    Int,
    Float,
    Dict,
    List,
    Str,
}

impl BuiltinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Dict => "dict",
            Self::List => "list",
            Self::Str => "str",
        }
    }

    /// Apply the built-in coercion function for this kind.
    pub fn apply(&self, raw: &str) -> Result<Value, String> {
        match self {
            Self::Bool => Ok(to_bool(raw)),
            Self::Int => to_int(raw),
            Self::Float => to_float(raw),
            Self::Dict => to_dict(raw),
            Self::List => to_list(raw),
            Self::Str => Ok(to_str(raw)),
        }
    }
}

impl fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuiltinKind {
    type Err = String;

    /// Case-insensitive, so `Dict` and `dict` name the same built-in.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bool" => Ok(Self::Bool),
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "dict" => Ok(Self::Dict),
            "list" => Ok(Self::List),
            "str" => Ok(Self::Str),
            other => Err(format!("no built-in coercion for type '{other}'")),
        }
    }
}

/// Type annotation attached to a setting.
#[derive(Clone)]
pub enum TypeTag {
    /// One of the built-in kinds
    Builtin(BuiltinKind),
    /// A type known only by name; coerced through a declaration-level
    /// coercer or a built-in of the same (lower-cased) name, if any
    Named(String),
    /// A type carrying its own coercion capability
    Custom {
        name: String,
        coercer: Arc<dyn Coerce>,
    },
}

impl TypeTag {
    /// Annotation for a type with its own coercion function.
    pub fn custom<F>(name: impl Into<String>, coercer: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self::with_coercer(name, Arc::new(coercer))
    }

    /// Annotation for a type whose coercer is already shared.
    pub fn with_coercer(name: impl Into<String>, coercer: Arc<dyn Coerce>) -> Self {
        Self::Custom {
            name: name.into(),
            coercer,
        }
    }

    /// Annotation by type name. Built-in names map to [`TypeTag::Builtin`].
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.parse::<BuiltinKind>() {
            Ok(kind) if kind.as_str() == name => Self::Builtin(kind),
            _ => Self::Named(name),
        }
    }

    /// The type name used for lookup and error messages.
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(kind) => kind.as_str(),
            Self::Named(name) => name,
            Self::Custom { name, .. } => name,
        }
    }

    /// Lower-cased type name, the key for declaration-level coercers.
    pub fn lookup_key(&self) -> String {
        self.name().to_lowercase()
    }

    /// The coercer this annotation carries itself, if any.
    pub fn own_coercer(&self) -> Option<&Arc<dyn Coerce>> {
        match self {
            Self::Custom { coercer, .. } => Some(coercer),
            _ => None,
        }
    }
}

impl From<BuiltinKind> for TypeTag {
    fn from(kind: BuiltinKind) -> Self {
        Self::Builtin(kind)
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(kind) => f.debug_tuple("Builtin").field(kind).finish(),
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Custom { name, .. } => f
                .debug_struct("Custom")
                .field("name", name)
                .finish_non_exhaustive(),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The coercion selected for a string value.
#[derive(Clone)]
pub enum Coercion {
    Builtin(BuiltinKind),
    /// Built-in chosen by [`guess`]; never fails, see [`apply_guessed`]
    Guessed(BuiltinKind),
    Custom {
        type_name: String,
        coercer: Arc<dyn Coerce>,
    },
}

impl Coercion {
    pub fn type_name(&self) -> &str {
        match self {
            Self::Builtin(kind) | Self::Guessed(kind) => kind.as_str(),
            Self::Custom { type_name, .. } => type_name,
        }
    }

    pub fn apply(&self, raw: &str) -> Result<Value, String> {
        match self {
            Self::Builtin(kind) => kind.apply(raw),
            Self::Guessed(kind) => Ok(apply_guessed(*kind, raw)),
            Self::Custom { coercer, .. } => coercer.coerce(raw),
        }
    }
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Coercion").field(&self.type_name()).finish()
    }
}

/// Pick the coercion for a string value.
///
/// `registered` looks up declaration-level coercers by lower-cased type
/// name. Returns `None` when the raw string should be kept as is.
pub fn select<'a, R>(raw: &str, annotation: Option<&TypeTag>, registered: R) -> Option<Coercion>
where
    R: Fn(&str) -> Option<&'a Arc<dyn Coerce>>,
{
    let Some(annotation) = annotation else {
        return guess(raw).map(Coercion::Guessed);
    };

    if let Some(coercer) = annotation.own_coercer() {
        return Some(Coercion::Custom {
            type_name: annotation.name().to_string(),
            coercer: Arc::clone(coercer),
        });
    }

    let key = annotation.lookup_key();
    if let Some(coercer) = registered(&key) {
        return Some(Coercion::Custom {
            type_name: annotation.name().to_string(),
            coercer: Arc::clone(coercer),
        });
    }

    key.parse::<BuiltinKind>().ok().map(Coercion::Builtin)
}

/// Guess a built-in coercion from the shape of an unannotated string.
///
/// Checked in order: boolean literal, decimal with exactly one dot, integer.
/// Anything else (including version strings like `1.0.2`) stays a string.
pub fn guess(raw: &str) -> Option<BuiltinKind> {
    if raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("false") {
        return Some(BuiltinKind::Bool);
    }

    let unsigned = raw.strip_prefix('-').unwrap_or(raw);
    if unsigned.matches('.').count() == 1 {
        let digits = unsigned.replace('.', "");
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return Some(BuiltinKind::Float);
        }
        return None;
    }

    if !unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return Some(BuiltinKind::Int);
    }

    None
}

/// Apply a guessed built-in without failing.
///
/// The string only looked numeric, so values that do not fit are degraded
/// instead of rejected: an oversized integer becomes a float, and anything
/// still unrepresentable (such as a float overflowing to infinity) stays the
/// raw string.
pub fn apply_guessed(kind: BuiltinKind, raw: &str) -> Value {
    let coerced = match kind {
        BuiltinKind::Int => to_int(raw).or_else(|_| to_float(raw)),
        other => other.apply(raw),
    };
    coerced.unwrap_or_else(|_| to_str(raw))
}

pub fn to_str(raw: &str) -> Value {
    Value::String(raw.to_string())
}

pub fn to_bool(raw: &str) -> Value {
    let lowered = raw.to_lowercase();
    Value::Bool(matches!(lowered.as_str(), "yes" | "true" | "1"))
}

pub fn to_int(raw: &str) -> Result<Value, String> {
    let trimmed = raw.trim();
    let signed = match trimmed.parse::<i64>() {
        Ok(n) => return Ok(Value::from(n)),
        Err(e) => e,
    };
    if trimmed.starts_with('-') {
        return Err(format!("invalid literal for int: {signed}"));
    }
    trimmed
        .parse::<u64>()
        .map(Value::from)
        .map_err(|e| format!("invalid literal for int: {e}"))
}

pub fn to_float(raw: &str) -> Result<Value, String> {
    let parsed = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid literal for float: {e}"))?;
    Number::from_f64(parsed)
        .map(Value::Number)
        .ok_or_else(|| format!("float value {parsed} is not finite"))
}

pub fn to_dict(raw: &str) -> Result<Value, String> {
    match serde_json::from_str::<Value>(raw).map_err(|e| e.to_string())? {
        value @ Value::Object(_) => Ok(value),
        other => Err(format!("expected a JSON object, found {}", json_kind(&other))),
    }
}

pub fn to_list(raw: &str) -> Result<Value, String> {
    match serde_json::from_str::<Value>(raw).map_err(|e| e.to_string())? {
        value @ Value::Array(_) => Ok(value),
        other => Err(format!("expected a JSON array, found {}", json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
