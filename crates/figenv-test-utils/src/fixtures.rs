//! Sample declarations and coercers shared across test suites.

use figenv::{BuiltinKind, Config, Factory, TypeTag};
use serde_json::Value;

/// Splits `a,b,c` (optionally wrapped in brackets) into a list of strings.
pub fn csv_tag() -> TypeTag {
    TypeTag::custom("CSV", |raw: &str| {
        let inner = raw.strip_prefix('[').unwrap_or(raw);
        let inner = inner.strip_suffix(']').unwrap_or(inner);
        Ok(Value::Array(
            inner.split(',').map(|s| Value::from(s.to_string())).collect(),
        ))
    })
}

/// Declaration-level coercer for a `Role` type: `ADMIN` or `USER`.
pub fn role_coercer(raw: &str) -> Result<Value, String> {
    match raw {
        "ADMIN" => Ok(Value::from("admin")),
        _ => Ok(Value::from("user")),
    }
}

/// A parent declaration with two settings.
pub fn parent_config() -> Config {
    Config::builder("Parent")
        .literal("CLASS", "parent")
        .literal("SECONDARY", "second")
        .build()
        .unwrap_or_else(|e| panic!("parent_config: {e}"))
}

/// A child of [`parent_config`] redeclaring `CLASS`.
pub fn child_config(parent: &Config) -> Config {
    Config::builder("Child")
        .inherit(parent)
        .literal("CLASS", "child")
        .build()
        .unwrap_or_else(|e| panic!("child_config: {e}"))
}

/// A declaration exercising every coercion path by annotation.
pub fn annotated_config() -> Config {
    Config::builder("Annotated")
        .literal("DEFAULT_SETTING", "default,value")
        .annotate("DEFAULT_SETTING", csv_tag())
        .literal("BOOL_SETTING", "1")
        .annotate("BOOL_SETTING", BuiltinKind::Bool)
        .literal("FALSE_SETTING", "0")
        .annotate("FALSE_SETTING", BuiltinKind::Bool)
        .literal("INT_SETTING", "1093")
        .annotate("INT_SETTING", BuiltinKind::Int)
        .literal("FLOAT_SETTING", "1.938")
        .annotate("FLOAT_SETTING", BuiltinKind::Float)
        .literal("DICT_SETTING", r#"{"hello":"world"}"#)
        .annotate("DICT_SETTING", TypeTag::named("Dict"))
        .annotate("NO_DEFAULT_SETTING", BuiltinKind::Int)
        .build()
        .unwrap_or_else(|e| panic!("annotated_config: {e}"))
}

/// `ENV_LOAD_ALL` declaration used by the parsing suites.
///
/// Mirrors a configuration where some names are annotated and one is
/// declared with a null default so its type comes from the environment.
pub fn load_all_config() -> Config {
    Config::builder("Parsing")
        .env_load_all(true)
        .literal("DEFINED_ANNOTATED_BOOL_BOOL_STRING", false)
        .annotate("DEFINED_ANNOTATED_BOOL_BOOL_STRING", BuiltinKind::Bool)
        .literal("DEFINED_ANNOTATED_BOOL_INT_STRING", false)
        .annotate("DEFINED_ANNOTATED_BOOL_INT_STRING", BuiltinKind::Bool)
        .literal("DEFINED_ANNOTATED_STRING_BOOL_STRING", "False")
        .annotate("DEFINED_ANNOTATED_STRING_BOOL_STRING", BuiltinKind::Str)
        .literal("DEFINED_ANNOTATED_FLOAT_FLOAT_STRING", 0.0)
        .annotate("DEFINED_ANNOTATED_FLOAT_FLOAT_STRING", BuiltinKind::Float)
        .literal("DEFINED_ANNOTATED_FLOAT_INT_STRING", 0.0)
        .annotate("DEFINED_ANNOTATED_FLOAT_INT_STRING", BuiltinKind::Float)
        .literal("DEFINED_ANNOTATED_STRING_FLOAT_STRING", "0.0")
        .annotate("DEFINED_ANNOTATED_STRING_FLOAT_STRING", BuiltinKind::Str)
        .literal("DEFINED_ANNOTATED_INT_INT_STRING", 0)
        .annotate("DEFINED_ANNOTATED_INT_INT_STRING", BuiltinKind::Int)
        .literal("DEFINED_ANNOTATED_STRING_INT_STRING", "0")
        .annotate("DEFINED_ANNOTATED_STRING_INT_STRING", BuiltinKind::Str)
        .literal("DEFINED_UNANNOTATED", Value::Null)
        .build()
        .unwrap_or_else(|e| panic!("load_all_config: {e}"))
}

/// `DATA` plus a factory deriving `GREETING` from it.
pub fn greeting_config(strict: bool) -> Config {
    let factory = Factory::new(|cfg| Ok(format!("{} world", cfg.resolve_string("DATA")?)));
    let factory = if strict { factory.strict() } else { factory };
    Config::builder("Greeting")
        .literal("DATA", "hello")
        .factory("GREETING", factory)
        .factory(
            "ACCOUNT_ID",
            Factory::new(|_| Ok("123456")).returns(BuiltinKind::Str),
        )
        .build()
        .unwrap_or_else(|e| panic!("greeting_config: {e}"))
}
