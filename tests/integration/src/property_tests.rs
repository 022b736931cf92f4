//! Resolution properties that must hold for any environment
//!
//! Parameterised cases pin the documented behaviour; proptest checks the
//! precedence rules over arbitrary names and values.

use figenv::{BuiltinKind, Config, Error, Factory, MapEnv};
use figenv_test_utils::env::map_env;
use proptest::prelude::*;
use rstest::rstest;
use serde_json::{Value, json};

fn prefixed(prefix: &str, load_all: bool) -> Config {
    Config::builder("Props")
        .env_prefix(prefix)
        .env_load_all(load_all)
        .literal("FOO", "declared")
        .required("NEEDED", None)
        .build()
        .unwrap()
}

#[rstest]
#[case::declared_default("FOO", &[], Ok(json!("declared")))]
#[case::prefixed_override("FOO", &[("APP_FOO", "from_env")], Ok(json!("from_env")))]
#[case::bare_name_ignored("FOO", &[("FOO", "bare")], Ok(json!("declared")))]
#[case::prefixed_required("NEEDED", &[("APP_NEEDED", "12")], Ok(json!(12)))]
fn test_prefix_governs_lookup(
    #[case] name: &str,
    #[case] pairs: &[(&str, &str)],
    #[case] expected: Result<Value, ()>,
) {
    let config = prefixed("APP_", false);
    let env = map_env(pairs.iter().copied());
    assert_eq!(config.resolve(&env, name).map_err(|_| ()), expected);
}

#[test]
fn test_unknown_and_missing_are_distinct() {
    let config = prefixed("APP_", false);
    let env = map_env([("APP_UNDECLARED", "x")]);

    assert!(matches!(
        config.resolve(&env, "UNDECLARED"),
        Err(Error::UnknownSetting { .. })
    ));
    assert!(matches!(
        config.resolve(&env, "NEEDED"),
        Err(Error::MissingConfiguration { .. })
    ));
}

#[test]
fn test_load_all_makes_any_prefixed_entry_resolvable() {
    let config = prefixed("APP_", true);
    let env = map_env([("APP_UNDECLARED", "x"), ("OTHER", "y")]);

    assert_eq!(config.resolve(&env, "UNDECLARED").unwrap(), json!("x"));
    assert!(matches!(
        config.resolve(&env, "OTHER"),
        Err(Error::UnknownSetting { .. })
    ));
}

#[test]
fn test_factory_return_type_governs_env_override() {
    let config = Config::builder("Returns")
        .factory(
            "WORKERS",
            Factory::new(|_| Ok("4")).returns(BuiltinKind::Int),
        )
        .factory(
            "VERSION",
            Factory::new(|_| Ok("1.0")).returns(BuiltinKind::Str),
        )
        .build()
        .unwrap();

    assert_eq!(config.resolve(&MapEnv::new(), "WORKERS").unwrap(), json!(4));
    assert_eq!(config.resolve(&MapEnv::new(), "VERSION").unwrap(), json!("1.0"));

    let env = map_env([("WORKERS", "16"), ("VERSION", "2.0")]);
    assert_eq!(config.resolve(&env, "WORKERS").unwrap(), json!(16));
    assert_eq!(config.resolve(&env, "VERSION").unwrap(), json!("2.0"));
}

#[test]
fn test_lookup_or_does_not_hide_coercion_errors() {
    let config = Config::builder("Strict")
        .literal("PORT", 80)
        .annotate("PORT", BuiltinKind::Int)
        .build()
        .unwrap();
    let env = map_env([("PORT", "eighty")]);
    let settings = config.settings(&env);

    assert!(matches!(
        settings.lookup_or("PORT", json!(0)),
        Err(Error::Coercion { .. })
    ));
    assert_eq!(settings.lookup_or("MISSING", json!(0)).unwrap(), json!(0));
}

fn setting_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,12}".prop_filter("reserved names are rejected", |name| {
        !figenv::RESERVED_NAMES.contains(&name.as_str())
    })
}

proptest! {
    #[test]
    fn env_always_overrides_a_literal_under_str(name in setting_name(), value in ".*") {
        let config = Config::builder("Override")
            .literal(name.as_str(), "default")
            .annotate(name.as_str(), BuiltinKind::Str)
            .build()
            .unwrap();
        let env = map_env([(name.as_str(), value.as_str())]);

        prop_assert_eq!(config.resolve(&env, &name).unwrap(), json!(value));
    }

    #[test]
    fn strict_factory_ignores_any_env_value(name in setting_name(), value in ".*") {
        let config = Config::builder("Pinned")
            .factory(name.as_str(), Factory::new(|_| Ok("pinned")).strict())
            .build()
            .unwrap();
        let env = map_env([(name.as_str(), value.as_str())]);

        prop_assert_eq!(config.resolve(&env, &name).unwrap(), json!("pinned"));
    }

    #[test]
    fn literal_defaults_keep_their_type(n in any::<i64>(), flag in any::<bool>()) {
        let config = Config::builder("Typed")
            .literal("COUNT", n)
            .literal("FLAG", flag)
            .build()
            .unwrap();
        let env = MapEnv::new();

        prop_assert_eq!(config.resolve(&env, "COUNT").unwrap(), json!(n));
        prop_assert_eq!(config.resolve(&env, "FLAG").unwrap(), json!(flag));
    }
}
