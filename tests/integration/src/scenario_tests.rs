//! End-to-end scenarios across the figenv crates
//!
//! Each test declares a realistic layered configuration, binds it to a
//! synthetic environment and checks what an application would observe.

use std::error::Error as _;
use std::sync::Arc;

use figenv::{BuiltinKind, Config, Error, Factory, MapEnv, Source, TypeTag};
use figenv_test_utils::env::map_env;
use figenv_test_utils::fixtures::{child_config, parent_config, role_coercer};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn base_config() -> Config {
    Config::builder("Base")
        .env_prefix("SVC_")
        .literal("HOST", "localhost")
        .literal("PORT", 8080)
        .literal("DEBUG", false)
        .factory(
            "DATABASE_URL",
            Factory::new(|cfg| Ok(format!("postgres://{}/app", cfg.resolve_string("HOST")?))),
        )
        .build()
        .unwrap()
}

fn staging_config(base: &Config) -> Config {
    Config::builder("Staging")
        .inherit(base)
        .literal("HOST", "staging.internal")
        .required("API_TOKEN", Some(BuiltinKind::Str.into()))
        .factory("BUILD", Factory::new(|_| Ok("release")).strict())
        .build()
        .unwrap()
}

fn staging_env() -> MapEnv {
    map_env([
        ("SVC_PORT", "9000"),
        ("SVC_DEBUG", "TRUE"),
        ("SVC_API_TOKEN", "12345"),
        ("SVC_BUILD", "debug"),
        ("PORT", "1"),
    ])
}

#[test]
fn test_layered_service_configuration() {
    let base = base_config();
    let staging = staging_config(&base);
    let env = staging_env();
    let settings = staging.settings(&env);

    assert_eq!(
        settings.keys(),
        vec!["HOST", "PORT", "DEBUG", "DATABASE_URL", "API_TOKEN", "BUILD"]
    );
    assert_eq!(
        Value::Object(settings.to_map().unwrap()),
        json!({
            "HOST": "staging.internal",
            "PORT": 9000,
            "DEBUG": true,
            "DATABASE_URL": "postgres://staging.internal/app",
            "API_TOKEN": "12345",
            "BUILD": "release",
        })
    );
}

#[test]
fn test_inherited_factory_sees_the_inheriting_declaration() {
    let base = base_config();
    let staging = staging_config(&base);
    let env = MapEnv::new();

    assert_eq!(
        base.resolve(&env, "DATABASE_URL").unwrap(),
        json!("postgres://localhost/app")
    );
    assert_eq!(
        staging.resolve(&env, "DATABASE_URL").unwrap(),
        json!("postgres://staging.internal/app")
    );

    // The environment reaches the factory through its dependencies too
    let env = map_env([("SVC_HOST", "db.example.com")]);
    assert_eq!(
        staging.resolve(&env, "DATABASE_URL").unwrap(),
        json!("postgres://db.example.com/app")
    );
}

#[test]
fn test_provenance_of_every_setting() {
    let base = base_config();
    let staging = staging_config(&base);
    let env = staging_env();

    let sources: Vec<(String, Source)> = staging
        .settings(&env)
        .resolve_all()
        .into_iter()
        .map(|(name, result)| (name, result.unwrap().source))
        .collect();

    assert_eq!(
        sources,
        vec![
            ("HOST".to_string(), Source::Default),
            ("PORT".to_string(), Source::Environment),
            ("DEBUG".to_string(), Source::Environment),
            ("DATABASE_URL".to_string(), Source::Factory),
            ("API_TOKEN".to_string(), Source::Environment),
            ("BUILD".to_string(), Source::Factory),
        ]
    );
}

#[test]
fn test_missing_required_setting_is_reported_through_lookup() {
    let base = base_config();
    let staging = staging_config(&base);
    let env = MapEnv::new();
    let settings = staging.settings(&env);

    let err = settings.lookup("API_TOKEN").unwrap_err();
    assert_eq!(err.to_string(), "Setting not found: API_TOKEN");
    let source = err.source().unwrap();
    assert_eq!(
        source.to_string(),
        "Configuration 'API_TOKEN' is not present in environment"
    );

    assert_eq!(
        settings.lookup_or("API_TOKEN", json!("anonymous")).unwrap(),
        json!("anonymous")
    );
    assert!(!settings.contains("API_TOKEN").unwrap());
    assert!(settings.to_map().is_err());
}

#[test]
fn test_factory_can_report_its_own_missing_message() {
    let config = Config::builder("Secrets")
        .factory(
            "SECRET",
            Factory::new(|cfg| match cfg.env().get("VAULT_SECRET") {
                Some(secret) => Ok(secret),
                None => Err(Error::missing_with_message(
                    "SECRET",
                    "SECRET must be provisioned through VAULT_SECRET",
                )),
            }),
        )
        .build()
        .unwrap();

    let err = config.resolve(&MapEnv::new(), "SECRET").unwrap_err();
    assert_eq!(err.to_string(), "SECRET must be provisioned through VAULT_SECRET");

    let env = map_env([("VAULT_SECRET", "hunter2")]);
    assert_eq!(config.resolve(&env, "SECRET").unwrap(), json!("hunter2"));
}

#[test]
fn test_declarations_stay_immutable() {
    let parent = parent_config();
    let env = MapEnv::new();

    let err = parent.assign("CLASS", "changed").unwrap_err();
    assert!(matches!(err, Error::ImmutableDeclaration { .. }));
    assert_eq!(parent.resolve(&env, "CLASS").unwrap(), json!("parent"));

    // Overriding goes through the environment instead
    let env = map_env([("CLASS", "from_env")]);
    assert_eq!(parent.resolve(&env, "CLASS").unwrap(), json!("from_env"));
}

#[test]
fn test_parent_and_child_resolve_independently() {
    let parent = parent_config();
    let child = child_config(&parent);
    let env = map_env([("SECONDARY", "overridden")]);

    assert_eq!(parent.resolve(&env, "CLASS").unwrap(), json!("parent"));
    assert_eq!(child.resolve(&env, "CLASS").unwrap(), json!("child"));
    assert_eq!(parent.resolve(&env, "SECONDARY").unwrap(), json!("overridden"));
    assert_eq!(child.resolve(&env, "SECONDARY").unwrap(), json!("overridden"));
}

#[test]
fn test_named_types_share_a_declaration_coercer() {
    let base = Config::builder("Accounts")
        .coercer("Role", role_coercer)
        .build()
        .unwrap();
    let accounts = Config::builder("Team")
        .inherit(&base)
        .annotate("OWNER", TypeTag::named("Role"))
        .annotate("MEMBER", TypeTag::named("role"))
        .build()
        .unwrap();

    let env = map_env([("OWNER", "ADMIN"), ("MEMBER", "someone")]);
    assert_eq!(accounts.resolve(&env, "OWNER").unwrap(), json!("admin"));
    assert_eq!(accounts.resolve(&env, "MEMBER").unwrap(), json!("user"));
}

#[test]
fn test_shared_declaration_across_threads() {
    let base = base_config();
    let staging = Arc::new(staging_config(&base));
    let env = Arc::new(staging_env());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let staging = Arc::clone(&staging);
            let env = Arc::clone(&env);
            std::thread::spawn(move || staging.resolve(env.as_ref(), "DATABASE_URL"))
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.join().unwrap().unwrap(),
            json!("postgres://staging.internal/app")
        );
    }
}
