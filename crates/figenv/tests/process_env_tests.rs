//! Tests resolving against the live process environment
//!
//! Every test here mutates the process environment through `ScopedEnv`,
//! which serialises access. Variable names are prefixed to avoid clashing
//! with anything the test runner inherits.

use figenv::{Config, EnvSource, MapEnv, StdEnv};
use figenv_test_utils::env::ScopedEnv;
use serde_json::json;

fn config() -> Config {
    Config::builder("Process")
        .env_prefix("FIGENV_PT_")
        .literal("DEFAULT_SETTING", "set_in_class")
        .build()
        .unwrap()
}

#[test]
fn test_std_env_changes_are_observed_immediately() {
    let config = config();

    {
        let _env = ScopedEnv::set([("FIGENV_PT_DEFAULT_SETTING", "set_by_env")]);
        assert_eq!(
            config.resolve(&StdEnv, "DEFAULT_SETTING").unwrap(),
            json!("set_by_env")
        );
    }

    let _quiet = ScopedEnv::lock();
    assert_eq!(
        config.resolve(&StdEnv, "DEFAULT_SETTING").unwrap(),
        json!("set_in_class")
    );
}

#[test]
fn test_snapshot_is_isolated_from_later_changes() {
    let config = config();

    let snapshot = {
        let _env = ScopedEnv::set([("FIGENV_PT_DEFAULT_SETTING", "42")]);
        MapEnv::snapshot()
    };

    let _quiet = ScopedEnv::lock();
    assert_eq!(
        snapshot.get("FIGENV_PT_DEFAULT_SETTING").as_deref(),
        Some("42")
    );
    assert_eq!(
        config.resolve(&snapshot, "DEFAULT_SETTING").unwrap(),
        json!(42)
    );
    assert_eq!(
        config.resolve(&StdEnv, "DEFAULT_SETTING").unwrap(),
        json!("set_in_class")
    );
}

#[test]
fn test_scoped_env_restores_previous_value() {
    let guard = ScopedEnv::set([("FIGENV_PT_RESTORE", "outer")]);
    assert!(StdEnv.contains("FIGENV_PT_RESTORE"));
    drop(guard);
    assert!(!StdEnv.contains("FIGENV_PT_RESTORE"));
}
