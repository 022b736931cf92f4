//! Environment-backed configuration declarations
//!
//! `figenv` resolves named settings from declared defaults and environment
//! variables, coercing environment strings into typed values.
//!
//! - **Declarations**: [`ConfigBuilder`] merges ancestor declarations and the
//!   declaration's own entries into an immutable [`Config`]
//! - **Resolution**: [`Resolver`] applies the precedence environment >
//!   factory > literal, honouring `ENV_PREFIX`, `ENV_LOAD_ALL` and strict
//!   factories
//! - **Coercion**: [`coerce`] converts strings by annotation ([`TypeTag`]) or
//!   by the shape of the string
//! - **Facade**: [`Settings`] offers iteration and mapping-style lookup
//!
//! The environment is always passed in as an [`EnvSource`]. Use [`StdEnv`]
//! for the live process environment, or [`MapEnv::snapshot`] for a stable
//! copy when several settings must agree.
//!
//! # Example
//!
//! ```
//! use figenv::{BuiltinKind, Config, Factory, MapEnv};
//! use serde_json::json;
//!
//! let config = Config::builder("Service")
//!     .env_prefix("SVC_")
//!     .literal("DEBUG", false)
//!     .literal("WORKERS", 4)
//!     .annotate("TAGS", BuiltinKind::List)
//!     .factory("BANNER", Factory::new(|cfg| {
//!         Ok(format!("workers={}", cfg.resolve_string("WORKERS")?))
//!     }).strict())
//!     .build()
//!     .unwrap();
//!
//! let env = MapEnv::from_pairs([
//!     ("SVC_DEBUG", "true"),
//!     ("SVC_WORKERS", "8"),
//!     ("SVC_TAGS", r#"["a", "b"]"#),
//!     ("SVC_BANNER", "ignored"),
//! ]);
//!
//! assert_eq!(config.resolve(&env, "DEBUG").unwrap(), json!(true));
//! assert_eq!(config.resolve(&env, "WORKERS").unwrap(), json!(8));
//! assert_eq!(config.resolve(&env, "TAGS").unwrap(), json!(["a", "b"]));
//! assert_eq!(config.resolve(&env, "BANNER").unwrap(), json!("workers=8"));
//! ```

pub mod coerce;
pub mod declaration;
pub mod definition;
pub mod env;
pub mod error;
pub mod resolver;
pub mod settings;

pub use coerce::{BuiltinKind, Coerce, TypeTag};
pub use declaration::{Config, ConfigBuilder, RESERVED_NAMES};
pub use definition::{Factory, MISSING_MARKER, SettingDefinition, SettingValue, strict};
pub use env::{EnvSource, MapEnv, StdEnv};
pub use error::{Error, Result};
pub use resolver::{MAX_FACTORY_DEPTH, Resolved, Resolver, Source, resolve};
pub use settings::{Settings, is_setting_name};
