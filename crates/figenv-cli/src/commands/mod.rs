//! Command implementations for figenv-cli
//!
//! Commands write to a caller-supplied writer and read the environment
//! through an [`figenv::EnvSource`], so they can be exercised without
//! touching the process.

pub mod check;
pub mod declaration;
pub mod set;
pub mod show;

pub use check::run_check;
pub use declaration::build_config;
pub use set::run_set;
pub use show::{run_dump, run_get, run_keys};
