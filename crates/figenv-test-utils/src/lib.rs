//! Shared test utilities for the figenv workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not
//! each re-declare the same configurations. It is a dev-dependency only,
//! never published.
//!
//! # Modules
//!
//! - [`env`]: synthetic environments and a scoped process-environment guard
//! - [`fixtures`]: sample declarations and custom coercers

pub mod env;
pub mod fixtures;
