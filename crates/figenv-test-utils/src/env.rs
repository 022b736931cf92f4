//! Environment fixtures at two realism levels.
//!
//! Prefer [`map_env`]: it never touches the process environment, so tests
//! using it can run in parallel. Use [`ScopedEnv`] only for tests that must
//! go through [`figenv::StdEnv`].

use figenv::MapEnv;
use std::sync::{Mutex, MutexGuard};

/// Builds a synthetic environment from `(name, value)` pairs.
///
/// Realism level: **FAKE**: an owned map, isolated per test.
pub fn map_env<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> MapEnv {
    MapEnv::from_pairs(pairs)
}

static PROCESS_ENV_LOCK: Mutex<()> = Mutex::new(());

/// Sets process environment variables for the lifetime of the guard.
///
/// Realism level: **REAL**: mutates the process environment. Guards are
/// serialised through a global lock; previous values are restored on drop.
/// A lock poisoned by a panicking test is recovered.
pub struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    /// Take the lock without changing anything, for tests that only read.
    pub fn lock() -> Self {
        Self::set(std::iter::empty())
    }

    pub fn set<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let lock = PROCESS_ENV_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut saved = Vec::new();
        for (name, value) in pairs {
            saved.push((name.to_string(), std::env::var(name).ok()));
            // SAFETY: all process-environment mutation in the test suites goes
            // through ScopedEnv, which holds PROCESS_ENV_LOCK.
            unsafe { std::env::set_var(name, value) };
        }

        Self { saved, _lock: lock }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (name, previous) in self.saved.drain(..).rev() {
            // SAFETY: see ScopedEnv::set; the lock is still held here.
            match previous {
                Some(value) => unsafe { std::env::set_var(&name, value) },
                None => unsafe { std::env::remove_var(&name) },
            }
        }
    }
}
