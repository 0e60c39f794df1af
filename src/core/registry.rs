//! # Observable registry: the name → watch-config map.
//!
//! [`ObservableRegistry`] holds the set of workloads declared at startup and
//! their restart budgets. The set of *names* is fixed for the supervisor's
//! lifetime; only the window/limit tuple of an existing entry can be
//! replaced, via the administrative update path.
//!
//! ## Rules
//! - [`load`](ObservableRegistry::load) replaces the whole set and is the
//!   single validation point: duplicate names, `limit == 0` or zero windows
//!   are rejected with `InvalidConfig` (fatal to supervisor construction).
//! - [`update`](ObservableRegistry::update) refuses names that were not part
//!   of the original load (`UnknownWorkload`); it cannot introduce a new
//!   watched workload at runtime.
//! - Reads return copies; the map lock is never held across caller code.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use crate::core::config::WatchConfig;
use crate::error::SupervisorError;

/// Thread-safe map of watched workloads and their restart budgets.
#[derive(Debug, Default)]
pub struct ObservableRegistry {
    entries: RwLock<HashMap<String, WatchConfig>>,
}

impl ObservableRegistry {
    /// Creates an empty registry; populate it with [`load`].
    ///
    /// [`load`]: ObservableRegistry::load
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire watch set from the startup configuration.
    ///
    /// Rejects duplicate names and entries violating `limit >= 1` /
    /// `window > 0`. On error the previous set is left untouched.
    pub fn load(&self, entries: Vec<WatchConfig>) -> Result<(), SupervisorError> {
        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            entry.validate()?;
            if map.insert(entry.name.clone(), entry.clone()).is_some() {
                return Err(SupervisorError::InvalidConfig {
                    reason: format!("duplicate workload {:?} in watch list", entry.name),
                });
            }
        }

        let mut guard = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = map;
        Ok(())
    }

    /// Returns the current watch config for `name`, if declared.
    pub fn get(&self, name: &str) -> Option<WatchConfig> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Atomically replaces the window/limit tuple of a declared workload.
    ///
    /// Fails with [`SupervisorError::UnknownWorkload`] for names that were
    /// not part of the original load, and with `InvalidConfig` for a zero
    /// window or limit. The `observe` flag is preserved.
    pub fn update(&self, name: &str, window: Duration, limit: u32) -> Result<(), SupervisorError> {
        let mut guard = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let entry = guard
            .get_mut(name)
            .ok_or_else(|| SupervisorError::UnknownWorkload {
                name: name.to_string(),
            })?;

        let replacement = WatchConfig {
            name: entry.name.clone(),
            window,
            limit,
            observe: entry.observe,
        };
        replacement.validate()?;
        *entry = replacement;
        Ok(())
    }

    /// Returns all watched names, sorted for stable output.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort_unstable();
        names
    }
}
