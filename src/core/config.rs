//! # Watch configuration.
//!
//! Provides [`WatchConfig`], the per-workload restart budget, and [`Config`],
//! the startup watch list consumed from the configuration source.
//!
//! Config is used in two ways:
//! 1. **Supervisor creation**: `Supervisor::new(host, config.observables)`
//! 2. **Administrative reads**: `Supervisor::restart_limits(name)` returns
//!    the current tuple for one workload.
//!
//! ## Field semantics
//! - `window`: sliding time span over which failures are counted
//! - `limit`: max failures tolerated inside `window` before the workload is
//!   considered unrecoverable
//! - `observe`: watch flag; `false` keeps the entry but disables the policy
//!
//! Invariants (`limit >= 1`, `window > 0`) are enforced by
//! [`ObservableRegistry::load`](crate::ObservableRegistry::load), not here:
//! deserialization only maps fields.
//!
//! ## Wire format
//! The startup list is an ordered JSON array:
//! ```json
//! { "observables": [
//!     { "name": "webserver", "window_secs": 60, "limit": 3 },
//!     { "name": "player", "window_secs": 120, "limit": 5, "observe": false }
//! ] }
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::SupervisorError;

/// Restart budget for one watched workload.
///
/// Created from configuration at startup; replaced atomically per-name by
/// the administrative set-restart-limits operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchConfig {
    /// Workload name (opaque, host-supplied, unique).
    pub name: String,
    /// Sliding window over which failures are counted.
    pub window: Duration,
    /// Max failures permitted inside `window`.
    pub limit: u32,
    /// Whether the policy is consulted for this workload.
    pub observe: bool,
}

impl WatchConfig {
    /// Creates a watched entry with the given budget.
    pub fn new(name: impl Into<String>, window: Duration, limit: u32) -> Self {
        Self {
            name: name.into(),
            window,
            limit,
            observe: true,
        }
    }

    /// Checks the `limit >= 1` / `window > 0` invariants.
    pub(crate) fn validate(&self) -> Result<(), SupervisorError> {
        if self.limit == 0 {
            return Err(SupervisorError::InvalidConfig {
                reason: format!("workload {:?}: limit must be >= 1", self.name),
            });
        }
        if self.window.is_zero() {
            return Err(SupervisorError::InvalidConfig {
                reason: format!("workload {:?}: window must be > 0", self.name),
            });
        }
        Ok(())
    }
}

/// Raw JSON shape of one watch entry.
#[derive(Debug, Deserialize)]
struct RawEntry {
    name: String,
    window_secs: u64,
    limit: u32,
    #[serde(default = "default_observe")]
    observe: bool,
}

fn default_observe() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    observables: Vec<RawEntry>,
}

/// Startup configuration: the ordered watch list.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Watch entries in configuration order.
    pub observables: Vec<WatchConfig>,
}

impl Config {
    /// Parses the startup watch list from its JSON form.
    ///
    /// Shape errors surface as [`SupervisorError::InvalidConfig`]; invariant
    /// violations (zero limit/window, duplicate names) are caught later by
    /// the registry load, which is the single validation point.
    pub fn from_json(raw: &str) -> Result<Self, SupervisorError> {
        let parsed: RawConfig =
            serde_json::from_str(raw).map_err(|e| SupervisorError::InvalidConfig {
                reason: format!("malformed watch list: {e}"),
            })?;

        let observables = parsed
            .observables
            .into_iter()
            .map(|raw| WatchConfig {
                name: raw.name,
                window: Duration::from_secs(raw.window_secs),
                limit: raw.limit,
                observe: raw.observe,
            })
            .collect();

        Ok(Self { observables })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_maps_fields() {
        let cfg = Config::from_json(
            r#"{ "observables": [
                { "name": "webserver", "window_secs": 60, "limit": 3 },
                { "name": "player", "window_secs": 120, "limit": 5, "observe": false }
            ] }"#,
        )
        .expect("valid config");

        assert_eq!(cfg.observables.len(), 2);
        assert_eq!(cfg.observables[0].name, "webserver");
        assert_eq!(cfg.observables[0].window, Duration::from_secs(60));
        assert_eq!(cfg.observables[0].limit, 3);
        assert!(cfg.observables[0].observe);
        assert!(!cfg.observables[1].observe);
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        let err = Config::from_json("{ not json").expect_err("must fail");
        assert_eq!(err.as_label(), "invalid_config");
    }

    #[test]
    fn test_validate_rejects_zero_limit_and_window() {
        let zero_limit = WatchConfig::new("a", Duration::from_secs(1), 0);
        assert!(zero_limit.validate().is_err());

        let zero_window = WatchConfig::new("a", Duration::ZERO, 1);
        assert!(zero_window.validate().is_err());

        let ok = WatchConfig::new("a", Duration::from_secs(1), 1);
        assert!(ok.validate().is_ok());
    }
}
