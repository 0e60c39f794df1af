//! # Sliding-window restart policy.
//!
//! [`RestartPolicy::decide`] answers one question: given a workload that has
//! just failed, should the host be asked to restart it?
//!
//! - [`Action::Restart`] while the in-window failure count is within the
//!   configured limit;
//! - [`Action::Exhausted`] once the count exceeds the limit — the workload
//!   has used up its failure budget and must not be auto-restarted until an
//!   explicit reset;
//! - [`Action::NoAction`] when watching is disabled for the workload.
//!
//! The caller records the failure **before** deciding, so the count already
//! includes the triggering failure. With `limit = L`, the first `L` failures
//! inside any window-length span yield `Restart` and the `(L+1)`-th yields
//! `Exhausted`.
//!
//! Boundary semantics are half-open: a failure exactly `window` old is
//! outside the window (see [`StatisticsStore::failures_within`]).

use std::time::Instant;

use crate::core::{StatisticsStore, WatchConfig};

/// Decision for one failure event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Ask the host to restart the workload.
    Restart,
    /// Failure budget exceeded; leave the workload down until reset.
    Exhausted,
    /// Watching disabled; the policy takes no position.
    NoAction,
}

impl Action {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Action::Restart => "restart",
            Action::Exhausted => "exhausted",
            Action::NoAction => "no_action",
        }
    }
}

/// Sliding-window restart decision.
///
/// Stateless: everything it needs lives in the [`WatchConfig`] and the
/// [`StatisticsStore`].
pub struct RestartPolicy;

impl RestartPolicy {
    /// Decides the action for the current (already recorded) failure.
    ///
    /// Callers normally filter unwatched workloads before getting here, but
    /// the policy tolerates being asked and answers [`Action::NoAction`].
    pub fn decide(cfg: &WatchConfig, store: &StatisticsStore, now: Instant) -> Action {
        if !cfg.observe {
            return Action::NoAction;
        }

        let n = store.failures_within(&cfg.name, cfg.window, now);
        if n <= cfg.limit {
            Action::Restart
        } else {
            Action::Exhausted
        }
    }

    /// Maps an in-window failure count (current failure included) to an
    /// action, without touching the store.
    ///
    /// Used by callers that obtained the count atomically with the record
    /// (see [`StatisticsStore::record_failure_counting`]).
    pub fn from_count(cfg: &WatchConfig, in_window: u32) -> Action {
        if !cfg.observe {
            return Action::NoAction;
        }
        if in_window <= cfg.limit {
            Action::Restart
        } else {
            Action::Exhausted
        }
    }
}
