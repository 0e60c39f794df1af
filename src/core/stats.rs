//! # Per-workload accounting: counters and failure history.
//!
//! [`StatisticsStore`] keeps one record per workload name:
//! - activation / deactivation counters
//! - failed restart attempts (host call errors)
//! - last failure wall-clock timestamp
//! - the ordered failure-instant history the sliding-window policy counts
//!
//! ## Rules
//! - **Lazy creation**: an unknown name is never an error; first contact
//!   creates a zeroed record.
//! - **Snapshot reads**: every read returns a fresh [`Statistics`] copy, so
//!   readers never observe a half-updated record.
//! - **Amortized pruning**: [`StatisticsStore::failures_within`] drops
//!   entries older than the window while counting, bounding history growth.
//! - **Half-open window**: a failure exactly `window` old is excluded; the
//!   counted interval is `(now - window, now]`.
//!
//! The store is internally locked and safe to share behind an `Arc`. Poisoned
//! locks are recovered (accounting is plain data; a panicking writer cannot
//! leave it logically torn).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant, SystemTime};

/// Read-only snapshot of one workload's counters.
///
/// Never mutated in place; every query returns a fresh copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statistics {
    /// Workload name.
    pub name: String,
    /// Total recorded activations.
    pub activations: u64,
    /// Total recorded administrative (non-failure) deactivations.
    pub deactivations: u64,
    /// Restart requests the host rejected or failed to carry out.
    pub restart_failures: u64,
    /// Wall-clock time of the most recent recorded failure.
    pub last_failure: Option<SystemTime>,
}

impl Statistics {
    fn zeroed(name: &str) -> Self {
        Self {
            name: name.to_string(),
            activations: 0,
            deactivations: 0,
            restart_failures: 0,
            last_failure: None,
        }
    }
}

/// Mutable per-workload record.
#[derive(Debug, Default)]
struct WorkloadStats {
    activations: u64,
    deactivations: u64,
    restart_failures: u64,
    last_failure: Option<SystemTime>,
    /// Failure instants, append-only, pruned against the window on count.
    failures: Vec<Instant>,
}

impl WorkloadStats {
    /// Drops entries at or beyond `window` age, then counts the rest.
    ///
    /// Entries with an `at` in the future of `now` (clock supplied by the
    /// caller) are kept and counted.
    fn prune_and_count(&mut self, window: Duration, now: Instant) -> u32 {
        self.failures
            .retain(|at| match now.checked_duration_since(*at) {
                Some(age) => age < window,
                None => true,
            });
        self.failures.len().min(u32::MAX as usize) as u32
    }
}

#[derive(Debug, Default)]
struct Inner {
    /// First-seen order, so `snapshot_all` stays stable for a process run.
    order: Vec<String>,
    map: HashMap<String, WorkloadStats>,
}

impl Inner {
    fn entry(&mut self, name: &str) -> &mut WorkloadStats {
        if !self.map.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.map.entry(name.to_string()).or_default()
    }

    fn snapshot(&self, name: &str) -> Statistics {
        match self.map.get(name) {
            Some(ws) => Statistics {
                name: name.to_string(),
                activations: ws.activations,
                deactivations: ws.deactivations,
                restart_failures: ws.restart_failures,
                last_failure: ws.last_failure,
            },
            None => Statistics::zeroed(name),
        }
    }
}

/// Thread-safe store of per-workload counters and failure history.
#[derive(Debug, Default)]
pub struct StatisticsStore {
    inner: Mutex<Inner>,
}

impl StatisticsStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records one activation for `name` (creating the record if needed).
    pub fn record_activation(&self, name: &str) {
        self.lock().entry(name).activations += 1;
    }

    /// Records one administrative deactivation for `name`.
    pub fn record_deactivation(&self, name: &str) {
        self.lock().entry(name).deactivations += 1;
    }

    /// Records one failure for `name` at the given instant.
    pub fn record_failure(&self, name: &str, at: Instant) {
        let mut inner = self.lock();
        let ws = inner.entry(name);
        ws.failures.push(at);
        ws.last_failure = Some(SystemTime::now());
    }

    /// Records a restart request the host failed to carry out.
    ///
    /// Kept separate from the failure history: the crash already happened
    /// independently of whether the restart call succeeded, so this never
    /// alters the sliding-window accounting.
    pub fn record_restart_failure(&self, name: &str) {
        self.lock().entry(name).restart_failures += 1;
    }

    /// Appends a failure and returns the in-window count, atomically.
    ///
    /// One lock acquisition spans record and count, so a concurrent writer
    /// for the same name cannot interleave between the two.
    pub fn record_failure_counting(&self, name: &str, at: Instant, window: Duration) -> u32 {
        let mut inner = self.lock();
        let ws = inner.entry(name);
        ws.failures.push(at);
        ws.last_failure = Some(SystemTime::now());
        ws.prune_and_count(window, at)
    }

    /// Counts failures in `(now - window, now]`, pruning older entries.
    ///
    /// Unknown names count zero.
    pub fn failures_within(&self, name: &str, window: Duration, now: Instant) -> u32 {
        let mut inner = self.lock();
        match inner.map.get_mut(name) {
            Some(ws) => ws.prune_and_count(window, now),
            None => 0,
        }
    }

    /// Returns a point-in-time copy of `name`'s counters.
    ///
    /// A never-seen name yields zero counters and no last failure; this is
    /// part of the contract, not an error case.
    pub fn snapshot(&self, name: &str) -> Statistics {
        self.lock().snapshot(name)
    }

    /// Returns snapshots for every known workload, in first-seen order.
    pub fn snapshot_all(&self) -> Vec<Statistics> {
        let inner = self.lock();
        inner.order.iter().map(|n| inner.snapshot(n)).collect()
    }

    /// Clears counters and failure history for `name`.
    ///
    /// Returns the pre-reset snapshot. A subsequent [`snapshot`] observes
    /// zero values. Unknown names are a no-op returning zeros.
    ///
    /// [`snapshot`]: StatisticsStore::snapshot
    pub fn reset(&self, name: &str) -> Statistics {
        let mut inner = self.lock();
        let before = inner.snapshot(name);
        if let Some(ws) = inner.map.get_mut(name) {
            *ws = WorkloadStats::default();
        }
        before
    }
}
