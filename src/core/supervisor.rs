//! # Supervisor: lifecycle ingestion, restart decisions, observer fan-out.
//!
//! The [`Supervisor`] owns the [`ObservableRegistry`], the
//! [`StatisticsStore`], the exhausted markers and the [`NotificationBus`].
//! It ingests workload lifecycle events from the host runtime, consults the
//! [`RestartPolicy`] for failures, asks the host to restart when the budget
//! allows, and multicasts every decision to registered observers.
//!
//! ## High-level architecture
//! ```text
//! Host runtime                       Administrative callers
//!   on_activated(name) ─┐               observables()
//!   on_deactivated(     │               statistics(name)
//!     name, reason) ────┤               restart_limits(name) get/set
//!                       │               reset(name)
//!                       ▼                    │
//! ┌───────────────────────────────────────────────────────────┐
//! │ Supervisor                                                │
//! │   classifier(reason) ── administrative stop? ── record,   │
//! │        │ failure                                done      │
//! │        ▼                                                  │
//! │   ObservableRegistry.get(name) ── absent/off ── emit      │
//! │        │ watched                                NoAction  │
//! │        ▼  (one lock spans record + decide)                │
//! │   StatisticsStore.record_failure_counting(...)            │
//! │   RestartPolicy ──► Restart ──► HostRuntime               │
//! │              └────► Exhausted ─► mark, no host call       │
//! └──────────────┬────────────────────────────────────────────┘
//!                ▼  (locks released)
//!          NotificationBus.emit(ActionEvent) ──► observers
//! ```
//!
//! ## Per-workload states
//! Conceptually `Active / Inactive / Exhausted`. Only the exhausted marker
//! is materialized: it is what keeps a workload down once its failure budget
//! is spent. An activation arriving for an exhausted workload is recorded
//! but does **not** clear the marker; only [`Supervisor::reset`] does. This
//! keeps a persistently crashing workload from masking its own failure
//! history through restart storms.
//!
//! ## Failure semantics
//! Operations on unknown names return empty/zero results instead of errors.
//! The one fatal error is a malformed watch list at construction
//! (`InvalidConfig`). Host restart failures are logged, counted in
//! statistics and surfaced in the emitted event, never retried.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::core::config::WatchConfig;
use crate::core::registry::ObservableRegistry;
use crate::core::stats::{Statistics, StatisticsStore};
use crate::error::SupervisorError;
use crate::events::{ActionEvent, NotificationBus};
use crate::host::HostRuntime;
use crate::observers::Observe;
use crate::policies::{Action, RestartPolicy};

/// Predicate deciding whether a deactivation reason counts as a failure.
///
/// The host classifies deactivations through the free-form `reason` string;
/// which reasons are crashes is deployment-specific, so the predicate is
/// pluggable rather than a hardcoded reason value.
pub type FailureClassifier = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Default classification: an administrative `"requested"` stop is a normal
/// deactivation; every other reason counts as a failure.
fn requested_is_not_a_failure(reason: &str) -> bool {
    !reason.eq_ignore_ascii_case("requested")
}

/// Watches a configured set of workloads and decides restarts.
pub struct Supervisor {
    host: Arc<dyn HostRuntime>,
    registry: ObservableRegistry,
    store: StatisticsStore,
    bus: NotificationBus,
    /// Workloads that spent their failure budget; cleared only by `reset`.
    ///
    /// The lock also serializes record-failure → decide → mark, making that
    /// sequence atomic with respect to other writers.
    exhausted: Mutex<HashSet<String>>,
    is_failure: FailureClassifier,
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor").finish_non_exhaustive()
    }
}

impl Supervisor {
    /// Creates a supervisor over the given watch list.
    ///
    /// The list is validated as a whole; duplicates or zero window/limit
    /// entries abort construction with [`SupervisorError::InvalidConfig`].
    pub fn new(
        host: Arc<dyn HostRuntime>,
        watch: Vec<WatchConfig>,
    ) -> Result<Self, SupervisorError> {
        Self::with_classifier(host, watch, Arc::new(requested_is_not_a_failure))
    }

    /// Creates a supervisor with a custom failure classifier.
    pub fn with_classifier(
        host: Arc<dyn HostRuntime>,
        watch: Vec<WatchConfig>,
        is_failure: FailureClassifier,
    ) -> Result<Self, SupervisorError> {
        let registry = ObservableRegistry::new();
        registry.load(watch)?;

        Ok(Self {
            host,
            registry,
            store: StatisticsStore::new(),
            bus: NotificationBus::new(),
            exhausted: Mutex::new(HashSet::new()),
            is_failure,
        })
    }

    // ---------------------------
    // Lifecycle ingestion
    // ---------------------------

    /// Host callback: `name` became active.
    ///
    /// Records the activation. An exhausted marker, if present, survives:
    /// clearing it requires an explicit [`reset`](Supervisor::reset).
    pub fn on_activated(&self, name: &str) {
        self.store.record_activation(name);
        debug!(workload = name, "activation recorded");
    }

    /// Host callback: `name` was deactivated with the given reason.
    pub async fn on_deactivated(&self, name: &str, reason: &str) {
        self.on_deactivated_at(name, reason, Instant::now()).await;
    }

    /// Same as [`on_deactivated`], with an explicit event instant.
    ///
    /// The instant is the decision's `now`: the window is evaluated against
    /// it, and the decision is final for this event.
    ///
    /// [`on_deactivated`]: Supervisor::on_deactivated
    pub async fn on_deactivated_at(&self, name: &str, reason: &str, at: Instant) {
        if !(self.is_failure)(reason) {
            // Operator stopped it; plain state-change record, no policy.
            self.store.record_deactivation(name);
            debug!(workload = name, reason, "administrative stop recorded");
            return;
        }

        let watched = self.registry.get(name).filter(|cfg| cfg.observe);
        let Some(cfg) = watched else {
            self.store.record_failure(name, at);
            debug!(workload = name, reason, "failure for unwatched workload");
            self.bus
                .emit(&ActionEvent::now(name, Action::NoAction).with_reason(reason));
            return;
        };

        let action = {
            let mut exhausted = self.exhausted.lock().await;
            if exhausted.contains(name) {
                // Budget already spent; keep the history, stay down.
                self.store.record_failure(name, at);
                Action::Exhausted
            } else {
                let in_window = self.store.record_failure_counting(name, at, cfg.window);
                let action = RestartPolicy::from_count(&cfg, in_window);
                if action == Action::Exhausted {
                    exhausted.insert(name.to_string());
                }
                action
            }
        };

        let event = match action {
            Action::Restart => self.request_restart(name, reason).await,
            Action::Exhausted => {
                warn!(workload = name, reason, "failure budget exhausted, leaving down");
                ActionEvent::now(name, Action::Exhausted).with_reason(reason)
            }
            Action::NoAction => return,
        };

        // All internal locks are released before delivery.
        self.bus.emit(&event);
    }

    /// Asks the host to restart `name`; shapes the resulting event.
    async fn request_restart(&self, name: &str, reason: &str) -> ActionEvent {
        match self.host.request_restart(name).await {
            Ok(()) => ActionEvent::now(name, Action::Restart).with_reason(reason),
            Err(err) => {
                // The crash already happened; a failed restart call is
                // surfaced but never alters the window accounting.
                self.store.record_restart_failure(name);
                let failure = SupervisorError::HostCallFailed {
                    name: name.to_string(),
                    reason: err.to_string(),
                };
                warn!(workload = name, error = %failure, "restart request failed");
                ActionEvent::now(name, Action::Restart)
                    .with_reason(format!("{reason}; restart request failed: {err}"))
            }
        }
    }

    // ---------------------------
    // Administrative surface
    // ---------------------------

    /// Clears `name`'s exhausted marker and failure history.
    ///
    /// Returns the pre-reset statistics snapshot; subsequent failures are
    /// evaluated against a fresh budget. Unknown names are a no-op.
    pub async fn reset(&self, name: &str) -> Statistics {
        self.exhausted.lock().await.remove(name);
        self.store.reset(name)
    }

    /// All currently watched workload names.
    pub fn observables(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Point-in-time statistics for `name` (zeroed if never seen).
    pub fn statistics(&self, name: &str) -> Statistics {
        self.store.snapshot(name)
    }

    /// Statistics for every workload known to the store.
    pub fn statistics_all(&self) -> Vec<Statistics> {
        self.store.snapshot_all()
    }

    /// Current restart limits for `name`, if declared.
    pub fn restart_limits(&self, name: &str) -> Option<WatchConfig> {
        self.registry.get(name)
    }

    /// Replaces the window/limit tuple of a declared workload.
    pub fn set_restart_limits(
        &self,
        name: &str,
        window: Duration,
        limit: u32,
    ) -> Result<(), SupervisorError> {
        self.registry.update(name, window, limit)
    }

    /// Whether `name` has spent its failure budget.
    pub async fn is_exhausted(&self, name: &str) -> bool {
        self.exhausted.lock().await.contains(name)
    }

    /// Registers an observer for action notifications (identity set).
    pub fn register_observer(&self, observer: Arc<dyn Observe>) {
        self.bus.register(observer);
    }

    /// Unregisters an observer by identity.
    pub fn unregister_observer(&self, observer: &Arc<dyn Observe>) {
        self.bus.unregister(observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex as StdMutex;

    /// Host stub recording restart requests; can be switched to fail.
    struct StubHost {
        calls: StdMutex<Vec<String>>,
        fail: AtomicBool,
    }

    impl StubHost {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: StdMutex::new(Vec::new()),
                fail: AtomicBool::new(false),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("stub lock").clone()
        }
    }

    #[async_trait]
    impl HostRuntime for StubHost {
        async fn request_restart(&self, name: &str) -> Result<(), HostError> {
            self.calls.lock().expect("stub lock").push(name.to_string());
            if self.fail.load(Ordering::SeqCst) {
                Err(HostError::new("platform unavailable"))
            } else {
                Ok(())
            }
        }
    }

    /// Observer stub collecting delivered events.
    struct Collector {
        events: StdMutex<Vec<ActionEvent>>,
    }

    impl Collector {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                events: StdMutex::new(Vec::new()),
            })
        }

        fn actions(&self) -> Vec<Action> {
            self.events
                .lock()
                .expect("collector lock")
                .iter()
                .map(|e| e.action)
                .collect()
        }
    }

    impl Observe for Collector {
        fn on_action(&self, event: &ActionEvent) {
            self.events.lock().expect("collector lock").push(event.clone());
        }
    }

    fn watch(name: &str, window_secs: u64, limit: u32) -> WatchConfig {
        WatchConfig::new(name, Duration::from_secs(window_secs), limit)
    }

    fn supervisor(host: Arc<StubHost>, watch_list: Vec<WatchConfig>) -> Supervisor {
        Supervisor::new(host, watch_list).expect("valid watch list")
    }

    #[test]
    fn test_construction_rejects_invalid_watch_list() {
        let host = StubHost::new();
        let err = Supervisor::new(host, vec![watch("a", 0, 1)]).expect_err("zero window");
        assert_eq!(err.as_label(), "invalid_config");
    }

    #[tokio::test]
    async fn test_crash_within_budget_requests_restart() {
        let host = StubHost::new();
        let sup = supervisor(host.clone(), vec![watch("app", 60, 2)]);
        let obs = Collector::new();
        sup.register_observer(obs.clone());

        sup.on_activated("app");
        sup.on_deactivated("app", "failure").await;

        assert_eq!(host.calls(), vec!["app"]);
        assert_eq!(obs.actions(), vec![Action::Restart]);
        assert!(!sup.is_exhausted("app").await);
    }

    #[tokio::test]
    async fn test_requested_stop_skips_policy() {
        let host = StubHost::new();
        let sup = supervisor(host.clone(), vec![watch("app", 60, 2)]);
        let obs = Collector::new();
        sup.register_observer(obs.clone());

        sup.on_deactivated("app", "requested").await;

        assert!(host.calls().is_empty());
        assert!(obs.actions().is_empty());
        assert_eq!(sup.statistics("app").deactivations, 1);
    }

    #[tokio::test]
    async fn test_unwatched_failure_emits_no_action() {
        let host = StubHost::new();
        let sup = supervisor(host.clone(), vec![watch("app", 60, 2)]);
        let obs = Collector::new();
        sup.register_observer(obs.clone());

        sup.on_deactivated("stranger", "failure").await;

        assert!(host.calls().is_empty());
        assert_eq!(obs.actions(), vec![Action::NoAction]);
        assert!(sup.statistics("stranger").last_failure.is_some());
    }

    #[tokio::test]
    async fn test_watch_disabled_emits_no_action() {
        let host = StubHost::new();
        let mut entry = watch("app", 60, 2);
        entry.observe = false;
        let sup = supervisor(host.clone(), vec![entry]);
        let obs = Collector::new();
        sup.register_observer(obs.clone());

        sup.on_deactivated("app", "failure").await;

        assert!(host.calls().is_empty());
        assert_eq!(obs.actions(), vec![Action::NoAction]);
    }

    #[tokio::test]
    async fn test_budget_exhaustion_marks_and_stops_restarting() {
        let host = StubHost::new();
        let sup = supervisor(host.clone(), vec![watch("app", 60, 2)]);
        let obs = Collector::new();
        sup.register_observer(obs.clone());

        let t0 = Instant::now();
        sup.on_deactivated_at("app", "failure", t0).await;
        sup.on_deactivated_at("app", "failure", t0 + Duration::from_secs(10))
            .await;
        sup.on_deactivated_at("app", "failure", t0 + Duration::from_secs(20))
            .await;

        assert_eq!(host.calls().len(), 2);
        assert_eq!(
            obs.actions(),
            vec![Action::Restart, Action::Restart, Action::Exhausted]
        );
        assert!(sup.is_exhausted("app").await);

        // Further failures stay down without re-deciding.
        sup.on_deactivated_at("app", "failure", t0 + Duration::from_secs(21))
            .await;
        assert_eq!(host.calls().len(), 2);
        assert_eq!(obs.actions().last(), Some(&Action::Exhausted));
    }

    #[tokio::test]
    async fn test_activation_does_not_clear_exhausted_marker() {
        let host = StubHost::new();
        let sup = supervisor(host.clone(), vec![watch("app", 60, 1)]);

        let t0 = Instant::now();
        sup.on_deactivated_at("app", "failure", t0).await;
        sup.on_deactivated_at("app", "failure", t0 + Duration::from_secs(1))
            .await;
        assert!(sup.is_exhausted("app").await);

        sup.on_activated("app");
        assert!(sup.is_exhausted("app").await);
        assert_eq!(sup.statistics("app").activations, 1);
    }

    #[tokio::test]
    async fn test_reset_restores_restart_eligibility() {
        let host = StubHost::new();
        let sup = supervisor(host.clone(), vec![watch("app", 60, 1)]);

        let t0 = Instant::now();
        sup.on_deactivated_at("app", "failure", t0).await;
        sup.on_deactivated_at("app", "failure", t0 + Duration::from_secs(1))
            .await;
        assert!(sup.is_exhausted("app").await);

        let before = sup.reset("app").await;
        assert!(before.last_failure.is_some());
        assert!(!sup.is_exhausted("app").await);
        assert_eq!(sup.statistics("app").last_failure, None);

        sup.on_deactivated_at("app", "failure", t0 + Duration::from_secs(2))
            .await;
        assert_eq!(host.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_host_call_failure_is_counted_and_surfaced() {
        let host = StubHost::new();
        host.fail.store(true, Ordering::SeqCst);
        let sup = supervisor(host.clone(), vec![watch("app", 60, 2)]);
        let obs = Collector::new();
        sup.register_observer(obs.clone());

        sup.on_deactivated("app", "failure").await;

        assert_eq!(sup.statistics("app").restart_failures, 1);
        let events = obs.events.lock().expect("collector lock");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, Action::Restart);
        let reason = events[0].reason.as_deref().expect("reason attached");
        assert!(reason.contains("restart request failed"));
    }

    #[tokio::test]
    async fn test_set_restart_limits_unknown_name() {
        let host = StubHost::new();
        let sup = supervisor(host, vec![watch("app", 60, 2)]);

        let err = sup
            .set_restart_limits("ghost", Duration::from_secs(10), 1)
            .expect_err("undeclared");
        assert_eq!(err.as_label(), "unknown_workload");
        assert_eq!(sup.observables(), vec!["app"]);
    }

    #[tokio::test]
    async fn test_custom_classifier() {
        let host = StubHost::new();
        let sup = Supervisor::with_classifier(
            host.clone(),
            vec![watch("app", 60, 2)],
            Arc::new(|reason: &str| reason == "crash"),
        )
        .expect("valid watch list");

        sup.on_deactivated("app", "stopped-for-upgrade").await;
        assert!(host.calls().is_empty());

        sup.on_deactivated("app", "crash").await;
        assert_eq!(host.calls(), vec!["app"]);
    }
}
