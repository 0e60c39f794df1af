//! # watchvisor
//!
//! **Watchvisor** is a process supervision core: it watches a configured set
//! of named workloads, records their activation/deactivation/failure events,
//! and decides — using a sliding time-window restart-rate policy — whether a
//! failed workload should be restarted, left alone, or permanently
//! deactivated until an operator resets it.
//!
//! It does not run workloads itself. Lifecycle events are pushed in by a
//! *host runtime* (the platform that owns the workloads), and the one thing
//! watchvisor asks back of the host is "restart this one". Transport,
//! serialization endpoints and platform property querying are adapter
//! concerns layered on top.
//!
//! ## Architecture
//! ```text
//!   Host runtime                          Administrative callers
//!     │ on_activated / on_deactivated       │ observables / statistics
//!     ▼                                     ▼ restart_limits / reset
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Supervisor                                                  │
//! │  ├─ ObservableRegistry   name → {window, limit, observe}    │
//! │  ├─ StatisticsStore      counters + failure history         │
//! │  ├─ RestartPolicy        count in (now-window, now] vs limit│
//! │  └─ exhausted markers    budget spent → down until reset    │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │ Restart                      │ ActionEvent
//!                ▼                              ▼
//!         HostRuntime::request_restart    NotificationBus ─► observers
//! ```
//!
//! ## Decision rule
//! With `limit = L` and `window = W`, the in-window failure count `n`
//! (including the failure being decided) yields:
//! - `n <= L` → [`Action::Restart`] — ask the host to restart;
//! - `n > L`  → [`Action::Exhausted`] — mark the workload down; no further
//!   auto-restarts until [`Supervisor::reset`];
//! - watch flag off → [`Action::NoAction`].
//!
//! The window is half-open: a failure exactly `W` old is outside it.
//!
//! ## Features
//! | Area            | Description                                          | Key types / traits                      |
//! |-----------------|------------------------------------------------------|-----------------------------------------|
//! | **Supervision** | Ingest lifecycle events, decide restarts.            | [`Supervisor`]                          |
//! | **Policy**      | Sliding-window failure budget.                       | [`RestartPolicy`], [`Action`]           |
//! | **Accounting**  | Per-workload counters and failure history.           | [`StatisticsStore`], [`Statistics`]     |
//! | **Watch list**  | Per-workload limits, administrative updates.         | [`ObservableRegistry`], [`WatchConfig`] |
//! | **Observers**   | Synchronous fan-out of decisions.                    | [`Observe`], [`NotificationBus`]        |
//! | **Host seam**   | The restart callback into the platform.              | [`HostRuntime`], [`HostError`]          |
//! | **Errors**      | Typed errors for configuration and admin calls.      | [`SupervisorError`]                     |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] observer
//!   _(demo/reference only)_.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use async_trait::async_trait;
//! use watchvisor::{HostError, HostRuntime, Supervisor, WatchConfig};
//!
//! struct Platform;
//!
//! #[async_trait]
//! impl HostRuntime for Platform {
//!     async fn request_restart(&self, name: &str) -> Result<(), HostError> {
//!         println!("restarting {name}");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let watch = vec![WatchConfig::new("webserver", Duration::from_secs(60), 3)];
//!     let sup = Supervisor::new(Arc::new(Platform), watch)?;
//!
//!     // Wire these calls to the host's lifecycle notifications:
//!     sup.on_activated("webserver");
//!     sup.on_deactivated("webserver", "failure").await; // → restart requested
//!     sup.on_deactivated("webserver", "requested").await; // operator stop, no policy
//!
//!     println!("{:?}", sup.statistics("webserver"));
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod host;
mod observers;
mod policies;

// ---- Public re-exports ----

pub use crate::core::{
    Config, FailureClassifier, ObservableRegistry, Statistics, StatisticsStore, Supervisor,
    WatchConfig,
};
pub use crate::error::{HostError, SupervisorError};
pub use crate::events::{ActionEvent, NotificationBus};
pub use crate::host::HostRuntime;
pub use crate::observers::Observe;
pub use crate::policies::{Action, RestartPolicy};

// Optional: expose a simple built-in logging observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use crate::observers::LogWriter;
