//! Supervision core: configuration, registry, statistics, orchestrator.

mod config;
mod registry;
mod stats;
mod supervisor;

pub use config::{Config, WatchConfig};
pub use registry::ObservableRegistry;
pub use stats::{Statistics, StatisticsStore};
pub use supervisor::{FailureClassifier, Supervisor};
