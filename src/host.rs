//! # Host runtime seam.
//!
//! The supervisor decides *whether* a workload should be restarted; carrying
//! the restart out belongs to the platform hosting the workloads. This
//! module defines that boundary.
//!
//! A non-success result from [`HostRuntime::request_restart`] is logged and
//! recorded as a failed restart attempt, never retried: the only retry
//! mechanism is the window/limit budget itself, consumed by the next
//! failure event.

use async_trait::async_trait;

use crate::error::HostError;

/// The platform that owns the workloads and can restart them.
#[async_trait]
pub trait HostRuntime: Send + Sync + 'static {
    /// Asks the host to restart `name`.
    ///
    /// Restart execution and any timeout policy are entirely the host's
    /// concern; the supervisor only consumes the immediate result.
    async fn request_restart(&self, name: &str) -> Result<(), HostError>;
}
