//! Error types used by the supervision core.
//!
//! This module defines two error types:
//!
//! - [`SupervisorError`] — errors raised by the supervision core itself.
//! - [`HostError`] — the payload a host runtime returns when a restart
//!   request cannot be carried out.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.
//!
//! Only [`SupervisorError::InvalidConfig`] is fatal, and only during
//! supervisor construction. Everything else is local to one administrative
//! call or one lifecycle event: the event-ingestion path never propagates an
//! error upward.

use thiserror::Error;

/// # Errors produced by the supervision core.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SupervisorError {
    /// Malformed startup configuration (duplicate name, zero window/limit).
    ///
    /// Fatal: aborts supervisor construction.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What exactly was rejected.
        reason: String,
    },

    /// Administrative update against a workload never declared at load time.
    ///
    /// Reported to the caller; no state change.
    #[error("workload {name:?} is not part of the watch list")]
    UnknownWorkload {
        /// The undeclared workload name.
        name: String,
    },

    /// The restart request to the host runtime did not succeed.
    ///
    /// Recorded in statistics as a failed restart attempt and surfaced to
    /// observers; never retried (the window/limit mechanism is the only
    /// retry policy).
    #[error("restart request for {name:?} failed: {reason}")]
    HostCallFailed {
        /// The workload whose restart was requested.
        name: String,
        /// Host-side failure description.
        reason: String,
    },
}

impl SupervisorError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use watchvisor::SupervisorError;
    ///
    /// let err = SupervisorError::UnknownWorkload { name: "app".into() };
    /// assert_eq!(err.as_label(), "unknown_workload");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SupervisorError::InvalidConfig { .. } => "invalid_config",
            SupervisorError::UnknownWorkload { .. } => "unknown_workload",
            SupervisorError::HostCallFailed { .. } => "host_call_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SupervisorError::InvalidConfig { reason } => {
                format!("invalid config: {reason}")
            }
            SupervisorError::UnknownWorkload { name } => {
                format!("unknown workload: {name}")
            }
            SupervisorError::HostCallFailed { name, reason } => {
                format!("host call failed for {name}: {reason}")
            }
        }
    }
}

/// Error returned by a host runtime when it cannot carry out a request.
///
/// The supervisor wraps this into [`SupervisorError::HostCallFailed`] for
/// logging and statistics; it never inspects the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    /// Creates a host error from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        HostError(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let invalid = SupervisorError::InvalidConfig {
            reason: "dup".into(),
        };
        let unknown = SupervisorError::UnknownWorkload { name: "x".into() };
        let host = SupervisorError::HostCallFailed {
            name: "x".into(),
            reason: "down".into(),
        };
        assert_eq!(invalid.as_label(), "invalid_config");
        assert_eq!(unknown.as_label(), "unknown_workload");
        assert_eq!(host.as_label(), "host_call_failed");
    }

    #[test]
    fn test_messages_carry_details() {
        let err = SupervisorError::HostCallFailed {
            name: "app".into(),
            reason: "ipc timeout".into(),
        };
        assert!(err.as_message().contains("app"));
        assert!(err.as_message().contains("ipc timeout"));
    }
}
