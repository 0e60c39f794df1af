//! # Action events delivered to observers.
//!
//! One [`ActionEvent`] is emitted per policy decision: what the supervisor
//! decided for which workload, and the deactivation reason that triggered
//! the decision.
//!
//! ## Ordering guarantees
//! Each event carries a globally unique sequence number (`seq`) that
//! increases monotonically across all workloads. Observers receiving events
//! from several workloads can use `seq` to restore decision order.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::policies::Action;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// A single supervision decision, as delivered to observers.
#[derive(Clone, Debug)]
pub struct ActionEvent {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp of the decision.
    pub at: SystemTime,
    /// Workload the decision concerns.
    pub workload: Arc<str>,
    /// The decided action.
    pub action: Action,
    /// The host-reported deactivation reason that triggered the decision,
    /// possibly annotated with a host restart-call failure.
    pub reason: Option<Arc<str>>,
}

impl ActionEvent {
    /// Creates an event stamped with the current time and next sequence.
    pub fn now(workload: impl Into<Arc<str>>, action: Action) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            workload: workload.into(),
            action,
            reason: None,
        }
    }

    /// Attaches the triggering reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = ActionEvent::now("app", Action::Restart);
        let b = ActionEvent::now("app", Action::Exhausted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builder_fields() {
        let ev = ActionEvent::now("app", Action::Restart).with_reason("segfault");
        assert_eq!(&*ev.workload, "app");
        assert_eq!(ev.action, Action::Restart);
        assert_eq!(ev.reason.as_deref(), Some("segfault"));
    }
}
