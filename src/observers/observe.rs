//! # Core observer trait.
//!
//! `Observe` is the extension point for receiving supervision decisions.
//! Observers are registered with the supervisor by identity and receive
//! every [`ActionEvent`] synchronously, on the event-ingestion thread, after
//! the supervisor has released its internal locks.
//!
//! ## Contract
//! - Implementations must not block indefinitely; delivery is synchronous
//!   and a stalled observer stalls subsequent observers for that event.
//! - Reentrancy is safe: an observer may register/unregister observers from
//!   inside `on_action` (the bus delivers from a snapshot).

use crate::events::ActionEvent;

/// Contract for action-event observers.
pub trait Observe: Send + Sync + 'static {
    /// Handles a single supervision decision.
    fn on_action(&self, event: &ActionEvent);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
