//! # Notification bus: ordered fan-out of action events.
//!
//! [`NotificationBus`] multicasts each [`ActionEvent`] to every registered
//! observer, synchronously, on the emitting thread.
//!
//! ## Rules
//! - **Identity set**: observers are keyed by `Arc` pointer identity;
//!   registering the same instance twice is a no-op, unregistering removes
//!   that instance only.
//! - **Exactly once**: every observer present at delivery time receives the
//!   event exactly once, in registration order.
//! - **Lock discipline**: the observer list is snapshotted under the lock
//!   and delivery happens after the lock is released, so a reentrant
//!   observer (one that calls back into registration) cannot deadlock the
//!   bus against a concurrent emit.
//! - **Non-owning**: the bus holds `Arc` references; observer lifetime
//!   belongs to the registrant, paired with an explicit unregister.

use std::sync::{Arc, PoisonError, RwLock};

use crate::events::ActionEvent;
use crate::observers::Observe;

/// Thread-safe multicast of action events to registered observers.
#[derive(Default)]
pub struct NotificationBus {
    observers: RwLock<Vec<Arc<dyn Observe>>>,
}

/// Thin-pointer comparison; avoids the vtable ambiguity of comparing fat
/// `dyn` pointers directly.
fn same_observer(a: &Arc<dyn Observe>, b: &Arc<dyn Observe>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl NotificationBus {
    /// Creates a bus with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer by identity.
    ///
    /// Registering an already-present instance is a no-op.
    pub fn register(&self, observer: Arc<dyn Observe>) {
        let mut observers = self
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if !observers.iter().any(|o| same_observer(o, &observer)) {
            observers.push(observer);
        }
    }

    /// Unregisters an observer by identity; unknown instances are ignored.
    pub fn unregister(&self, observer: &Arc<dyn Observe>) {
        let mut observers = self
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        observers.retain(|o| !same_observer(o, observer));
    }

    /// Number of currently registered observers.
    pub fn len(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers the event to all registered observers, in registration
    /// order, on the calling thread.
    pub fn emit(&self, event: &ActionEvent) {
        let snapshot: Vec<Arc<dyn Observe>> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        // Lock released; a slow or reentrant observer cannot block
        // registration or a concurrent emit.
        for observer in snapshot {
            observer.on_action(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::Action;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Counting {
        seen: AtomicUsize,
    }

    impl Counting {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                seen: AtomicUsize::new(0),
            })
        }
    }

    impl Observe for Counting {
        fn on_action(&self, _event: &ActionEvent) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Recording {
        tag: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Observe for Recording {
        fn on_action(&self, _event: &ActionEvent) {
            self.log
                .lock()
                .expect("test log lock")
                .push(self.tag);
        }
    }

    #[test]
    fn test_delivery_exactly_once_per_observer() {
        let bus = NotificationBus::new();
        let a = Counting::new();
        let b = Counting::new();
        bus.register(a.clone());
        bus.register(b.clone());

        bus.emit(&ActionEvent::now("app", Action::Restart));

        assert_eq!(a.seen.load(Ordering::SeqCst), 1);
        assert_eq!(b.seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_duplicate_registration_is_noop() {
        let bus = NotificationBus::new();
        let a = Counting::new();
        bus.register(a.clone());
        bus.register(a.clone());
        assert_eq!(bus.len(), 1);

        bus.emit(&ActionEvent::now("app", Action::Restart));
        assert_eq!(a.seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unregister_by_identity() {
        let bus = NotificationBus::new();
        let a = Counting::new();
        let b = Counting::new();
        bus.register(a.clone());
        bus.register(b.clone());

        let a_dyn: Arc<dyn Observe> = a.clone();
        bus.unregister(&a_dyn);
        assert_eq!(bus.len(), 1);

        bus.emit(&ActionEvent::now("app", Action::Exhausted));
        assert_eq!(a.seen.load(Ordering::SeqCst), 0);
        assert_eq!(b.seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let bus = NotificationBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.register(Arc::new(Recording {
            tag: "first",
            log: log.clone(),
        }));
        bus.register(Arc::new(Recording {
            tag: "second",
            log: log.clone(),
        }));

        bus.emit(&ActionEvent::now("app", Action::Restart));
        assert_eq!(*log.lock().expect("test log lock"), vec!["first", "second"]);
    }
}
