//! Action events and the observer fan-out bus.

mod bus;
mod event;

pub use bus::NotificationBus;
pub use event::ActionEvent;
