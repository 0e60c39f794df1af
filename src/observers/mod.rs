//! Observer trait and built-in observers.

mod observe;

pub use observe::Observe;

#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "logging")]
pub use log::LogWriter;
