//! Restart decision policy.

mod restart;

pub use restart::{Action, RestartPolicy};
