use tracing::{info, warn};

use crate::events::ActionEvent;
use crate::observers::Observe;
use crate::policies::Action;

/// Base observer that logs decisions via `tracing`.
///
/// Enabled via the `logging` feature. Useful for demos and debugging.
pub struct LogWriter;

impl Observe for LogWriter {
    fn on_action(&self, e: &ActionEvent) {
        let reason = e.reason.as_deref().unwrap_or("-");
        match e.action {
            Action::Restart => {
                info!(workload = %e.workload, seq = e.seq, reason, "restart requested");
            }
            Action::Exhausted => {
                warn!(workload = %e.workload, seq = e.seq, reason, "failure budget exhausted");
            }
            Action::NoAction => {
                info!(workload = %e.workload, seq = e.seq, reason, "failure observed, not watched");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
