//! Re-entrancy guard for export triggers

use super::ExportError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Allows at most one export at a time per trigger
///
/// Clones share the same flag, so a guard can be handed to a spawned task.
#[derive(Debug, Clone, Default)]
pub struct ExportGuard {
    busy: Arc<AtomicBool>,
}

/// Proof that an export is running; releases the guard when dropped
#[derive(Debug)]
pub struct ExportTicket {
    busy: Arc<AtomicBool>,
}

impl ExportGuard {
    /// Create an idle guard
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard for one export
    ///
    /// # Errors
    /// [`ExportError::Busy`] while an earlier ticket is still alive
    pub fn try_begin(&self) -> Result<ExportTicket, ExportError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportError::Busy)?;
        Ok(ExportTicket {
            busy: Arc::clone(&self.busy),
        })
    }

    /// Whether an export is in flight
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for ExportTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
