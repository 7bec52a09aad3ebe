//! Progress observation and cooperative cancellation.
//!
//! The engine notifies an observer at well-defined checkpoints and checks
//! a cancellation flag between batch-job boundaries. It has no dependency
//! on how progress is displayed, and cancellation is never pre-empted
//! mid-allocation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::allocate::AllocationPlan;
use crate::batch::{BatchPlan, JobOutcome};

/// Checkpoint notifications emitted while planning a batch.
pub trait PlanObserver: Send + Sync {
    /// A variant's allocation plan was computed.
    fn on_allocation(&self, _variant_index: usize, _plan: &AllocationPlan) {}

    /// A variant finished planning, successfully or not.
    fn on_job_complete(&self, _variant_index: usize, _outcome: &JobOutcome) {}

    /// The whole batch finished planning.
    fn on_batch_complete(&self, _batch: &BatchPlan) {}
}

/// Observer that ignores every checkpoint.
pub struct NoopObserver;

impl PlanObserver for NoopObserver {}

/// Cooperative cancellation flag, cloneable across workers.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Takes effect at the next job boundary.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
