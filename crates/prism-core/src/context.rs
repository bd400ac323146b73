//! Request-scoped pipeline context: ingest metadata plus cooperative
//! cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::models::IngestContext;

/// Cooperative cancellation handle. Cloning shares the flag; workers
/// poll it at loop boundaries and exit with a cancellation error.
#[derive(Debug, Clone, Default)]
pub struct PipelineCancellation {
    flag: Arc<AtomicBool>,
}

impl PipelineCancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// The ambient request-scoped object threaded through one pipeline
/// invocation. Carries the optional [`IngestContext`] (priority
/// derivation) and the cancellation handle; never unbundled into
/// separate parameters.
#[derive(Debug, Clone, Default)]
pub struct PipelineContext {
    ingest: Option<IngestContext>,
    cancellation: PipelineCancellation,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ingest(mut self, ingest: IngestContext) -> Self {
        self.ingest = Some(ingest);
        self
    }

    pub fn ingest(&self) -> Option<&IngestContext> {
        self.ingest.as_ref()
    }

    pub fn cancellation(&self) -> &PipelineCancellation {
        &self.cancellation
    }
}
