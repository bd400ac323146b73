//! Ingest metadata: strategy, priority derivation, and batch results.

use serde::{Deserialize, Serialize};

/// How a batch entered the system. Determines the priority used for
/// conflict-aware persistence (backfill never silently clobbers
/// calibration data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngestStrategy {
    /// Live device uploads. Priority 100.
    Realtime,
    /// Historical backfill after an offline period. Priority 50.
    BatchLate,
    /// Manual correction or recomputed high-accuracy data. Priority 1000.
    Calibration,
}

impl IngestStrategy {
    /// Larger wins during HIGH_PRIORITY_WINS upserts.
    pub const fn priority(&self) -> i32 {
        match self {
            IngestStrategy::Calibration => 1000,
            IngestStrategy::Realtime => 100,
            IngestStrategy::BatchLate => 50,
        }
    }
}

/// Request-scoped ingest metadata, carried on the pipeline context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestContext {
    pub trace_id: String,
    pub strategy: IngestStrategy,
    /// SYSTEM or a concrete operator id.
    pub operator: String,
    #[serde(default)]
    pub batch_id: String,
}

impl IngestContext {
    pub fn new(strategy: IngestStrategy) -> Self {
        Self {
            trace_id: String::new(),
            strategy,
            operator: "SYSTEM".to_string(),
            batch_id: String::new(),
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    pub fn with_batch_id(mut self, batch_id: impl Into<String>) -> Self {
        self.batch_id = batch_id.into();
        self
    }
}

/// Per-stream ingestion tally returned by the adapters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestionResult {
    pub total: u64,
    pub success: u64,
    pub failed: u64,
    /// Duplicates or otherwise skipped records.
    pub skipped: u64,
    pub errors: Vec<String>,
}
