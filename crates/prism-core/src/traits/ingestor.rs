//! Inbound ingestion ports.

use async_trait::async_trait;
use std::io::Read;

use crate::context::PipelineContext;
use crate::errors::PrismResult;
use crate::models::{IngestionResult, Reading};

/// Downstream consumer of parsed reading batches. The standardizer's
/// `process_and_standardize` conforms to this shape.
#[async_trait]
pub trait IReadingSink: Send + Sync {
    async fn deliver(&self, ctx: &PipelineContext, batch: Vec<Reading>) -> PrismResult<()>;
}

/// Format-specific ingest adapter. Per-record data errors are counted
/// into the [`IngestionResult`]; only stream-level failures are
/// returned as errors.
#[async_trait]
pub trait IIngestor: Send + Sync {
    async fn ingest_stream(
        &self,
        ctx: &PipelineContext,
        stream: &mut (dyn Read + Send),
    ) -> PrismResult<IngestionResult>;

    /// Batch-file flavor; `format` must match the adapter.
    async fn ingest_batch(
        &self,
        ctx: &PipelineContext,
        file: &mut (dyn Read + Send),
        format: &str,
    ) -> PrismResult<IngestionResult>;
}
