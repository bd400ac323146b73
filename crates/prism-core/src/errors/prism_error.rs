use super::{IngestError, StandardizeError, StorageError};

/// Top-level error type for the Prism pipeline.
/// All subsystem errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum PrismError {
    #[error("standardize error: {0}")]
    Standardize(#[from] StandardizeError),

    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PrismError {
    /// True when the failure originated in a cancellation, directly or
    /// inside an aggregated shard error.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PrismError::Standardize(e) if e.is_cancelled())
    }
}

/// Convenience type alias.
pub type PrismResult<T> = Result<T, PrismError>;
