/// Errors raised by the ingest adapters.
///
/// Per-record variants are recoverable: the adapters count them into
/// the `IngestionResult` and keep reading. Stream-level variants abort
/// the ingestion.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid timestamp format: {0}")]
    InvalidTimestamp(String),

    #[error("invalid value format: {0}")]
    InvalidValue(String),

    #[error("device_id is empty")]
    MissingDeviceId,

    #[error("missing required csv header: {0}")]
    MissingHeader(&'static str),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
