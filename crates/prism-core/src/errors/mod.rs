mod ingest_error;
mod prism_error;
mod standardize_error;
mod storage_error;

pub use ingest_error::IngestError;
pub use prism_error::{PrismError, PrismResult};
pub use standardize_error::StandardizeError;
pub use storage_error::StorageError;
