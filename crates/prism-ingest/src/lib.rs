//! # prism-ingest
//!
//! Format-specific ingest adapters. Each adapter parses a stream into
//! [`prism_core::models::Reading`] batches and hands them to an
//! injected [`prism_core::traits::IReadingSink`] in chunks of at most
//! [`BATCH_SIZE`]. Per-record data errors are tallied into the
//! [`prism_core::models::IngestionResult`]; only stream-level failures
//! abort.

pub mod csv;
pub mod json;

mod record;

pub use crate::csv::CsvIngestor;
pub use crate::json::JsonIngestor;

/// Readings buffered before a downstream delivery.
pub const BATCH_SIZE: usize = 100;
