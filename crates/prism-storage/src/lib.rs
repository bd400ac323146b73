//! # prism-storage
//!
//! Single-process reference backend for the repository ports: one
//! mutex-guarded in-memory store per port. The integration suites
//! fixture against these, and the standard store documents the upsert
//! decision matrix in executable form.

pub mod memory;

pub use memory::{MemoryQuarantineStore, MemoryRuleStore, MemoryStandardStore};
