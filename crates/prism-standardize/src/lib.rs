//! # prism-standardize
//!
//! The standardization pipeline: rule-chain sanitization with
//! quarantine routing, tolerance-bounded time-grid alignment,
//! fixed-point precision conversion, and priority-aware persistence.
//!
//! The entry point is [`CoreStandardizer::process_and_standardize`]:
//! raw readings are cleaned (statically configured chain, or rules
//! loaded per device type), quarantined rejects are flushed on a
//! detached task, and the clean stream is sharded by device and
//! aligned onto the standard grid under bounded concurrency.

pub mod aligner;
pub mod grid;
pub mod rules;
pub mod sanitizer;
pub mod standardizer;
pub mod unifier;

mod dynamic;

pub use aligner::TimeAligner;
pub use sanitizer::ChainSanitizer;
pub use standardizer::CoreStandardizer;
pub use unifier::{MetricUnifier, DEFAULT_SCALE_FACTOR};
