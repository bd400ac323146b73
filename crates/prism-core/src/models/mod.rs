//! Domain model: readings, quarantine records, ingest metadata, and
//! cleaning-rule configuration.

mod device;
mod ingest;
mod quarantine;
mod reading;
mod rule;

pub use device::{DeviceInfo, DeviceType};
pub use ingest::{IngestContext, IngestStrategy, IngestionResult};
pub use quarantine::{QuarantineReading, QuarantineStatus};
pub use reading::{CleanReading, QualityState, Reading, ReadingType, StandardReading};
pub use rule::{CheckResult, CleaningContext, RuleAction, RuleConfig, RuleType};
