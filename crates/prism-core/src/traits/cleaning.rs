//! Pure computation ports of the standardization pipeline.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::errors::StandardizeError;
use crate::models::{
    CheckResult, CleanReading, CleaningContext, QuarantineReading, Reading, RuleConfig,
};

/// A single cleaning strategy. Implementations must be pure with
/// respect to external state: no I/O, and any internal state safe for
/// serial invocation within one device stream.
pub trait ICleaningRule: std::fmt::Debug + Send + Sync {
    /// Check `curr` against the rule, given the previous accepted
    /// reading in the stream. The returned reading (original or
    /// mutated) feeds the next rule in the chain.
    fn check(&self, ctx: &CleaningContext<'_>, curr: Reading) -> CheckResult;
}

/// Rule-chain executor producing clean and quarantined streams.
pub trait ISanitizer: Send + Sync {
    /// Returns `(clean, quarantined)`. Clean output is sorted strictly
    /// ascending by timestamp per device, with duplicates and
    /// rule-rejected readings routed to quarantine.
    fn clean(&self, readings: Vec<Reading>) -> (Vec<CleanReading>, Vec<QuarantineReading>);
}

/// Tolerance-bounded nearest-neighbor snapshotter over a time-sorted
/// slice.
pub trait IAligner: Send + Sync {
    /// Index of the reading closest to `target` within tolerance, or
    /// `None`. Exact-distance ties resolve to the earlier reading.
    fn find_snapshot_index(&self, readings: &[Reading], target: DateTime<Utc>) -> Option<usize>;

    /// Reference flavor of [`Self::find_snapshot_index`].
    fn find_snapshot<'a>(
        &self,
        readings: &'a [Reading],
        target: DateTime<Utc>,
    ) -> Option<&'a Reading> {
        self.find_snapshot_index(readings, target)
            .map(|i| &readings[i])
    }
}

/// Fixed-point precision conversion.
pub trait IUnifier: Send + Sync {
    fn to_scaled(&self, value: f64) -> i64;
    fn from_scaled(&self, value: i64) -> f64;
    fn scale_factor(&self) -> i64;
}

/// Materializes runtime rule strategies from persisted configuration.
pub trait IRuleFactory: Send + Sync {
    fn create(&self, config: &RuleConfig) -> Result<Arc<dyn ICleaningRule>, StandardizeError>;
}
