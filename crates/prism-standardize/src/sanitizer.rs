//! Rule-chain sanitizer with quarantine routing.

use std::sync::Arc;

use prism_core::models::{CleanReading, CleaningContext, QuarantineReading, Reading};
use prism_core::traits::{ICleaningRule, ISanitizer};

/// Reason attached to the built-in deduplication quarantine.
const DUPLICATE_REASON: &str = "Duplicate timestamp";

/// Pipe-and-filter sanitizer. Rules run in the configured order over a
/// working copy of each reading, so a correction made by one rule is
/// what the next rule sees. The first failing rule short-circuits the
/// chain and quarantines the original reading.
pub struct ChainSanitizer {
    rules: Vec<Arc<dyn ICleaningRule>>,
}

impl ChainSanitizer {
    pub fn new(rules: Vec<Arc<dyn ICleaningRule>>) -> Self {
        Self { rules }
    }
}

impl ISanitizer for ChainSanitizer {
    fn clean(&self, mut readings: Vec<Reading>) -> (Vec<CleanReading>, Vec<QuarantineReading>) {
        if readings.is_empty() {
            return (Vec::new(), Vec::new());
        }

        // Stable sort: secondary order within equal timestamps is the
        // arrival order and is not part of the contract.
        readings.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        let mut clean: Vec<CleanReading> = Vec::new();
        let mut quarantined: Vec<QuarantineReading> = Vec::new();

        for curr in readings {
            // Built-in rule: duplicate (device, timestamp) against the
            // last accepted reading.
            if let Some(prev) = clean.last() {
                if prev.reading.device.id == curr.device.id
                    && prev.reading.timestamp == curr.timestamp
                {
                    quarantined.push(QuarantineReading::new(curr, DUPLICATE_REASON));
                    continue;
                }
            }

            let original = curr.clone();
            let mut working = curr;
            let mut corrected = false;
            let mut rejection: Option<String> = None;

            let ctx = CleaningContext {
                previous: clean.last().map(|c| &c.reading),
            };
            for rule in &self.rules {
                let result = rule.check(&ctx, working);
                working = result.reading;
                if !result.passed {
                    rejection = Some(result.reason);
                    break;
                }
                corrected |= result.corrected;
            }

            match rejection {
                // Quarantine carries the pre-chain snapshot, not the
                // partially corrected working copy.
                Some(reason) => quarantined.push(QuarantineReading::new(original, reason)),
                None => clean.push(CleanReading {
                    reading: working,
                    corrected,
                }),
            }
        }

        (clean, quarantined)
    }
}
