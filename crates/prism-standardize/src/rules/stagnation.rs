//! Stagnation rule.

use prism_core::models::{CheckResult, CleaningContext, Reading};
use prism_core::traits::ICleaningRule;

/// Rejects a reading whose non-negative increase over the previous
/// accepted value is below `min` — a stuck or barely moving counter.
/// Regressions are out of scope here (the monotonic rule owns them).
#[derive(Debug)]
pub struct StagnationRule {
    pub min: f64,
}

impl StagnationRule {
    pub fn new(min: f64) -> Self {
        Self { min }
    }
}

impl ICleaningRule for StagnationRule {
    fn check(&self, ctx: &CleaningContext<'_>, curr: Reading) -> CheckResult {
        let Some(prev) = ctx.previous else {
            return CheckResult::pass(curr);
        };
        let diff = curr.value - prev.value;
        if (0.0..self.min).contains(&diff) {
            let reason = format!("value stagnation: diff {:.4} < min {:.4}", diff, self.min);
            return CheckResult::reject(curr, reason);
        }
        CheckResult::pass(curr)
    }
}
