//! Abnormal jump rule.

use prism_core::models::{CheckResult, CleaningContext, Reading};
use prism_core::traits::ICleaningRule;

/// Rejects a reading whose increase over the previous accepted value
/// exceeds `max`. There is no correction policy for jumps: the true
/// value is unknowable, so the reading goes to quarantine.
#[derive(Debug)]
pub struct JumpRule {
    pub max: f64,
}

impl JumpRule {
    pub fn new(max: f64) -> Self {
        Self { max }
    }
}

impl ICleaningRule for JumpRule {
    fn check(&self, ctx: &CleaningContext<'_>, curr: Reading) -> CheckResult {
        let Some(prev) = ctx.previous else {
            return CheckResult::pass(curr);
        };
        let diff = curr.value - prev.value;
        if diff > self.max {
            let reason = format!("abnormal jump: diff {:.2} > max {:.2}", diff, self.max);
            return CheckResult::reject(curr, reason);
        }
        CheckResult::pass(curr)
    }
}
