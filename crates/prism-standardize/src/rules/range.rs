//! Min/max bounds rule.

use prism_core::models::{CheckResult, CleaningContext, Reading, RuleAction};
use prism_core::traits::ICleaningRule;

/// Fails when the value leaves `[min, max]`. Under CORRECT, clamps to
/// the violated bound.
#[derive(Debug)]
pub struct RangeRule {
    pub min: f64,
    pub max: f64,
    pub action: RuleAction,
}

impl RangeRule {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            action: RuleAction::Reject,
        }
    }

    pub fn with_action(mut self, action: RuleAction) -> Self {
        self.action = action;
        self
    }
}

impl ICleaningRule for RangeRule {
    fn check(&self, _ctx: &CleaningContext<'_>, curr: Reading) -> CheckResult {
        if curr.value >= self.min && curr.value <= self.max {
            return CheckResult::pass(curr);
        }

        match self.action {
            RuleAction::Correct => {
                let bound = if curr.value < self.min {
                    self.min
                } else {
                    self.max
                };
                let reason = format!("value {:.2} corrected to bound {:.2}", curr.value, bound);
                let mut fixed = curr;
                fixed.value = bound;
                CheckResult::corrected(fixed, reason)
            }
            RuleAction::FlagOnly => {
                tracing::warn!(
                    device_id = %curr.device.id,
                    value = curr.value,
                    min = self.min,
                    max = self.max,
                    "range violation flagged"
                );
                CheckResult::pass(curr)
            }
            RuleAction::Reject => {
                let reason = format!(
                    "value {:.2} out of range [{:.2}, {:.2}]",
                    curr.value, self.min, self.max
                );
                CheckResult::reject(curr, reason)
            }
        }
    }
}
