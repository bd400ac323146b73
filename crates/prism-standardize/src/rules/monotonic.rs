//! Monotonic counter rule.

use prism_core::models::{CheckResult, CleaningContext, Reading, RuleAction};
use prism_core::traits::ICleaningRule;

/// Rejects negative values and regressions against the previous
/// accepted reading. Under CORRECT, a regression is substituted with
/// the previous value (counter rollover is not distinguished from a
/// faulty regression).
#[derive(Debug)]
pub struct MonotonicRule {
    pub action: RuleAction,
}

impl MonotonicRule {
    pub fn new() -> Self {
        Self {
            action: RuleAction::Reject,
        }
    }

    pub fn with_action(mut self, action: RuleAction) -> Self {
        self.action = action;
        self
    }

    fn violation(&self, ctx: &CleaningContext<'_>, curr: Reading, reason: String) -> CheckResult {
        match self.action {
            RuleAction::Correct => match ctx.previous {
                Some(prev) => {
                    let mut fixed = curr;
                    fixed.value = prev.value;
                    CheckResult::corrected(fixed, reason)
                }
                // Nothing to substitute for the first reading.
                None => CheckResult::reject(curr, reason),
            },
            RuleAction::FlagOnly => {
                tracing::warn!(device_id = %curr.device.id, value = curr.value, %reason, "monotonic violation flagged");
                CheckResult::pass(curr)
            }
            RuleAction::Reject => CheckResult::reject(curr, reason),
        }
    }
}

impl Default for MonotonicRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ICleaningRule for MonotonicRule {
    fn check(&self, ctx: &CleaningContext<'_>, curr: Reading) -> CheckResult {
        if curr.value < 0.0 {
            let reason = format!("negative value: {:.2}", curr.value);
            return self.violation(ctx, curr, reason);
        }
        if let Some(prev) = ctx.previous {
            if curr.value < prev.value {
                let reason = format!(
                    "value regression: current {:.2} < prev {:.2}",
                    curr.value, prev.value
                );
                return self.violation(ctx, curr, reason);
            }
        }
        CheckResult::pass(curr)
    }
}
