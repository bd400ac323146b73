//! Cleaning-rule configuration and the per-check data contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::device::DeviceType;
use super::reading::Reading;

/// Kind of check a configured rule performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    /// Min/max bounds check.
    Range,
    /// Delta-versus-previous check.
    Rate,
    /// Trend check (stagnation and the like).
    Trend,
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RuleType::Range => "RANGE",
            RuleType::Rate => "RATE",
            RuleType::Trend => "TREND",
        })
    }
}

/// What a violated rule does to the reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleAction {
    /// Quarantine the reading.
    Reject,
    /// Mutate the value and mark it CORRECTED.
    Correct,
    /// Keep the value, log a warning.
    FlagOnly,
}

impl Default for RuleAction {
    fn default() -> Self {
        RuleAction::Reject
    }
}

/// Persisted rule configuration, materialized into a runtime strategy
/// by the rule factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub id: String,
    pub device_type: DeviceType,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    #[serde(default)]
    pub action: RuleAction,
    pub enabled: bool,
    /// Rule-specific parameters, e.g. `{"min": 0, "max": 100}`.
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
    /// Chain position: higher runs earlier.
    #[serde(default)]
    pub priority: i32,
}

impl RuleConfig {
    /// Fetch a numeric parameter, accepting any JSON number.
    pub fn param_f64(&self, key: &str) -> Option<f64> {
        self.parameters.get(key).and_then(Value::as_f64)
    }
}

/// Context handed to each rule check: the most recent *accepted*
/// reading of the stream being cleaned, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleaningContext<'a> {
    pub previous: Option<&'a Reading>,
}

/// Outcome of one rule check.
///
/// `reason` is non-empty whenever the check failed or corrected the
/// value; it becomes the quarantine reason on rejection.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    /// The reading to hand to the next rule (original or mutated).
    pub reading: Reading,
    pub passed: bool,
    pub corrected: bool,
    pub reason: String,
}

impl CheckResult {
    /// Unchanged pass-through.
    pub fn pass(reading: Reading) -> Self {
        Self {
            reading,
            passed: true,
            corrected: false,
            reason: String::new(),
        }
    }

    /// Pass with a substituted value.
    pub fn corrected(reading: Reading, reason: impl Into<String>) -> Self {
        Self {
            reading,
            passed: true,
            corrected: true,
            reason: reason.into(),
        }
    }

    /// Rejection; the chain short-circuits.
    pub fn reject(reading: Reading, reason: impl Into<String>) -> Self {
        Self {
            reading,
            passed: false,
            corrected: false,
            reason: reason.into(),
        }
    }
}
