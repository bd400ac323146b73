//! Registry-based rule factory.

use std::collections::HashMap;
use std::sync::Arc;

use prism_core::errors::StandardizeError;
use prism_core::models::{RuleConfig, RuleType};
use prism_core::traits::{ICleaningRule, IRuleFactory};

use super::{JumpRule, RangeRule, StagnationRule};

/// Builds one rule strategy from its persisted configuration.
pub type RuleBuilder =
    Box<dyn Fn(&RuleConfig) -> Result<Arc<dyn ICleaningRule>, StandardizeError> + Send + Sync>;

/// Registry keyed by [`RuleType`]. Builtins are registered by
/// [`RuleFactory::new`]; callers may override or extend via
/// [`RuleFactory::register`] before injecting the factory.
pub struct RuleFactory {
    builders: HashMap<RuleType, RuleBuilder>,
}

impl RuleFactory {
    pub fn new() -> Self {
        let mut factory = Self {
            builders: HashMap::new(),
        };
        factory.register(RuleType::Range, Box::new(build_range));
        factory.register(RuleType::Rate, Box::new(build_jump));
        factory.register(RuleType::Trend, Box::new(build_stagnation));
        factory
    }

    /// Add or override a builder.
    pub fn register(&mut self, rule_type: RuleType, builder: RuleBuilder) {
        self.builders.insert(rule_type, builder);
    }
}

impl Default for RuleFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl IRuleFactory for RuleFactory {
    fn create(&self, config: &RuleConfig) -> Result<Arc<dyn ICleaningRule>, StandardizeError> {
        let builder = self
            .builders
            .get(&config.rule_type)
            .ok_or(StandardizeError::UnknownRuleType(config.rule_type))?;
        builder(config)
    }
}

fn required_param(config: &RuleConfig, key: &str) -> Result<f64, StandardizeError> {
    config
        .param_f64(key)
        .ok_or_else(|| StandardizeError::InvalidRuleParameters {
            rule_type: config.rule_type,
            message: format!("need numeric {key}"),
        })
}

fn build_range(config: &RuleConfig) -> Result<Arc<dyn ICleaningRule>, StandardizeError> {
    let min = required_param(config, "min")?;
    let max = required_param(config, "max")?;
    Ok(Arc::new(
        RangeRule::new(min, max).with_action(config.action),
    ))
}

fn build_jump(config: &RuleConfig) -> Result<Arc<dyn ICleaningRule>, StandardizeError> {
    let max = required_param(config, "max")?;
    Ok(Arc::new(JumpRule::new(max)))
}

fn build_stagnation(config: &RuleConfig) -> Result<Arc<dyn ICleaningRule>, StandardizeError> {
    let min = required_param(config, "min")?;
    Ok(Arc::new(StagnationRule::new(min)))
}
