use crate::models::{DeviceType, RuleType};

/// Standardization subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum StandardizeError {
    #[error("operation cancelled")]
    Cancelled,

    #[error("repository not configured: {0}")]
    RepositoryNotConfigured(&'static str),

    #[error("loading rules for {device_type} failed: {message}")]
    RuleLoadFailed {
        device_type: DeviceType,
        message: String,
    },

    #[error("building rule {rule_id} failed: {message}")]
    RuleBuildFailed { rule_id: String, message: String },

    #[error("invalid parameters for {rule_type} rule: {message}")]
    InvalidRuleParameters {
        rule_type: RuleType,
        message: String,
    },

    #[error("no builder registered for rule type {0}")]
    UnknownRuleType(RuleType),

    #[error("persisting standards failed: {0}")]
    PersistFailed(String),

    #[error("shard worker failed: {0}")]
    WorkerFailed(String),

    #[error("{} shard(s) failed: {}", .0.len(), join_messages(.0))]
    Shards(Vec<StandardizeError>),
}

impl StandardizeError {
    /// Fold shard errors into a single error, flattening the
    /// one-element case.
    pub fn combine(mut errors: Vec<StandardizeError>) -> StandardizeError {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            StandardizeError::Shards(errors)
        }
    }

    /// True when this error is, or contains, a cancellation.
    pub fn is_cancelled(&self) -> bool {
        match self {
            StandardizeError::Cancelled => true,
            StandardizeError::Shards(errors) => errors.iter().any(StandardizeError::is_cancelled),
            _ => false,
        }
    }
}

fn join_messages(errors: &[StandardizeError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
