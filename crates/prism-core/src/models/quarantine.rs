//! Quarantine records for readings rejected by the sanitizer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::reading::Reading;

/// Governance state of a quarantined reading. Transitions happen
/// out-of-band, never inside the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuarantineStatus {
    Pending,
    Resolved,
    Ignored,
}

/// A rejected observation held for review, with the reason the rule
/// chain (or the built-in deduplication) produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarantineReading {
    pub id: String,
    /// Snapshot of the offending raw reading.
    pub reading: Reading,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: QuarantineStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
}

impl QuarantineReading {
    /// New PENDING record with a generated id.
    pub fn new(reading: Reading, reason: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            reading,
            reason: reason.into(),
            rule_id: None,
            created_at: now,
            updated_at: now,
            status: QuarantineStatus::Pending,
            batch_id: None,
        }
    }
}
