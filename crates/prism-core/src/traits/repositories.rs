//! Outbound persistence ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;
use crate::models::{DeviceType, QuarantineReading, RuleConfig, StandardReading};

/// Conflict resolution for standard-reading upserts, keyed by
/// `(device_id, timestamp)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpsertStrategy {
    /// Unconditional overwrite; reserved for migration/admin paths.
    LastWriteWins,
    /// Update only when `new.priority >= stored.priority`; equal
    /// priorities let the later write win.
    HighPriorityWins,
}

/// Store for the canonical standardized stream.
#[async_trait]
pub trait IStandardReadingRepository: Send + Sync {
    async fn save(
        &self,
        reading: &StandardReading,
        strategy: UpsertStrategy,
    ) -> Result<(), StorageError>;

    async fn save_batch(
        &self,
        readings: &[StandardReading],
        strategy: UpsertStrategy,
    ) -> Result<(), StorageError>;

    /// Exact-timestamp lookup.
    async fn find_exact(
        &self,
        device_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<StandardReading>, StorageError>;

    /// Inclusive range scan, ascending by timestamp.
    async fn find_range(
        &self,
        device_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StandardReading>, StorageError>;
}

/// Store for rejected readings awaiting governance.
#[async_trait]
pub trait IQuarantineRepository: Send + Sync {
    /// Insert or update one record.
    async fn save(&self, record: &QuarantineReading) -> Result<(), StorageError>;

    /// PENDING records in insertion order, up to `limit`.
    async fn find_pending(&self, limit: usize) -> Result<Vec<QuarantineReading>, StorageError>;
}

/// Store for cleaning-rule configuration.
#[async_trait]
pub trait ICleaningRuleRepository: Send + Sync {
    async fn save(&self, rule: &RuleConfig) -> Result<(), StorageError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<RuleConfig>, StorageError>;

    async fn list_by_device_type(
        &self,
        device_type: DeviceType,
    ) -> Result<Vec<RuleConfig>, StorageError>;

    /// Enabled rules for the type, descending by rule priority; this
    /// order is the chain order in the dynamic sanitize path.
    async fn list_enabled_by_device_type(
        &self,
        device_type: DeviceType,
    ) -> Result<Vec<RuleConfig>, StorageError>;

    async fn delete(&self, id: &str) -> Result<(), StorageError>;
}
