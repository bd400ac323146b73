//! In-memory repositories, one store per port.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use prism_core::errors::StorageError;
use prism_core::models::{
    DeviceType, QuarantineReading, QuarantineStatus, RuleConfig, StandardReading,
};
use prism_core::traits::{
    ICleaningRuleRepository, IQuarantineRepository, IStandardReadingRepository, UpsertStrategy,
};

type StandardKey = (String, DateTime<Utc>);

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Backend("lock poisoned".to_string())
}

/// Standard-reading store keyed by `(device_id, timestamp)`; the
/// upsert decision matrix lives here in executable form.
#[derive(Default)]
pub struct MemoryStandardStore {
    rows: Mutex<HashMap<StandardKey, StandardReading>>,
}

impl MemoryStandardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows (test introspection).
    pub fn count(&self) -> usize {
        self.rows.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn upsert(
        rows: &mut HashMap<StandardKey, StandardReading>,
        reading: &StandardReading,
        strategy: UpsertStrategy,
    ) {
        let key = (reading.device_id.clone(), reading.timestamp);
        match strategy {
            UpsertStrategy::LastWriteWins => {
                rows.insert(key, reading.clone());
            }
            UpsertStrategy::HighPriorityWins => match rows.get(&key) {
                // Lower priority is ignored; on a tie the later write
                // wins.
                Some(existing) if reading.priority < existing.priority => {}
                _ => {
                    rows.insert(key, reading.clone());
                }
            },
        }
    }
}

#[async_trait]
impl IStandardReadingRepository for MemoryStandardStore {
    async fn save(
        &self,
        reading: &StandardReading,
        strategy: UpsertStrategy,
    ) -> Result<(), StorageError> {
        let mut rows = self.rows.lock().map_err(poisoned)?;
        Self::upsert(&mut rows, reading, strategy);
        Ok(())
    }

    async fn save_batch(
        &self,
        readings: &[StandardReading],
        strategy: UpsertStrategy,
    ) -> Result<(), StorageError> {
        let mut rows = self.rows.lock().map_err(poisoned)?;
        for reading in readings {
            Self::upsert(&mut rows, reading, strategy);
        }
        Ok(())
    }

    async fn find_exact(
        &self,
        device_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<StandardReading>, StorageError> {
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows.get(&(device_id.to_string(), timestamp)).cloned())
    }

    async fn find_range(
        &self,
        device_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StandardReading>, StorageError> {
        let rows = self.rows.lock().map_err(poisoned)?;
        let mut found: Vec<StandardReading> = rows
            .values()
            .filter(|r| r.device_id == device_id && r.timestamp >= start && r.timestamp <= end)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(found)
    }
}

/// Quarantine store preserving insertion order for `find_pending`.
#[derive(Default)]
pub struct MemoryQuarantineStore {
    rows: Mutex<Vec<QuarantineReading>>,
}

impl MemoryQuarantineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.rows.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl IQuarantineRepository for MemoryQuarantineStore {
    async fn save(&self, record: &QuarantineReading) -> Result<(), StorageError> {
        let mut rows = self.rows.lock().map_err(poisoned)?;
        let mut record = record.clone();
        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        }
        if let Some(existing) = rows.iter_mut().find(|r| r.id == record.id) {
            record.updated_at = Utc::now();
            *existing = record;
        } else {
            rows.push(record);
        }
        Ok(())
    }

    async fn find_pending(&self, limit: usize) -> Result<Vec<QuarantineReading>, StorageError> {
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows
            .iter()
            .filter(|r| r.status == QuarantineStatus::Pending)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Cleaning-rule store with CRUD and the enabled-by-type listing used
/// by the dynamic sanitize path.
#[derive(Default)]
pub struct MemoryRuleStore {
    rows: Mutex<HashMap<String, RuleConfig>>,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ICleaningRuleRepository for MemoryRuleStore {
    async fn save(&self, rule: &RuleConfig) -> Result<(), StorageError> {
        let mut rows = self.rows.lock().map_err(poisoned)?;
        rows.insert(rule.id.clone(), rule.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<RuleConfig>, StorageError> {
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows.get(id).cloned())
    }

    async fn list_by_device_type(
        &self,
        device_type: DeviceType,
    ) -> Result<Vec<RuleConfig>, StorageError> {
        let rows = self.rows.lock().map_err(poisoned)?;
        let mut found: Vec<RuleConfig> = rows
            .values()
            .filter(|r| r.device_type == device_type)
            .cloned()
            .collect();
        // Descending priority: this is the chain order downstream.
        found.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(found)
    }

    async fn list_enabled_by_device_type(
        &self,
        device_type: DeviceType,
    ) -> Result<Vec<RuleConfig>, StorageError> {
        let mut found = self.list_by_device_type(device_type).await?;
        found.retain(|r| r.enabled);
        Ok(found)
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let mut rows = self.rows.lock().map_err(poisoned)?;
        rows.remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::RuleNotFound { id: id.to_string() })
    }
}
