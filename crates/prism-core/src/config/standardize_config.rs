//! Standardizer configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Configuration for the standardization pipeline.
///
/// Non-positive values are replaced with the defaults at service
/// construction; the config itself stays dumb.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardizeConfig {
    /// Grid stride for time alignment.
    pub standard_interval_secs: i64,
    /// Maximum |reading − grid point| for a snapshot match.
    pub tolerance_secs: i64,
    /// Fixed-point precision factor (10000 ⇒ 4 decimal places).
    pub scale_factor: i64,
    /// Maximum concurrently active device-shard workers.
    pub concurrency_limit: usize,
    /// Upper bound on the detached quarantine flush.
    pub quarantine_flush_timeout_secs: u64,
}

impl Default for StandardizeConfig {
    fn default() -> Self {
        Self {
            standard_interval_secs: 900, // 15m
            tolerance_secs: 300,         // 5m
            scale_factor: 10_000,
            concurrency_limit: 100,
            quarantine_flush_timeout_secs: 30,
        }
    }
}

impl StandardizeConfig {
    pub fn standard_interval(&self) -> Duration {
        Duration::seconds(self.standard_interval_secs)
    }

    pub fn tolerance(&self) -> Duration {
        Duration::seconds(self.tolerance_secs)
    }

    pub fn quarantine_flush_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.quarantine_flush_timeout_secs)
    }
}
