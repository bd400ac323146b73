//! Raw and standardized readings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::device::DeviceInfo;

/// Provenance of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadingType {
    Raw,
    Standard,
}

/// Data-quality marker attached to standardized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityState {
    Valid,
    Corrected,
    Estimated,
    Interpolated,
}

/// A single raw observation. Immutable once produced by an ingestor.
///
/// `value` carries cumulative counter semantics: it grows
/// monotonically unless the device resets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(rename = "device_info")]
    pub device: DeviceInfo,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Reading {
    pub fn new(device: DeviceInfo, timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            device,
            timestamp,
            value,
        }
    }
}

/// A reading that survived the rule chain. The `corrected` flag is
/// carried so the standardizer can stamp `QualityState::Corrected`
/// without widening the immutable [`Reading`].
#[derive(Debug, Clone, PartialEq)]
pub struct CleanReading {
    pub reading: Reading,
    pub corrected: bool,
}

/// The canonical output record: cleaned, grid-snapped, fixed-point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardReading {
    pub device_id: String,
    /// Snapped to the standard time grid.
    pub timestamp: DateTime<Utc>,
    /// `round_half_away(value_display * scale_factor)`.
    pub value_scaled: i64,
    pub scale_factor: i64,
    /// The source float, preserved verbatim for display surfaces.
    pub value_display: f64,
    pub quality: QualityState,
    pub source_type: ReadingType,
    /// Wall clock of standardization.
    pub ingested_at: DateTime<Utc>,
    /// Governs upsert conflicts; derived from the ingest strategy.
    pub priority: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_wire_values() {
        assert_eq!(
            serde_json::to_string(&QualityState::Interpolated).unwrap(),
            "\"INTERPOLATED\""
        );
        assert_eq!(
            serde_json::to_string(&ReadingType::Standard).unwrap(),
            "\"STANDARD\""
        );
    }

    #[test]
    fn reading_serializes_device_info_key() {
        let r = Reading::new(DeviceInfo::new("D1"), Utc::now(), 1.5);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["device_info"]["device_id"], "D1");
    }
}
