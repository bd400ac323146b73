//! Shared record-to-domain mapping for the ingest adapters.

use chrono::{DateTime, NaiveDateTime, Utc};

use prism_core::errors::IngestError;
use prism_core::models::DeviceType;

/// Accept RFC 3339 first, then the bare `YYYY-MM-DD HH:MM:SS` form
/// (interpreted as UTC).
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, IngestError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| IngestError::InvalidTimestamp(raw.to_string()))
}

/// Empty or missing types map to `None`; anything else must be one of
/// the known wire values.
pub(crate) fn parse_device_type(raw: &str) -> Result<Option<DeviceType>, IngestError> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<DeviceType>()
        .map(Some)
        .map_err(IngestError::InvalidValue)
}
