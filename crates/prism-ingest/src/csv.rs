//! CSV ingest adapter.

use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use prism_core::errors::IngestError;
use prism_core::models::{DeviceInfo, IngestionResult, Reading};
use prism_core::traits::{IIngestor, IReadingSink};
use prism_core::{PipelineContext, PrismResult};

use crate::record::{parse_device_type, parse_timestamp};
use crate::BATCH_SIZE;

const REQUIRED_HEADERS: [&str; 3] = ["device_id", "timestamp", "value"];

/// Column lookup through the case-folded header map; absent or short
/// rows read as empty.
fn field<'r>(
    row: &'r csv::StringRecord,
    headers: &HashMap<String, usize>,
    column: &str,
) -> &'r str {
    headers
        .get(column)
        .and_then(|&i| row.get(i))
        .unwrap_or("")
}

/// Row-streaming CSV adapter. Headers are matched case-insensitively;
/// `device_id`, `timestamp`, and `value` are required, `model` and
/// `type` optional. Rows that fail to parse are counted and skipped.
pub struct CsvIngestor {
    downstream: Arc<dyn IReadingSink>,
}

impl CsvIngestor {
    pub fn new(downstream: Arc<dyn IReadingSink>) -> Self {
        Self { downstream }
    }

    fn parse_row(
        row: &csv::StringRecord,
        headers: &HashMap<String, usize>,
    ) -> Result<Reading, IngestError> {
        let device_id = field(row, headers, "device_id");
        if device_id.is_empty() {
            return Err(IngestError::MissingDeviceId);
        }
        let timestamp = parse_timestamp(field(row, headers, "timestamp"))?;
        let raw_value = field(row, headers, "value");
        let value: f64 = raw_value
            .parse()
            .map_err(|_| IngestError::InvalidValue(raw_value.to_string()))?;

        Ok(Reading {
            device: DeviceInfo {
                id: device_id.to_string(),
                model: field(row, headers, "model").to_string(),
                device_type: parse_device_type(field(row, headers, "type"))?,
            },
            timestamp,
            value,
        })
    }
}

#[async_trait]
impl IIngestor for CsvIngestor {
    async fn ingest_stream(
        &self,
        ctx: &PipelineContext,
        stream: &mut (dyn Read + Send),
    ) -> PrismResult<IngestionResult> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(stream);

        let mut result = IngestionResult::default();

        let headers: HashMap<String, usize> = match reader.headers() {
            Ok(headers) if headers.is_empty() => return Ok(result),
            Ok(headers) => headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
                .collect(),
            Err(e) => return Err(IngestError::MalformedPayload(e.to_string()).into()),
        };
        for required in REQUIRED_HEADERS {
            if !headers.contains_key(required) {
                return Err(IngestError::MissingHeader(required).into());
            }
        }

        let mut buffer: Vec<Reading> = Vec::with_capacity(BATCH_SIZE);
        for (index, row) in reader.records().enumerate() {
            // +2: one for the header row, one for 1-based numbering.
            let line = index + 2;
            result.total += 1;
            let parsed = row
                .map_err(|e| IngestError::MalformedPayload(e.to_string()))
                .and_then(|row| Self::parse_row(&row, &headers));
            match parsed {
                Ok(reading) => {
                    buffer.push(reading);
                    result.success += 1;
                }
                Err(err) => {
                    result.failed += 1;
                    result.errors.push(format!("line {line}: {err}"));
                    warn!(line, error = %err, "csv row skipped");
                    continue;
                }
            }
            if buffer.len() >= BATCH_SIZE {
                self.downstream
                    .deliver(ctx, std::mem::take(&mut buffer))
                    .await?;
            }
        }
        if !buffer.is_empty() {
            self.downstream.deliver(ctx, buffer).await?;
        }

        Ok(result)
    }

    async fn ingest_batch(
        &self,
        ctx: &PipelineContext,
        file: &mut (dyn Read + Send),
        format: &str,
    ) -> PrismResult<IngestionResult> {
        if !format.eq_ignore_ascii_case("csv") {
            return Err(IngestError::UnsupportedFormat(format.to_string()).into());
        }
        self.ingest_stream(ctx, file).await
    }
}
