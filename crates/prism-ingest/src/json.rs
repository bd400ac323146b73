//! JSON ingest adapter.

use std::io::Read;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use prism_core::errors::IngestError;
use prism_core::models::{DeviceInfo, IngestionResult, Reading};
use prism_core::traits::{IIngestor, IReadingSink};
use prism_core::{PipelineContext, PrismResult};

use crate::record::{parse_device_type, parse_timestamp};
use crate::BATCH_SIZE;

/// Flat wire payload. `value` stays a [`serde_json::Number`] so the
/// decimal text is converted exactly once.
#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(default)]
    device_id: String,
    #[serde(default)]
    model: String,
    #[serde(default, rename = "type")]
    device_type: String,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    value: Option<serde_json::Number>,
}

/// Accepts either a single flat object or an array of them. Records
/// that fail domain mapping are counted and skipped; malformed JSON
/// aborts the stream.
pub struct JsonIngestor {
    downstream: Arc<dyn IReadingSink>,
}

impl JsonIngestor {
    pub fn new(downstream: Arc<dyn IReadingSink>) -> Self {
        Self { downstream }
    }

    fn map_to_reading(payload: &RawPayload) -> Result<Reading, IngestError> {
        let timestamp = parse_timestamp(&payload.timestamp)?;
        let value = payload
            .value
            .as_ref()
            .and_then(serde_json::Number::as_f64)
            .ok_or_else(|| {
                IngestError::InvalidValue(
                    payload
                        .value
                        .as_ref()
                        .map_or_else(|| "missing".to_string(), |n| n.to_string()),
                )
            })?;
        Ok(Reading {
            device: DeviceInfo {
                id: payload.device_id.clone(),
                model: payload.model.clone(),
                device_type: parse_device_type(&payload.device_type)?,
            },
            timestamp,
            value,
        })
    }

    async fn ingest_payloads(
        &self,
        ctx: &PipelineContext,
        payloads: Vec<RawPayload>,
    ) -> PrismResult<IngestionResult> {
        let mut result = IngestionResult::default();
        let mut buffer: Vec<Reading> = Vec::with_capacity(BATCH_SIZE);

        for payload in &payloads {
            result.total += 1;
            match Self::map_to_reading(payload) {
                Ok(reading) => {
                    buffer.push(reading);
                    result.success += 1;
                }
                Err(err) => {
                    result.failed += 1;
                    result.errors.push(format!("item {}: {err}", result.total));
                    warn!(item = result.total, error = %err, "json record skipped");
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
}

#[async_trait]
impl IIngestor for JsonIngestor {
    async fn ingest_stream(
        &self,
        ctx: &PipelineContext,
        stream: &mut (dyn Read + Send),
    ) -> PrismResult<IngestionResult> {
        let mut body = String::new();
        stream
            .read_to_string(&mut body)
            .map_err(IngestError::from)?;
        let trimmed = body.trim_start();
        if trimmed.is_empty() {
            return Ok(IngestionResult::default());
        }

        let payloads: Vec<RawPayload> = match trimmed.as_bytes()[0] {
            b'[' => serde_json::from_str(trimmed)
                .map_err(|e| IngestError::MalformedPayload(e.to_string()))?,
            b'{' => vec![serde_json::from_str(trimmed)
                .map_err(|e| IngestError::MalformedPayload(e.to_string()))?],
            other => {
                return Err(IngestError::MalformedPayload(format!(
                    "expected '[' or '{{', got '{}'",
                    other as char
                ))
                .into());
            }
        };

        self.ingest_payloads(ctx, payloads).await
    }

    async fn ingest_batch(
        &self,
        ctx: &PipelineContext,
        file: &mut (dyn Read + Send),
        format: &str,
    ) -> PrismResult<IngestionResult> {
        if !format.eq_ignore_ascii_case("json") {
            return Err(IngestError::UnsupportedFormat(format.to_string()).into());
        }
        self.ingest_stream(ctx, file).await
    }
}
