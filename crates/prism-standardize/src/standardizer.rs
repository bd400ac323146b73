//! The standardization orchestrator.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error};

use prism_core::config::StandardizeConfig;
use prism_core::errors::StandardizeError;
use prism_core::models::{
    CleanReading, IngestStrategy, QualityState, QuarantineReading, Reading, ReadingType,
    StandardReading,
};
use prism_core::traits::{
    IAligner, ICleaningRule, ICleaningRuleRepository, IQuarantineRepository, IReadingSink,
    IRuleFactory, ISanitizer, IStandardReadingRepository, IUnifier, UpsertStrategy,
};
use prism_core::{PipelineCancellation, PipelineContext, PrismResult};

use crate::aligner::TimeAligner;
use crate::grid;
use crate::rules::RuleFactory;
use crate::sanitizer::ChainSanitizer;
use crate::unifier::MetricUnifier;

/// Orchestrates sanitize → shard → align → scale → persist.
///
/// Construction-time configuration is immutable afterwards; rules and
/// repositories are injected as shared collaborators. Without a
/// repository the service runs in stateless compute-only mode.
pub struct CoreStandardizer {
    pub(crate) sanitizer: Arc<dyn ISanitizer>,
    pub(crate) aligner: Arc<dyn IAligner>,
    pub(crate) unifier: Arc<dyn IUnifier>,
    pub(crate) interval: Duration,
    pub(crate) concurrency_limit: usize,
    pub(crate) flush_timeout: std::time::Duration,
    pub(crate) repo: Option<Arc<dyn IStandardReadingRepository>>,
    pub(crate) rule_repo: Option<Arc<dyn ICleaningRuleRepository>>,
    pub(crate) rule_factory: Arc<dyn IRuleFactory>,
    pub(crate) quarantine_repo: Option<Arc<dyn IQuarantineRepository>>,
}

impl CoreStandardizer {
    /// Build from configuration; non-positive values fall back to the
    /// defaults.
    pub fn new(config: StandardizeConfig) -> Self {
        let defaults = StandardizeConfig::default();
        let interval = if config.standard_interval_secs > 0 {
            config.standard_interval()
        } else {
            defaults.standard_interval()
        };
        let tolerance = if config.tolerance_secs > 0 {
            config.tolerance()
        } else {
            defaults.tolerance()
        };
        let concurrency_limit = if config.concurrency_limit > 0 {
            config.concurrency_limit
        } else {
            defaults.concurrency_limit
        };

        Self {
            sanitizer: Arc::new(ChainSanitizer::new(Vec::new())),
            aligner: Arc::new(TimeAligner::new(tolerance)),
            unifier: Arc::new(MetricUnifier::new(config.scale_factor)),
            interval,
            concurrency_limit,
            flush_timeout: config.quarantine_flush_timeout(),
            repo: None,
            rule_repo: None,
            rule_factory: Arc::new(RuleFactory::new()),
            quarantine_repo: None,
        }
    }

    /// Replace the static rule chain.
    pub fn with_rules(mut self, rules: Vec<Arc<dyn ICleaningRule>>) -> Self {
        self.sanitizer = Arc::new(ChainSanitizer::new(rules));
        self
    }

    /// Swap in a custom sanitizer implementation.
    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn ISanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn with_repository(mut self, repo: Arc<dyn IStandardReadingRepository>) -> Self {
        self.repo = Some(repo);
        self
    }

    pub fn with_quarantine_repository(mut self, repo: Arc<dyn IQuarantineRepository>) -> Self {
        self.quarantine_repo = Some(repo);
        self
    }

    /// Enable the dynamic rule path: sanitization groups readings by
    /// device type and loads enabled rules from this repository.
    pub fn with_rule_repository(mut self, repo: Arc<dyn ICleaningRuleRepository>) -> Self {
        self.rule_repo = Some(repo);
        self
    }

    pub fn with_rule_factory(mut self, factory: Arc<dyn IRuleFactory>) -> Self {
        self.rule_factory = factory;
        self
    }

    /// Exact standard reading for `(device_id, timestamp)`.
    ///
    /// Query-only operation: fails when no repository is configured.
    pub async fn get_standard_reading(
        &self,
        device_id: &str,
        timestamp: DateTime<Utc>,
    ) -> PrismResult<Option<StandardReading>> {
        let Some(repo) = &self.repo else {
            return Err(StandardizeError::RepositoryNotConfigured("standard readings").into());
        };
        Ok(repo.find_exact(device_id, timestamp).await?)
    }

    /// Clean, align, scale, and (when configured) persist one batch.
    ///
    /// Any error means no standards are returned: partial output is
    /// never surfaced. The aggregated error reports cancellation when
    /// any shard observed it.
    pub async fn process_and_standardize(
        &self,
        ctx: &PipelineContext,
        raw_readings: Vec<Reading>,
    ) -> PrismResult<Vec<StandardReading>> {
        let (clean, mut quarantined) = if self.rule_repo.is_some() {
            self.clean_with_dynamic_rules(raw_readings).await?
        } else {
            self.sanitizer.clean(raw_readings)
        };

        if let Some(ingest) = ctx.ingest() {
            if !ingest.batch_id.is_empty() {
                for record in &mut quarantined {
                    record.batch_id = Some(ingest.batch_id.clone());
                }
            }
        }
        self.spawn_quarantine_flush(quarantined);

        // Read once per invocation; absent context means realtime.
        let priority = ctx
            .ingest()
            .map_or(IngestStrategy::Realtime.priority(), |i| {
                i.strategy.priority()
            });

        let mut groups: HashMap<String, Vec<CleanReading>> = HashMap::new();
        for reading in clean {
            groups
                .entry(reading.reading.device.id.clone())
                .or_default()
                .push(reading);
        }
        debug!(devices = groups.len(), "standardizing batch");

        let semaphore = Arc::new(Semaphore::new(self.concurrency_limit));
        let mut workers: JoinSet<Result<Vec<StandardReading>, StandardizeError>> = JoinSet::new();
        for (_, shard) in groups {
            let semaphore = Arc::clone(&semaphore);
            let aligner = Arc::clone(&self.aligner);
            let unifier = Arc::clone(&self.unifier);
            let cancellation = ctx.cancellation().clone();
            let interval = self.interval;
            workers.spawn(async move {
                // Held for the worker's whole lifetime; released on
                // every exit path by drop.
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| StandardizeError::WorkerFailed(e.to_string()))?;
                standardize_shard(
                    shard,
                    interval,
                    priority,
                    aligner.as_ref(),
                    unifier.as_ref(),
                    &cancellation,
                )
            });
        }

        let mut standards = Vec::new();
        let mut errors = Vec::new();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Ok(mut shard_standards)) => standards.append(&mut shard_standards),
                Ok(Err(e)) => errors.push(e),
                Err(e) => errors.push(StandardizeError::WorkerFailed(e.to_string())),
            }
        }
        if !errors.is_empty() {
            return Err(StandardizeError::combine(errors).into());
        }

        if let Some(repo) = &self.repo {
            if !standards.is_empty() {
                repo.save_batch(&standards, UpsertStrategy::HighPriorityWins)
                    .await
                    .map_err(|e| StandardizeError::PersistFailed(e.to_string()))?;
            }
        }

        Ok(standards)
    }

    /// Persist quarantined records on a detached task with its own
    /// timeout, so the flush neither blocks the pipeline nor inherits
    /// the caller's cancellation. Failures are logged, never returned.
    fn spawn_quarantine_flush(&self, quarantined: Vec<QuarantineReading>) {
        if quarantined.is_empty() {
            return;
        }
        let Some(repo) = self.quarantine_repo.clone() else {
            return;
        };
        let flush_timeout = self.flush_timeout;
        tokio::spawn(async move {
            let count = quarantined.len();
            let flush = async {
                for record in &quarantined {
                    if let Err(err) = repo.save(record).await {
                        error!(
                            device_id = %record.reading.device.id,
                            timestamp = %record.reading.timestamp,
                            reason = %record.reason,
                            error = %err,
                            "failed to save quarantine reading"
                        );
                    }
                }
            };
            if tokio::time::timeout(flush_timeout, flush).await.is_err() {
                error!(
                    records = count,
                    timeout_secs = flush_timeout.as_secs(),
                    "quarantine flush timed out"
                );
            }
        });
    }
}

#[async_trait]
impl IReadingSink for CoreStandardizer {
    async fn deliver(&self, ctx: &PipelineContext, batch: Vec<Reading>) -> PrismResult<()> {
        self.process_and_standardize(ctx, batch).await.map(|_| ())
    }
}

/// Align one device shard onto the grid and scale each snapshot.
///
/// Output is ascending by grid timestamp. Cancellation is polled on
/// every grid step.
fn standardize_shard(
    mut shard: Vec<CleanReading>,
    interval: Duration,
    priority: i32,
    aligner: &dyn IAligner,
    unifier: &dyn IUnifier,
    cancellation: &PipelineCancellation,
) -> Result<Vec<StandardReading>, StandardizeError> {
    if shard.is_empty() {
        return Ok(Vec::new());
    }

    // Sanitizer output is time-sorted, but sharding by device loses
    // that guarantee.
    shard.sort_by(|a, b| a.reading.timestamp.cmp(&b.reading.timestamp));
    let corrected: Vec<bool> = shard.iter().map(|c| c.corrected).collect();
    let readings: Vec<Reading> = shard.into_iter().map(|c| c.reading).collect();

    let grid_start = grid::floor_to_interval(readings[0].timestamp, interval);
    let grid_end = grid::ceil_to_interval(readings[readings.len() - 1].timestamp, interval);

    let mut out = Vec::new();
    let mut t = grid_start;
    while t <= grid_end {
        if cancellation.is_cancelled() {
            return Err(StandardizeError::Cancelled);
        }
        if let Some(i) = aligner.find_snapshot_index(&readings, t) {
            out.push(standardize_one(
                &readings[i],
                corrected[i],
                t,
                priority,
                unifier,
            ));
        }
        t = t + interval;
    }
    Ok(out)
}

/// Map one snapshot onto the canonical record, with the timestamp
/// forced onto the grid point it answered for.
fn standardize_one(
    reading: &Reading,
    corrected: bool,
    grid_timestamp: DateTime<Utc>,
    priority: i32,
    unifier: &dyn IUnifier,
) -> StandardReading {
    StandardReading {
        device_id: reading.device.id.clone(),
        timestamp: grid_timestamp,
        value_scaled: unifier.to_scaled(reading.value),
        scale_factor: unifier.scale_factor(),
        value_display: reading.value,
        quality: if corrected {
            QualityState::Corrected
        } else {
            QualityState::Valid
        },
        source_type: ReadingType::Standard,
        ingested_at: Utc::now(),
        priority,
    }
}
