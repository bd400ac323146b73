//! Dynamic rule path: per-device-type rule loading.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::debug;

use prism_core::errors::StandardizeError;
use prism_core::models::{CleanReading, DeviceType, QuarantineReading, Reading};
use prism_core::traits::ISanitizer;

use crate::sanitizer::ChainSanitizer;
use crate::standardizer::CoreStandardizer;

impl CoreStandardizer {
    /// Group readings by device type and sanitize each group with the
    /// enabled rules loaded for that type. Strict mode: a group whose
    /// rules cannot be loaded or built fails the whole operation.
    ///
    /// Untyped readings form their own group and pass through a
    /// rule-less chain (deduplication only) without a repository
    /// round trip.
    pub(crate) async fn clean_with_dynamic_rules(
        &self,
        readings: Vec<Reading>,
    ) -> Result<(Vec<CleanReading>, Vec<QuarantineReading>), StandardizeError> {
        let Some(rule_repo) = self.rule_repo.clone() else {
            return Err(StandardizeError::RepositoryNotConfigured("cleaning rules"));
        };

        let mut groups: HashMap<Option<DeviceType>, Vec<Reading>> = HashMap::new();
        for reading in readings {
            groups
                .entry(reading.device.device_type)
                .or_default()
                .push(reading);
        }
        debug!(groups = groups.len(), "dynamic sanitize");

        let mut workers: JoinSet<
            Result<(Vec<CleanReading>, Vec<QuarantineReading>), StandardizeError>,
        > = JoinSet::new();
        for (device_type, group) in groups {
            match device_type {
                None => {
                    workers.spawn(async move {
                        Ok(ChainSanitizer::new(Vec::new()).clean(group))
                    });
                }
                Some(device_type) => {
                    let repo = Arc::clone(&rule_repo);
                    let factory = Arc::clone(&self.rule_factory);
                    workers.spawn(async move {
                        let configs = repo
                            .list_enabled_by_device_type(device_type)
                            .await
                            .map_err(|e| StandardizeError::RuleLoadFailed {
                                device_type,
                                message: e.to_string(),
                            })?;
                        let mut rules = Vec::with_capacity(configs.len());
                        for config in &configs {
                            let rule = factory.create(config).map_err(|e| {
                                StandardizeError::RuleBuildFailed {
                                    rule_id: config.id.clone(),
                                    message: e.to_string(),
                                }
                            })?;
                            rules.push(rule);
                        }
                        Ok(ChainSanitizer::new(rules).clean(group))
                    });
                }
            }
        }

        let mut clean = Vec::new();
        let mut quarantined = Vec::new();
        let mut errors = Vec::new();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Ok((group_clean, group_quarantined))) => {
                    clean.extend(group_clean);
                    quarantined.extend(group_quarantined);
                }
                Ok(Err(e)) => errors.push(e),
                Err(e) => errors.push(StandardizeError::WorkerFailed(e.to_string())),
            }
        }
        if !errors.is_empty() {
            return Err(StandardizeError::combine(errors));
        }
        Ok((clean, quarantined))
    }
}
