//! Property-based checks for the pipeline's quantified invariants:
//! scaling precision, grid membership, and the sanitizer partition.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use prism_core::config::StandardizeConfig;
use prism_core::models::{DeviceInfo, Reading};
use prism_core::traits::{ISanitizer, IUnifier};
use prism_core::PipelineContext;
use prism_standardize::rules::MonotonicRule;
use prism_standardize::{ChainSanitizer, CoreStandardizer, MetricUnifier};

// ─── Strategy helpers ───────────────────────────────────────────────────────

/// Generate a batch of readings over a handful of devices and a few
/// hours of offsets.
fn readings_strategy(max_len: usize) -> impl Strategy<Value = Vec<Reading>> {
    prop::collection::vec(
        (0u8..3, 0i64..10_000, -100.0f64..1000.0),
        0..=max_len,
    )
    .prop_map(|entries| {
        let base = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        entries
            .into_iter()
            .map(|(dev, offset_secs, value)| {
                Reading::new(
                    DeviceInfo::new(format!("D{dev}")),
                    base + Duration::seconds(offset_secs),
                    value,
                )
            })
            .collect()
    })
}

// ─── Scaling invariants ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn scaled_value_stays_within_one_tick(value in -1.0e12f64..1.0e12) {
        let unifier = MetricUnifier::default();
        let scaled = unifier.to_scaled(value);
        let exact = value * unifier.scale_factor() as f64;
        prop_assert!((scaled as f64 - exact).abs() < 1.0);
    }

    #[test]
    fn from_scaled_reconstructs_within_precision(value in -1.0e9f64..1.0e9) {
        let unifier = MetricUnifier::default();
        let back = unifier.from_scaled(unifier.to_scaled(value));
        prop_assert!((back - value).abs() < 1.0 / unifier.scale_factor() as f64);
    }
}

// ─── Sanitizer partition ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn every_reading_lands_in_exactly_one_stream(readings in readings_strategy(64)) {
        let total = readings.len();
        let sanitizer = ChainSanitizer::new(vec![Arc::new(MonotonicRule::new())]);

        let (clean, quarantined) = sanitizer.clean(readings);

        prop_assert_eq!(clean.len() + quarantined.len(), total);
        prop_assert!(quarantined.iter().all(|q| !q.reason.is_empty()));

        // Strictly ascending, no duplicate timestamps, per device.
        for device in ["D0", "D1", "D2"] {
            let times: Vec<_> = clean
                .iter()
                .filter(|c| c.reading.device.id == device)
                .map(|c| c.reading.timestamp)
                .collect();
            prop_assert!(times.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

// ─── Grid membership ────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn emitted_timestamps_lie_on_the_epoch_grid(readings in readings_strategy(32)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let config = StandardizeConfig::default();
        let interval_secs = config.standard_interval_secs;
        let service = CoreStandardizer::new(config);

        let standards = runtime
            .block_on(service.process_and_standardize(&PipelineContext::new(), readings))
            .unwrap();

        for standard in &standards {
            prop_assert_eq!(standard.timestamp.timestamp() % interval_secs, 0);
            let exact = standard.value_display * standard.scale_factor as f64;
            prop_assert!((standard.value_scaled as f64 - exact).abs() < 1.0);
        }
    }
}
