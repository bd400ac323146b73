//! Hot-path benchmarks: sanitize and the full standardize pipeline.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use prism_core::config::StandardizeConfig;
use prism_core::models::{DeviceInfo, Reading};
use prism_core::traits::ISanitizer;
use prism_core::PipelineContext;
use prism_standardize::rules::{JumpRule, MonotonicRule};
use prism_standardize::{ChainSanitizer, CoreStandardizer};

fn batch(devices: usize, per_device: usize) -> Vec<Reading> {
    let base = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
    let mut readings = Vec::with_capacity(devices * per_device);
    for d in 0..devices {
        for i in 0..per_device {
            readings.push(Reading::new(
                DeviceInfo::new(format!("D{d:03}")),
                base + Duration::minutes(i as i64 * 15),
                100.0 + i as f64 * 0.5,
            ));
        }
    }
    readings
}

fn bench_sanitize(c: &mut Criterion) {
    let sanitizer = ChainSanitizer::new(vec![
        Arc::new(MonotonicRule::new()),
        Arc::new(JumpRule::new(100.0)),
    ]);
    c.bench_function("sanitize_10k", |b| {
        b.iter_batched(
            || batch(100, 100),
            |readings| sanitizer.clean(readings),
            BatchSize::SmallInput,
        )
    });
}

fn bench_process(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .unwrap();
    let service = CoreStandardizer::new(StandardizeConfig::default());
    c.bench_function("process_and_standardize_10k", |b| {
        b.iter_batched(
            || batch(100, 100),
            |readings| {
                runtime
                    .block_on(service.process_and_standardize(&PipelineContext::new(), readings))
                    .unwrap()
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_sanitize, bench_process);
criterion_main!(benches);
