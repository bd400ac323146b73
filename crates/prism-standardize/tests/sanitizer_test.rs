//! Sanitizer chain scenarios: ordering, deduplication, rule
//! short-circuiting, and correction pass-through.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use prism_core::models::{DeviceInfo, Reading, RuleAction};
use prism_core::traits::{ICleaningRule, ISanitizer};
use prism_standardize::rules::{JumpRule, MonotonicRule, RangeRule};
use prism_standardize::ChainSanitizer;

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, 10, 0, 0).unwrap()
}

fn reading(device: &str, offset_mins: i64, value: f64) -> Reading {
    Reading::new(
        DeviceInfo::new(device),
        t0() + Duration::minutes(offset_mins),
        value,
    )
}

fn chain(rules: Vec<Arc<dyn ICleaningRule>>) -> ChainSanitizer {
    ChainSanitizer::new(rules)
}

// ─── S1: monotonic + jump chain ─────────────────────────────────────────────

#[test]
fn s1_monotonic_and_jump_chain() {
    let sanitizer = chain(vec![
        Arc::new(MonotonicRule::new()),
        Arc::new(JumpRule::new(100.0)),
    ]);
    let input = vec![
        reading("D1", 0, 100.0),
        reading("D1", 1, 150.0),
        reading("D1", 2, 140.0), // regression
        reading("D1", 3, 300.0), // jump of 150 from 150
        reading("D1", 4, 200.0),
    ];

    let (clean, quarantined) = sanitizer.clean(input);

    let values: Vec<f64> = clean.iter().map(|c| c.reading.value).collect();
    assert_eq!(values, vec![100.0, 150.0, 200.0]);

    assert_eq!(quarantined.len(), 2);
    assert!(quarantined[0].reason.starts_with("value regression"));
    assert!(quarantined[1].reason.starts_with("abnormal jump"));
}

// ─── S2: duplicate timestamps ───────────────────────────────────────────────

#[test]
fn s2_duplicates_and_regression() {
    let sanitizer = chain(vec![Arc::new(MonotonicRule::new())]);
    let input = vec![
        reading("D1", 0, 100.0),
        reading("D1", 0, 100.0),        // duplicate
        reading("D1", 30, 20.0),        // regression
        reading("D1", 60, 100.000_19),
    ];

    let (clean, quarantined) = sanitizer.clean(input);

    assert_eq!(clean.len(), 2);
    assert_eq!(clean[0].reading.value, 100.0);
    assert_eq!(clean[1].reading.value, 100.000_19);

    assert_eq!(quarantined.len(), 2);
    let reasons: Vec<&str> = quarantined.iter().map(|q| q.reason.as_str()).collect();
    assert!(reasons.contains(&"Duplicate timestamp"));
    assert!(reasons.iter().any(|r| r.starts_with("value regression")));
}

// ─── Partition invariant ────────────────────────────────────────────────────

#[test]
fn every_input_lands_in_exactly_one_stream() {
    let sanitizer = chain(vec![
        Arc::new(MonotonicRule::new()),
        Arc::new(JumpRule::new(50.0)),
    ]);
    let input: Vec<Reading> = (0..20)
        .map(|i| reading("D1", i, if i % 4 == 3 { -1.0 } else { i as f64 * 10.0 }))
        .collect();
    let total = input.len();

    let (clean, quarantined) = sanitizer.clean(input);

    assert_eq!(clean.len() + quarantined.len(), total);
    assert!(quarantined.iter().all(|q| !q.reason.is_empty()));
}

#[test]
fn clean_output_is_strictly_ascending_per_device() {
    let sanitizer = chain(Vec::new());
    let input = vec![
        reading("D2", 10, 2.0),
        reading("D1", 0, 1.0),
        reading("D1", 10, 2.0),
        reading("D2", 0, 1.0),
        reading("D1", 5, 1.5),
    ];

    let (clean, _) = sanitizer.clean(input);

    for device in ["D1", "D2"] {
        let times: Vec<_> = clean
            .iter()
            .filter(|c| c.reading.device.id == device)
            .map(|c| c.reading.timestamp)
            .collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]), "{device} not strictly ascending");
    }
}

// ─── Correction semantics ───────────────────────────────────────────────────

#[test]
fn corrected_value_feeds_next_rule_and_next_prev() {
    // Range clamps 500 down to 200; jump then compares against the
    // corrected value and passes.
    let sanitizer = chain(vec![
        Arc::new(RangeRule::new(0.0, 200.0).with_action(RuleAction::Correct)),
        Arc::new(JumpRule::new(150.0)),
    ]);
    let input = vec![
        reading("D1", 0, 100.0),
        reading("D1", 15, 500.0), // clamped to 200, jump diff 100 ok
        reading("D1", 30, 260.0), // prev is the corrected 200, diff 60 ok
    ];

    let (clean, quarantined) = sanitizer.clean(input);

    assert!(quarantined.is_empty());
    let values: Vec<f64> = clean.iter().map(|c| c.reading.value).collect();
    assert_eq!(values, vec![100.0, 200.0, 260.0]);
    assert!(clean[1].corrected);
    assert!(!clean[0].corrected && !clean[2].corrected);
}

#[test]
fn rejected_reading_keeps_original_value_in_quarantine() {
    // Range clamps -500 up to 0, monotonic then rejects the corrected
    // 0 against prev 50; the quarantine snapshot must still be the raw
    // -500, not the half-corrected working copy.
    let sanitizer = chain(vec![
        Arc::new(RangeRule::new(0.0, 90.0).with_action(RuleAction::Correct)),
        Arc::new(MonotonicRule::new()),
    ]);
    let input = vec![reading("D1", 0, 50.0), reading("D1", 15, -500.0)];

    let (clean, quarantined) = sanitizer.clean(input);

    assert_eq!(clean.len(), 1);
    assert_eq!(quarantined.len(), 1);
    assert_eq!(quarantined[0].reading.value, -500.0);
    assert!(quarantined[0].reason.starts_with("value regression"));
}
