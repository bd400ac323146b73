//! Tolerance-bounded nearest-neighbor snapshotter.

use chrono::{DateTime, Duration, Utc};

use prism_core::models::Reading;
use prism_core::traits::IAligner;

/// Binary-search aligner over a time-sorted slice: O(log n) per probe.
pub struct TimeAligner {
    tolerance: Duration,
}

impl TimeAligner {
    pub fn new(tolerance: Duration) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }
}

impl IAligner for TimeAligner {
    fn find_snapshot_index(&self, readings: &[Reading], target: DateTime<Utc>) -> Option<usize> {
        if readings.is_empty() {
            return None;
        }

        // First index with timestamp >= target; the best candidate is
        // that reading or its predecessor.
        let idx = readings.partition_point(|r| r.timestamp < target);

        let mut best: Option<(usize, Duration)> = None;
        let candidates = [idx.checked_sub(1), (idx < readings.len()).then_some(idx)];
        for i in candidates.into_iter().flatten() {
            let diff = (readings[i].timestamp - target).abs();
            if diff > self.tolerance {
                continue;
            }
            // Strict improvement only: on an exact-distance tie the
            // earlier reading (visited first) stays the winner.
            if best.map_or(true, |(_, best_diff)| diff < best_diff) {
                best = Some((i, diff));
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use prism_core::models::DeviceInfo;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, h, m, 0).unwrap()
    }

    fn reading(h: u32, m: u32) -> Reading {
        Reading::new(DeviceInfo::new("D1"), at(h, m), 1.0)
    }

    #[test]
    fn empty_slice_yields_none() {
        let aligner = TimeAligner::new(Duration::minutes(5));
        assert!(aligner.find_snapshot(&[], at(10, 0)).is_none());
    }

    #[test]
    fn exact_match_wins() {
        let aligner = TimeAligner::new(Duration::minutes(5));
        let readings = vec![reading(10, 0), reading(10, 15)];
        let snap = aligner.find_snapshot(&readings, at(10, 15)).unwrap();
        assert_eq!(snap.timestamp, at(10, 15));
    }

    #[test]
    fn nearest_neighbor_within_tolerance() {
        let aligner = TimeAligner::new(Duration::minutes(5));
        let readings = vec![reading(10, 0), reading(10, 16)];
        let snap = aligner.find_snapshot(&readings, at(10, 15)).unwrap();
        assert_eq!(snap.timestamp, at(10, 16));
    }

    #[test]
    fn boundary_distance_is_accepted() {
        let aligner = TimeAligner::new(Duration::minutes(5));
        let readings = vec![reading(10, 35)];
        assert!(aligner.find_snapshot(&readings, at(10, 30)).is_some());
    }

    #[test]
    fn outside_tolerance_yields_none() {
        let aligner = TimeAligner::new(Duration::minutes(5));
        let readings = vec![reading(10, 35)];
        assert!(aligner.find_snapshot(&readings, at(10, 45)).is_none());
    }

    #[test]
    fn exact_tie_resolves_to_earlier_reading() {
        let aligner = TimeAligner::new(Duration::minutes(5));
        let readings = vec![reading(10, 5), reading(10, 15)];
        let snap = aligner.find_snapshot(&readings, at(10, 10)).unwrap();
        assert_eq!(snap.timestamp, at(10, 5));
    }

    #[test]
    fn target_before_all_readings() {
        let aligner = TimeAligner::new(Duration::minutes(5));
        let readings = vec![reading(10, 4), reading(10, 15)];
        let snap = aligner.find_snapshot(&readings, at(10, 0)).unwrap();
        assert_eq!(snap.timestamp, at(10, 4));
    }
}
