//! Epoch-anchored time-grid arithmetic.
//!
//! The grid is the infinite set `{k * interval : k ∈ ℤ}` anchored at
//! interval-aligned epoch boundaries (15-minute marks land on :00,
//! :15, :30, :45), never at the first sample.

use chrono::{DateTime, Duration, DurationRound, Utc};

/// Largest grid point `<= ts`.
pub fn floor_to_interval(ts: DateTime<Utc>, interval: Duration) -> DateTime<Utc> {
    ts.duration_trunc(interval).unwrap_or(ts)
}

/// Smallest grid point `>= ts`; `ts` itself when already aligned.
pub fn ceil_to_interval(ts: DateTime<Utc>, interval: Duration) -> DateTime<Utc> {
    let floored = floor_to_interval(ts, interval);
    if floored == ts {
        ts
    } else {
        floored + interval
    }
}
