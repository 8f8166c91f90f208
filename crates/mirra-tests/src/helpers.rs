//! Shared builders for integration tests.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use mirra_core::types::{AppState, ChallengeCompletion, TimelineEntry};
use mirra_metrics::MetricGenerator;

/// Creation instant used by every fixture.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
}

/// An instant in a fixed local offset, for the rate limiter and patterns.
pub fn local(offset_hours: i32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(offset_hours * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 3, day, hour, min, sec)
        .unwrap()
}

/// A plain capture `days` after [`epoch`] with the given confidence.
pub fn entry_at(days: i64, confidence: f64) -> TimelineEntry {
    TimelineEntry::new(
        format!("photo-{days}"),
        epoch() + Duration::days(days),
        confidence,
    )
}

/// Aggregate with `photos` daily captures and `challenges` completions.
pub fn state_with(photos: u32, challenges: u32) -> AppState {
    let mut state = AppState::new(epoch());
    for day in 0..i64::from(photos) {
        state.record_capture(entry_at(day, 0.8)).unwrap();
    }
    for n in 0..challenges {
        let at = epoch() + Duration::hours(i64::from(n) * 20);
        state
            .record_challenge(ChallengeCompletion::new(
                format!("c-{n}"),
                format!("challenge-{}", n % 3),
                at,
            ))
            .unwrap();
    }
    state
}

/// Aggregate whose captures carry generated metric snapshots, one per day.
pub fn state_with_generated(generator: &MetricGenerator, photos: u32) -> AppState {
    let mut state = AppState::new(epoch());
    for day in 0..photos {
        let seed = f64::from(day) / f64::from(photos.max(1));
        let entry = generator
            .capture(format!("gen-{day}"), epoch() + Duration::days(i64::from(day)), seed)
            .unwrap();
        state.record_capture(entry).unwrap();
    }
    state
}
