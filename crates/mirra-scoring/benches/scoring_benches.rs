//! Criterion benchmarks for mirra-scoring.
//!
//! Covers: full progress score, unlock status and the improvement component
//! on a year-long timeline.

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mirra_core::types::{AppState, Bounds, ChallengeCompletion, ConfidenceLevel, MetricSample, TimelineEntry};
use mirra_scoring::components::improvement_score;
use mirra_scoring::ScoringEngine;

fn year_of_captures() -> AppState {
    let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
    let mut state = AppState::new(t0);
    for day in 0..365i64 {
        let samples = ["jawline_definition", "facial_symmetry", "skin_clarity"]
            .iter()
            .map(|id| MetricSample {
                id: (*id).to_string(),
                value: 60.0 + (day % 7) as f64,
                range: Bounds::new(55.0, 70.0),
                confidence_level: ConfidenceLevel::Medium,
                variance: 3.0,
            });
        let entry = TimelineEntry::new(format!("p{day}"), t0 + Duration::days(day), 0.8).with_metrics(samples);
        state.timeline.push(entry);
        state.challenges.push(ChallengeCompletion::new(
            format!("c{day}"),
            "hydration",
            t0 + Duration::days(day),
        ));
    }
    state
}

fn bench_progress_score(c: &mut Criterion) {
    let engine = ScoringEngine::default();
    let state = year_of_captures();
    let now = state.created_at + Duration::days(366);

    c.bench_function("progress_score_365_entries", |b| {
        b.iter(|| engine.calculate_progress_score(black_box(&state), black_box(now)))
    });
}

fn bench_unlock_status(c: &mut Criterion) {
    let engine = ScoringEngine::default();
    let state = year_of_captures();
    let now = state.created_at + Duration::days(366);

    c.bench_function("unlock_status", |b| {
        b.iter(|| engine.check_unlock_status(black_box(&state), black_box(now)))
    });
}

fn bench_improvement(c: &mut Criterion) {
    let state = year_of_captures();
    let sorted = state.sorted_timeline();

    c.bench_function("improvement_score", |b| {
        b.iter(|| improvement_score(black_box(&sorted), black_box(3)))
    });
}

criterion_group!(
    benches,
    bench_progress_score,
    bench_unlock_status,
    bench_improvement,
);
criterion_main!(benches);
