//! The four progress sub-scores, each on a 0–100 scale.
//!
//! Functions taking a timeline expect it sorted by ascending timestamp
//! ([`AppState::sorted_timeline`](mirra_core::AppState::sorted_timeline)).

use std::collections::BTreeSet;

use mirra_core::constants::{IMPROVEMENT_DELTA_CLAMP, NEUTRAL_SCORE};
use mirra_core::stats::{mean, weighted_moving_average};
use mirra_core::types::TimelineEntry;

const SECS_PER_DAY: f64 = 86_400.0;

/// Score capture cadence from the mean gap between consecutive entries.
///
/// | Mean gap (days) | Score |
/// |-----------------|-------|
/// | < 1             | 70    |
/// | 1 – 3           | 100   |
/// | 3 – 7           | 80    |
/// | 7 – 14          | 60    |
/// | > 14            | 40    |
///
/// Fewer than two entries score the neutral 50.
pub fn consistency_score(sorted: &[&TimelineEntry]) -> f64 {
    let [first, .., last] = sorted else {
        return NEUTRAL_SCORE;
    };

    // The mean of consecutive gaps telescopes to total span / gap count.
    let span_days = (last.timestamp - first.timestamp).num_seconds() as f64 / SECS_PER_DAY;
    let avg_gap = span_days / (sorted.len() - 1) as f64;

    if avg_gap < 1.0 {
        70.0
    } else if avg_gap <= 3.0 {
        100.0
    } else if avg_gap <= 7.0 {
        80.0
    } else if avg_gap <= 14.0 {
        60.0
    } else {
        40.0
    }
}

/// Score challenge completions per elapsed day.
///
/// `days_since_start == 0` scores the neutral 50.
pub fn challenge_score(completions: usize, days_since_start: u32) -> f64 {
    if days_since_start == 0 {
        return NEUTRAL_SCORE;
    }

    let rate = completions as f64 / f64::from(days_since_start);
    if rate >= 0.7 {
        100.0
    } else if rate >= 0.5 {
        85.0
    } else if rate >= 0.3 {
        70.0
    } else if rate >= 0.1 {
        55.0
    } else {
        40.0
    }
}

/// Weighted moving average of capture confidence, scaled to 0–100.
pub fn quality_score(sorted: &[&TimelineEntry], window: usize) -> f64 {
    let confidences: Vec<f64> = sorted.iter().map(|e| e.confidence * 100.0).collect();
    weighted_moving_average(&confidences, window).unwrap_or(NEUTRAL_SCORE)
}

/// Compare per-metric means of the newest `window` entries against the
/// `window` entries before them.
///
/// Each metric's delta is clamped to `±50` and halved, the results are
/// averaged over the metrics present in both windows, and the average is
/// added to the neutral 50. The score therefore lies in `[25, 75]`.
pub fn improvement_score(sorted: &[&TimelineEntry], window: usize) -> f64 {
    if window == 0 || sorted.len() < window * 2 {
        return NEUTRAL_SCORE;
    }

    let recent = &sorted[sorted.len() - window..];
    let older = &sorted[sorted.len() - window * 2..sorted.len() - window];

    let ids: BTreeSet<&str> = recent
        .iter()
        .chain(older)
        .flat_map(|e| e.metrics.keys().map(String::as_str))
        .collect();

    let deltas: Vec<f64> = ids
        .into_iter()
        .filter_map(|id| {
            let recent_mean = metric_mean(recent, id)?;
            let older_mean = metric_mean(older, id)?;
            let delta = (recent_mean - older_mean).clamp(-IMPROVEMENT_DELTA_CLAMP, IMPROVEMENT_DELTA_CLAMP);
            Some(delta / 2.0)
        })
        .collect();

    mean(&deltas).map_or(NEUTRAL_SCORE, |d| NEUTRAL_SCORE + d)
}

fn metric_mean(entries: &[&TimelineEntry], id: &str) -> Option<f64> {
    let values: Vec<f64> = entries.iter().filter_map(|e| e.metric_value(id)).collect();
    mean(&values)
}
