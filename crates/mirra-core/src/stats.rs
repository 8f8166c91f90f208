//! Confidence classification and moving averages.
//!
//! Pure functions with no state. Empty inputs produce `None` rather than an
//! error so callers can fall back to a neutral value; the only hard failure is
//! classifying against a zero-width range, which is a configuration mistake.

use crate::constants::{CONFIDENCE_HIGH_CUTOFF, CONFIDENCE_MEDIUM_CUTOFF, SIGNIFICANT_CHANGE_FACTOR};
use crate::error::StatsError;
use crate::types::{Bounds, ConfidenceLevel};

/// Map a raw variance onto a coarse confidence label.
///
/// The variance is normalized into `[0, 1]` against `range`; `≤ 0.33` is
/// high confidence, `≤ 0.66` medium, anything above low.
///
/// # Errors
///
/// [`StatsError::DegenerateRange`] when `range.min == range.max`.
///
/// # Examples
///
/// ```
/// use mirra_core::stats::classify_confidence;
/// use mirra_core::types::{Bounds, ConfidenceLevel};
///
/// let range = Bounds::new(0.0, 10.0);
/// assert_eq!(classify_confidence(2.0, range).unwrap(), ConfidenceLevel::High);
/// assert_eq!(classify_confidence(5.0, range).unwrap(), ConfidenceLevel::Medium);
/// assert_eq!(classify_confidence(9.0, range).unwrap(), ConfidenceLevel::Low);
/// ```
pub fn classify_confidence(value: f64, range: Bounds) -> Result<ConfidenceLevel, StatsError> {
    let width = range.width();
    if width == 0.0 {
        return Err(StatsError::DegenerateRange(range.min));
    }

    let normalized = ((value - range.min) / width).clamp(0.0, 1.0);
    Ok(if normalized <= CONFIDENCE_HIGH_CUTOFF {
        ConfidenceLevel::High
    } else if normalized <= CONFIDENCE_MEDIUM_CUTOFF {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    })
}

/// The trailing `window` elements of `values` (all of them if shorter).
fn tail(values: &[f64], window: usize) -> &[f64] {
    &values[values.len().saturating_sub(window)..]
}

/// Arithmetic mean of the last `window` values.
///
/// Returns `None` for an empty sequence or a zero window.
pub fn moving_average(values: &[f64], window: usize) -> Option<f64> {
    let slice = tail(values, window);
    if slice.is_empty() {
        return None;
    }
    Some(slice.iter().sum::<f64>() / slice.len() as f64)
}

/// Linearly weighted mean of the last `window` values.
///
/// The oldest value in the window has weight 1 and the most recent weight
/// `k`, where `k` is the number of values actually in the window.
///
/// ```
/// use mirra_core::stats::weighted_moving_average;
///
/// // (1*10 + 2*20) / 3
/// let wma = weighted_moving_average(&[10.0, 20.0], 10).unwrap();
/// assert!((wma - 50.0 / 3.0).abs() < 1e-9);
/// ```
pub fn weighted_moving_average(values: &[f64], window: usize) -> Option<f64> {
    let slice = tail(values, window);
    if slice.is_empty() {
        return None;
    }

    let (weighted, total_weight) = slice
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(acc, w_acc), (i, v)| {
            let w = (i + 1) as f64;
            (acc + v * w, w_acc + w)
        });
    Some(weighted / total_weight)
}

/// Returns `true` if the move from `previous` to `current` exceeds 1.5× the
/// metric's variance.
pub fn is_significant_change(current: f64, previous: f64, variance: f64) -> bool {
    (current - previous).abs() > variance * SIGNIFICANT_CHANGE_FACTOR
}

/// Plain mean, `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    moving_average(values, values.len())
}
