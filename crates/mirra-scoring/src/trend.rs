//! Direction of capture confidence over time.

use std::fmt;

use mirra_core::stats::mean;
use mirra_core::types::TimelineEntry;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
    /// Not enough captures to compare yet.
    Building,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Declining => "declining",
            Self::Building => "building",
        };
        f.write_str(s)
    }
}

/// Compare mean confidence of the newest `window` entries against up to
/// `window` entries before them.
///
/// Fewer than `window` entries, or nothing before the newest window, is
/// [`Trend::Building`]. Exactly `window` entries count as nothing before the
/// newest window, so a single full window is still building. A difference strictly beyond `±epsilon` is improving
/// or declining; anything else is stable.
pub fn calculate_trend(sorted: &[&TimelineEntry], window: usize, epsilon: f64) -> Trend {
    if window == 0 || sorted.len() < window {
        return Trend::Building;
    }

    let split = sorted.len() - window;
    let recent = &sorted[split..];
    let older = &sorted[split.saturating_sub(window)..split];

    let confidence = |entries: &[&TimelineEntry]| {
        mean(&entries.iter().map(|e| e.confidence).collect::<Vec<_>>())
    };

    let (Some(recent_mean), Some(older_mean)) = (confidence(recent), confidence(older)) else {
        return Trend::Building;
    };

    let diff = recent_mean - older_mean;
    if diff > epsilon {
        Trend::Improving
    } else if diff < -epsilon {
        Trend::Declining
    } else {
        Trend::Stable
    }
}
