//! Suspicious upload cadence detection.
//!
//! Two patterns are flagged:
//! - **rapid uploads**: more than [`MAX_RAPID_PAIRS`] neighbouring uploads
//!   less than [`RAPID_UPLOAD_GAP_SECS`] apart
//! - **suspicious consistency**: more than [`MAX_SAME_HOUR_UPLOADS`] uploads
//!   that all fall in the same hour of the day
//!
//! Each pattern carries a trust multiplier; the report keeps the harshest.

use chrono::{DateTime, Duration, FixedOffset, Timelike};
use mirra_core::constants::{
    MAX_RAPID_PAIRS, MAX_SAME_HOUR_UPLOADS, MIN_PATTERN_HISTORY, RAPID_UPLOAD_GAP_SECS,
    RAPID_UPLOAD_MULTIPLIER, SAME_HOUR_MULTIPLIER,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SuspiciousPattern {
    RapidUploads { pairs: usize },
    SuspiciousConsistency { hour: u32, uploads: usize },
}

impl SuspiciousPattern {
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::RapidUploads { .. } => RAPID_UPLOAD_MULTIPLIER,
            Self::SuspiciousConsistency { .. } => SAME_HOUR_MULTIPLIER,
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::RapidUploads { pairs } => {
                format!("{pairs} uploads within {RAPID_UPLOAD_GAP_SECS}s of the previous one")
            }
            Self::SuspiciousConsistency { hour, uploads } => {
                format!("all {uploads} uploads taken during hour {hour:02}")
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatternReport {
    pub patterns: Vec<SuspiciousPattern>,
    /// 1.0 when nothing is flagged, else the lowest pattern multiplier.
    pub trust_multiplier: f64,
}

impl PatternReport {
    fn clean() -> Self {
        Self {
            patterns: Vec::new(),
            trust_multiplier: 1.0,
        }
    }

    pub fn is_suspicious(&self) -> bool {
        !self.patterns.is_empty()
    }
}

/// Inspect an upload history for suspicious cadence.
///
/// Order of `timestamps` does not matter. Histories shorter than
/// [`MIN_PATTERN_HISTORY`] are never flagged.
pub fn detect_suspicious_patterns(timestamps: &[DateTime<FixedOffset>]) -> PatternReport {
    if timestamps.len() < MIN_PATTERN_HISTORY {
        return PatternReport::clean();
    }

    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let mut patterns = Vec::new();

    let rapid_gap = Duration::seconds(RAPID_UPLOAD_GAP_SECS);
    let rapid_pairs = sorted
        .windows(2)
        .filter(|pair| pair[0] - pair[1] < rapid_gap)
        .count();
    if rapid_pairs > MAX_RAPID_PAIRS {
        patterns.push(SuspiciousPattern::RapidUploads { pairs: rapid_pairs });
    }

    let first_hour = sorted[0].hour();
    if sorted.len() > MAX_SAME_HOUR_UPLOADS && sorted.iter().all(|t| t.hour() == first_hour) {
        patterns.push(SuspiciousPattern::SuspiciousConsistency {
            hour: first_hour,
            uploads: sorted.len(),
        });
    }

    let trust_multiplier = patterns
        .iter()
        .map(SuspiciousPattern::multiplier)
        .fold(1.0, f64::min);

    for p in &patterns {
        warn!(pattern = %p.description(), trust_multiplier, "patterns: suspicious upload cadence");
    }

    PatternReport {
        patterns,
        trust_multiplier,
    }
}
