//! Trust scoring.
//!
//! Folds the per-capture checks into one score in `[0.1, 1.0]`. The score
//! starts at the validation confidence and is cut by a fixed penalty for a
//! detected filter and another for an off-angle capture. Cadence flags from
//! [`detect_suspicious_patterns`] are applied on top via
//! [`TrustScore::with_pattern`].

use std::fmt;

use chrono::{DateTime, FixedOffset};
use mirra_core::constants::{
    ANGLE_PENALTY, FILTER_PENALTY, MAX_TRUST_SCORE, MIN_TRUST_SCORE, TRUST_HIGH_CUTOFF,
    TRUST_MEDIUM_CUTOFF,
};
use mirra_core::traits::Pose;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::angle::{check_angle_consistency, AngleResult};
use crate::filters::{detect_filters, CaptureMetadata, FilterResult};
use crate::patterns::{detect_suspicious_patterns, PatternReport};
use crate::validation::{PhotoQuality, ValidationResult, ValidationThresholds};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    High,
    Medium,
    Low,
}

impl TrustLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= TRUST_HIGH_CUTOFF {
            Self::High
        } else if score >= TRUST_MEDIUM_CUTOFF {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => f.write_str("high"),
            Self::Medium => f.write_str("medium"),
            Self::Low => f.write_str("low"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrustScore {
    pub score: f64,
    pub level: TrustLevel,
    pub message: String,
}

impl TrustScore {
    fn new(score: f64, message: String) -> Self {
        let score = score.clamp(MIN_TRUST_SCORE, MAX_TRUST_SCORE);
        Self {
            score,
            level: TrustLevel::from_score(score),
            message,
        }
    }

    /// Apply a cadence report's multiplier. A clean report leaves the score
    /// untouched.
    pub fn with_pattern(self, report: &PatternReport) -> Self {
        let Some(first) = report.patterns.first() else {
            return self;
        };
        Self::new(
            self.score * report.trust_multiplier,
            format!("{} ({})", self.message, first.description()),
        )
    }
}

pub fn calculate_trust_score(
    validation: &ValidationResult,
    filter: &FilterResult,
    angle: &AngleResult,
) -> TrustScore {
    let mut score = validation.confidence;
    if filter.filter_detected {
        score *= FILTER_PENALTY;
    }
    if !angle.is_consistent {
        score *= ANGLE_PENALTY;
    }

    let message = if let Some(issue) = validation.issues.first() {
        format!("Photo quality check failed: {issue}")
    } else if filter.filter_detected {
        match &filter.software {
            Some(software) => format!("Editing software detected: {software}"),
            None => "Photo appears to have been edited after capture".to_string(),
        }
    } else if !angle.is_consistent {
        format!(
            "Camera angle differs from previous photos by {:.1}°",
            angle.deviation
        )
    } else if score < TRUST_HIGH_CUTOFF {
        "Photo looks genuine with minor concerns".to_string()
    } else {
        "Photo looks genuine".to_string()
    };

    TrustScore::new(score, message)
}

/// Everything the capture pipeline knows about one photo.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Capture {
    pub quality: PhotoQuality,
    #[serde(default)]
    pub metadata: CaptureMetadata,
    /// Detected head pose; `None` skips the angle check.
    #[serde(default)]
    pub pose: Option<Pose>,
    #[serde(default)]
    pub pose_history: Vec<Pose>,
    /// Earlier upload times, for cadence checks.
    #[serde(default)]
    pub upload_history: Vec<DateTime<FixedOffset>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaptureAssessment {
    pub validation: ValidationResult,
    pub filter: FilterResult,
    pub angle: AngleResult,
    pub patterns: PatternReport,
    pub trust: TrustScore,
}

/// Run every per-capture check and the cadence check.
pub fn assess_capture(capture: &Capture, thresholds: &ValidationThresholds) -> CaptureAssessment {
    let validation = thresholds.validate_photo(&capture.quality);
    let filter = detect_filters(&capture.metadata);
    let angle = match capture.pose {
        Some(pose) => check_angle_consistency(pose, &capture.pose_history),
        None => AngleResult::unchecked(None),
    };
    let patterns = detect_suspicious_patterns(&capture.upload_history);
    let trust = calculate_trust_score(&validation, &filter, &angle).with_pattern(&patterns);

    debug!(score = trust.score, level = %trust.level, "trust: capture assessed");

    CaptureAssessment {
        validation,
        filter,
        angle,
        patterns,
        trust,
    }
}
