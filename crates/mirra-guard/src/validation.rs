//! Photo quality validation against fixed thresholds.
//!
//! The capture pipeline reduces each frame to four numbers: mean brightness
//! (0–255), sharpness (variance of the Laplacian), contrast (luminance
//! standard deviation) and face size (fraction of the frame covered by the
//! face box). Each failed check costs a quarter of the confidence.

use std::fmt;

use mirra_core::constants::{
    MAX_BRIGHTNESS, MAX_FACE_SIZE, MIN_BRIGHTNESS, MIN_CONTRAST, MIN_FACE_SIZE, MIN_SHARPNESS,
    MIN_TRUST_SCORE, QUALITY_ISSUE_PENALTY,
};
use mirra_core::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Raw quality measurements of one capture.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhotoQuality {
    pub brightness: f64,
    pub sharpness: f64,
    pub contrast: f64,
    pub face_size: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct ValidationThresholds {
    pub min_brightness: f64,
    pub max_brightness: f64,
    pub min_sharpness: f64,
    pub min_contrast: f64,
    pub min_face_size: f64,
    pub max_face_size: f64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            min_brightness: MIN_BRIGHTNESS,
            max_brightness: MAX_BRIGHTNESS,
            min_sharpness: MIN_SHARPNESS,
            min_contrast: MIN_CONTRAST,
            min_face_size: MIN_FACE_SIZE,
            max_face_size: MAX_FACE_SIZE,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QualityIssue {
    TooDark,
    TooBright,
    Blurry,
    LowContrast,
    FaceTooSmall,
    FaceTooLarge,
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TooDark => "photo is too dark",
            Self::TooBright => "photo is overexposed",
            Self::Blurry => "photo is blurry",
            Self::LowContrast => "contrast is too low",
            Self::FaceTooSmall => "face is too far from the camera",
            Self::FaceTooLarge => "face is too close to the camera",
        };
        f.write_str(s)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    /// `1 - 0.25 * issues`, never below 0.1.
    pub confidence: f64,
    pub issues: Vec<QualityIssue>,
}

impl ValidationThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_brightness > self.max_brightness {
            return Err(ConfigError::InvertedBounds("brightness"));
        }
        if self.min_face_size > self.max_face_size {
            return Err(ConfigError::InvertedBounds("face_size"));
        }
        Ok(())
    }

    pub fn validate_photo(&self, q: &PhotoQuality) -> ValidationResult {
        let mut issues = Vec::new();

        if q.brightness < self.min_brightness {
            issues.push(QualityIssue::TooDark);
        } else if q.brightness > self.max_brightness {
            issues.push(QualityIssue::TooBright);
        }
        if q.sharpness < self.min_sharpness {
            issues.push(QualityIssue::Blurry);
        }
        if q.contrast < self.min_contrast {
            issues.push(QualityIssue::LowContrast);
        }
        if q.face_size < self.min_face_size {
            issues.push(QualityIssue::FaceTooSmall);
        } else if q.face_size > self.max_face_size {
            issues.push(QualityIssue::FaceTooLarge);
        }

        let confidence =
            (1.0 - QUALITY_ISSUE_PENALTY * issues.len() as f64).max(MIN_TRUST_SCORE);
        ValidationResult {
            is_valid: issues.is_empty(),
            confidence,
            issues,
        }
    }
}

/// Validate against the default thresholds.
pub fn validate_photo(q: &PhotoQuality) -> ValidationResult {
    ValidationThresholds::default().validate_photo(q)
}
