//! Scoring configuration.
//!
//! Defaults match the shipped app. Every field can be overridden from a
//! config file; call [`ScoringConfig::validate`] after loading.

use mirra_core::constants::{
    IMPROVEMENT_WINDOW, MIN_CHALLENGES_FOR_UNLOCK, MIN_DAYS_FOR_UNLOCK, MIN_PHOTOS_FOR_UNLOCK,
    QUALITY_WINDOW, TREND_EPSILON, TREND_WINDOW, WEIGHT_CHALLENGE_COMPLETION, WEIGHT_CONSISTENCY,
    WEIGHT_IMPROVEMENT, WEIGHT_PHOTO_QUALITY,
};
use mirra_core::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Tolerance when checking that weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Minimum usage before a numeric score is shown. All three are inclusive
/// hard gates.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct UnlockThresholds {
    pub min_days: u32,
    pub min_photos: u32,
    pub min_challenges: u32,
}

impl Default for UnlockThresholds {
    fn default() -> Self {
        Self {
            min_days: MIN_DAYS_FOR_UNLOCK,
            min_photos: MIN_PHOTOS_FOR_UNLOCK,
            min_challenges: MIN_CHALLENGES_FOR_UNLOCK,
        }
    }
}

/// Weights of the four sub-scores; they must sum to 1.0.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct ScoreWeights {
    pub consistency: f64,
    pub challenge_completion: f64,
    pub photo_quality: f64,
    pub improvement: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            consistency: WEIGHT_CONSISTENCY,
            challenge_completion: WEIGHT_CHALLENGE_COMPLETION,
            photo_quality: WEIGHT_PHOTO_QUALITY,
            improvement: WEIGHT_IMPROVEMENT,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.consistency + self.challenge_completion + self.photo_quality + self.improvement
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub thresholds: UnlockThresholds,
    pub weights: ScoreWeights,
    /// Weighted-moving-average window over capture confidence.
    pub quality_window: usize,
    /// Entries per side for the improvement comparison.
    pub improvement_window: usize,
    /// Entries per side for the trend comparison.
    pub trend_window: usize,
    /// Confidence delta separating stable from improving/declining.
    pub trend_epsilon: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            thresholds: UnlockThresholds::default(),
            weights: ScoreWeights::default(),
            quality_window: QUALITY_WINDOW,
            improvement_window: IMPROVEMENT_WINDOW,
            trend_window: TREND_WINDOW,
            trend_epsilon: TREND_EPSILON,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.weights;
        for (name, value) in [
            ("consistency", w.consistency),
            ("challenge_completion", w.challenge_completion),
            ("photo_quality", w.photo_quality),
            ("improvement", w.improvement),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeWeight(name));
            }
        }
        let sum = w.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum(sum));
        }

        let t = &self.thresholds;
        if t.min_days == 0 {
            return Err(ConfigError::ZeroThreshold("min_days"));
        }
        if t.min_photos == 0 {
            return Err(ConfigError::ZeroThreshold("min_photos"));
        }
        if t.min_challenges == 0 {
            return Err(ConfigError::ZeroThreshold("min_challenges"));
        }

        if self.quality_window == 0 {
            return Err(ConfigError::ZeroWindow("quality_window"));
        }
        if self.improvement_window == 0 {
            return Err(ConfigError::ZeroWindow("improvement_window"));
        }
        if self.trend_window == 0 {
            return Err(ConfigError::ZeroWindow("trend_window"));
        }
        Ok(())
    }
}
