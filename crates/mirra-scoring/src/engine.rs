//! Progress scoring engine.
//!
//! Provides the locked/unlocked state machine over an [`AppState`]:
//! - locked: no score, only the weighted progress towards the unlock gate
//! - unlocked: weighted sum of the four sub-scores plus the trend
//!
//! The engine never mutates the aggregate except through
//! [`ScoringEngine::refresh_unlock`], which stamps the first unlock time.

use chrono::{DateTime, Utc};
use mirra_core::error::ConfigError;
use mirra_core::types::{AppState, TimelineEntry};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::components::{challenge_score, consistency_score, improvement_score, quality_score};
use crate::config::{ScoreWeights, ScoringConfig};
use crate::trend::{calculate_trend, Trend};
use crate::unlock::{UnlockStatus, Usage};

/// Sub-scores behind an unlocked progress score, each 0–100.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ScoreBreakdown {
    pub consistency: f64,
    pub challenges: f64,
    pub quality: f64,
    pub improvement: f64,
}

impl ScoreBreakdown {
    /// Weighted sum of the sub-scores, rounded to the nearest integer.
    ///
    /// ```
    /// use mirra_scoring::{ScoreBreakdown, ScoreWeights};
    ///
    /// let perfect = ScoreBreakdown { consistency: 100.0, challenges: 100.0, quality: 100.0, improvement: 100.0 };
    /// assert_eq!(perfect.weighted_total(&ScoreWeights::default()), 100.0);
    /// ```
    pub fn weighted_total(&self, weights: &ScoreWeights) -> f64 {
        let total = self.consistency * weights.consistency
            + self.challenges * weights.challenge_completion
            + self.quality * weights.photo_quality
            + self.improvement * weights.improvement;
        total.round()
    }
}

/// Outcome of [`ScoringEngine::calculate_progress_score`].
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// `None` while locked.
    pub score: Option<f64>,
    pub is_locked: bool,
    /// Progress towards the unlock gate; 1.0 once unlocked.
    pub unlock_progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    /// Create an engine with a validated configuration.
    pub fn new(config: ScoringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    fn usage(state: &AppState, now: DateTime<Utc>) -> Usage {
        let count = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        Usage {
            days: state.days_since_start(now),
            photos: count(state.timeline.len()),
            challenges: count(state.challenges.len()),
        }
    }

    /// Evaluate the unlock gate. Pure; calling it repeatedly on the same
    /// aggregate and instant yields the same status.
    pub fn check_unlock_status(&self, state: &AppState, now: DateTime<Utc>) -> UnlockStatus {
        self.config
            .thresholds
            .status(Self::usage(state, now), state.is_unlocked())
    }

    /// Stamp `progress_unlocked_at` the first time the gate opens.
    ///
    /// Returns `true` if this call performed the transition.
    pub fn refresh_unlock(&self, state: &mut AppState, now: DateTime<Utc>) -> bool {
        if state.is_unlocked() {
            return false;
        }
        let usage = Self::usage(state, now);
        if !self.config.thresholds.is_met(usage) {
            return false;
        }
        let stamped = state.mark_unlocked(now);
        if stamped {
            info!(
                days = usage.days,
                photos = usage.photos,
                challenges = usage.challenges,
                "scoring: progress unlocked"
            );
        }
        stamped
    }

    /// Sub-scores for the aggregate, regardless of the unlock gate.
    pub fn breakdown(&self, state: &AppState, now: DateTime<Utc>) -> ScoreBreakdown {
        let sorted = state.sorted_timeline();
        self.breakdown_sorted(&sorted, state.challenges.len(), state.days_since_start(now))
    }

    fn breakdown_sorted(
        &self,
        sorted: &[&TimelineEntry],
        challenges: usize,
        days: u32,
    ) -> ScoreBreakdown {
        ScoreBreakdown {
            consistency: consistency_score(sorted),
            challenges: challenge_score(challenges, days),
            quality: quality_score(sorted, self.config.quality_window),
            improvement: improvement_score(sorted, self.config.improvement_window),
        }
    }

    /// Compute the progress score.
    ///
    /// While locked the result has no score, breakdown or trend, only the
    /// unlock progress.
    pub fn calculate_progress_score(&self, state: &AppState, now: DateTime<Utc>) -> ScoreResult {
        let status = self.check_unlock_status(state, now);
        if !status.is_unlocked {
            debug!(progress = status.progress, "scoring: still locked");
            return ScoreResult {
                score: None,
                is_locked: true,
                unlock_progress: status.progress,
                breakdown: None,
                trend: None,
            };
        }

        let sorted = state.sorted_timeline();
        let breakdown =
            self.breakdown_sorted(&sorted, state.challenges.len(), state.days_since_start(now));
        let score = breakdown.weighted_total(&self.config.weights);
        let trend = calculate_trend(&sorted, self.config.trend_window, self.config.trend_epsilon);

        debug!(
            score,
            consistency = breakdown.consistency,
            challenges = breakdown.challenges,
            quality = breakdown.quality,
            improvement = breakdown.improvement,
            %trend,
            "scoring: progress score computed"
        );

        ScoreResult {
            score: Some(score),
            is_locked: false,
            unlock_progress: 1.0,
            breakdown: Some(breakdown),
            trend: Some(trend),
        }
    }
}
