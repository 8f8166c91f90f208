//! Data model: metric samples, timeline entries, challenge completions and
//! the process-wide app-state aggregate.
//!
//! Everything serializes as camelCase JSON so snapshots produced by the
//! persistence layer can be loaded directly.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// A closed numeric interval `[min, max]`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Linear interpolation: `t = 0` is `min`, `t = 1` is `max`.
    pub fn lerp(&self, t: f64) -> f64 {
        self.min + t * self.width()
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }
}

/// Coarse confidence label attached to a generated metric.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// Numeric weight used when folding labels into a capture confidence.
    pub fn weight(&self) -> f64 {
        match self {
            Self::High => 0.9,
            Self::Medium => 0.7,
            Self::Low => 0.5,
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(s)
    }
}

/// One named metric of one capture.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    pub id: String,
    pub value: f64,
    pub range: Bounds,
    pub confidence_level: ConfidenceLevel,
    pub variance: f64,
}

/// One recorded capture with its derived metrics.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    /// Opaque reference to the stored photo.
    pub photo_ref: String,
    pub timestamp: DateTime<Utc>,
    /// Capture confidence in `[0, 1]`.
    pub confidence: f64,
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricSample>,
}

impl TimelineEntry {
    pub fn new(photo_ref: impl Into<String>, timestamp: DateTime<Utc>, confidence: f64) -> Self {
        Self {
            photo_ref: photo_ref.into(),
            timestamp,
            confidence: confidence.clamp(0.0, 1.0),
            metrics: BTreeMap::new(),
        }
    }

    /// Attach samples, keyed by their metric id.
    pub fn with_metrics(mut self, samples: impl IntoIterator<Item = MetricSample>) -> Self {
        self.metrics
            .extend(samples.into_iter().map(|s| (s.id.clone(), s)));
        self
    }

    pub fn metric_value(&self, id: &str) -> Option<f64> {
        self.metrics.get(id).map(|s| s.value)
    }
}

/// A habit challenge marked complete on a calendar day.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeCompletion {
    pub id: String,
    pub challenge_id: String,
    pub date: NaiveDate,
    pub completed_at: DateTime<Utc>,
}

impl ChallengeCompletion {
    pub fn new(id: impl Into<String>, challenge_id: impl Into<String>, completed_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            challenge_id: challenge_id.into(),
            date: completed_at.date_naive(),
            completed_at,
        }
    }
}

/// The app-state aggregate consumed by the scoring engine.
///
/// # Invariants
///
/// * `timeline` and `challenges` are append-only.
/// * once `progress_unlocked_at` is set it is never cleared.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
    #[serde(default)]
    pub challenges: Vec<ChallengeCompletion>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub progress_unlocked_at: Option<DateTime<Utc>>,
}

impl AppState {
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            timeline: Vec::new(),
            challenges: Vec::new(),
            created_at,
            progress_unlocked_at: None,
        }
    }

    /// Append a capture.
    ///
    /// # Errors
    ///
    /// [`StateError::BeforeCreation`] if the capture predates the aggregate.
    pub fn record_capture(&mut self, entry: TimelineEntry) -> Result<(), StateError> {
        self.check_after_creation(entry.timestamp)?;
        self.timeline.push(entry);
        Ok(())
    }

    /// Append a challenge completion.
    ///
    /// Duplicate `(challenge_id, date)` pairs are accepted; use
    /// [`is_challenge_completed`](Self::is_challenge_completed) to enforce
    /// once-per-day completion at the call site.
    pub fn record_challenge(&mut self, completion: ChallengeCompletion) -> Result<(), StateError> {
        self.check_after_creation(completion.completed_at)?;
        self.challenges.push(completion);
        Ok(())
    }

    pub fn is_challenge_completed(&self, challenge_id: &str, date: NaiveDate) -> bool {
        self.challenges
            .iter()
            .any(|c| c.challenge_id == challenge_id && c.date == date)
    }

    /// Stamp the unlock time. Returns `true` only on the first call.
    pub fn mark_unlocked(&mut self, at: DateTime<Utc>) -> bool {
        if self.progress_unlocked_at.is_some() {
            return false;
        }
        self.progress_unlocked_at = Some(at);
        true
    }

    pub fn is_unlocked(&self) -> bool {
        self.progress_unlocked_at.is_some()
    }

    /// Whole days elapsed since creation, never negative.
    pub fn days_since_start(&self, now: DateTime<Utc>) -> u32 {
        let days = (now - self.created_at).num_days();
        u32::try_from(days.max(0)).unwrap_or(u32::MAX)
    }

    /// Timeline entries ordered by ascending timestamp.
    pub fn sorted_timeline(&self) -> Vec<&TimelineEntry> {
        let mut entries: Vec<&TimelineEntry> = self.timeline.iter().collect();
        entries.sort_by_key(|e| e.timestamp);
        entries
    }

    fn check_after_creation(&self, timestamp: DateTime<Utc>) -> Result<(), StateError> {
        if timestamp < self.created_at {
            return Err(StateError::BeforeCreation {
                timestamp: timestamp.to_rfc3339(),
                created_at: self.created_at.to_rfc3339(),
            });
        }
        Ok(())
    }
}
