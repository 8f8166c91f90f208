//! Error types for the Mirra crates.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("degenerate range: min == max == {0}")] DegenerateRange(f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    #[error("metric {id}: variance range has zero width")] DegenerateVariance { id: String },
    #[error("metric {id}: {which} range is inverted ({min} > {max})")] InvertedRange { id: String, which: &'static str, min: f64, max: f64 },
    #[error("metric {id}: baseline range lies outside the value range")] BaselineOutOfBounds { id: String },
    #[error("duplicate metric id: {0}")] DuplicateId(String),
    #[error("seed out of range [0, 1): {0}")] SeedOutOfRange(f64),
    #[error(transparent)] Stats(#[from] StatsError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("score weights must sum to 1.0, got {0}")] WeightSum(f64),
    #[error("negative weight for {0}")] NegativeWeight(&'static str),
    #[error("unlock threshold {0} must be non-zero")] ZeroThreshold(&'static str),
    #[error("window {0} must be non-zero")] ZeroWindow(&'static str),
    #[error("rate limit {0} must be non-zero")] ZeroLimit(&'static str),
    #[error("{0}: lower bound exceeds upper bound")] InvertedBounds(&'static str),
    #[error("{field} must lie in [{min}, {max}], got {value}")] OutOfRange { field: &'static str, value: i64, min: i64, max: i64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("timestamp {timestamp} precedes aggregate creation at {created_at}")] BeforeCreation { timestamp: String, created_at: String },
}

#[derive(Error, Debug)]
pub enum MirraError {
    #[error(transparent)] Stats(#[from] StatsError),
    #[error(transparent)] Metric(#[from] MetricError),
    #[error(transparent)] Config(#[from] ConfigError),
    #[error(transparent)] State(#[from] StateError),
    #[error("serialization: {0}")] Serialization(String),
}

impl From<serde_json::Error> for MirraError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
