//! # mirra-metrics: Facial metric snapshots.
//!
//! No computer vision happens here. A capture is reduced upstream to a seed
//! in `[0, 1)`; this crate turns that seed into a bounded set of named
//! metrics:
//! - **Definitions**: a static table of baseline, variance and value ranges
//!   per metric, validated once at startup.
//! - **Generation**: the metric value is a deterministic function of the seed
//!   and the metric's position in the table; the variance band is drawn from
//!   a caller-supplied RNG, so reproducibility is the caller's choice.

pub mod definitions;
pub mod generator;

pub use definitions::{builtin_definitions, validate_definitions, MetricDefinition};
pub use generator::{capture_confidence, MetricGenerator, SEED_STRIDE};
