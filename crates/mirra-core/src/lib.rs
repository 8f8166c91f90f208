//! # mirra-core
//! Foundation types, statistics helpers and traits shared by the Mirra crates.

pub mod clock;
pub mod constants;
pub mod error;
pub mod stats;
pub mod traits;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use types::{AppState, ChallengeCompletion, ConfidenceLevel, MetricSample, TimelineEntry};
