//! # mirra-scoring: Progress score for the Mirra timeline.
//!
//! Pure computation over an [`AppState`](mirra_core::AppState) snapshot; no
//! storage, no IO. The current time is always passed in.
//!
//! - **Unlock gate**: no numeric score is reported until the aggregate is at
//!   least 14 days old with 7 captures and 5 challenge completions. Before
//!   that the result carries a weighted progress figure towards unlocking.
//! - **Sub-scores** (0–100): capture consistency, challenge completion rate,
//!   photo quality and metric improvement. Insufficient data yields the
//!   neutral 50 rather than an error.
//! - **Overall score**: weighted sum of the sub-scores, rounded.
//! - **Trend**: recent vs older capture confidence.

pub mod components;
pub mod config;
pub mod engine;
pub mod trend;
pub mod unlock;

pub use config::{ScoreWeights, ScoringConfig, UnlockThresholds};
pub use engine::{ScoreBreakdown, ScoreResult, ScoringEngine};
pub use trend::Trend;
pub use unlock::{Remaining, UnlockStatus};
