//! # mirra-guard: Capture anti-cheat.
//!
//! All checks are advisory: they gate UI messaging and the trust multiplier
//! but never block a capture from being stored.
//!
//! - [`UploadLedger`] enforces hourly and daily upload caps over an in-memory
//!   sliding window, driven by an injected [`Clock`](mirra_core::Clock).
//! - [`detect_suspicious_patterns`] flags bursty or unnaturally regular
//!   capture cadence.
//! - [`validate_photo`], [`detect_filters`] and [`check_angle_consistency`]
//!   inspect one capture; [`calculate_trust_score`] folds them into a single
//!   score in `[0.1, 1.0]` with a human-readable explanation.

pub mod angle;
pub mod config;
pub mod filters;
pub mod patterns;
pub mod rate_limiter;
pub mod trust;
pub mod validation;

pub use angle::{check_angle_consistency, check_frame_angle, AngleResult};
pub use config::GuardConfig;
pub use filters::{detect_filters, CaptureMetadata, FilterResult, FilterSignal};
pub use patterns::{detect_suspicious_patterns, PatternReport, SuspiciousPattern};
pub use rate_limiter::{RateLimitConfig, RateLimitReason, RateLimitResult, UploadLedger};
pub use trust::{
    assess_capture, calculate_trust_score, Capture, CaptureAssessment, TrustLevel, TrustScore,
};
pub use validation::{
    validate_photo, PhotoQuality, QualityIssue, ValidationResult, ValidationThresholds,
};
