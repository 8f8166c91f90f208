//! Capability interfaces for native device features.
//!
//! Pose detection and haptics live behind these traits; the
//! composition boundary picks either a platform implementation or the
//! `Noop*` types below. Nothing in the scoring or anti-cheat logic depends on
//! a real implementation being present.

use serde::{Deserialize, Serialize};

/// Head orientation of a detected face, in degrees.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Pose {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl Pose {
    pub const fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HapticIntensity {
    Light,
    Medium,
    Heavy,
}

/// Emits a haptic pulse, e.g. when a workout rep is counted.
pub trait HapticFeedback {
    fn impact(&self, intensity: HapticIntensity);
}

/// Estimates head pose from an encoded camera frame.
pub trait PoseDetector {
    /// `None` when no face is found.
    fn detect(&self, frame: &[u8]) -> Option<Pose>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHaptics;

impl HapticFeedback for NoopHaptics {
    fn impact(&self, _intensity: HapticIntensity) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPoseDetector;

impl PoseDetector for NoopPoseDetector {
    fn detect(&self, _frame: &[u8]) -> Option<Pose> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_capabilities_report_nothing() {
        NoopHaptics.impact(HapticIntensity::Heavy);
        assert_eq!(NoopPoseDetector.detect(&[0xFF, 0xD8]), None);
    }

    #[test]
    fn capabilities_are_object_safe() {
        let detector: Box<dyn PoseDetector> = Box::new(NoopPoseDetector);
        assert!(detector.detect(&[]).is_none());
    }
}
