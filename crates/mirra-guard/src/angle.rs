//! Head-pose consistency across captures.
//!
//! Progress photos are only comparable when taken from roughly the same
//! angle. The current pose is compared with the mean pose of earlier
//! captures; a mean absolute deviation above 15° is inconsistent.

use mirra_core::constants::MAX_ANGLE_DEVIATION_DEG;
use mirra_core::stats::mean;
use mirra_core::traits::{Pose, PoseDetector};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AngleResult {
    pub is_consistent: bool,
    /// Mean absolute yaw/pitch/roll deviation in degrees.
    pub deviation: f64,
    /// The pose that was checked, if one was available.
    pub pose: Option<Pose>,
}

impl AngleResult {
    /// A pass with no measured deviation, for when there is nothing to compare.
    pub(crate) fn unchecked(pose: Option<Pose>) -> Self {
        Self {
            is_consistent: true,
            deviation: 0.0,
            pose,
        }
    }
}

/// Compare `current` with the mean of `history`. An empty history is
/// always consistent.
pub fn check_angle_consistency(current: Pose, history: &[Pose]) -> AngleResult {
    let axis = |f: fn(&Pose) -> f64| mean(&history.iter().map(f).collect::<Vec<_>>());

    let (Some(yaw), Some(pitch), Some(roll)) =
        (axis(|p| p.yaw), axis(|p| p.pitch), axis(|p| p.roll))
    else {
        return AngleResult::unchecked(Some(current));
    };

    let deviation = ((current.yaw - yaw).abs()
        + (current.pitch - pitch).abs()
        + (current.roll - roll).abs())
        / 3.0;

    AngleResult {
        is_consistent: deviation <= MAX_ANGLE_DEVIATION_DEG,
        deviation,
        pose: Some(current),
    }
}

/// Run `detector` on a frame and check the resulting pose. A frame without
/// a detectable face is passed as consistent; the quality checks are
/// responsible for rejecting it.
pub fn check_frame_angle<D: PoseDetector + ?Sized>(
    detector: &D,
    frame: &[u8],
    history: &[Pose],
) -> AngleResult {
    match detector.detect(frame) {
        Some(pose) => check_angle_consistency(pose, history),
        None => AngleResult::unchecked(None),
    }
}
