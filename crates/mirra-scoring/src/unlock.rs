//! Unlock gate evaluation.

use mirra_core::constants::{UNLOCK_WEIGHT_CHALLENGES, UNLOCK_WEIGHT_DAYS, UNLOCK_WEIGHT_PHOTOS};
use serde::{Deserialize, Serialize};

use crate::config::UnlockThresholds;

/// What is still missing before the score unlocks.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Remaining {
    pub days: u32,
    pub photos: u32,
    pub challenges: u32,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnlockStatus {
    pub is_unlocked: bool,
    /// Weighted progress towards unlocking, in `[0, 1]`.
    pub progress: f64,
    pub remaining: Remaining,
}

/// Usage counters the gate is evaluated against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Usage {
    pub days: u32,
    pub photos: u32,
    pub challenges: u32,
}

impl UnlockThresholds {
    /// `true` only when every gate is met (inclusive).
    pub fn is_met(&self, usage: Usage) -> bool {
        usage.days >= self.min_days
            && usage.photos >= self.min_photos
            && usage.challenges >= self.min_challenges
    }

    /// Weighted average of the three gate ratios, each capped at 1.
    pub fn progress(&self, usage: Usage) -> f64 {
        let ratio = |have: u32, need: u32| {
            if need == 0 {
                1.0
            } else {
                (f64::from(have) / f64::from(need)).min(1.0)
            }
        };
        UNLOCK_WEIGHT_DAYS * ratio(usage.days, self.min_days)
            + UNLOCK_WEIGHT_PHOTOS * ratio(usage.photos, self.min_photos)
            + UNLOCK_WEIGHT_CHALLENGES * ratio(usage.challenges, self.min_challenges)
    }

    pub fn remaining(&self, usage: Usage) -> Remaining {
        Remaining {
            days: self.min_days.saturating_sub(usage.days),
            photos: self.min_photos.saturating_sub(usage.photos),
            challenges: self.min_challenges.saturating_sub(usage.challenges),
        }
    }

    /// Full status for `usage`. `already_unlocked` reflects a previously
    /// stamped unlock, which is never revoked.
    pub fn status(&self, usage: Usage, already_unlocked: bool) -> UnlockStatus {
        if already_unlocked || self.is_met(usage) {
            return UnlockStatus {
                is_unlocked: true,
                progress: 1.0,
                remaining: Remaining::default(),
            };
        }
        UnlockStatus {
            is_unlocked: false,
            progress: self.progress(usage),
            remaining: self.remaining(usage),
        }
    }
}
