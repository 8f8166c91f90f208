//! Subsystem constants. Durations are expressed in seconds unless noted.

// ---------------------------------------------------------------------------
// Confidence classification
// ---------------------------------------------------------------------------

/// Normalized variance at or below which a sample is high confidence.
pub const CONFIDENCE_HIGH_CUTOFF: f64 = 0.33;

/// Normalized variance at or below which a sample is medium confidence.
pub const CONFIDENCE_MEDIUM_CUTOFF: f64 = 0.66;

/// Multiplier applied to a metric's variance when deciding whether a change
/// between two readings is significant.
pub const SIGNIFICANT_CHANGE_FACTOR: f64 = 1.5;

// ---------------------------------------------------------------------------
// Unlock gate
// ---------------------------------------------------------------------------

/// Minimum whole days since the aggregate was created.
pub const MIN_DAYS_FOR_UNLOCK: u32 = 14;
/// Minimum number of timeline entries (captures).
pub const MIN_PHOTOS_FOR_UNLOCK: u32 = 7;
/// Minimum number of recorded challenge completions.
pub const MIN_CHALLENGES_FOR_UNLOCK: u32 = 5;

/// Weights of the three gate ratios in the locked-state progress figure.
pub const UNLOCK_WEIGHT_DAYS: f64 = 0.5;
pub const UNLOCK_WEIGHT_PHOTOS: f64 = 0.3;
pub const UNLOCK_WEIGHT_CHALLENGES: f64 = 0.2;

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Sub-score returned whenever there is not enough data to judge.
pub const NEUTRAL_SCORE: f64 = 50.0;

pub const WEIGHT_CONSISTENCY: f64 = 0.35;
pub const WEIGHT_CHALLENGE_COMPLETION: f64 = 0.25;
pub const WEIGHT_PHOTO_QUALITY: f64 = 0.20;
pub const WEIGHT_IMPROVEMENT: f64 = 0.20;

/// Window of the weighted moving average over capture confidence.
pub const QUALITY_WINDOW: usize = 10;
/// Entries per side when comparing recent vs older metric means.
pub const IMPROVEMENT_WINDOW: usize = 3;
/// Per-metric delta clamp applied before halving.
pub const IMPROVEMENT_DELTA_CLAMP: f64 = 50.0;
/// Entries per side when comparing recent vs older confidence for the trend.
pub const TREND_WINDOW: usize = 5;
/// Confidence difference beyond which the trend is no longer stable.
pub const TREND_EPSILON: f64 = 0.05;

// ---------------------------------------------------------------------------
// Rate limiting
// ---------------------------------------------------------------------------

pub const MAX_UPLOADS_PER_HOUR: usize = 10;
pub const MAX_UPLOADS_PER_DAY: usize = 20;

/// Uploads older than this are pruned from the ledger.
pub const UPLOAD_RETENTION_SECS: i64 = 24 * 60 * 60;
/// Upper bound accepted for a configured retention window (one week).
pub const MAX_UPLOAD_RETENTION_SECS: i64 = 7 * 24 * 60 * 60;

// ---------------------------------------------------------------------------
// Suspicious-pattern detection
// ---------------------------------------------------------------------------

/// Two uploads closer than this count as a rapid pair.
pub const RAPID_UPLOAD_GAP_SECS: i64 = 30;
/// Rapid pairs tolerated before the cadence is flagged.
pub const MAX_RAPID_PAIRS: usize = 3;
/// Uploads sharing one hour-of-day tolerated before the cadence is flagged.
pub const MAX_SAME_HOUR_UPLOADS: usize = 5;
/// Minimum history length before pattern detection runs.
pub const MIN_PATTERN_HISTORY: usize = 3;

pub const RAPID_UPLOAD_MULTIPLIER: f64 = 0.5;
pub const SAME_HOUR_MULTIPLIER: f64 = 0.7;

// ---------------------------------------------------------------------------
// Trust score
// ---------------------------------------------------------------------------

pub const MIN_TRUST_SCORE: f64 = 0.1;
pub const MAX_TRUST_SCORE: f64 = 1.0;

/// Multiplier applied when editing software is detected in the metadata.
pub const FILTER_PENALTY: f64 = 0.6;
/// Multiplier applied when the head pose deviates from the capture history.
pub const ANGLE_PENALTY: f64 = 0.8;

/// Score at or above which trust is reported as high.
pub const TRUST_HIGH_CUTOFF: f64 = 0.8;
/// Score at or above which trust is reported as medium.
pub const TRUST_MEDIUM_CUTOFF: f64 = 0.5;

/// Mean absolute yaw/pitch/roll deviation tolerated, in degrees.
pub const MAX_ANGLE_DEVIATION_DEG: f64 = 15.0;

// ---------------------------------------------------------------------------
// Photo validation
// ---------------------------------------------------------------------------

pub const MIN_BRIGHTNESS: f64 = 40.0;
pub const MAX_BRIGHTNESS: f64 = 220.0;
pub const MIN_SHARPNESS: f64 = 100.0;
pub const MIN_CONTRAST: f64 = 30.0;
pub const MIN_FACE_SIZE: f64 = 0.15;
pub const MAX_FACE_SIZE: f64 = 0.85;

/// Confidence lost per failed quality check.
pub const QUALITY_ISSUE_PENALTY: f64 = 0.25;
