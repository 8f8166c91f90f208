//! Upload rate limiting using a sliding window.
//!
//! Tracks when the user uploaded captures. An upload is refused when the
//! trailing hour already holds the hourly cap, or when the uploads since
//! local midnight already reach the daily cap.
//!
//! # Design
//!
//! The ledger holds a [`VecDeque`] of upload instants in arrival order. On
//! every check the deque is first pruned of entries older than the retention
//! window (24 hours by default, at most a week), then the remaining entries
//! are counted against both caps. Recording an upload appends the clock's
//! current instant.
//!
//! The ledger lives for the process only and is owned by the caller; nothing
//! is persisted.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveTime};
use mirra_core::clock::{Clock, SystemClock};
use mirra_core::constants::{
    MAX_UPLOADS_PER_DAY, MAX_UPLOADS_PER_HOUR, MAX_UPLOAD_RETENTION_SECS, UPLOAD_RETENTION_SECS,
};
use mirra_core::error::ConfigError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Trailing window for the hourly cap.
fn hour() -> Duration {
    Duration::hours(1)
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_uploads_per_hour: usize,
    pub max_uploads_per_day: usize,
    /// Entries older than this many seconds are pruned.
    pub retention_secs: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_uploads_per_hour: MAX_UPLOADS_PER_HOUR,
            max_uploads_per_day: MAX_UPLOADS_PER_DAY,
            retention_secs: UPLOAD_RETENTION_SECS,
        }
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_uploads_per_hour == 0 {
            return Err(ConfigError::ZeroLimit("max_uploads_per_hour"));
        }
        if self.max_uploads_per_day == 0 {
            return Err(ConfigError::ZeroLimit("max_uploads_per_day"));
        }
        // The daily cap counts from local midnight, so a day must stay in view.
        if !(UPLOAD_RETENTION_SECS..=MAX_UPLOAD_RETENTION_SECS).contains(&self.retention_secs) {
            return Err(ConfigError::OutOfRange {
                field: "retention_secs",
                value: self.retention_secs,
                min: UPLOAD_RETENTION_SECS,
                max: MAX_UPLOAD_RETENTION_SECS,
            });
        }
        Ok(())
    }
}

/// Which cap refused the upload.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitReason {
    HourlyLimit,
    DailyLimit,
}

impl fmt::Display for RateLimitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::HourlyLimit => "hourly upload limit reached",
            Self::DailyLimit => "daily upload limit reached",
        };
        f.write_str(s)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitResult {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RateLimitReason>,
    /// Estimated minutes until an upload would be accepted again.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_minutes: Option<i64>,
}

impl RateLimitResult {
    fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
            wait_minutes: None,
        }
    }

    fn rejected(reason: RateLimitReason, wait: Duration) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
            wait_minutes: Some(ceil_minutes(wait)),
        }
    }
}

/// Whole minutes in `d`, rounded up, at least one.
fn ceil_minutes(d: Duration) -> i64 {
    let secs = d.num_seconds().max(0);
    ((secs + 59) / 60).max(1)
}

/// Local midnight at the start of `now`'s day, in `now`'s offset.
fn start_of_day(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    now - (now.time() - NaiveTime::MIN)
}

/// In-memory upload ledger enforcing the hourly and daily caps.
///
/// # Usage
///
/// Call [`check_rate_limit`](Self::check_rate_limit) before accepting an
/// upload and [`record_upload`](Self::record_upload) once the upload has
/// been accepted. Keeping the two separate lets callers record only uploads
/// that actually went through.
#[derive(Debug)]
pub struct UploadLedger<C: Clock = SystemClock> {
    uploads: VecDeque<DateTime<FixedOffset>>,
    config: RateLimitConfig,
    clock: C,
}

impl UploadLedger<SystemClock> {
    /// Ledger on the host clock with the default caps.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for UploadLedger<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> UploadLedger<C> {
    pub fn with_clock(clock: C) -> Self {
        Self::with_config(RateLimitConfig::default(), clock)
    }

    pub fn with_config(config: RateLimitConfig, clock: C) -> Self {
        Self {
            uploads: VecDeque::new(),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Remove uploads older than the retention window. A window too large to
    /// represent keeps everything.
    fn prune(&mut self, now: DateTime<FixedOffset>) {
        let Some(cutoff) = Duration::try_seconds(self.config.retention_secs)
            .and_then(|window| now.checked_sub_signed(window))
        else {
            return;
        };
        while self.uploads.front().is_some_and(|t| *t <= cutoff) {
            self.uploads.pop_front();
        }
    }

    /// Decide whether another upload is allowed right now.
    ///
    /// Prunes stale entries first, so the ledger never grows beyond one
    /// retention window.
    pub fn check_rate_limit(&mut self) -> RateLimitResult {
        let now = self.clock.now();
        self.prune(now);

        let hour_ago = now - hour();
        let in_last_hour: Vec<&DateTime<FixedOffset>> =
            self.uploads.iter().filter(|t| **t > hour_ago).collect();
        if in_last_hour.len() >= self.config.max_uploads_per_hour {
            // The window frees up when the oldest upload in it turns an hour old.
            let wait = in_last_hour
                .first()
                .map_or(hour(), |oldest| **oldest + hour() - now);
            warn!(
                count = in_last_hour.len(),
                limit = self.config.max_uploads_per_hour,
                "rate_limiter: hourly upload limit exceeded"
            );
            return RateLimitResult::rejected(RateLimitReason::HourlyLimit, wait);
        }

        let midnight = start_of_day(now);
        let today = self.uploads.iter().filter(|t| **t >= midnight).count();
        if today >= self.config.max_uploads_per_day {
            let wait = midnight + Duration::days(1) - now;
            warn!(
                count = today,
                limit = self.config.max_uploads_per_day,
                "rate_limiter: daily upload limit exceeded"
            );
            return RateLimitResult::rejected(RateLimitReason::DailyLimit, wait);
        }

        debug!(hour = in_last_hour.len(), today, "rate_limiter: upload allowed");
        RateLimitResult::allowed()
    }

    /// Record an accepted upload at the clock's current instant.
    pub fn record_upload(&mut self) {
        let now = self.clock.now();
        self.uploads.push_back(now);
        debug!(total = self.uploads.len(), "rate_limiter: upload recorded");
    }

    /// Uploads still inside the retention window, oldest first.
    pub fn history(&mut self) -> Vec<DateTime<FixedOffset>> {
        let now = self.clock.now();
        self.prune(now);
        self.uploads.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.uploads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty()
    }

    /// Forget every recorded upload.
    pub fn clear(&mut self) {
        self.uploads.clear();
        debug!("rate_limiter: ledger cleared");
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mirra_core::clock::ManualClock;
    use std::sync::Arc;

    fn at(h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 7, 14, h, m, 0)
            .unwrap()
    }

    fn ledger(start: DateTime<FixedOffset>) -> (Arc<ManualClock>, UploadLedger<Arc<ManualClock>>) {
        let clock = Arc::new(ManualClock::new(start));
        let ledger = UploadLedger::with_clock(Arc::clone(&clock));
        (clock, ledger)
    }

    /// Under-limit uploads all pass.
    #[test]
    fn within_hourly_limit() {
        let (clock, mut l) = ledger(at(9, 0));
        for _ in 0..MAX_UPLOADS_PER_HOUR {
            assert!(l.check_rate_limit().allowed, "upload within limit should pass");
            l.record_upload();
            clock.advance(Duration::minutes(1));
        }
    }

    /// The eleventh upload inside an hour is refused on the hourly cap.
    #[test]
    fn exceeds_hourly_limit() {
        let (clock, mut l) = ledger(at(9, 0));
        for _ in 0..MAX_UPLOADS_PER_HOUR {
            l.record_upload();
            clock.advance(Duration::minutes(1));
        }

        let r = l.check_rate_limit();
        assert!(!r.allowed);
        assert_eq!(r.reason, Some(RateLimitReason::HourlyLimit));
        // oldest at 09:00, now 09:10
        assert_eq!(r.wait_minutes, Some(50));
        assert!(r.reason.unwrap().to_string().contains("hourly"));
    }

    /// Twenty uploads spaced over an hour apart exhaust the daily cap.
    #[test]
    fn exceeds_daily_limit() {
        let (clock, mut l) = ledger(at(0, 0));
        for _ in 0..MAX_UPLOADS_PER_DAY {
            assert!(l.check_rate_limit().allowed);
            l.record_upload();
            clock.advance(Duration::minutes(61));
        }

        let r = l.check_rate_limit();
        assert!(!r.allowed);
        assert_eq!(r.reason, Some(RateLimitReason::DailyLimit));
        // now 20:20 local, midnight in 3h40m
        assert_eq!(r.wait_minutes, Some(220));
    }

    /// The daily cap resets at local midnight even though entries are retained.
    #[test]
    fn daily_limit_resets_at_midnight() {
        let (clock, mut l) = ledger(at(1, 0));
        for _ in 0..MAX_UPLOADS_PER_DAY {
            l.record_upload();
            clock.advance(Duration::minutes(61));
        }
        assert!(!l.check_rate_limit().allowed);

        clock.set(at(23, 59) + Duration::minutes(2));
        assert!(l.check_rate_limit().allowed, "new local day should reset the cap");
        assert_eq!(l.len(), MAX_UPLOADS_PER_DAY, "entries inside 24h are retained");
    }

    /// Entries older than the retention window are pruned.
    #[test]
    fn window_slides() {
        let (clock, mut l) = ledger(at(9, 0));
        for _ in 0..MAX_UPLOADS_PER_HOUR {
            l.record_upload();
        }
        assert!(!l.check_rate_limit().allowed);

        clock.advance(Duration::hours(24));
        assert!(l.check_rate_limit().allowed, "after window slides, limit should reset");
        assert!(l.is_empty());
    }

    /// Separate ledgers never share state.
    #[test]
    fn ledgers_are_isolated() {
        let (_ca, mut a) = ledger(at(9, 0));
        let (_cb, mut b) = ledger(at(9, 0));
        for _ in 0..MAX_UPLOADS_PER_HOUR {
            a.record_upload();
        }
        assert!(!a.check_rate_limit().allowed);
        assert!(b.check_rate_limit().allowed);
    }

    #[test]
    fn custom_caps_apply() {
        let clock = Arc::new(ManualClock::new(at(9, 0)));
        let config = RateLimitConfig {
            max_uploads_per_hour: 2,
            ..RateLimitConfig::default()
        };
        let mut l = UploadLedger::with_config(config, Arc::clone(&clock));
        l.record_upload();
        l.record_upload();
        assert_eq!(l.check_rate_limit().reason, Some(RateLimitReason::HourlyLimit));
    }

    #[test]
    fn clear_resets_ledger() {
        let (_clock, mut l) = ledger(at(9, 0));
        for _ in 0..MAX_UPLOADS_PER_HOUR {
            l.record_upload();
        }
        l.clear();
        assert!(l.check_rate_limit().allowed);
        assert!(l.history().is_empty());
    }

    #[test]
    fn zero_caps_rejected() {
        let config = RateLimitConfig {
            max_uploads_per_day: 0,
            ..RateLimitConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroLimit("max_uploads_per_day")));
        RateLimitConfig::default().validate().unwrap();
    }

    #[test]
    fn retention_shorter_than_a_day_rejected() {
        let config = RateLimitConfig {
            retention_secs: 3600,
            ..RateLimitConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "retention_secs",
                value: 3600,
                min: UPLOAD_RETENTION_SECS,
                max: MAX_UPLOAD_RETENTION_SECS,
            })
        );
        RateLimitConfig {
            retention_secs: UPLOAD_RETENTION_SECS,
            ..RateLimitConfig::default()
        }
        .validate()
        .unwrap();
    }

    #[test]
    fn retention_beyond_a_week_rejected() {
        for retention_secs in [MAX_UPLOAD_RETENTION_SECS + 1, i64::MAX] {
            let config = RateLimitConfig {
                retention_secs,
                ..RateLimitConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::OutOfRange { field: "retention_secs", .. })
            ));
        }
        RateLimitConfig {
            retention_secs: MAX_UPLOAD_RETENTION_SECS,
            ..RateLimitConfig::default()
        }
        .validate()
        .unwrap();
    }

    /// An unvalidated, unrepresentable retention keeps history instead of
    /// panicking during the prune.
    #[test]
    fn huge_retention_does_not_panic() {
        let clock = Arc::new(ManualClock::new(at(9, 0)));
        let config = RateLimitConfig {
            retention_secs: i64::MAX,
            ..RateLimitConfig::default()
        };
        let mut l = UploadLedger::with_config(config, Arc::clone(&clock));
        l.record_upload();
        clock.advance(Duration::days(3));
        assert!(l.check_rate_limit().allowed);
        assert_eq!(l.len(), 1);
    }

    #[test]
    fn wait_rounds_up_to_whole_minutes() {
        assert_eq!(ceil_minutes(Duration::seconds(1)), 1);
        assert_eq!(ceil_minutes(Duration::seconds(61)), 2);
        assert_eq!(ceil_minutes(Duration::zero()), 1);
    }

    #[test]
    fn allowed_result_serializes_compactly() {
        let json = serde_json::to_string(&RateLimitResult::allowed()).unwrap();
        assert_eq!(json, r#"{"allowed":true}"#);
    }
}
