//! Editing-software and filter detection from capture metadata.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Software tags written by photo editors and beauty-filter apps.
/// Matched case-insensitively as substrings of the metadata software tag.
const EDITING_SOFTWARE: &[&str] = &[
    "photoshop",
    "lightroom",
    "facetune",
    "snapseed",
    "vsco",
    "meitu",
    "picsart",
    "airbrush",
    "faceapp",
    "beautyplus",
    "youcam",
    "snapchat",
    "instagram",
    "gimp",
];

/// A file modified this long after capture is treated as edited.
const MAX_MODIFY_DELAY_SECS: i64 = 60;

const SOFTWARE_MATCH_CONFIDENCE: f64 = 0.9;
const LATE_MODIFY_CONFIDENCE: f64 = 0.6;

/// Metadata attached to a capture by the camera pipeline.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureMetadata {
    pub software: Option<String>,
    pub captured_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Why a capture was judged edited.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterSignal {
    EditingSoftware { software: String },
    ModifiedAfterCapture { delay_secs: i64 },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterResult {
    pub filter_detected: bool,
    /// The matched software tag, as written in the metadata.
    pub software: Option<String>,
    /// How sure the detector is that the capture was edited.
    pub confidence: f64,
    pub signals: Vec<FilterSignal>,
}

/// Inspect metadata for signs of editing.
pub fn detect_filters(meta: &CaptureMetadata) -> FilterResult {
    let mut signals = Vec::new();
    let mut confidence: f64 = 0.0;

    let software = meta
        .software
        .as_deref()
        .filter(|s| {
            let lower = s.to_lowercase();
            EDITING_SOFTWARE.iter().any(|tag| lower.contains(tag))
        })
        .map(str::to_string);
    if let Some(software) = &software {
        signals.push(FilterSignal::EditingSoftware {
            software: software.clone(),
        });
        confidence = SOFTWARE_MATCH_CONFIDENCE;
    }

    if let (Some(captured), Some(modified)) = (meta.captured_at, meta.modified_at) {
        let delay = modified - captured;
        if delay > Duration::seconds(MAX_MODIFY_DELAY_SECS) {
            signals.push(FilterSignal::ModifiedAfterCapture {
                delay_secs: delay.num_seconds(),
            });
            confidence = confidence.max(LATE_MODIFY_CONFIDENCE);
        }
    }

    if !signals.is_empty() {
        debug!(?signals, "filters: editing detected");
    }

    FilterResult {
        filter_detected: !signals.is_empty(),
        software,
        confidence,
        signals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn camera_firmware_is_clean() {
        let meta = CaptureMetadata {
            software: Some("iOS 19.1".into()),
            ..CaptureMetadata::default()
        };
        assert!(!detect_filters(&meta).filter_detected);
    }

    #[test]
    fn editor_tag_detected_case_insensitively() {
        let meta = CaptureMetadata {
            software: Some("Adobe Photoshop Lightroom Classic 13.2".into()),
            ..CaptureMetadata::default()
        };
        let r = detect_filters(&meta);
        assert!(r.filter_detected);
        assert_eq!(r.confidence, SOFTWARE_MATCH_CONFIDENCE);
        assert_eq!(r.software.as_deref(), Some("Adobe Photoshop Lightroom Classic 13.2"));
        assert_eq!(
            r.signals,
            vec![FilterSignal::EditingSoftware {
                software: "Adobe Photoshop Lightroom Classic 13.2".into()
            }]
        );
    }

    #[test]
    fn late_modification_detected() {
        let captured = Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap();
        let meta = CaptureMetadata {
            software: None,
            captured_at: Some(captured),
            modified_at: Some(captured + Duration::minutes(10)),
        };
        let r = detect_filters(&meta);
        assert_eq!(r.signals, vec![FilterSignal::ModifiedAfterCapture { delay_secs: 600 }]);
        assert_eq!(r.software, None);
        assert_eq!(r.confidence, LATE_MODIFY_CONFIDENCE);
    }

    #[test]
    fn write_delay_tolerated() {
        let captured = Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap();
        let meta = CaptureMetadata {
            software: None,
            captured_at: Some(captured),
            modified_at: Some(captured + Duration::seconds(2)),
        };
        assert!(!detect_filters(&meta).filter_detected);
    }

    #[test]
    fn empty_metadata_is_clean() {
        assert_eq!(detect_filters(&CaptureMetadata::default()), FilterResult::default());
    }
}
