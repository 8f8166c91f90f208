//! Property-based tests for cross-crate invariants.
//!
//! Covered:
//! - confidence classification cut points
//! - empty-input behaviour of the moving averages
//! - unlock gate monotonicity and idempotency
//! - generated metrics stay inside their value ranges
//! - trust scores stay inside `[0.1, 1.0]`

use chrono::Duration;
use mirra_core::constants::{MAX_TRUST_SCORE, MIN_TRUST_SCORE};
use mirra_core::stats::{classify_confidence, moving_average, weighted_moving_average};
use mirra_core::traits::Pose;
use mirra_core::types::{Bounds, ConfidenceLevel};
use mirra_guard::{
    calculate_trust_score, check_angle_consistency, detect_filters, validate_photo,
    CaptureMetadata, PhotoQuality,
};
use mirra_metrics::MetricGenerator;
use mirra_scoring::{ScoreBreakdown, ScoreWeights, ScoringEngine};
use mirra_tests::helpers::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn classification_follows_normalized_position(
        min in -100.0f64..100.0,
        width in 0.1f64..50.0,
        t in 0.0f64..=1.0,
    ) {
        let range = Bounds::new(min, min + width);
        let value = min + t * width;
        let normalized = ((value - min) / width).clamp(0.0, 1.0);
        let level = classify_confidence(value, range).unwrap();
        let expected = if normalized <= 0.33 {
            ConfidenceLevel::High
        } else if normalized <= 0.66 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        };
        prop_assert_eq!(level, expected);
    }

    #[test]
    fn averages_of_nothing_are_none(window in 0usize..20) {
        prop_assert_eq!(moving_average(&[], window), None);
        prop_assert_eq!(weighted_moving_average(&[], window), None);
    }

    #[test]
    fn unlock_progress_never_decreases_with_time(
        photos in 0u32..12,
        challenges in 0u32..8,
        day in 0i64..30,
    ) {
        let engine = ScoringEngine::default();
        let state = state_with(photos, challenges);
        let earlier = engine.check_unlock_status(&state, epoch() + Duration::days(day));
        let later = engine.check_unlock_status(&state, epoch() + Duration::days(day + 1));
        prop_assert!(later.progress >= earlier.progress);
        prop_assert!((0.0..=1.0).contains(&earlier.progress));
        prop_assert!(!earlier.is_unlocked || later.is_unlocked);
        prop_assert_eq!(engine.check_unlock_status(&state, epoch() + Duration::days(day)), earlier);
    }

    #[test]
    fn perfect_sub_scores_give_perfect_total(
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
        c in 0.0f64..1.0,
        d in 0.01f64..1.0,
    ) {
        let sum = a + b + c + d;
        let weights = ScoreWeights {
            consistency: a / sum,
            challenge_completion: b / sum,
            photo_quality: c / sum,
            improvement: d / sum,
        };
        let perfect = ScoreBreakdown {
            consistency: 100.0,
            challenges: 100.0,
            quality: 100.0,
            improvement: 100.0,
        };
        prop_assert_eq!(perfect.weighted_total(&weights), 100.0);
    }

    #[test]
    fn generated_metrics_stay_in_range(seed in 0.0f64..1.0) {
        let generator = MetricGenerator::builtin().unwrap();
        let samples = generator.generate(seed).unwrap();
        prop_assert_eq!(samples.len(), generator.definitions().len());
        for (sample, def) in samples.iter().zip(generator.definitions()) {
            prop_assert!(def.value_range.contains(sample.value));
            prop_assert!(sample.range.min <= sample.value && sample.value <= sample.range.max);
            prop_assert!(def.variance_range.contains(sample.variance));
        }
    }

    #[test]
    fn reproducible_generation_is_stable(seed in 0.0f64..1.0) {
        let generator = MetricGenerator::builtin().unwrap();
        prop_assert_eq!(
            generator.generate_reproducible(seed).unwrap(),
            generator.generate_reproducible(seed).unwrap()
        );
    }

    #[test]
    fn trust_score_is_bounded(
        brightness in 0.0f64..255.0,
        sharpness in 0.0f64..400.0,
        contrast in 0.0f64..100.0,
        face_size in 0.0f64..1.0,
        yaw in -90.0f64..90.0,
        edited in any::<bool>(),
    ) {
        let validation = validate_photo(&PhotoQuality { brightness, sharpness, contrast, face_size });
        let filter = detect_filters(&CaptureMetadata {
            software: edited.then(|| "Facetune 2".to_string()),
            ..CaptureMetadata::default()
        });
        let angle = check_angle_consistency(Pose::new(yaw, 0.0, 0.0), &[Pose::default()]);
        let trust = calculate_trust_score(&validation, &filter, &angle);
        prop_assert!((MIN_TRUST_SCORE..=MAX_TRUST_SCORE).contains(&trust.score));
        prop_assert!(trust.score <= validation.confidence);
    }
}
