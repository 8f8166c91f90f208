//! Static metric definitions.

use std::collections::HashSet;

use mirra_core::error::MetricError;
use mirra_core::types::Bounds;
use serde::{Deserialize, Serialize};

/// How one named metric is generated.
///
/// # Invariants
///
/// * every range has `min <= max`
/// * `variance_range` has non-zero width (it normalizes confidence)
/// * `baseline_range` lies inside `value_range`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricDefinition {
    pub id: String,
    pub label: String,
    pub baseline_range: Bounds,
    pub variance_range: Bounds,
    pub value_range: Bounds,
}

impl MetricDefinition {
    pub fn new(
        id: &str,
        label: &str,
        baseline_range: Bounds,
        variance_range: Bounds,
        value_range: Bounds,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            baseline_range,
            variance_range,
            value_range,
        }
    }

    /// Reject definitions that would make generation or confidence
    /// classification undefined.
    pub fn validate(&self) -> Result<(), MetricError> {
        for (which, r) in [
            ("baseline", self.baseline_range),
            ("variance", self.variance_range),
            ("value", self.value_range),
        ] {
            if r.min > r.max {
                return Err(MetricError::InvertedRange {
                    id: self.id.clone(),
                    which,
                    min: r.min,
                    max: r.max,
                });
            }
        }
        if self.variance_range.width() == 0.0 {
            return Err(MetricError::DegenerateVariance { id: self.id.clone() });
        }
        if !self.value_range.contains_bounds(&self.baseline_range) {
            return Err(MetricError::BaselineOutOfBounds { id: self.id.clone() });
        }
        Ok(())
    }
}

/// Validate a whole table, including id uniqueness.
pub fn validate_definitions(defs: &[MetricDefinition]) -> Result<(), MetricError> {
    let mut seen = HashSet::new();
    for def in defs {
        def.validate()?;
        if !seen.insert(def.id.as_str()) {
            return Err(MetricError::DuplicateId(def.id.clone()));
        }
    }
    Ok(())
}

/// The facial metrics reported for every capture.
///
/// Scores are on a 0–100 scale except `facial_fat_index` (percent),
/// `canthal_tilt` (degrees) and `facial_width_ratio` (width / height).
pub fn builtin_definitions() -> Vec<MetricDefinition> {
    vec![
        MetricDefinition::new(
            "jawline_definition",
            "Jawline definition",
            Bounds::new(55.0, 75.0),
            Bounds::new(2.0, 8.0),
            Bounds::new(0.0, 100.0),
        ),
        MetricDefinition::new(
            "facial_symmetry",
            "Facial symmetry",
            Bounds::new(78.0, 92.0),
            Bounds::new(1.0, 5.0),
            Bounds::new(0.0, 100.0),
        ),
        MetricDefinition::new(
            "skin_clarity",
            "Skin clarity",
            Bounds::new(60.0, 80.0),
            Bounds::new(3.0, 10.0),
            Bounds::new(0.0, 100.0),
        ),
        MetricDefinition::new(
            "facial_fat_index",
            "Facial fat index",
            Bounds::new(18.0, 28.0),
            Bounds::new(1.0, 4.0),
            Bounds::new(5.0, 45.0),
        ),
        MetricDefinition::new(
            "cheekbone_prominence",
            "Cheekbone prominence",
            Bounds::new(50.0, 70.0),
            Bounds::new(2.0, 7.0),
            Bounds::new(0.0, 100.0),
        ),
        MetricDefinition::new(
            "under_eye_puffiness",
            "Under-eye puffiness",
            Bounds::new(20.0, 40.0),
            Bounds::new(2.0, 8.0),
            Bounds::new(0.0, 100.0),
        ),
        MetricDefinition::new(
            "canthal_tilt",
            "Canthal tilt",
            Bounds::new(2.0, 6.0),
            Bounds::new(0.5, 2.0),
            Bounds::new(-10.0, 15.0),
        ),
        MetricDefinition::new(
            "facial_width_ratio",
            "Facial width-to-height ratio",
            Bounds::new(1.7, 2.0),
            Bounds::new(0.03, 0.12),
            Bounds::new(1.4, 2.4),
        ),
    ]
}
