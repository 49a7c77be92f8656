use serde::{Deserialize, Serialize};

use crate::core::DataPoint;

/// Per-measure inputs that adjust the data-driven range: explicit axis
/// bounds (already resolved from `'auto'`) and an enabled reference-line
/// value that must stay inside the effective range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeOverrides {
    pub min_y: Option<f64>,
    pub max_y: Option<f64>,
    pub reference_value: Option<f64>,
}

/// Resolved vertical range for one measure.
///
/// `min`/`max` keep the pre-override calculation for diagnostics;
/// `effective_min`/`effective_max` are what renderers scale against.
/// Recomputed fresh on every render or resize, never cached across data
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureRange {
    pub measure: usize,
    pub min: f64,
    pub max: f64,
    pub effective_min: f64,
    pub effective_max: f64,
}

/// Computes the range for measure `measure_idx` over the projected points.
#[must_use]
pub fn compute_measure_range(
    points: &[DataPoint],
    measure_idx: usize,
    overrides: RangeOverrides,
) -> MeasureRange {
    let mut data_min = f64::INFINITY;
    let mut data_max = f64::NEG_INFINITY;

    for point in points {
        let Some(value) = point.values.get(measure_idx).copied() else {
            continue;
        };
        if !value.is_finite() {
            continue;
        }
        data_min = data_min.min(value);
        data_max = data_max.max(value);
    }

    if data_min > data_max {
        // No usable values for this measure.
        data_min = 0.0;
        data_max = 1.0;
    }

    let range = data_max - data_min;
    let margin = if range > 0.0 {
        range * 0.1
    } else if data_max > 0.0 {
        data_max * 0.1
    } else {
        0.1
    };

    // The zero floor keeps positive bar charts anchored at the axis; data
    // below zero keeps its own margin so the range never inverts.
    let calculated_min = if data_min >= 0.0 {
        (data_min - margin).max(0.0)
    } else {
        data_min - margin
    };
    let calculated_max = data_max + margin;

    let mut effective_min = overrides.min_y.unwrap_or(calculated_min);
    let mut effective_max = overrides.max_y.unwrap_or(calculated_max);

    // A reference line must never be clipped out of view; widen whichever
    // bound excludes it.
    if let Some(reference) = overrides.reference_value.filter(|v| v.is_finite()) {
        if reference < effective_min {
            effective_min = reference;
        }
        if reference > effective_max {
            effective_max = reference;
        }
    }

    MeasureRange {
        measure: measure_idx,
        min: calculated_min,
        max: calculated_max,
        effective_min,
        effective_max,
    }
}

/// Ranges for all measures, one `RangeOverrides` per configured measure.
#[must_use]
pub fn compute_measure_ranges(
    points: &[DataPoint],
    overrides: &[RangeOverrides],
) -> Vec<MeasureRange> {
    overrides
        .iter()
        .enumerate()
        .map(|(measure_idx, o)| compute_measure_range(points, measure_idx, *o))
        .collect()
}
