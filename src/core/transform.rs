//! Percentage-of-total value transforms.
//!
//! Transforms run before range and layout computation and always produce a
//! fresh point sequence. Several measures may each carry an independent rule
//! over the same projected points, so nothing here mutates in place.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, DimensionSlot};

/// How one measure's values are converted to shares of a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "mode")]
pub enum PercentOfTotalRule {
    /// Share of the measure's sum over all points, as a 0–100 number.
    Global,
    /// Share of the sum over points carrying the same value of the chosen
    /// dimension, as a 0–100 number.
    Grouped { dimension: DimensionSlot },
}

/// Replaces measure `measure_idx` of every point with its percentage share.
///
/// Points whose total is zero (or non-finite) map to `0.0` rather than NaN;
/// all other measures are carried over untouched. The returned points are
/// new objects with copied value vectors.
#[must_use]
pub fn apply_percent_of_total(
    points: &[DataPoint],
    measure_idx: usize,
    rule: PercentOfTotalRule,
) -> Vec<DataPoint> {
    match rule {
        PercentOfTotalRule::Global => {
            let total: f64 = points
                .iter()
                .map(|point| finite_or_zero(point.value(measure_idx)))
                .sum();
            rewrite_values(points, measure_idx, |point| {
                share_of(point.value(measure_idx), total)
            })
        }
        PercentOfTotalRule::Grouped { dimension } => {
            let mut totals: HashMap<&str, f64> = HashMap::new();
            for point in points {
                let entry = totals.entry(point.label_for(dimension)).or_insert(0.0);
                *entry += finite_or_zero(point.value(measure_idx));
            }
            rewrite_values(points, measure_idx, |point| {
                let total = totals.get(point.label_for(dimension)).copied().unwrap_or(0.0);
                share_of(point.value(measure_idx), total)
            })
        }
    }
}

fn rewrite_values(
    points: &[DataPoint],
    measure_idx: usize,
    mut replacement: impl FnMut(&DataPoint) -> f64,
) -> Vec<DataPoint> {
    points
        .iter()
        .map(|point| {
            let mut values = point.values.clone();
            if let Some(slot) = values.get_mut(measure_idx) {
                *slot = replacement(point);
            }
            DataPoint::new(
                point.primary_label.clone(),
                point.secondary_labels.clone(),
                values,
            )
        })
        .collect()
}

fn share_of(value: f64, total: f64) -> f64 {
    if !total.is_finite() || total == 0.0 {
        return 0.0;
    }
    finite_or_zero(value) / total * 100.0
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
