use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, DimensionSlot};

/// Tolerance applied to `==` and `!=` threshold comparisons.
pub const EQUALITY_TOLERANCE: f64 = 1e-4;

/// Categorical fallback palette; labels hash onto it, so a label keeps its
/// color across renders and data orderings.
const PALETTE: [&str; 10] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ac",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdOp {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
}

#[must_use]
pub fn threshold_matches(op: ThresholdOp, value: f64, threshold: f64) -> bool {
    match op {
        ThresholdOp::Gt => value > threshold,
        ThresholdOp::Lt => value < threshold,
        ThresholdOp::Ge => value >= threshold,
        ThresholdOp::Le => value <= threshold,
        ThresholdOp::Eq => (value - threshold).abs() <= EQUALITY_TOLERANCE,
        ThresholdOp::Ne => (value - threshold).abs() > EQUALITY_TOLERANCE,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdColorRule {
    pub op: ThresholdOp,
    pub threshold: f64,
    pub true_color: String,
    pub false_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionColorRule {
    pub dimension: DimensionSlot,
    /// Explicit label assignments; unmapped labels fall back to the palette.
    #[serde(default)]
    pub color_map: IndexMap<String, String>,
}

/// Conditional coloring for one measure. The two modes are mutually
/// exclusive by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "mode")]
pub enum ConditionalColorRule {
    Threshold(ThresholdColorRule),
    Dimension(DimensionColorRule),
}

/// Resolves the fill for one value of one data point. Without a rule the
/// measure's static color applies.
#[must_use]
pub fn resolve_color<'a>(
    rule: Option<&'a ConditionalColorRule>,
    static_color: &'a str,
    value: f64,
    point: &DataPoint,
) -> &'a str {
    match rule {
        None => static_color,
        Some(ConditionalColorRule::Threshold(rule)) => {
            if threshold_matches(rule.op, value, rule.threshold) {
                &rule.true_color
            } else {
                &rule.false_color
            }
        }
        Some(ConditionalColorRule::Dimension(rule)) => {
            let label = point.label_for(rule.dimension);
            rule.color_map
                .get(label)
                .map_or_else(|| palette_color(label), String::as_str)
        }
    }
}

/// Stable palette assignment: FNV-1a over the label, modulo palette size.
#[must_use]
pub fn palette_color(label: &str) -> &'static str {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in label.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    PALETTE[(hash % PALETTE.len() as u64) as usize]
}
