use serde::{Deserialize, Serialize};

use crate::core::{DataGroup, TrellisLayout, ValueScale};
use crate::error::TrellisResult;
use crate::interaction::HitTarget;
use crate::render::svg::{SvgNode, fmt_coord};

const LINE_STROKE_WIDTH_PX: f64 = 2.0;
const MARKER_RADIUS_PX: f64 = 3.5;
const LABEL_GAP_PX: f64 = 4.0;

/// How a measure's values are drawn within its panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    #[default]
    #[serde(alias = "bar")]
    Bars,
    #[serde(alias = "lines")]
    Line,
}

/// Where a value label sits relative to its bar or marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueLabelPosition {
    #[default]
    Above,
    #[serde(alias = "insideTop")]
    InsideTop,
    #[serde(alias = "insideCenter")]
    InsideCenter,
    Below,
}

/// One panel's series, fully resolved: values post-transform, fills already
/// run through the conditional color resolver, labels already formatted
/// (`None` hides the label for that category).
#[derive(Debug)]
pub struct SeriesInputs<'a> {
    pub measure_index: usize,
    pub kind: SeriesKind,
    pub values: &'a [f64],
    pub fills: &'a [String],
    pub labels: &'a [Option<String>],
    /// Path stroke for line series. Per-point conditional colors apply to
    /// markers only; the connecting path keeps the static color.
    pub line_color: &'a str,
    /// Contiguous same-group runs; line paths never cross a run boundary.
    pub groups: &'a [DataGroup],
}

#[derive(Debug, Clone, Copy)]
pub struct LabelStyle<'a> {
    pub position: ValueLabelPosition,
    pub font_size: f64,
    pub color: &'a str,
    /// Bars shorter than this suppress their label unless `force` is set.
    pub min_bar_height: f64,
    pub force: bool,
}

/// Builds the `<g>` layer holding one measure's bars or line for the panel
/// starting at `panel_top`. Every bar and marker carries an `id` that the
/// hit registry maps back to `(measure_index, data_index)`.
pub fn build_series_layer(
    layout: &TrellisLayout,
    scale: &ValueScale,
    panel_top: f64,
    series: &SeriesInputs<'_>,
    labels: &LabelStyle<'_>,
) -> TrellisResult<SvgNode> {
    match series.kind {
        SeriesKind::Bars => build_bars(layout, scale, panel_top, series, labels),
        SeriesKind::Line => build_line(layout, scale, panel_top, series, labels),
    }
}

fn build_bars(
    layout: &TrellisLayout,
    scale: &ValueScale,
    panel_top: f64,
    series: &SeriesInputs<'_>,
    labels: &LabelStyle<'_>,
) -> TrellisResult<SvgNode> {
    let row_height = layout.measure_row_height;
    let base_y = scale.baseline_y(panel_top, row_height)?;
    let mut group = SvgNode::new("g").attr("class", "series-bars");

    for (idx, &value) in series.values.iter().enumerate() {
        let value_y = scale.value_to_y(value, panel_top, row_height)?;
        let top = value_y.min(base_y);
        let height = (value_y - base_y).abs();
        let x = layout.bar_left(idx);

        let bar = SvgNode::new("rect")
            .attr("id", HitTarget::new(series.measure_index, idx).element_id())
            .coord("x", x)
            .coord("y", top)
            .coord("width", layout.bar_width)
            .coord("height", height)
            .attr("fill", fill_for(series, idx));
        group.push(bar);

        if let Some(text) = label_text(series, idx)
            && (labels.force || height >= labels.min_bar_height)
        {
            let center_x = layout.category_center_x(idx);
            let label_y = match labels.position {
                ValueLabelPosition::Above => top - LABEL_GAP_PX,
                ValueLabelPosition::InsideTop => top + labels.font_size + 2.0,
                ValueLabelPosition::InsideCenter => top + height / 2.0 + labels.font_size * 0.35,
                ValueLabelPosition::Below => top + height + labels.font_size + 2.0,
            };
            group.push(value_label(center_x, label_y, text, labels));
        }
    }
    Ok(group)
}

fn build_line(
    layout: &TrellisLayout,
    scale: &ValueScale,
    panel_top: f64,
    series: &SeriesInputs<'_>,
    labels: &LabelStyle<'_>,
) -> TrellisResult<SvgNode> {
    let row_height = layout.measure_row_height;
    let mut group = SvgNode::new("g").attr("class", "series-line");

    // One path per contiguous run keeps separate groups visually disjoint.
    for run in series.groups {
        if run.start_idx >= series.values.len() {
            continue;
        }
        let end = run.end_idx.min(series.values.len() - 1);
        let mut path = String::new();
        for idx in run.start_idx..=end {
            let y = scale.value_to_y(series.values[idx], panel_top, row_height)?;
            let prefix = if idx == run.start_idx { 'M' } else { 'L' };
            if idx > run.start_idx {
                path.push(' ');
            }
            path.push(prefix);
            path.push_str(&fmt_coord(layout.category_center_x(idx)));
            path.push(' ');
            path.push_str(&fmt_coord(y));
        }
        group.push(
            SvgNode::new("path")
                .attr("d", path)
                .attr("fill", "none")
                .attr("stroke", series.line_color)
                .coord("stroke-width", LINE_STROKE_WIDTH_PX),
        );
    }

    for (idx, &value) in series.values.iter().enumerate() {
        let cx = layout.category_center_x(idx);
        let cy = scale.value_to_y(value, panel_top, row_height)?;
        group.push(
            SvgNode::new("circle")
                .attr("id", HitTarget::new(series.measure_index, idx).element_id())
                .coord("cx", cx)
                .coord("cy", cy)
                .coord("r", MARKER_RADIUS_PX)
                .attr("fill", fill_for(series, idx)),
        );
        if let Some(text) = label_text(series, idx) {
            // Inside positions have no meaning for a marker; they collapse
            // to the above placement.
            let label_y = match labels.position {
                ValueLabelPosition::Below => cy + labels.font_size + MARKER_RADIUS_PX + 2.0,
                _ => cy - MARKER_RADIUS_PX - LABEL_GAP_PX,
            };
            group.push(value_label(cx, label_y, text, labels));
        }
    }
    Ok(group)
}

fn fill_for<'a>(series: &'a SeriesInputs<'_>, idx: usize) -> &'a str {
    series
        .fills
        .get(idx)
        .map_or(series.line_color, String::as_str)
}

fn label_text<'a>(series: &'a SeriesInputs<'_>, idx: usize) -> Option<&'a str> {
    series.labels.get(idx).and_then(|l| l.as_deref())
}

fn value_label(x: f64, y: f64, text: &str, style: &LabelStyle<'_>) -> SvgNode {
    SvgNode::new("text")
        .coord("x", x)
        .coord("y", y)
        .attr("fill", style.color)
        .coord("font-size", style.font_size)
        .attr("font-family", "sans-serif")
        .attr("text-anchor", "middle")
        .text(text)
}
