use crate::core::{DataGroup, TrellisLayout};
use crate::render::svg::{SvgNode, fmt_coord};

const TICK_MARK_LEN_PX: f64 = 4.0;
const TICK_LABEL_GAP_PX: f64 = 8.0;
const X_LABEL_GAP_PX: f64 = 6.0;
const MEASURE_LABEL_INSET_PX: f64 = 8.0;

/// Evenly spaced tick values between `min` and `max`, both endpoints
/// included. A degenerate span yields the single shared value.
#[must_use]
pub fn tick_values(min: f64, max: f64, count: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }
    let count = count.max(2);
    let step = (max - min) / (count - 1) as f64;
    (0..count).map(|i| min + step * i as f64).collect()
}

/// Formatted ticks for one panel, paired with their pixel rows. Callers
/// format values and map them through the panel's scale so formatting and
/// geometry stay out of this layer.
#[derive(Debug)]
pub struct YAxisSpec<'a> {
    /// `(pixel_y, label)` pairs, any order.
    pub ticks: &'a [(f64, String)],
    pub axis_color: &'a str,
    pub text_color: &'a str,
    pub font_size: f64,
    pub gridlines: bool,
    pub gridline_color: &'a str,
}

#[must_use]
pub fn build_y_axis(layout: &TrellisLayout, panel_top: f64, spec: &YAxisSpec<'_>) -> SvgNode {
    let x = layout.plot_left();
    let mut group = SvgNode::new("g").attr("class", "y-axis").child(
        SvgNode::new("line")
            .coord("x1", x)
            .coord("y1", panel_top)
            .coord("x2", x)
            .coord("y2", panel_top + layout.measure_row_height)
            .attr("stroke", spec.axis_color)
            .attr("stroke-width", "1"),
    );

    for (y, label) in spec.ticks {
        if spec.gridlines {
            group.push(
                SvgNode::new("line")
                    .coord("x1", x)
                    .coord("y1", *y)
                    .coord("x2", layout.plot_right())
                    .coord("y2", *y)
                    .attr("stroke", spec.gridline_color)
                    .attr("stroke-width", "1"),
            );
        }
        group.push(
            SvgNode::new("line")
                .coord("x1", x - TICK_MARK_LEN_PX)
                .coord("y1", *y)
                .coord("x2", x)
                .coord("y2", *y)
                .attr("stroke", spec.axis_color)
                .attr("stroke-width", "1"),
        );
        group.push(
            SvgNode::new("text")
                .coord("x", x - TICK_LABEL_GAP_PX)
                .coord("y", *y + spec.font_size * 0.35)
                .attr("fill", spec.text_color)
                .coord("font-size", spec.font_size)
                .attr("font-family", "sans-serif")
                .attr("text-anchor", "end")
                .text(label.clone()),
        );
    }
    group
}

#[derive(Debug)]
pub struct XAxisSpec<'a> {
    pub labels: &'a [String],
    /// Negative values slant labels up to the right; zero keeps them flat.
    pub rotation_degrees: f64,
    pub font_size: f64,
    pub text_color: &'a str,
    pub axis_color: &'a str,
    pub show_baseline: bool,
}

/// Category labels below the last panel, one per category, rotated around
/// their own anchor point.
#[must_use]
pub fn build_x_axis(layout: &TrellisLayout, axis_y: f64, spec: &XAxisSpec<'_>) -> SvgNode {
    let mut group = SvgNode::new("g").attr("class", "x-axis");
    if spec.show_baseline {
        group.push(
            SvgNode::new("line")
                .coord("x1", layout.plot_left())
                .coord("y1", axis_y)
                .coord("x2", layout.plot_right())
                .coord("y2", axis_y)
                .attr("stroke", spec.axis_color)
                .attr("stroke-width", "1"),
        );
    }

    let label_y = axis_y + spec.font_size + X_LABEL_GAP_PX;
    for (idx, label) in spec.labels.iter().enumerate() {
        let x = layout.category_center_x(idx);
        let mut text = SvgNode::new("text")
            .coord("x", x)
            .coord("y", label_y)
            .attr("fill", spec.text_color)
            .coord("font-size", spec.font_size)
            .attr("font-family", "sans-serif");
        if spec.rotation_degrees == 0.0 {
            text = text.attr("text-anchor", "middle");
        } else {
            let anchor = if spec.rotation_degrees < 0.0 {
                "end"
            } else {
                "start"
            };
            text = text.attr("text-anchor", anchor).attr(
                "transform",
                format!(
                    "rotate({} {} {})",
                    fmt_coord(spec.rotation_degrees),
                    fmt_coord(x),
                    fmt_coord(label_y)
                ),
            );
        }
        group.push(text.text(label.clone()));
    }
    group
}

#[derive(Debug, Clone, Copy)]
pub struct DividerStyle<'a> {
    pub color: &'a str,
    pub width: f64,
}

/// Horizontal separators centered in the gaps between adjacent panels.
#[must_use]
pub fn build_measure_dividers(layout: &TrellisLayout, style: DividerStyle<'_>) -> SvgNode {
    let mut group = SvgNode::new("g").attr("class", "measure-dividers");
    for idx in 0..layout.measure_count.saturating_sub(1) {
        let y = (layout.panel_bottom(idx) + layout.panel_top(idx + 1)) / 2.0;
        group.push(horizontal_divider(layout, y, style));
    }
    group
}

/// Vertical separators between every pair of adjacent categories.
#[must_use]
pub fn build_bar_dividers(layout: &TrellisLayout, style: DividerStyle<'_>) -> SvgNode {
    let mut group = SvgNode::new("g").attr("class", "bar-dividers");
    for idx in 0..layout.category_count.saturating_sub(1) {
        group.push(vertical_divider(layout, layout.boundary_x_after(idx), style));
    }
    group
}

/// Vertical separators at the boundary after each group's final category.
#[must_use]
pub fn build_group_dividers(
    layout: &TrellisLayout,
    groups: &[DataGroup],
    style: DividerStyle<'_>,
) -> SvgNode {
    let mut group = SvgNode::new("g").attr("class", "group-dividers");
    for run in groups.iter().take(groups.len().saturating_sub(1)) {
        group.push(vertical_divider(layout, layout.boundary_x_after(run.end_idx), style));
    }
    group
}

fn horizontal_divider(layout: &TrellisLayout, y: f64, style: DividerStyle<'_>) -> SvgNode {
    SvgNode::new("line")
        .coord("x1", layout.plot_left())
        .coord("y1", y)
        .coord("x2", layout.plot_right())
        .coord("y2", y)
        .attr("stroke", style.color)
        .coord("stroke-width", style.width)
}

fn vertical_divider(layout: &TrellisLayout, x: f64, style: DividerStyle<'_>) -> SvgNode {
    SvgNode::new("line")
        .coord("x1", x)
        .coord("y1", layout.top_margin)
        .coord("x2", x)
        .coord("y2", layout.panel_bottom(layout.measure_count.saturating_sub(1)))
        .attr("stroke", style.color)
        .coord("stroke-width", style.width)
}

/// Group header labels centered over each run's horizontal extent.
#[must_use]
pub fn build_group_headers(
    layout: &TrellisLayout,
    groups: &[DataGroup],
    header_y: f64,
    font_size: f64,
    text_color: &str,
) -> SvgNode {
    let mut group = SvgNode::new("g").attr("class", "group-headers");
    for run in groups {
        if run.label.is_empty() {
            continue;
        }
        let center = (layout.category_center_x(run.start_idx)
            + layout.category_center_x(run.end_idx))
            / 2.0;
        group.push(
            SvgNode::new("text")
                .coord("x", center)
                .coord("y", header_y)
                .attr("fill", text_color)
                .coord("font-size", font_size)
                .attr("font-family", "sans-serif")
                .attr("text-anchor", "middle")
                .text(run.label.clone()),
        );
    }
    group
}

/// Measure name anchored in the reserved left band, vertically centered
/// on its panel.
#[must_use]
pub fn build_measure_label(
    layout: &TrellisLayout,
    panel_top: f64,
    name: &str,
    font_size: f64,
    text_color: &str,
) -> SvgNode {
    SvgNode::new("text")
        .coord("x", MEASURE_LABEL_INSET_PX)
        .coord("y", panel_top + layout.measure_row_height / 2.0 + font_size * 0.35)
        .attr("fill", text_color)
        .coord("font-size", font_size)
        .attr("font-family", "sans-serif")
        .attr("text-anchor", "start")
        .text(name)
}
