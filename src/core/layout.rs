use serde::{Deserialize, Serialize};

use crate::core::ContainerBox;
use crate::error::{TrellisError, TrellisResult};

/// Width the chart falls back to when `fit_width` is set but the container
/// has not reported a larger size yet.
pub const FIT_WIDTH_FALLBACK_PX: f64 = 800.0;

/// Fixed bar metrics used in fit-width mode while the y-axis is shown.
const AXIS_BAR_SPACING_PX: f64 = 20.0;
const AXIS_BAR_WIDTH_PX: f64 = 40.0;

/// Floors applied to computed bar metrics in fit-width mode without an axis.
const MIN_BAR_SPACING_PX: f64 = 15.0;
const MIN_BAR_WIDTH_PX: f64 = 30.0;

/// Gutter reserved left of the plot for y-axis tick labels.
const Y_AXIS_GUTTER_PX: f64 = 48.0;
const BASE_MARGIN_PX: f64 = 16.0;
const GROUP_HEADER_SPACE_PX: f64 = 24.0;
const MIN_ROW_HEIGHT_PX: f64 = 24.0;

/// Everything the layout computation depends on. A `TrellisLayout` is a pure
/// function of this struct; no prior layout feeds back into the next one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutInputs {
    pub measure_count: usize,
    pub category_count: usize,
    pub fit_width: bool,
    pub fit_height: bool,
    /// Most recent valid container box; `None` before the host reported one.
    pub container: Option<ContainerBox>,
    pub show_y_axis: bool,
    /// Space reserved left of each panel for its measure name; zero hides it.
    pub measure_label_space: f64,
    /// Space below the last panel for rotated category labels and headers.
    pub x_label_space: f64,
    pub has_group_headers: bool,
    pub fixed_bar_width: f64,
    pub fixed_bar_spacing: f64,
    pub fixed_row_height: f64,
    pub spacing_between_measures: f64,
}

/// Exact pixel geometry for one render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrellisLayout {
    pub left_margin: f64,
    pub top_margin: f64,
    pub bottom_margin: f64,
    pub right_margin: f64,
    pub spacing_between_measures: f64,
    pub chart_width: f64,
    pub chart_height: f64,
    pub measure_row_height: f64,
    pub plot_area_width: f64,
    pub bar_width: f64,
    pub bar_spacing: f64,
    pub measure_label_space: f64,
    pub measure_count: usize,
    pub category_count: usize,
}

impl TrellisLayout {
    #[must_use]
    pub fn plot_left(&self) -> f64 {
        self.left_margin
    }

    #[must_use]
    pub fn plot_right(&self) -> f64 {
        self.left_margin + self.plot_area_width
    }

    /// Top pixel of panel `measure_idx`.
    #[must_use]
    pub fn panel_top(&self, measure_idx: usize) -> f64 {
        self.top_margin
            + measure_idx as f64 * (self.measure_row_height + self.spacing_between_measures)
    }

    #[must_use]
    pub fn panel_bottom(&self, measure_idx: usize) -> f64 {
        self.panel_top(measure_idx) + self.measure_row_height
    }

    /// Left edge of the bar for category `category_idx`.
    #[must_use]
    pub fn bar_left(&self, category_idx: usize) -> f64 {
        self.left_margin
            + self.bar_spacing
            + category_idx as f64 * (self.bar_width + self.bar_spacing)
    }

    /// Horizontal center of category `category_idx`; line points and labels
    /// anchor here.
    #[must_use]
    pub fn category_center_x(&self, category_idx: usize) -> f64 {
        self.bar_left(category_idx) + self.bar_width / 2.0
    }

    /// Vertical boundary between category `left_idx` and its right neighbor:
    /// the midpoint of the gap between adjacent bar edges, not bar centers.
    #[must_use]
    pub fn boundary_x_after(&self, left_idx: usize) -> f64 {
        let right_edge = self.bar_left(left_idx) + self.bar_width;
        let next_left = self.bar_left(left_idx + 1);
        (right_edge + next_left) / 2.0
    }
}

/// Computes the full layout geometry.
///
/// Width and height are independent responsive axes. When a fit flag is set
/// the container drives the axis (with a documented fallback before the
/// container has a usable size); otherwise the axis derives bottom-up from
/// the fixed metrics. Calling this twice with identical inputs yields
/// identical geometry.
pub fn compute_layout(inputs: LayoutInputs) -> TrellisResult<TrellisLayout> {
    if inputs.measure_count == 0 || inputs.category_count == 0 {
        return Err(TrellisError::InvalidData(
            "layout requires at least one measure and one category".to_owned(),
        ));
    }
    for (name, value) in [
        ("fixed_bar_width", inputs.fixed_bar_width),
        ("fixed_bar_spacing", inputs.fixed_bar_spacing),
        ("fixed_row_height", inputs.fixed_row_height),
        ("spacing_between_measures", inputs.spacing_between_measures),
        ("measure_label_space", inputs.measure_label_space),
        ("x_label_space", inputs.x_label_space),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(TrellisError::InvalidConfig(format!(
                "layout input `{name}` must be finite and >= 0"
            )));
        }
    }

    let measures = inputs.measure_count as f64;
    let categories = inputs.category_count as f64;

    let left_margin = if inputs.show_y_axis {
        Y_AXIS_GUTTER_PX + inputs.measure_label_space
    } else {
        BASE_MARGIN_PX + inputs.measure_label_space
    };
    let right_margin = BASE_MARGIN_PX;
    let top_margin = BASE_MARGIN_PX;
    let bottom_margin = inputs.x_label_space
        + if inputs.has_group_headers {
            GROUP_HEADER_SPACE_PX
        } else {
            0.0
        };

    let (chart_width, bar_width, bar_spacing) = if inputs.fit_width {
        let container_width = inputs
            .container
            .filter(|b| b.is_valid())
            .map_or(0.0, |b| f64::from(b.width));
        let chart_width = container_width.max(FIT_WIDTH_FALLBACK_PX);
        let plot_area_width = chart_width - left_margin - right_margin;

        let bar_spacing = if inputs.show_y_axis {
            AXIS_BAR_SPACING_PX
        } else {
            (plot_area_width / (categories * 3.0)).max(MIN_BAR_SPACING_PX)
        };
        let bar_width = if inputs.show_y_axis {
            AXIS_BAR_WIDTH_PX
        } else {
            let total_spacing = bar_spacing * (categories + 1.0);
            ((plot_area_width - total_spacing) / categories).max(MIN_BAR_WIDTH_PX)
        };
        (chart_width, bar_width, bar_spacing)
    } else {
        let chart_width = left_margin
            + right_margin
            + categories * inputs.fixed_bar_width
            + (categories + 1.0) * inputs.fixed_bar_spacing;
        (chart_width, inputs.fixed_bar_width, inputs.fixed_bar_spacing)
    };

    let (chart_height, measure_row_height) = if inputs.fit_height {
        let container_height = inputs
            .container
            .filter(|b| b.is_valid())
            .map_or(0.0, |b| f64::from(b.height));
        let inter_row = inputs.spacing_between_measures * (measures - 1.0);
        let available = container_height - top_margin - bottom_margin - inter_row;
        let row_height = (available / measures).max(MIN_ROW_HEIGHT_PX);
        let chart_height = if container_height
            >= top_margin + bottom_margin + inter_row + measures * MIN_ROW_HEIGHT_PX
        {
            container_height
        } else {
            top_margin + bottom_margin + inter_row + measures * row_height
        };
        (chart_height, row_height)
    } else {
        let row_height = inputs.fixed_row_height.max(MIN_ROW_HEIGHT_PX);
        let chart_height = top_margin
            + bottom_margin
            + measures * row_height
            + inputs.spacing_between_measures * (measures - 1.0);
        (chart_height, row_height)
    };

    Ok(TrellisLayout {
        left_margin,
        top_margin,
        bottom_margin,
        right_margin,
        spacing_between_measures: inputs.spacing_between_measures,
        chart_width,
        chart_height,
        measure_row_height,
        plot_area_width: chart_width - left_margin - right_margin,
        bar_width,
        bar_spacing,
        measure_label_space: inputs.measure_label_space,
        measure_count: inputs.measure_count,
        category_count: inputs.category_count,
    })
}
