use serde::{Deserialize, Serialize};

use crate::core::{ContainerBox, LayoutInputs};
use crate::error::{TrellisError, TrellisResult};

/// One decorative divider layer toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividerConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_divider_color")]
    pub color: String,
    #[serde(default = "default_divider_width")]
    pub width: f64,
}

impl Default for DividerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            color: default_divider_color(),
            width: default_divider_width(),
        }
    }
}

/// Chart-wide configuration.
///
/// This type is serializable so host applications can persist/load chart
/// setup without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrellisConfig {
    #[serde(default = "default_true")]
    pub fit_width: bool,
    #[serde(default)]
    pub fit_height: bool,
    #[serde(default = "default_true")]
    pub show_y_axis: bool,
    #[serde(default = "default_true")]
    pub show_x_axis: bool,
    #[serde(default)]
    pub show_gridlines: bool,
    #[serde(default = "default_y_tick_count")]
    pub y_tick_count: usize,
    #[serde(default = "default_bar_width")]
    pub bar_width: f64,
    #[serde(default = "default_bar_spacing")]
    pub bar_spacing: f64,
    #[serde(default = "default_measure_row_height")]
    pub measure_row_height: f64,
    #[serde(default = "default_spacing_between_measures")]
    pub spacing_between_measures: f64,
    #[serde(default = "default_true")]
    pub show_measure_labels: bool,
    #[serde(default = "default_measure_label_space")]
    pub measure_label_space: f64,
    #[serde(default = "default_x_label_rotation")]
    pub x_label_rotation_degrees: f64,
    #[serde(default = "default_x_label_space")]
    pub x_label_space: f64,
    #[serde(default = "default_font_size")]
    pub axis_font_size: f64,
    #[serde(default = "default_font_size")]
    pub label_font_size: f64,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default = "default_axis_color")]
    pub axis_color: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_gridline_color")]
    pub gridline_color: String,
    #[serde(default)]
    pub divider_between_measures: DividerConfig,
    #[serde(default)]
    pub divider_between_groups: DividerConfig,
    #[serde(default)]
    pub divider_between_bars: DividerConfig,
    /// Draws value labels even on bars shorter than the suppression height.
    #[serde(default)]
    pub force_value_labels: bool,
    #[serde(default = "default_min_label_bar_height")]
    pub min_label_bar_height: f64,
}

impl Default for TrellisConfig {
    fn default() -> Self {
        Self {
            fit_width: true,
            fit_height: false,
            show_y_axis: true,
            show_x_axis: true,
            show_gridlines: false,
            y_tick_count: default_y_tick_count(),
            bar_width: default_bar_width(),
            bar_spacing: default_bar_spacing(),
            measure_row_height: default_measure_row_height(),
            spacing_between_measures: default_spacing_between_measures(),
            show_measure_labels: true,
            measure_label_space: default_measure_label_space(),
            x_label_rotation_degrees: default_x_label_rotation(),
            x_label_space: default_x_label_space(),
            axis_font_size: default_font_size(),
            label_font_size: default_font_size(),
            background_color: default_background_color(),
            axis_color: default_axis_color(),
            text_color: default_text_color(),
            gridline_color: default_gridline_color(),
            divider_between_measures: DividerConfig::default(),
            divider_between_groups: DividerConfig::default(),
            divider_between_bars: DividerConfig::default(),
            force_value_labels: false,
            min_label_bar_height: default_min_label_bar_height(),
        }
    }
}

impl TrellisConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets responsive width behavior.
    #[must_use]
    pub const fn with_fit_width(mut self, fit: bool) -> Self {
        self.fit_width = fit;
        self
    }

    /// Sets responsive height behavior.
    #[must_use]
    pub const fn with_fit_height(mut self, fit: bool) -> Self {
        self.fit_height = fit;
        self
    }

    /// Sets y-axis visibility.
    #[must_use]
    pub const fn with_y_axis(mut self, shown: bool) -> Self {
        self.show_y_axis = shown;
        self
    }

    /// Sets x-axis visibility.
    #[must_use]
    pub const fn with_x_axis(mut self, shown: bool) -> Self {
        self.show_x_axis = shown;
        self
    }

    /// Sets the fixed bar metrics used outside fit-width mode.
    #[must_use]
    pub const fn with_bar_metrics(mut self, width: f64, spacing: f64) -> Self {
        self.bar_width = width;
        self.bar_spacing = spacing;
        self
    }

    /// Sets the fixed panel height used outside fit-height mode.
    #[must_use]
    pub const fn with_measure_row_height(mut self, height: f64) -> Self {
        self.measure_row_height = height;
        self
    }

    /// Sets x-label rotation in degrees; negative slants up to the right.
    #[must_use]
    pub const fn with_x_label_rotation(mut self, degrees: f64) -> Self {
        self.x_label_rotation_degrees = degrees;
        self
    }

    /// Sets measure-name label visibility.
    #[must_use]
    pub const fn with_measure_labels(mut self, shown: bool) -> Self {
        self.show_measure_labels = shown;
        self
    }

    /// Enables the divider drawn between measure panels.
    #[must_use]
    pub fn with_measure_dividers(mut self, divider: DividerConfig) -> Self {
        self.divider_between_measures = divider;
        self
    }

    /// Enables the divider drawn between secondary-dimension groups.
    #[must_use]
    pub fn with_group_dividers(mut self, divider: DividerConfig) -> Self {
        self.divider_between_groups = divider;
        self
    }

    /// Enables the divider drawn between adjacent bars.
    #[must_use]
    pub fn with_bar_dividers(mut self, divider: DividerConfig) -> Self {
        self.divider_between_bars = divider;
        self
    }

    /// Geometry inputs for one layout computation.
    #[must_use]
    pub fn layout_inputs(
        &self,
        measure_count: usize,
        category_count: usize,
        container: Option<ContainerBox>,
        has_group_headers: bool,
    ) -> LayoutInputs {
        LayoutInputs {
            measure_count,
            category_count,
            fit_width: self.fit_width,
            fit_height: self.fit_height,
            container,
            show_y_axis: self.show_y_axis,
            measure_label_space: if self.show_measure_labels {
                self.measure_label_space
            } else {
                0.0
            },
            x_label_space: if self.show_x_axis {
                self.x_label_space
            } else {
                // Hidden axis keeps a small inset so bars never touch the
                // document edge.
                8.0
            },
            has_group_headers,
            fixed_bar_width: self.bar_width,
            fixed_bar_spacing: self.bar_spacing,
            fixed_row_height: self.measure_row_height,
            spacing_between_measures: self.spacing_between_measures,
        }
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> TrellisResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TrellisError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> TrellisResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| TrellisError::InvalidConfig(format!("failed to parse config: {e}")))
    }
}

fn default_true() -> bool {
    true
}

fn default_y_tick_count() -> usize {
    5
}

fn default_bar_width() -> f64 {
    40.0
}

fn default_bar_spacing() -> f64 {
    20.0
}

fn default_measure_row_height() -> f64 {
    160.0
}

fn default_spacing_between_measures() -> f64 {
    24.0
}

fn default_measure_label_space() -> f64 {
    120.0
}

fn default_x_label_rotation() -> f64 {
    -45.0
}

fn default_x_label_space() -> f64 {
    56.0
}

fn default_font_size() -> f64 {
    11.0
}

fn default_background_color() -> String {
    "#ffffff".to_owned()
}

fn default_axis_color() -> String {
    "#9ca3af".to_owned()
}

fn default_text_color() -> String {
    "#374151".to_owned()
}

fn default_gridline_color() -> String {
    "#e5e7eb".to_owned()
}

fn default_divider_color() -> String {
    "#d1d5db".to_owned()
}

fn default_divider_width() -> f64 {
    1.0
}

fn default_min_label_bar_height() -> f64 {
    18.0
}
