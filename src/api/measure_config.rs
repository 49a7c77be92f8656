use serde::{Deserialize, Serialize};

use crate::core::{PercentOfTotalRule, RangeOverrides};
use crate::interaction::TooltipLayout;
use crate::render::{SeriesKind, StrokeStyle, ValueLabelPosition};

use super::{ConditionalColorRule, NumericFormat};

/// An axis bound that is either data-driven or pinned by the host.
///
/// Hosts send these as raw JSON where a number means a fixed bound and the
/// keyword `"auto"` (or anything non-numeric) means data-driven, so the
/// serialized form is a plain number or string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "AxisBoundRepr", into = "AxisBoundRepr")]
pub enum AxisBound {
    #[default]
    Auto,
    Fixed(f64),
}

impl AxisBound {
    #[must_use]
    pub const fn resolve(self) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Fixed(value) => Some(value),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum AxisBoundRepr {
    Number(f64),
    Keyword(String),
}

impl From<AxisBoundRepr> for AxisBound {
    fn from(repr: AxisBoundRepr) -> Self {
        match repr {
            AxisBoundRepr::Number(value) if value.is_finite() => Self::Fixed(value),
            AxisBoundRepr::Number(_) | AxisBoundRepr::Keyword(_) => Self::Auto,
        }
    }
}

impl From<AxisBound> for AxisBoundRepr {
    fn from(bound: AxisBound) -> Self {
        match bound {
            AxisBound::Auto => Self::Keyword("auto".to_owned()),
            AxisBound::Fixed(value) => Self::Number(value),
        }
    }
}

/// Horizontal rule drawn across a measure's panel at a fixed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLineConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub value: f64,
    #[serde(default = "default_reference_color")]
    pub color: String,
    #[serde(default)]
    pub style: StrokeStyle,
    #[serde(default = "default_enabled")]
    pub show_label: bool,
}

impl ReferenceLineConfig {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            enabled: true,
            value,
            color: default_reference_color(),
            style: StrokeStyle::default(),
            show_label: true,
        }
    }
}

/// Per-measure tooltip behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Custom template with `{value}`, `{measure}`, `{primary}`,
    /// `{secondary}` and `{secondary2}` placeholders; `None` uses the
    /// layout's structured content.
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default = "default_tooltip_background")]
    pub background_color: String,
    #[serde(default)]
    pub layout: TooltipLayout,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: None,
            background_color: default_tooltip_background(),
            layout: TooltipLayout::default(),
        }
    }
}

/// Everything configurable per measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureConfig {
    #[serde(default = "default_measure_color")]
    pub color: String,
    #[serde(default)]
    pub kind: SeriesKind,
    #[serde(default)]
    pub format: NumericFormat,
    #[serde(default)]
    pub min_y: AxisBound,
    #[serde(default)]
    pub max_y: AxisBound,
    #[serde(default)]
    pub reference_line: Option<ReferenceLineConfig>,
    #[serde(default)]
    pub tooltip: TooltipConfig,
    #[serde(default)]
    pub conditional_color: Option<ConditionalColorRule>,
    #[serde(default)]
    pub percent_of_total: Option<PercentOfTotalRule>,
    #[serde(default)]
    pub show_value_labels: bool,
    #[serde(default)]
    pub value_label_position: ValueLabelPosition,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            color: default_measure_color(),
            kind: SeriesKind::default(),
            format: NumericFormat::default(),
            min_y: AxisBound::Auto,
            max_y: AxisBound::Auto,
            reference_line: None,
            tooltip: TooltipConfig::default(),
            conditional_color: None,
            percent_of_total: None,
            show_value_labels: false,
            value_label_position: ValueLabelPosition::default(),
        }
    }
}

impl MeasureConfig {
    /// Sets the static series color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Sets bars or line rendering.
    #[must_use]
    pub fn with_kind(mut self, kind: SeriesKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the numeric format.
    #[must_use]
    pub fn with_format(mut self, format: NumericFormat) -> Self {
        self.format = format;
        self
    }

    /// Pins the lower axis bound.
    #[must_use]
    pub const fn with_min_y(mut self, bound: AxisBound) -> Self {
        self.min_y = bound;
        self
    }

    /// Pins the upper axis bound.
    #[must_use]
    pub const fn with_max_y(mut self, bound: AxisBound) -> Self {
        self.max_y = bound;
        self
    }

    /// Sets the reference line.
    #[must_use]
    pub fn with_reference_line(mut self, reference: ReferenceLineConfig) -> Self {
        self.reference_line = Some(reference);
        self
    }

    /// Sets tooltip behavior.
    #[must_use]
    pub fn with_tooltip(mut self, tooltip: TooltipConfig) -> Self {
        self.tooltip = tooltip;
        self
    }

    /// Sets the conditional color rule.
    #[must_use]
    pub fn with_conditional_color(mut self, rule: ConditionalColorRule) -> Self {
        self.conditional_color = Some(rule);
        self
    }

    /// Sets the percentage-of-total transform.
    #[must_use]
    pub fn with_percent_of_total(mut self, rule: PercentOfTotalRule) -> Self {
        self.percent_of_total = Some(rule);
        self
    }

    /// Enables value labels at the given position.
    #[must_use]
    pub fn with_value_labels(mut self, position: ValueLabelPosition) -> Self {
        self.show_value_labels = true;
        self.value_label_position = position;
        self
    }

    /// Range inputs derived from this config: resolved axis bounds plus an
    /// enabled reference value.
    #[must_use]
    pub fn range_overrides(&self) -> RangeOverrides {
        RangeOverrides {
            min_y: self.min_y.resolve(),
            max_y: self.max_y.resolve(),
            reference_value: self
                .reference_line
                .as_ref()
                .filter(|reference| reference.enabled)
                .map(|reference| reference.value),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_reference_color() -> String {
    "#d62728".to_owned()
}

fn default_tooltip_background() -> String {
    "#ffffff".to_owned()
}

fn default_measure_color() -> String {
    "#4e79a7".to_owned()
}

#[cfg(test)]
mod tests {
    use super::{AxisBound, MeasureConfig, ReferenceLineConfig};

    #[test]
    fn axis_bounds_deserialize_from_numbers_and_keywords() {
        let fixed: AxisBound = serde_json::from_str("12.5").expect("number");
        assert_eq!(fixed, AxisBound::Fixed(12.5));

        let auto: AxisBound = serde_json::from_str("\"auto\"").expect("keyword");
        assert_eq!(auto, AxisBound::Auto);

        // Unknown keywords degrade to auto rather than failing the parse.
        let odd: AxisBound = serde_json::from_str("\"dunno\"").expect("keyword");
        assert_eq!(odd, AxisBound::Auto);
    }

    #[test]
    fn axis_bounds_serialize_back_to_raw_forms() {
        assert_eq!(
            serde_json::to_string(&AxisBound::Fixed(3.0)).expect("json"),
            "3.0"
        );
        assert_eq!(
            serde_json::to_string(&AxisBound::Auto).expect("json"),
            "\"auto\""
        );
    }

    #[test]
    fn range_overrides_skip_disabled_reference_lines() {
        let mut reference = ReferenceLineConfig::new(40.0);
        reference.enabled = false;
        let config = MeasureConfig::default()
            .with_min_y(AxisBound::Fixed(0.0))
            .with_reference_line(reference);

        let overrides = config.range_overrides();
        assert_eq!(overrides.min_y, Some(0.0));
        assert_eq!(overrides.max_y, None);
        assert_eq!(overrides.reference_value, None);
    }

    #[test]
    fn enabled_reference_line_feeds_the_range() {
        let config = MeasureConfig::default().with_reference_line(ReferenceLineConfig::new(40.0));
        assert_eq!(config.range_overrides().reference_value, Some(40.0));
    }

    #[test]
    fn defaults_round_trip_through_json() {
        let config = MeasureConfig::default();
        let json = serde_json::to_string(&config).expect("serialize");
        let back: MeasureConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, config);
    }

    #[test]
    fn sparse_json_fills_defaults() {
        let config: MeasureConfig =
            serde_json::from_str(r##"{"color": "#123456"}"##).expect("parse");
        assert_eq!(config.color, "#123456");
        assert_eq!(config.min_y, AxisBound::Auto);
        assert!(config.tooltip.enabled);
        assert!(!config.show_value_labels);
    }
}
