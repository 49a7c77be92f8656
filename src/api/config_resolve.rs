use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::core::{DataSelection, DimensionSlot, PercentOfTotalRule};

use super::{
    AxisBound, ConditionalColorRule, DimensionColorRule, DividerConfig, MeasureConfig,
    NumericFormat, ReferenceLineConfig, ThresholdColorRule, TooltipConfig, TrellisConfig,
};

type JsonMap = Map<String, Value>;

/// Maps column ids referenced in host config onto dimension slots of the
/// active selection.
#[derive(Debug, Clone, Default)]
pub struct DimensionContext {
    pub primary_id: String,
    pub secondary_ids: Vec<String>,
}

impl DimensionContext {
    #[must_use]
    pub fn from_selection(selection: &DataSelection) -> Self {
        Self {
            primary_id: selection.primary_dimension.clone(),
            secondary_ids: selection.secondary_dimensions.clone(),
        }
    }

    #[must_use]
    pub fn slot_for(&self, column_id: &str) -> Option<DimensionSlot> {
        if !self.primary_id.is_empty() && column_id == self.primary_id {
            return Some(DimensionSlot::Primary);
        }
        self.secondary_ids
            .iter()
            .position(|id| id == column_id)
            .map(DimensionSlot::Secondary)
    }
}

/// Fully resolved configuration for one selection: the chart-wide config
/// plus one measure config per selected measure, in selection order.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub chart: TrellisConfig,
    pub measures: Vec<MeasureConfig>,
}

/// Resolves raw host JSON into typed configuration.
///
/// Every setting resolves with the same precedence: explicit per-column
/// entry (under `columns.<id>`), then legacy flat key at the top level,
/// then the built-in default. Malformed values degrade to the next tier
/// instead of failing the render.
#[must_use]
pub fn resolve_config(raw: &Value, selection: &DataSelection) -> ResolvedConfig {
    let dimensions = DimensionContext::from_selection(selection);
    ResolvedConfig {
        chart: resolve_chart_config(raw),
        measures: selection
            .measures
            .iter()
            .map(|id| resolve_measure_config(raw, id, &dimensions))
            .collect(),
    }
}

/// Chart-wide settings: the modern `chart` object wins over legacy flat
/// keys, which win over defaults.
#[must_use]
pub fn resolve_chart_config(raw: &Value) -> TrellisConfig {
    let lookup = SettingLookup {
        primary: raw.get("chart").and_then(Value::as_object),
        fallback: raw.as_object(),
    };
    let defaults = TrellisConfig::default();

    TrellisConfig {
        fit_width: lookup
            .bool(&["fitWidth", "fit_width", "responsive"])
            .unwrap_or(defaults.fit_width),
        fit_height: lookup
            .bool(&["fitHeight", "fit_height"])
            .unwrap_or(defaults.fit_height),
        show_y_axis: lookup
            .bool(&["showYAxis", "show_y_axis", "yAxis"])
            .unwrap_or(defaults.show_y_axis),
        show_x_axis: lookup
            .bool(&["showXAxis", "show_x_axis", "xAxis"])
            .unwrap_or(defaults.show_x_axis),
        show_gridlines: lookup
            .bool(&["showGridlines", "show_gridlines", "gridlines"])
            .unwrap_or(defaults.show_gridlines),
        y_tick_count: lookup
            .usize(&["yTickCount", "y_tick_count", "tickCount"])
            .unwrap_or(defaults.y_tick_count),
        bar_width: lookup
            .f64(&["barWidth", "bar_width"])
            .unwrap_or(defaults.bar_width),
        bar_spacing: lookup
            .f64(&["barSpacing", "bar_spacing"])
            .unwrap_or(defaults.bar_spacing),
        measure_row_height: lookup
            .f64(&["rowHeight", "measure_row_height", "panelHeight"])
            .unwrap_or(defaults.measure_row_height),
        spacing_between_measures: lookup
            .f64(&["spacingBetweenMeasures", "spacing_between_measures"])
            .unwrap_or(defaults.spacing_between_measures),
        show_measure_labels: lookup
            .bool(&["showMeasureLabels", "show_measure_labels"])
            .unwrap_or(defaults.show_measure_labels),
        measure_label_space: lookup
            .f64(&["measureLabelSpace", "measure_label_space"])
            .unwrap_or(defaults.measure_label_space),
        x_label_rotation_degrees: lookup
            .f64(&["xLabelRotation", "x_label_rotation", "labelRotation"])
            .unwrap_or(defaults.x_label_rotation_degrees),
        x_label_space: lookup
            .f64(&["xLabelSpace", "x_label_space"])
            .unwrap_or(defaults.x_label_space),
        axis_font_size: lookup
            .f64(&["axisFontSize", "axis_font_size"])
            .unwrap_or(defaults.axis_font_size),
        label_font_size: lookup
            .f64(&["labelFontSize", "label_font_size", "fontSize"])
            .unwrap_or(defaults.label_font_size),
        background_color: lookup
            .string(&["backgroundColor", "background_color"])
            .unwrap_or(defaults.background_color),
        axis_color: lookup
            .string(&["axisColor", "axis_color"])
            .unwrap_or(defaults.axis_color),
        text_color: lookup
            .string(&["textColor", "text_color"])
            .unwrap_or(defaults.text_color),
        gridline_color: lookup
            .string(&["gridlineColor", "gridline_color"])
            .unwrap_or(defaults.gridline_color),
        divider_between_measures: lookup
            .get(&["dividerBetweenMeasures", "divider_between_measures"])
            .map_or(defaults.divider_between_measures, divider_from),
        divider_between_groups: lookup
            .get(&["dividerBetweenGroups", "divider_between_groups"])
            .map_or(defaults.divider_between_groups, divider_from),
        divider_between_bars: lookup
            .get(&["dividerBetweenBars", "divider_between_bars"])
            .map_or(defaults.divider_between_bars, divider_from),
        force_value_labels: lookup
            .bool(&["forceValueLabels", "force_value_labels"])
            .unwrap_or(defaults.force_value_labels),
        min_label_bar_height: lookup
            .f64(&["minLabelBarHeight", "min_label_bar_height"])
            .unwrap_or(defaults.min_label_bar_height),
    }
}

/// Settings for one measure column.
#[must_use]
pub fn resolve_measure_config(
    raw: &Value,
    column_id: &str,
    dimensions: &DimensionContext,
) -> MeasureConfig {
    let lookup = SettingLookup {
        primary: raw
            .get("columns")
            .and_then(|columns| columns.get(column_id))
            .and_then(Value::as_object),
        fallback: raw.as_object(),
    };
    let defaults = MeasureConfig::default();

    MeasureConfig {
        color: lookup
            .string(&["color", "barColor", "bar_color"])
            .unwrap_or(defaults.color),
        kind: lookup
            .parse(&["chartType", "chart_type", "type"])
            .unwrap_or(defaults.kind),
        format: NumericFormat {
            style: lookup
                .parse(&["format", "numberFormat", "number_format"])
                .unwrap_or_default(),
            decimals: lookup
                .u8(&["decimals", "decimalPlaces", "decimal_places"])
                .unwrap_or(0),
            thousands_separator: lookup
                .bool(&["thousandsSeparator", "thousands_separator"])
                .unwrap_or(false),
            prefix: lookup.string(&["prefix"]).unwrap_or_default(),
            suffix: lookup.string(&["suffix"]).unwrap_or_default(),
            compact: lookup
                .bool(&["compact", "compactNumbers"])
                .unwrap_or(false),
        },
        min_y: lookup
            .parse(&["minY", "min_y", "yMin"])
            .unwrap_or(AxisBound::Auto),
        max_y: lookup
            .parse(&["maxY", "max_y", "yMax"])
            .unwrap_or(AxisBound::Auto),
        reference_line: lookup
            .get(&["referenceLine", "reference_line"])
            .and_then(reference_line_from),
        tooltip: lookup
            .get(&["tooltip"])
            .map_or(defaults.tooltip, tooltip_from),
        conditional_color: lookup
            .get(&["conditionalColor", "conditional_color"])
            .and_then(|value| conditional_color_from(value, dimensions)),
        percent_of_total: lookup
            .get(&["percentOfTotal", "percent_of_total"])
            .and_then(|value| percent_of_total_from(value, dimensions)),
        show_value_labels: lookup
            .bool(&["showValueLabels", "show_value_labels", "dataLabels"])
            .unwrap_or(false),
        value_label_position: lookup
            .parse(&["valueLabelPosition", "value_label_position", "labelPosition"])
            .unwrap_or_default(),
    }
}

struct SettingLookup<'a> {
    primary: Option<&'a JsonMap>,
    fallback: Option<&'a JsonMap>,
}

impl<'a> SettingLookup<'a> {
    fn get(&self, keys: &[&str]) -> Option<&'a Value> {
        self.primary
            .and_then(|map| first_key(map, keys))
            .or_else(|| self.fallback.and_then(|map| first_key(map, keys)))
    }

    fn bool(&self, keys: &[&str]) -> Option<bool> {
        self.get(keys).and_then(Value::as_bool)
    }

    fn f64(&self, keys: &[&str]) -> Option<f64> {
        self.get(keys).and_then(Value::as_f64).filter(|v| v.is_finite())
    }

    fn usize(&self, keys: &[&str]) -> Option<usize> {
        self.get(keys)
            .and_then(Value::as_u64)
            .and_then(|v| usize::try_from(v).ok())
    }

    fn u8(&self, keys: &[&str]) -> Option<u8> {
        self.get(keys)
            .and_then(Value::as_u64)
            .and_then(|v| u8::try_from(v).ok())
    }

    fn string(&self, keys: &[&str]) -> Option<String> {
        self.get(keys).and_then(Value::as_str).map(str::to_owned)
    }

    fn parse<T: DeserializeOwned>(&self, keys: &[&str]) -> Option<T> {
        serde_json::from_value(self.get(keys)?.clone()).ok()
    }
}

fn first_key<'a>(map: &'a JsonMap, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| map.get(*key))
        .filter(|value| !value.is_null())
}

fn divider_from(value: &Value) -> DividerConfig {
    let mut divider = DividerConfig::default();
    match value {
        Value::Bool(enabled) => divider.enabled = *enabled,
        Value::Object(map) => {
            divider.enabled = first_key(map, &["enabled"])
                .and_then(Value::as_bool)
                .unwrap_or(true);
            if let Some(color) = first_key(map, &["color"]).and_then(Value::as_str) {
                divider.color = color.to_owned();
            }
            if let Some(width) = first_key(map, &["width"]).and_then(Value::as_f64) {
                divider.width = width;
            }
        }
        _ => {}
    }
    divider
}

fn reference_line_from(value: &Value) -> Option<ReferenceLineConfig> {
    if let Some(number) = value.as_f64() {
        return Some(ReferenceLineConfig::new(number));
    }
    let map = value.as_object()?;
    let line_value = first_key(map, &["value"])?.as_f64()?;
    let mut config = ReferenceLineConfig::new(line_value);
    if let Some(enabled) = first_key(map, &["enabled"]).and_then(Value::as_bool) {
        config.enabled = enabled;
    }
    if let Some(color) = first_key(map, &["color"]).and_then(Value::as_str) {
        config.color = color.to_owned();
    }
    if let Some(style) = first_key(map, &["style", "lineStyle", "line_style"])
        .and_then(|v| serde_json::from_value(v.clone()).ok())
    {
        config.style = style;
    }
    if let Some(show) = first_key(map, &["showLabel", "show_label"]).and_then(Value::as_bool) {
        config.show_label = show;
    }
    Some(config)
}

fn tooltip_from(value: &Value) -> TooltipConfig {
    let mut tooltip = TooltipConfig::default();
    match value {
        Value::Bool(enabled) => tooltip.enabled = *enabled,
        Value::Object(map) => {
            if let Some(enabled) = first_key(map, &["enabled"]).and_then(Value::as_bool) {
                tooltip.enabled = enabled;
            }
            tooltip.format = first_key(map, &["format", "template"])
                .and_then(Value::as_str)
                .map(str::to_owned);
            if let Some(color) =
                first_key(map, &["backgroundColor", "background_color"]).and_then(Value::as_str)
            {
                tooltip.background_color = color.to_owned();
            }
            if let Some(layout) =
                first_key(map, &["layout"]).and_then(|v| serde_json::from_value(v.clone()).ok())
            {
                tooltip.layout = layout;
            }
        }
        _ => {}
    }
    tooltip
}

fn conditional_color_from(
    value: &Value,
    dimensions: &DimensionContext,
) -> Option<ConditionalColorRule> {
    let map = value.as_object()?;

    if let Some(op) = first_key(map, &["op", "operator"]) {
        let op = serde_json::from_value(op.clone()).ok()?;
        let threshold = first_key(map, &["threshold", "value"])?.as_f64()?;
        let true_color = first_key(map, &["trueColor", "true_color"])?.as_str()?.to_owned();
        let false_color = first_key(map, &["falseColor", "false_color"])?
            .as_str()?
            .to_owned();
        return Some(ConditionalColorRule::Threshold(ThresholdColorRule {
            op,
            threshold,
            true_color,
            false_color,
        }));
    }

    let dimension_id =
        first_key(map, &["dimension", "byDimension", "by_dimension"])?.as_str()?;
    let Some(dimension) = dimensions.slot_for(dimension_id) else {
        warn!(dimension_id, "conditional color references an unknown dimension; rule ignored");
        return None;
    };
    let color_map = first_key(map, &["colorMap", "color_map", "colors"])
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(label, color)| {
                    color.as_str().map(|c| (label.clone(), c.to_owned()))
                })
                .collect()
        })
        .unwrap_or_default();
    Some(ConditionalColorRule::Dimension(DimensionColorRule {
        dimension,
        color_map,
    }))
}

fn percent_of_total_from(
    value: &Value,
    dimensions: &DimensionContext,
) -> Option<PercentOfTotalRule> {
    match value {
        Value::Bool(true) => Some(PercentOfTotalRule::Global),
        Value::Bool(false) => None,
        Value::String(mode) if mode == "global" => Some(PercentOfTotalRule::Global),
        Value::String(mode) if mode == "grouped" => Some(PercentOfTotalRule::Grouped {
            dimension: DimensionSlot::Secondary(0),
        }),
        Value::Object(map) => {
            let grouped = first_key(map, &["mode"])
                .and_then(Value::as_str)
                .is_some_and(|mode| mode == "grouped");
            if !grouped {
                return Some(PercentOfTotalRule::Global);
            }
            let dimension = match first_key(map, &["dimension"]).and_then(Value::as_str) {
                Some(id) => {
                    let Some(slot) = dimensions.slot_for(id) else {
                        warn!(
                            dimension_id = id,
                            "percent-of-total references an unknown dimension; rule ignored"
                        );
                        return None;
                    };
                    slot
                }
                None => DimensionSlot::Secondary(0),
            };
            Some(PercentOfTotalRule::Grouped { dimension })
        }
        _ => None,
    }
}
