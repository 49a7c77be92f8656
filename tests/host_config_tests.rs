use serde_json::json;
use trellis_rs::api::{AxisBound, ConditionalColorRule, FormatStyle, ThresholdOp};
use trellis_rs::core::{Column, ContainerBox, DimensionSlot, PercentOfTotalRule};
use trellis_rs::render::{SeriesKind, StrokeStyle};
use trellis_rs::{RenderOutcome, TrellisEngine};

fn engine_with_data() -> TrellisEngine {
    let mut engine = TrellisEngine::new();
    engine.set_container(ContainerBox::new(900, 600));
    engine.set_data(
        vec![
            Column::dimension("category", "Category"),
            Column::dimension("group", "Group"),
            Column::measure("revenue", "Revenue"),
            Column::measure("count", "Count"),
        ],
        vec![
            vec![json!("A"), json!("X"), json!(10.0), json!(1.0)],
            vec![json!("B"), json!("X"), json!(20.0), json!(2.0)],
            vec![json!("C"), json!("Y"), json!(30.0), json!(3.0)],
        ],
    );
    engine
}

#[test]
fn chart_object_settings_override_legacy_flat_keys() {
    let mut engine = engine_with_data();
    engine.set_host_config(json!({
        "rowHeight": 200.0,
        "barWidth": 50.0,
        "chart": {
            "rowHeight": 240.0,
            "showGridlines": true
        }
    }));

    let config = engine.config();
    assert!((config.measure_row_height - 240.0).abs() <= 1e-9);
    assert!((config.bar_width - 50.0).abs() <= 1e-9);
    assert!(config.show_gridlines);
    // Untouched settings keep their defaults.
    assert!((config.bar_spacing - 20.0).abs() <= 1e-9);
    assert!(config.fit_width);
}

#[test]
fn measure_entries_resolve_ahead_of_flat_keys_and_defaults() {
    let mut engine = engine_with_data();
    engine.set_host_config(json!({
        "decimals": 1,
        "columns": {
            "revenue": {
                "chartType": "line",
                "color": "#2a9d8f",
                "format": "currency",
                "decimals": 2,
                "minY": 0,
                "maxY": "auto",
                "referenceLine": { "value": 25.0, "style": "dashed", "showLabel": false },
                "percentOfTotal": false,
                "tooltip": { "format": "{measure}: {value}", "backgroundColor": "#101010" }
            }
        }
    }));

    let configs = engine.measure_configs();
    let revenue = &configs[0];
    assert_eq!(revenue.kind, SeriesKind::Line);
    assert_eq!(revenue.color, "#2a9d8f");
    assert_eq!(revenue.format.style, FormatStyle::Currency);
    assert_eq!(revenue.format.decimals, 2);
    assert_eq!(revenue.min_y, AxisBound::Fixed(0.0));
    assert_eq!(revenue.max_y, AxisBound::Auto);
    assert_eq!(revenue.percent_of_total, None);

    let reference = revenue.reference_line.as_ref().expect("reference line");
    assert!((reference.value - 25.0).abs() <= 1e-9);
    assert_eq!(reference.style, StrokeStyle::Dashed);
    assert!(!reference.show_label);
    assert!(reference.enabled);
    assert_eq!(reference.color, "#d62728");

    assert_eq!(
        revenue.tooltip.format.as_deref(),
        Some("{measure}: {value}")
    );
    assert_eq!(revenue.tooltip.background_color, "#101010");

    // The count measure only sees the flat fallback.
    let count = &configs[1];
    assert_eq!(count.kind, SeriesKind::Bars);
    assert_eq!(count.color, "#4e79a7");
    assert_eq!(count.format.style, FormatStyle::Decimal);
    assert_eq!(count.format.decimals, 1);
}

#[test]
fn reference_line_accepts_the_bare_number_shorthand() {
    let mut engine = engine_with_data();
    engine.set_host_config(json!({
        "columns": { "revenue": { "referenceLine": 25 } }
    }));

    let reference = engine.measure_configs()[0]
        .reference_line
        .as_ref()
        .expect("reference line");
    assert!((reference.value - 25.0).abs() <= 1e-9);
    assert!(reference.enabled);
    assert!(reference.show_label);
    assert_eq!(reference.style, StrokeStyle::Solid);
}

#[test]
fn conditional_color_rules_parse_both_modes() {
    let mut engine = engine_with_data();
    engine.set_host_config(json!({
        "columns": {
            "revenue": {
                "conditionalColor": {
                    "op": ">=",
                    "threshold": 15.0,
                    "trueColor": "#00ff00",
                    "falseColor": "#ff0000"
                }
            },
            "count": {
                "conditionalColor": {
                    "dimension": "group",
                    "colorMap": { "X": "#0000ff" }
                }
            }
        }
    }));

    match engine.measure_configs()[0]
        .conditional_color
        .as_ref()
        .expect("threshold rule")
    {
        ConditionalColorRule::Threshold(rule) => {
            assert_eq!(rule.op, ThresholdOp::Ge);
            assert!((rule.threshold - 15.0).abs() <= 1e-9);
            assert_eq!(rule.true_color, "#00ff00");
            assert_eq!(rule.false_color, "#ff0000");
        }
        other => panic!("expected threshold rule, got {other:?}"),
    }

    match engine.measure_configs()[1]
        .conditional_color
        .as_ref()
        .expect("dimension rule")
    {
        ConditionalColorRule::Dimension(rule) => {
            assert_eq!(rule.dimension, DimensionSlot::Secondary(0));
            assert_eq!(rule.color_map.get("X"), Some(&"#0000ff".to_owned()));
        }
        other => panic!("expected dimension rule, got {other:?}"),
    }

    // The fills flow through to the bars: 10 misses the threshold, 20 and
    // 30 clear it; both X rows map through the dimension rule.
    assert_eq!(engine.render(0.0), RenderOutcome::Rendered);
    let markup = engine.markup().expect("markup");
    assert_eq!(markup.matches("fill=\"#ff0000\"").count(), 1);
    assert_eq!(markup.matches("fill=\"#00ff00\"").count(), 2);
    assert_eq!(markup.matches("fill=\"#0000ff\"").count(), 2);
}

#[test]
fn conditional_color_ignores_unknown_dimensions() {
    let mut engine = engine_with_data();
    engine.set_host_config(json!({
        "columns": {
            "count": {
                "conditionalColor": { "dimension": "nonexistent", "colorMap": {} }
            }
        }
    }));
    assert_eq!(engine.measure_configs()[1].conditional_color, None);
}

#[test]
fn percent_of_total_accepts_every_documented_shape() {
    let mut engine = engine_with_data();

    engine.set_host_config(json!({ "columns": { "revenue": { "percentOfTotal": true } } }));
    assert_eq!(
        engine.measure_configs()[0].percent_of_total,
        Some(PercentOfTotalRule::Global)
    );

    engine.set_host_config(json!({ "columns": { "revenue": { "percentOfTotal": "grouped" } } }));
    assert_eq!(
        engine.measure_configs()[0].percent_of_total,
        Some(PercentOfTotalRule::Grouped {
            dimension: DimensionSlot::Secondary(0),
        })
    );

    engine.set_host_config(json!({
        "columns": {
            "revenue": { "percentOfTotal": { "mode": "grouped", "dimension": "group" } }
        }
    }));
    assert_eq!(
        engine.measure_configs()[0].percent_of_total,
        Some(PercentOfTotalRule::Grouped {
            dimension: DimensionSlot::Secondary(0),
        })
    );

    engine.set_host_config(json!({ "columns": { "revenue": { "percentOfTotal": false } } }));
    assert_eq!(engine.measure_configs()[0].percent_of_total, None);
}

#[test]
fn malformed_values_degrade_to_the_next_tier() {
    let mut engine = engine_with_data();
    engine.set_host_config(json!({
        "chart": { "rowHeight": "tall" },
        "columns": {
            "revenue": { "minY": "banana", "decimals": 3.7 }
        }
    }));

    let config = engine.config();
    assert!((config.measure_row_height - 160.0).abs() <= 1e-9);

    let revenue = &engine.measure_configs()[0];
    assert_eq!(revenue.min_y, AxisBound::Auto);
    assert_eq!(revenue.format.decimals, 0);
}

#[test]
fn axis_visibility_flows_from_host_config_to_markup() {
    let mut engine = engine_with_data();
    engine.set_host_config(json!({ "chart": { "showXAxis": false } }));

    assert_eq!(engine.render(0.0), RenderOutcome::Rendered);
    let markup = engine.markup().expect("markup");
    assert!(!markup.contains("class=\"x-axis\""));
    assert_eq!(markup.matches("class=\"y-axis\"").count(), 2);
}

#[test]
fn divider_shorthand_and_object_forms_agree() {
    let mut engine = engine_with_data();
    engine.set_host_config(json!({
        "chart": {
            "dividerBetweenMeasures": true,
            "dividerBetweenGroups": { "color": "#777777", "width": 2.0 }
        }
    }));

    let config = engine.config();
    assert!(config.divider_between_measures.enabled);
    assert_eq!(config.divider_between_measures.color, "#d1d5db");
    assert!(config.divider_between_groups.enabled);
    assert_eq!(config.divider_between_groups.color, "#777777");
    assert!((config.divider_between_groups.width - 2.0).abs() <= 1e-9);
    assert!(!config.divider_between_bars.enabled);
}
