use serde_json::json;
use trellis_rs::api::{AxisBound, DividerConfig, MeasureConfig, ReferenceLineConfig, TrellisConfig};
use trellis_rs::core::{Column, ContainerBox};
use trellis_rs::render::{SeriesKind, StrokeStyle, ValueLabelPosition};
use trellis_rs::{RenderOutcome, TrellisEngine};

fn grouped_engine() -> TrellisEngine {
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

fn rendered_markup(engine: &mut TrellisEngine) -> String {
    assert_eq!(engine.render(0.0), RenderOutcome::Rendered);
    engine.markup().expect("rendered markup").to_owned()
}

#[test]
fn dividers_emit_one_separator_per_gap() {
    let mut engine = grouped_engine();
    let mut config = engine.config().clone();
    config.divider_between_measures = DividerConfig {
        enabled: true,
        color: "#111111".to_owned(),
        width: 1.0,
    };
    config.divider_between_bars = DividerConfig {
        enabled: true,
        color: "#222222".to_owned(),
        width: 1.0,
    };
    config.divider_between_groups = DividerConfig {
        enabled: true,
        color: "#333333".to_owned(),
        width: 2.0,
    };
    engine.set_config(config);

    let markup = rendered_markup(&mut engine);
    assert!(markup.contains("class=\"measure-dividers\""));
    assert!(markup.contains("class=\"bar-dividers\""));
    assert!(markup.contains("class=\"group-dividers\""));

    // Two panels share one gap; three categories share two; the X|Y
    // boundary is the only group seam.
    assert_eq!(markup.matches("stroke=\"#111111\"").count(), 1);
    assert_eq!(markup.matches("stroke=\"#222222\"").count(), 2);
    assert_eq!(markup.matches("stroke=\"#333333\"").count(), 1);
}

#[test]
fn dividers_stay_out_of_the_document_when_disabled() {
    let mut engine = grouped_engine();
    let markup = rendered_markup(&mut engine);
    assert!(!markup.contains("measure-dividers"));
    assert!(!markup.contains("bar-dividers"));
    assert!(!markup.contains("group-dividers"));
}

#[test]
fn gridlines_paint_one_line_per_tick() {
    let mut engine = grouped_engine();
    let mut config = engine.config().clone();
    config.show_gridlines = true;
    engine.set_config(config);

    let markup = rendered_markup(&mut engine);
    // Five ticks per panel across two panels, each with a full-width rule.
    assert_eq!(markup.matches("stroke=\"#e5e7eb\"").count(), 10);
}

#[test]
fn reference_line_draws_dashed_rule_with_label() {
    let mut engine = grouped_engine();
    engine.set_measure_configs(vec![
        MeasureConfig::default()
            .with_min_y(AxisBound::Fixed(0.0))
            .with_reference_line(ReferenceLineConfig {
                style: StrokeStyle::Dashed,
                ..ReferenceLineConfig::new(25.0)
            }),
        MeasureConfig::default(),
    ]);

    let markup = rendered_markup(&mut engine);
    assert_eq!(markup.matches("class=\"reference-line\"").count(), 1);
    assert!(markup.contains("stroke=\"#d62728\""));
    assert!(markup.contains("stroke-dasharray=\"6 4\""));
    assert!(markup.contains(">25</text>"));
}

#[test]
fn reference_label_can_be_hidden() {
    let mut engine = grouped_engine();
    engine.set_measure_configs(vec![
        MeasureConfig::default().with_reference_line(ReferenceLineConfig {
            show_label: false,
            ..ReferenceLineConfig::new(25.0)
        }),
        MeasureConfig::default(),
    ]);

    let markup = rendered_markup(&mut engine);
    assert_eq!(markup.matches("class=\"reference-line\"").count(), 1);
    assert!(!markup.contains(">25</text>"));
}

#[test]
fn line_series_draws_path_and_markers() {
    let mut engine = grouped_engine();
    engine.set_measure_configs(vec![
        MeasureConfig::default(),
        MeasureConfig::default().with_kind(SeriesKind::Line),
    ]);

    let markup = rendered_markup(&mut engine);
    assert_eq!(markup.matches("class=\"series-bars\"").count(), 1);
    assert_eq!(markup.matches("class=\"series-line\"").count(), 1);

    // One path per secondary group run.
    assert_eq!(markup.matches("<path d=\"M").count(), 2);
    for category in 0..3 {
        let id = format!("id=\"m1-d{category}\"");
        assert!(markup.contains(&id));
    }
    assert!(markup.contains("r=\"3.5\""));
    assert!(markup.contains("fill=\"none\""));
}

#[test]
fn short_bars_suppress_value_labels_below_the_floor() {
    let mut engine = TrellisEngine::new();
    engine.set_container(ContainerBox::new(900, 600));
    engine.set_data(
        vec![
            Column::dimension("category", "Category"),
            Column::measure("revenue", "Revenue"),
        ],
        vec![
            vec![json!("A"), json!(1.0)],
            vec![json!("B"), json!(200.0)],
        ],
    );
    engine.set_measure_configs(vec![
        MeasureConfig::default()
            .with_min_y(AxisBound::Fixed(0.0))
            .with_value_labels(ValueLabelPosition::Above),
    ]);

    let markup = rendered_markup(&mut engine);
    assert!(markup.contains(">200</text>"));
    assert!(!markup.contains(">1</text>"));
}

#[test]
fn forcing_value_labels_overrides_the_floor() {
    let mut engine = TrellisEngine::new();
    engine.set_container(ContainerBox::new(900, 600));
    engine.set_data(
        vec![
            Column::dimension("category", "Category"),
            Column::measure("revenue", "Revenue"),
        ],
        vec![
            vec![json!("A"), json!(1.0)],
            vec![json!("B"), json!(200.0)],
        ],
    );
    let mut config = TrellisConfig::default();
    config.force_value_labels = true;
    engine.set_config(config);
    engine.set_measure_configs(vec![
        MeasureConfig::default()
            .with_min_y(AxisBound::Fixed(0.0))
            .with_value_labels(ValueLabelPosition::Above),
    ]);

    let markup = rendered_markup(&mut engine);
    assert!(markup.contains(">200</text>"));
    assert!(markup.contains(">1</text>"));
}

#[test]
fn hidden_axes_drop_their_layers() {
    let mut engine = grouped_engine();
    let mut config = engine.config().clone();
    config.show_y_axis = false;
    config.show_x_axis = false;
    config.show_measure_labels = false;
    engine.set_config(config);

    let markup = rendered_markup(&mut engine);
    assert!(!markup.contains("class=\"y-axis\""));
    assert!(!markup.contains("class=\"x-axis\""));
    assert!(!markup.contains(">Revenue</text>"));
    // The series itself still renders.
    assert_eq!(markup.matches("class=\"series-bars\"").count(), 2);
}
