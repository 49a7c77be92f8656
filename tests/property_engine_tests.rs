use proptest::prelude::*;
use serde_json::json;
use trellis_rs::core::{Column, ContainerBox};
use trellis_rs::{RenderOutcome, TrellisEngine};

fn grid_strategy() -> impl Strategy<Value = (usize, Vec<Vec<f64>>)> {
    (1usize..4, 1usize..7).prop_flat_map(|(measure_count, category_count)| {
        prop::collection::vec(
            prop::collection::vec(-1_000_000.0f64..1_000_000.0, measure_count),
            category_count,
        )
        .prop_map(move |rows| (measure_count, rows))
    })
}

fn engine_with_grid(measure_count: usize, rows: &[Vec<f64>]) -> TrellisEngine {
    let mut columns = vec![Column::dimension("category", "Category")];
    for idx in 0..measure_count {
        columns.push(Column::measure(format!("m{idx}"), format!("Measure {idx}")));
    }

    let data_rows = rows
        .iter()
        .enumerate()
        .map(|(category_idx, values)| {
            let mut row = vec![json!(format!("c{category_idx}"))];
            row.extend(values.iter().map(|&value| json!(value)));
            row
        })
        .collect();

    let mut engine = TrellisEngine::new();
    engine.set_container(ContainerBox::new(1200, 800));
    engine.set_data(columns, data_rows);
    engine
}

proptest! {
    #[test]
    fn any_small_grid_renders_one_panel_per_measure(
        (measure_count, rows) in grid_strategy()
    ) {
        let mut engine = engine_with_grid(measure_count, &rows);
        prop_assert_eq!(engine.render(0.0), RenderOutcome::Rendered);

        let markup = engine.markup().expect("rendered markup");
        prop_assert_eq!(markup.matches("class=\"y-axis\"").count(), measure_count);
        prop_assert_eq!(markup.matches("class=\"series-bars\"").count(), measure_count);
        prop_assert_eq!(markup.matches("id=\"m").count(), measure_count * rows.len());
    }

    #[test]
    fn hit_targets_cover_the_full_grid(
        (measure_count, rows) in grid_strategy()
    ) {
        let mut engine = engine_with_grid(measure_count, &rows);
        engine.render(0.0);

        let snapshot = engine.snapshot();
        prop_assert_eq!(snapshot.category_count, rows.len());
        prop_assert_eq!(snapshot.hit_target_count, measure_count * rows.len());

        let layout = snapshot.layout.expect("layout in snapshot");
        prop_assert_eq!(layout.measure_count, measure_count);
        prop_assert_eq!(layout.category_count, rows.len());
    }

    #[test]
    fn rendering_the_same_state_twice_yields_identical_markup(
        (measure_count, rows) in grid_strategy()
    ) {
        let mut engine = engine_with_grid(measure_count, &rows);
        engine.render(0.0);
        let first = engine.markup().expect("first markup").to_owned();
        engine.render(0.0);
        let second = engine.markup().expect("second markup").to_owned();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_rendered_cell_answers_hover(
        (measure_count, rows) in grid_strategy()
    ) {
        let mut engine = engine_with_grid(measure_count, &rows);
        engine.render(0.0);

        for measure_idx in 0..measure_count {
            for category_idx in 0..rows.len() {
                let id = format!("m{measure_idx}-d{category_idx}");
                let panel = engine.pointer_over(&id, 0.0).expect("tooltip panel");
                // Simple layout: the category title plus the hovered measure.
                prop_assert_eq!(panel.lines.len(), 2);
                let expected_category = format!("c{category_idx}");
                prop_assert!(panel.lines[0].text.contains(&expected_category));
            }
        }
    }

    #[test]
    fn unparseable_measure_cells_render_as_zeroes(
        (measure_count, rows) in (1usize..3, 1usize..5).prop_flat_map(|(m, c)| {
            prop::collection::vec(
                prop::collection::vec(
                    prop_oneof![
                        -1_000_000.0f64..1_000_000.0,
                        Just(f64::NAN),
                        Just(f64::INFINITY)
                    ],
                    m,
                ),
                c,
            )
            .prop_map(move |values| (m, values))
        })
    ) {
        let mut engine = engine_with_grid(measure_count, &rows);
        prop_assert_eq!(engine.render(0.0), RenderOutcome::Rendered);

        let snapshot = engine.snapshot();
        prop_assert_eq!(snapshot.hit_target_count, measure_count * rows.len());
        for range in &snapshot.ranges {
            prop_assert!(range.effective_min.is_finite());
            prop_assert!(range.effective_max.is_finite());
        }
    }
}
