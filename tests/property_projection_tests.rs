use proptest::prelude::*;
use serde_json::{Value, json};
use trellis_rs::core::{Column, DataSelection, group_by_secondary, project_rows};

fn columns() -> Vec<Column> {
    vec![
        Column::dimension("category", "Category"),
        Column::dimension("group", "Group"),
        Column::measure("m1", "First"),
        Column::measure("m2", "Second"),
    ]
}

fn selection() -> DataSelection {
    DataSelection::from_columns(&columns())
}

fn cell_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1_000_000.0f64..1_000_000.0,
        Just(f64::NAN),
        Just(f64::INFINITY),
    ]
}

fn row_strategy() -> impl Strategy<Value = (Option<String>, String, f64, f64)> {
    (
        prop::option::of("[A-Z]{1,6}"),
        "[a-z]{1,3}",
        cell_strategy(),
        cell_strategy(),
    )
}

fn to_json_rows(raw: &[(Option<String>, String, f64, f64)]) -> Vec<Vec<Value>> {
    raw.iter()
        .map(|(primary, group, m1, m2)| {
            let primary_cell = primary.as_ref().map_or(Value::Null, |label| json!(label));
            vec![primary_cell, json!(group), json!(m1), json!(m2)]
        })
        .collect()
}

proptest! {
    #[test]
    fn every_row_is_either_kept_or_dropped(
        raw in prop::collection::vec(row_strategy(), 0..64)
    ) {
        let rows = to_json_rows(&raw);
        let projection = project_rows(&columns(), &rows, &selection());
        prop_assert_eq!(projection.points.len() + projection.dropped_rows, rows.len());
    }

    #[test]
    fn kept_points_follow_source_order_with_full_value_vectors(
        raw in prop::collection::vec(row_strategy(), 0..64)
    ) {
        let rows = to_json_rows(&raw);
        let projection = project_rows(&columns(), &rows, &selection());

        let expected_labels: Vec<&String> = raw
            .iter()
            .filter_map(|(primary, ..)| primary.as_ref())
            .collect();
        let labels: Vec<&String> = projection
            .points
            .iter()
            .map(|point| &point.primary_label)
            .collect();
        prop_assert_eq!(labels, expected_labels);

        for point in &projection.points {
            prop_assert_eq!(point.values.len(), 2);
            for value in &point.values {
                prop_assert!(value.is_finite());
            }
        }
    }

    #[test]
    fn projection_is_deterministic(
        raw in prop::collection::vec(row_strategy(), 0..64)
    ) {
        let rows = to_json_rows(&raw);
        let first = project_rows(&columns(), &rows, &selection());
        let second = project_rows(&columns(), &rows, &selection());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn groups_partition_the_point_sequence(
        raw in prop::collection::vec(row_strategy(), 1..64)
    ) {
        let rows = to_json_rows(&raw);
        let projection = project_rows(&columns(), &rows, &selection());
        let groups = group_by_secondary(&projection.points, 0);

        if projection.points.is_empty() {
            prop_assert!(groups.is_empty());
            return Ok(());
        }

        prop_assert_eq!(groups[0].start_idx, 0);
        prop_assert_eq!(groups[groups.len() - 1].end_idx, projection.points.len() - 1);
        for window in groups.windows(2) {
            prop_assert_eq!(window[1].start_idx, window[0].end_idx + 1);
        }
        for group in &groups {
            prop_assert!(group.start_idx <= group.end_idx);
            for idx in group.start_idx..=group.end_idx {
                prop_assert_eq!(projection.points[idx].secondary_label(0), group.label.as_str());
            }
        }
        // Adjacent runs never share a label, otherwise they would be one run.
        for window in groups.windows(2) {
            prop_assert_ne!(&window[0].label, &window[1].label);
        }
    }
}
