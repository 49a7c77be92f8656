use serde_json::json;
use trellis_rs::api::{RetryState, TrellisSnapshot};
use trellis_rs::core::{Column, ContainerBox, DataSelection};
use trellis_rs::{RenderOutcome, TrellisEngine};

fn engine_with_data() -> TrellisEngine {
    let mut engine = TrellisEngine::new();
    engine.set_container(ContainerBox::new(900, 600));
    engine.set_data(
        vec![
            Column::dimension("category", "Category"),
            Column::dimension("group", "Group"),
            Column::measure("revenue", "Revenue"),
        ],
        vec![
            vec![json!("A"), json!("X"), json!(10.0)],
            vec![json!("B"), json!("Y"), json!(20.0)],
        ],
    );
    engine
}

#[test]
fn a_fresh_engine_snapshots_to_empty_state() {
    let engine = TrellisEngine::new();
    let snapshot = engine.snapshot();

    assert_eq!(snapshot.data_version, 0);
    assert_eq!(snapshot.container, None);
    assert_eq!(snapshot.category_count, 0);
    assert!(snapshot.layout.is_none());
    assert!(snapshot.ranges.is_empty());
    assert!(snapshot.groups.is_empty());
    assert_eq!(snapshot.retry_state, RetryState::Idle);
    assert_eq!(snapshot.hit_target_count, 0);
    assert_eq!(snapshot.format_cache.size, 0);
}

#[test]
fn snapshots_are_deterministic_between_renders() {
    let mut engine = engine_with_data();
    assert_eq!(engine.render(0.0), RenderOutcome::Rendered);

    let first = engine.snapshot();
    let second = engine.snapshot();
    assert_eq!(first, second);

    // Rendering again without changes keeps the same shape.
    assert_eq!(engine.render(1.0), RenderOutcome::Rendered);
    let third = engine.snapshot();
    assert_eq!(first.layout, third.layout);
    assert_eq!(first.ranges, third.ranges);
    assert_eq!(first.groups, third.groups);
}

#[test]
fn snapshot_json_round_trips_through_serde() {
    let mut engine = engine_with_data();
    assert_eq!(engine.render(0.0), RenderOutcome::Rendered);

    let snapshot = engine.snapshot();
    let text = snapshot.to_json_pretty().expect("snapshot json");
    assert!(text.contains("\"data_version\": 1"));
    assert!(text.contains("\"retry_state\": \"idle\""));
    assert!(text.contains("\"category_count\": 2"));

    let parsed: TrellisSnapshot = serde_json::from_str(&text).expect("parse snapshot json");
    assert_eq!(parsed, snapshot);
}

#[test]
fn the_retry_wait_is_visible_in_the_snapshot() {
    let mut engine = engine_with_data();
    engine
        .set_selection(DataSelection {
            primary_dimension: "category".to_owned(),
            secondary_dimensions: Vec::new(),
            measures: vec!["margin".to_owned()],
        })
        .expect("valid selection");
    engine.render(0.0);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.retry_state, RetryState::Pending);
    assert_eq!(snapshot.missing_measures, vec!["margin".to_owned()]);

    let text = snapshot.to_json_pretty().expect("snapshot json");
    assert!(text.contains("\"retry_state\": \"pending\""));
    assert!(text.contains("\"margin\""));
}

#[test]
fn format_cache_stats_accumulate_across_renders() {
    let mut engine = engine_with_data();
    assert_eq!(engine.render(0.0), RenderOutcome::Rendered);

    let after_first = engine.snapshot().format_cache;
    assert!(after_first.size > 0);
    assert!(after_first.misses > 0);

    // The same ticks come back from the cache on the second cycle.
    assert_eq!(engine.render(1.0), RenderOutcome::Rendered);
    let after_second = engine.snapshot().format_cache;
    assert!(after_second.hits > after_first.hits);
    assert_eq!(after_second.size, after_first.size);
}

#[test]
fn selection_travels_with_the_snapshot() {
    let mut engine = engine_with_data();
    assert_eq!(engine.render(0.0), RenderOutcome::Rendered);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.selection.primary_dimension, "category");
    assert_eq!(
        snapshot.selection.secondary_dimensions,
        vec!["group".to_owned()]
    );
    assert_eq!(snapshot.selection.measures, vec!["revenue".to_owned()]);
}
