//! One full render cycle: projection, transforms, ranges, grouping,
//! layout, layer construction and document assembly. The document is
//! always recomputed from scratch and swapped in whole.

use tracing::debug;

use crate::core::{
    DataGroup, DataPoint, MeasureRange, TrellisLayout, ValueScale, apply_percent_of_total,
    compute_layout, compute_measure_range, group_by_secondary, project_rows,
};
use crate::error::TrellisResult;
use crate::interaction::HitTarget;
use crate::render::{
    DividerStyle, LabelStyle, ReferenceLineSpec, SeriesInputs, SvgNode, XAxisSpec, YAxisSpec,
    assemble_document, build_bar_dividers, build_group_dividers, build_group_headers,
    build_measure_dividers, build_measure_label, build_reference_line, build_series_layer,
    build_x_axis, build_y_axis, placeholder_document, tick_values,
};

use super::engine::RenderArtifacts;
use super::{
    EngineSignal, FormatCache, MeasureConfig, RenderOutcome, RetryState, TrellisConfig,
    TrellisEngine, resolve_color,
};

/// Reference lines use a thinner rule than series strokes.
const REFERENCE_STROKE_WIDTH_PX: f64 = 1.0;
/// Group header baselines sit this far above the document's bottom edge,
/// inside the strip the layout reserves under the x labels.
const GROUP_HEADER_BASELINE_INSET_PX: f64 = 8.0;

/// Everything the layer builders read; grouped so the format cache can be
/// borrowed mutably alongside.
struct LayerInputs<'a> {
    config: &'a TrellisConfig,
    measure_configs: &'a [MeasureConfig],
    measure_names: &'a [String],
    points: &'a [DataPoint],
    ranges: &'a [MeasureRange],
    groups: &'a [DataGroup],
    layout: &'a TrellisLayout,
    has_group_headers: bool,
}

pub(super) struct RenderCycle;

impl RenderCycle {
    pub(super) fn run(engine: &mut TrellisEngine, now: f64) -> TrellisResult<RenderOutcome> {
        if engine.columns.is_empty() || engine.rows.is_empty() {
            engine.retry.cancel();
            return Ok(Self::placeholder(engine, "no data available"));
        }
        if engine.selection.primary_dimension.is_empty() || engine.selection.measures.is_empty() {
            engine.retry.cancel();
            return Ok(Self::placeholder(
                engine,
                "select at least one dimension and one measure",
            ));
        }

        let measure_count = engine.selection.measures.len();
        if engine.measure_configs.len() != measure_count {
            engine
                .measure_configs
                .resize_with(measure_count, MeasureConfig::default);
        }

        let projection = project_rows(&engine.columns, &engine.rows, &engine.selection);
        if !projection.missing_measures.is_empty() {
            return Ok(Self::await_measures(
                engine,
                projection.missing_measures,
                now,
            ));
        }
        Self::settle_retry(engine, now);

        if projection.points.is_empty() {
            return Ok(Self::placeholder(
                engine,
                "no rows carry a value for the primary dimension",
            ));
        }

        let mut points = projection.points;
        for (measure_idx, config) in engine.measure_configs.iter().enumerate() {
            if let Some(rule) = config.percent_of_total {
                points = apply_percent_of_total(&points, measure_idx, rule);
            }
        }

        let ranges: Vec<MeasureRange> = engine
            .measure_configs
            .iter()
            .enumerate()
            .map(|(measure_idx, config)| {
                compute_measure_range(&points, measure_idx, config.range_overrides())
            })
            .collect();

        let has_secondary = !engine.selection.secondary_dimensions.is_empty();
        let groups = if has_secondary {
            group_by_secondary(&points, 0)
        } else {
            vec![DataGroup::new(0, points.len() - 1, "")]
        };

        let category_count = points.len();
        let inputs = engine.config.layout_inputs(
            measure_count,
            category_count,
            engine.resize.current(),
            has_secondary,
        );
        let layout = compute_layout(inputs)?;

        engine.hits.clear();
        for measure_idx in 0..measure_count {
            for data_idx in 0..category_count {
                engine.hits.register(HitTarget::new(measure_idx, data_idx));
            }
        }

        let measure_names: Vec<String> = (0..measure_count)
            .map(|measure_idx| engine.measure_display_name(measure_idx))
            .collect();

        let layers = Self::build_layers(
            LayerInputs {
                config: &engine.config,
                measure_configs: &engine.measure_configs,
                measure_names: &measure_names,
                points: &points,
                ranges: &ranges,
                groups: &groups,
                layout: &layout,
                has_group_headers: has_secondary,
            },
            &mut engine.format_cache,
            now,
        )?;
        let document = assemble_document(
            layout.chart_width,
            layout.chart_height,
            &engine.config.background_color,
            layers,
        );

        engine.markup = Some(document);
        engine.points = points;
        engine.artifacts = Some(RenderArtifacts {
            layout,
            ranges,
            groups,
            category_count,
        });
        engine.signals.push(EngineSignal::RenderCompleted {
            measures: measure_count,
            categories: category_count,
        });
        engine.format_cache.prune(now);
        debug!(
            measures = measure_count,
            categories = category_count,
            width = layout.chart_width,
            height = layout.chart_height,
            "render cycle completed"
        );
        Ok(RenderOutcome::Rendered)
    }

    /// Swaps in an informational document and drops stale geometry so
    /// tooltips cannot reference data that is no longer drawn.
    fn placeholder(engine: &mut TrellisEngine, reason: &str) -> RenderOutcome {
        let (width, height) = engine.document_size();
        engine.markup = Some(placeholder_document(
            width,
            height,
            reason,
            &engine.config.background_color,
            &engine.config.text_color,
        ));
        engine.points.clear();
        engine.artifacts = None;
        engine.hits.clear();
        engine.tooltips.pointer_leave();
        debug!(reason, "rendered placeholder");
        RenderOutcome::Placeholder {
            reason: reason.to_owned(),
        }
    }

    /// Routes a missing-measure cycle through the retry machine. The last
    /// rendered document stays in place while the wait runs.
    fn await_measures(
        engine: &mut TrellisEngine,
        missing: Vec<String>,
        now: f64,
    ) -> RenderOutcome {
        if engine.retry.state() == RetryState::Checking {
            if engine.retry.complete_check(missing.clone(), now) {
                engine.signals.push(EngineSignal::RetryExhausted {
                    missing: missing.clone(),
                });
            }
        } else {
            let was_waiting = engine.retry.is_waiting();
            engine.retry.arm(missing.clone(), now);
            if !was_waiting && engine.retry.is_waiting() {
                engine.signals.push(EngineSignal::ConfigurationTouched);
            }
        }
        if engine.markup.is_none() {
            let (width, height) = engine.document_size();
            let reason = format!("waiting for measures: {}", missing.join(", "));
            engine.markup = Some(placeholder_document(
                width,
                height,
                &reason,
                &engine.config.background_color,
                &engine.config.text_color,
            ));
        }
        debug!(missing = ?missing, state = ?engine.retry.state(), "measures missing from column set");
        RenderOutcome::AwaitingMeasures { missing }
    }

    /// Nothing is missing: close out an in-flight check, or cancel a wait
    /// superseded by this cycle.
    fn settle_retry(engine: &mut TrellisEngine, now: f64) {
        match engine.retry.state() {
            RetryState::Checking => {
                let _ = engine.retry.complete_check(Vec::new(), now);
            }
            RetryState::Idle | RetryState::Resolved => {}
            RetryState::Pending | RetryState::Exhausted => engine.retry.cancel(),
        }
    }

    fn build_layers(
        inputs: LayerInputs<'_>,
        format_cache: &mut FormatCache,
        now: f64,
    ) -> TrellisResult<Vec<SvgNode>> {
        let LayerInputs {
            config,
            measure_configs,
            measure_names,
            points,
            ranges,
            groups,
            layout,
            has_group_headers,
        } = inputs;

        let mut scales = Vec::with_capacity(ranges.len());
        for range in ranges {
            scales.push(ValueScale::new(range.effective_min, range.effective_max)?);
        }

        let mut layers = Vec::new();

        if config.divider_between_measures.enabled && measure_configs.len() > 1 {
            layers.push(build_measure_dividers(
                layout,
                DividerStyle {
                    color: &config.divider_between_measures.color,
                    width: config.divider_between_measures.width,
                },
            ));
        }
        if config.divider_between_groups.enabled && groups.len() > 1 {
            layers.push(build_group_dividers(
                layout,
                groups,
                DividerStyle {
                    color: &config.divider_between_groups.color,
                    width: config.divider_between_groups.width,
                },
            ));
        }
        if config.divider_between_bars.enabled && points.len() > 1 {
            layers.push(build_bar_dividers(
                layout,
                DividerStyle {
                    color: &config.divider_between_bars.color,
                    width: config.divider_between_bars.width,
                },
            ));
        }

        for (measure_idx, measure_config) in measure_configs.iter().enumerate() {
            let panel_top = layout.panel_top(measure_idx);
            let scale = scales[measure_idx];
            let range = &ranges[measure_idx];

            if config.show_y_axis {
                let mut ticks = Vec::new();
                for tick in
                    tick_values(range.effective_min, range.effective_max, config.y_tick_count)
                {
                    let pixel_y = scale.value_to_y(tick, panel_top, layout.measure_row_height)?;
                    let label =
                        format_cache.format(measure_idx, &measure_config.format, tick, now);
                    ticks.push((pixel_y, label));
                }
                layers.push(build_y_axis(
                    layout,
                    panel_top,
                    &YAxisSpec {
                        ticks: &ticks,
                        axis_color: &config.axis_color,
                        text_color: &config.text_color,
                        font_size: config.axis_font_size,
                        gridlines: config.show_gridlines,
                        gridline_color: &config.gridline_color,
                    },
                ));
            }

            let values: Vec<f64> = points
                .iter()
                .map(|point| point.value(measure_idx))
                .collect();
            let fills: Vec<String> = points
                .iter()
                .map(|point| {
                    resolve_color(
                        measure_config.conditional_color.as_ref(),
                        &measure_config.color,
                        point.value(measure_idx),
                        point,
                    )
                    .to_owned()
                })
                .collect();
            let show_labels = measure_config.show_value_labels || config.force_value_labels;
            let labels: Vec<Option<String>> = if show_labels {
                values
                    .iter()
                    .map(|value| {
                        Some(format_cache.format(
                            measure_idx,
                            &measure_config.format,
                            *value,
                            now,
                        ))
                    })
                    .collect()
            } else {
                vec![None; values.len()]
            };

            layers.push(build_series_layer(
                layout,
                &scale,
                panel_top,
                &SeriesInputs {
                    measure_index: measure_idx,
                    kind: measure_config.kind,
                    values: &values,
                    fills: &fills,
                    labels: &labels,
                    line_color: &measure_config.color,
                    groups,
                },
                &LabelStyle {
                    position: measure_config.value_label_position,
                    font_size: config.label_font_size,
                    color: &config.text_color,
                    min_bar_height: config.min_label_bar_height,
                    force: config.force_value_labels,
                },
            )?);

            if let Some(reference) = &measure_config.reference_line {
                if reference.enabled {
                    let label = reference.show_label.then(|| {
                        format_cache.format(
                            measure_idx,
                            &measure_config.format,
                            reference.value,
                            now,
                        )
                    });
                    layers.push(build_reference_line(
                        layout,
                        &scale,
                        panel_top,
                        &ReferenceLineSpec {
                            value: reference.value,
                            label,
                            color: &reference.color,
                            style: reference.style,
                            stroke_width: REFERENCE_STROKE_WIDTH_PX,
                            font_size: config.axis_font_size,
                        },
                    )?);
                }
            }

            if config.show_measure_labels {
                layers.push(build_measure_label(
                    layout,
                    panel_top,
                    &measure_names[measure_idx],
                    config.label_font_size,
                    &config.text_color,
                ));
            }
        }

        if config.show_x_axis {
            let labels: Vec<String> = points
                .iter()
                .map(|point| point.primary_label.clone())
                .collect();
            layers.push(build_x_axis(
                layout,
                layout.panel_bottom(measure_configs.len().saturating_sub(1)),
                &XAxisSpec {
                    labels: &labels,
                    rotation_degrees: config.x_label_rotation_degrees,
                    font_size: config.axis_font_size,
                    text_color: &config.text_color,
                    axis_color: &config.axis_color,
                    show_baseline: true,
                },
            ));
        }

        if has_group_headers {
            layers.push(build_group_headers(
                layout,
                groups,
                layout.chart_height - GROUP_HEADER_BASELINE_INSET_PX,
                config.label_font_size,
                &config.text_color,
            ));
        }

        Ok(layers)
    }
}
