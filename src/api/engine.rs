use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::core::layout::FIT_WIDTH_FALLBACK_PX;
use crate::core::{
    Column, ContainerBox, DataGroup, DataPoint, DataSelection, MeasureRange, TrellisLayout,
    ValueScale,
};
use crate::error::{TrellisError, TrellisResult};
use crate::interaction::{
    HitRegistry, HitTarget, TooltipController, TooltipInputs, TooltipLayout, TooltipLine,
    TooltipPanel, build_simple_lines, estimate_panel_size, place_panel, render_tooltip_template,
};
use crate::render::error_document;

use super::render_cycle::RenderCycle;
use super::{
    FormatCache, MeasureConfig, MeasureRetryMachine, ResizeCoordinator, RetryPoll, TrellisConfig,
    resolve_config,
};

/// Signals drained by the host after `render` and `pump` calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineSignal {
    /// Emitted exactly once per successful render cycle.
    RenderCompleted { measures: usize, categories: usize },
    /// Asks the host to requery while configured measures are missing.
    ConfigurationTouched,
    /// The missing-measure wait gave up; emitted on that transition only.
    RetryExhausted { missing: Vec<String> },
    RenderFailed { message: String },
}

/// What one render call produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderOutcome {
    Rendered,
    /// An informational document stands in for the chart.
    Placeholder { reason: String },
    /// Configured measures are absent; the retry machine is waiting.
    AwaitingMeasures { missing: Vec<String> },
    Failed { message: String },
}

/// Geometry retained from the last successful cycle for tooltip placement
/// and snapshots.
#[derive(Debug, Clone)]
pub(super) struct RenderArtifacts {
    pub(super) layout: TrellisLayout,
    pub(super) ranges: Vec<MeasureRange>,
    pub(super) groups: Vec<DataGroup>,
    pub(super) category_count: usize,
}

/// Host-facing engine: owns the result set, resolved configuration and
/// interaction state, and turns them into SVG documents on demand.
///
/// Time never comes from the system clock; every deadline-driven operation
/// takes `now` in seconds from the host's monotonic clock.
#[derive(Debug)]
pub struct TrellisEngine {
    pub(super) columns: Vec<Column>,
    pub(super) rows: Vec<Vec<Value>>,
    pub(super) data_version: u64,
    pub(super) selection: DataSelection,
    explicit_selection: bool,
    pub(super) host_config: Value,
    pub(super) config: TrellisConfig,
    pub(super) measure_configs: Vec<MeasureConfig>,
    pub(super) resize: ResizeCoordinator,
    pub(super) retry: MeasureRetryMachine,
    pub(super) hits: HitRegistry,
    pub(super) tooltips: TooltipController,
    pub(super) format_cache: FormatCache,
    pub(super) markup: Option<String>,
    pub(super) signals: Vec<EngineSignal>,
    pub(super) points: Vec<DataPoint>,
    pub(super) artifacts: Option<RenderArtifacts>,
}

impl Default for TrellisEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TrellisEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TrellisConfig::default())
    }

    #[must_use]
    pub fn with_config(config: TrellisConfig) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            data_version: 0,
            selection: DataSelection::from_columns(&[]),
            explicit_selection: false,
            host_config: Value::Null,
            config,
            measure_configs: Vec::new(),
            resize: ResizeCoordinator::new(),
            retry: MeasureRetryMachine::default(),
            hits: HitRegistry::new(),
            tooltips: TooltipController::new(),
            format_cache: FormatCache::new(),
            markup: None,
            signals: Vec::new(),
            points: Vec::new(),
            artifacts: None,
        }
    }

    /// Replaces the result set. Bumps the data version and cancels any
    /// pending measure wait; the markup stays until the next render.
    pub fn set_data(&mut self, columns: Vec<Column>, rows: Vec<Vec<Value>>) {
        self.columns = columns;
        self.rows = rows;
        self.data_version = self.data_version.wrapping_add(1);
        self.retry.cancel();
        if !self.explicit_selection {
            self.selection = DataSelection::from_columns(&self.columns);
        }
        self.resolve_measure_configs();
        debug!(
            version = self.data_version,
            columns = self.columns.len(),
            rows = self.rows.len(),
            "result set replaced"
        );
    }

    /// Chooses which columns drive the chart. The selection must name a
    /// primary dimension and at least one measure.
    pub fn set_selection(&mut self, selection: DataSelection) -> TrellisResult<()> {
        if selection.primary_dimension.is_empty() {
            return Err(TrellisError::InvalidConfig(
                "selection needs a primary dimension".to_owned(),
            ));
        }
        if selection.measures.is_empty() {
            return Err(TrellisError::InvalidConfig(
                "selection needs at least one measure".to_owned(),
            ));
        }
        self.selection = selection;
        self.explicit_selection = true;
        self.retry.cancel();
        self.resolve_measure_configs();
        Ok(())
    }

    /// Applies raw host configuration. Both the chart-wide and per-measure
    /// configs are re-resolved against the current selection.
    pub fn set_host_config(&mut self, raw: Value) {
        self.host_config = raw;
        let resolved = resolve_config(&self.host_config, &self.selection);
        self.config = resolved.chart;
        self.measure_configs = resolved.measures;
        self.format_cache.clear();
    }

    /// Replaces the chart-wide configuration directly, bypassing host-key
    /// resolution. A later `set_host_config` re-resolves over it.
    pub fn set_config(&mut self, config: TrellisConfig) {
        self.config = config;
    }

    /// Replaces per-measure configurations directly. A later data or
    /// selection change re-resolves them from the stored host config.
    pub fn set_measure_configs(&mut self, configs: Vec<MeasureConfig>) {
        self.measure_configs = configs;
        self.format_cache.clear();
    }

    /// Feeds a container notification into the debounce window.
    pub fn observe_container_resize(&mut self, container: ContainerBox, now: f64) {
        self.resize.observe(container, now);
    }

    /// Adopts the initial container measurement without debouncing.
    pub fn set_container(&mut self, container: ContainerBox) {
        self.resize.adopt(container);
    }

    /// Advances debounce and retry deadlines; renders when one fires.
    pub fn pump(&mut self, now: f64) -> Option<RenderOutcome> {
        let mut render_due = false;
        if let Some(container) = self.resize.poll(now) {
            debug!(
                width = container.width,
                height = container.height,
                "container size settled"
            );
            render_due = true;
        }
        if self.retry.poll(now) == RetryPoll::CheckDue {
            self.retry.begin_check();
            render_due = true;
        }
        render_due.then(|| self.render(now))
    }

    /// Runs a full render cycle. Pipeline failures are contained: the
    /// document is swapped for an error panel and the host keeps running.
    pub fn render(&mut self, now: f64) -> RenderOutcome {
        match RenderCycle::run(self, now) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = %err, "render cycle failed");
                let message = err.to_string();
                let (width, height) = self.document_size();
                self.markup = Some(error_document(width, height, &message));
                self.artifacts = None;
                self.hits.clear();
                self.signals.push(EngineSignal::RenderFailed {
                    message: message.clone(),
                });
                RenderOutcome::Failed { message }
            }
        }
    }

    /// Last rendered document. Replaced only as a whole, never patched.
    #[must_use]
    pub fn markup(&self) -> Option<&str> {
        self.markup.as_deref()
    }

    /// Drains queued signals in emission order.
    pub fn take_signals(&mut self) -> Vec<EngineSignal> {
        std::mem::take(&mut self.signals)
    }

    #[must_use]
    pub const fn config(&self) -> &TrellisConfig {
        &self.config
    }

    #[must_use]
    pub fn measure_configs(&self) -> &[MeasureConfig] {
        &self.measure_configs
    }

    #[must_use]
    pub const fn selection(&self) -> &DataSelection {
        &self.selection
    }

    #[must_use]
    pub const fn data_version(&self) -> u64 {
        self.data_version
    }

    /// Pointer entered a registered element; returns the panel to show.
    pub fn pointer_over(&mut self, element_id: &str, now: f64) -> Option<TooltipPanel> {
        let target = self.hits.lookup(element_id)?;
        self.tooltips.pointer_over(target);
        self.tooltip_panel(target, now)
    }

    /// Tap/click parity: touch hosts route taps here and get the same
    /// panel a hover would produce.
    pub fn pointer_click(&mut self, element_id: &str, now: f64) -> Option<TooltipPanel> {
        self.pointer_over(element_id, now)
    }

    pub fn pointer_leave(&mut self) {
        self.tooltips.pointer_leave();
    }

    #[must_use]
    pub fn hovered(&self) -> Option<HitTarget> {
        self.tooltips.hovered()
    }

    pub(super) fn resolve_measure_configs(&mut self) {
        let resolved = resolve_config(&self.host_config, &self.selection);
        self.measure_configs = resolved.measures;
        self.format_cache.clear();
    }

    /// Display name of a selected measure, falling back to its column id.
    pub(super) fn measure_display_name(&self, measure_index: usize) -> String {
        let id = self
            .selection
            .measures
            .get(measure_index)
            .map_or("", String::as_str);
        self.columns
            .iter()
            .find(|column| column.id == id)
            .map_or_else(|| id.to_owned(), |column| column.name.clone())
    }

    /// Best-known document dimensions for placeholder and error panels.
    pub(super) fn document_size(&self) -> (f64, f64) {
        if let Some(artifacts) = &self.artifacts {
            return (artifacts.layout.chart_width, artifacts.layout.chart_height);
        }
        match self.resize.current() {
            Some(container) => (f64::from(container.width), f64::from(container.height)),
            None => (FIT_WIDTH_FALLBACK_PX, 400.0),
        }
    }

    fn tooltip_panel(&mut self, target: HitTarget, now: f64) -> Option<TooltipPanel> {
        let artifacts = self.artifacts.as_ref()?;
        let layout = artifacts.layout;
        let range = artifacts.ranges.get(target.measure_index).copied()?;
        let point = self.points.get(target.data_index)?.clone();
        let measure_config = self.measure_configs.get(target.measure_index)?.clone();
        if !measure_config.tooltip.enabled {
            return None;
        }

        let value = point.value(target.measure_index);
        let formatted =
            self.format_cache
                .format(target.measure_index, &measure_config.format, value, now);
        let measure_name = self.measure_display_name(target.measure_index);
        let inputs = TooltipInputs {
            measure_name: &measure_name,
            formatted_value: &formatted,
            primary_label: &point.primary_label,
            secondary_label: point.secondary_label(0),
            secondary2_label: point.secondary_label(1),
        };

        let lines = match (&measure_config.tooltip.format, measure_config.tooltip.layout) {
            (Some(template), _) => {
                vec![TooltipLine::new(
                    None,
                    render_tooltip_template(template, &inputs),
                )]
            }
            (None, TooltipLayout::Simple) => build_simple_lines(&inputs),
            (None, TooltipLayout::Detailed) => self.detailed_lines(&inputs, &point, now),
        };

        let anchor_x = layout.category_center_x(target.data_index);
        let panel_top = layout.panel_top(target.measure_index);
        let anchor_y = ValueScale::new(range.effective_min, range.effective_max)
            .and_then(|scale| scale.value_to_y(value, panel_top, layout.measure_row_height))
            .unwrap_or(panel_top);

        let (width, height) = estimate_panel_size(&lines);
        let (x, y) = place_panel(
            anchor_x,
            anchor_y,
            width,
            height,
            layout.chart_width,
            layout.chart_height,
        );

        Some(TooltipPanel {
            x,
            y,
            width,
            height,
            background_color: measure_config.tooltip.background_color.clone(),
            lines,
        })
    }

    /// Title line, then one swatched line per selected measure.
    fn detailed_lines(
        &mut self,
        inputs: &TooltipInputs<'_>,
        point: &DataPoint,
        now: f64,
    ) -> Vec<TooltipLine> {
        let title = if inputs.secondary_label.is_empty() {
            inputs.primary_label.to_owned()
        } else {
            format!("{} ({})", inputs.primary_label, inputs.secondary_label)
        };
        let mut lines = vec![TooltipLine::new(None, title)];
        for index in 0..self.measure_configs.len().min(point.values.len()) {
            let (format, color) = {
                let config = &self.measure_configs[index];
                (config.format.clone(), config.color.clone())
            };
            let name = self.measure_display_name(index);
            let text = self
                .format_cache
                .format(index, &format, point.value(index), now);
            lines.push(TooltipLine::new(Some(color), format!("{name}: {text}")));
        }
        lines
    }
}
