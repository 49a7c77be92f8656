use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

const CHAR_WIDTH_PX: f64 = 6.5;
const LINE_HEIGHT_PX: f64 = 18.0;
const PANEL_PADDING_PX: f64 = 8.0;
const SWATCH_SPACE_PX: f64 = 14.0;
const ANCHOR_OFFSET_PX: f64 = 12.0;

/// The data element behind one rendered SVG id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitTarget {
    pub measure_index: usize,
    pub data_index: usize,
}

impl HitTarget {
    #[must_use]
    pub const fn new(measure_index: usize, data_index: usize) -> Self {
        Self {
            measure_index,
            data_index,
        }
    }

    /// Stable SVG element id for this target.
    #[must_use]
    pub fn element_id(self) -> String {
        format!("m{}-d{}", self.measure_index, self.data_index)
    }
}

/// Render-time mapping from SVG element id to the `(measure, data point)`
/// it represents. Hosts resolve pointer events through this map; there is
/// no geometric hit-testing anywhere.
#[derive(Debug, Clone, Default)]
pub struct HitRegistry {
    targets: IndexMap<String, HitTarget>,
}

impl HitRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, target: HitTarget) {
        self.targets.insert(target.element_id(), target);
    }

    #[must_use]
    pub fn lookup(&self, element_id: &str) -> Option<HitTarget> {
        self.targets.get(element_id).copied()
    }

    /// Dropped wholesale at the start of every render cycle; stale ids from
    /// a previous document must never resolve.
    pub fn clear(&mut self) {
        self.targets.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Tooltip content shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipLayout {
    /// One measure plus the primary label.
    #[default]
    Simple,
    /// Every measure for the hovered category, each with a color swatch.
    Detailed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipLine {
    /// Swatch fill color, when the line belongs to a specific measure.
    pub swatch: Option<String>,
    pub text: String,
}

impl TooltipLine {
    #[must_use]
    pub fn new(swatch: Option<String>, text: impl Into<String>) -> Self {
        Self {
            swatch,
            text: text.into(),
        }
    }
}

/// A positioned tooltip ready for the host to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipPanel {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub background_color: String,
    pub lines: Vec<TooltipLine>,
}

/// Everything a tooltip template can reference for one hovered element.
#[derive(Debug, Clone, Copy)]
pub struct TooltipInputs<'a> {
    pub measure_name: &'a str,
    pub formatted_value: &'a str,
    pub primary_label: &'a str,
    pub secondary_label: &'a str,
    pub secondary2_label: &'a str,
}

/// Substitutes `{value}`, `{measure}`, `{primary}`, `{secondary}` and
/// `{secondary2}` placeholders. Unknown placeholders pass through verbatim.
#[must_use]
pub fn render_tooltip_template(template: &str, inputs: &TooltipInputs<'_>) -> String {
    template
        .replace("{value}", inputs.formatted_value)
        .replace("{measure}", inputs.measure_name)
        .replace("{primary}", inputs.primary_label)
        .replace("{secondary2}", inputs.secondary2_label)
        .replace("{secondary}", inputs.secondary_label)
}

/// Default content when no custom template is configured: a title line with
/// the dimension labels, then `measure: value`.
#[must_use]
pub fn build_simple_lines(inputs: &TooltipInputs<'_>) -> Vec<TooltipLine> {
    let title = if inputs.secondary_label.is_empty() {
        inputs.primary_label.to_owned()
    } else {
        format!("{} ({})", inputs.primary_label, inputs.secondary_label)
    };
    vec![
        TooltipLine::new(None, title),
        TooltipLine::new(
            None,
            format!("{}: {}", inputs.measure_name, inputs.formatted_value),
        ),
    ]
}

/// Monospace-ish size estimate; hosts lay real text out themselves, this
/// only has to be good enough for placement.
#[must_use]
pub fn estimate_panel_size(lines: &[TooltipLine]) -> (f64, f64) {
    let widest = lines
        .iter()
        .map(|line| line.text.chars().count())
        .max()
        .unwrap_or(0) as f64;
    let swatch_space = if lines.iter().any(|line| line.swatch.is_some()) {
        SWATCH_SPACE_PX
    } else {
        0.0
    };
    (
        widest * CHAR_WIDTH_PX + swatch_space + PANEL_PADDING_PX * 2.0,
        lines.len() as f64 * LINE_HEIGHT_PX + PANEL_PADDING_PX * 2.0,
    )
}

/// Picks the panel corner position: right of the anchor when it fits, then
/// left, then above, scored by how much of the panel would overflow the
/// viewport. The winner is clamped so the panel never escapes entirely.
#[must_use]
pub fn place_panel(
    anchor_x: f64,
    anchor_y: f64,
    width: f64,
    height: f64,
    viewport_width: f64,
    viewport_height: f64,
) -> (f64, f64) {
    let mut candidates: SmallVec<[((OrderedFloat<f64>, usize), (f64, f64)); 3]> = SmallVec::new();
    let positions = [
        (anchor_x + ANCHOR_OFFSET_PX, anchor_y - height / 2.0),
        (anchor_x - ANCHOR_OFFSET_PX - width, anchor_y - height / 2.0),
        (anchor_x - width / 2.0, anchor_y - height - ANCHOR_OFFSET_PX),
    ];
    for (rank, (x, y)) in positions.into_iter().enumerate() {
        let overflow = overflow_area(x, y, width, height, viewport_width, viewport_height);
        candidates.push(((OrderedFloat(overflow), rank), (x, y)));
    }

    let (x, y) = candidates
        .into_iter()
        .min_by_key(|(key, _)| *key)
        .map_or((anchor_x, anchor_y), |(_, position)| position);
    (
        x.clamp(0.0, (viewport_width - width).max(0.0)),
        y.clamp(0.0, (viewport_height - height).max(0.0)),
    )
}

fn overflow_area(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    viewport_width: f64,
    viewport_height: f64,
) -> f64 {
    let visible_w = ((x + width).min(viewport_width) - x.max(0.0)).max(0.0);
    let visible_h = ((y + height).min(viewport_height) - y.max(0.0)).max(0.0);
    width * height - visible_w * visible_h
}

/// Hover state shared by pointer-over and click (touch parity).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TooltipController {
    hovered: Option<HitTarget>,
}

impl TooltipController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the hovered element actually changed.
    pub fn pointer_over(&mut self, target: HitTarget) -> bool {
        let changed = self.hovered != Some(target);
        self.hovered = Some(target);
        changed
    }

    pub fn pointer_leave(&mut self) -> bool {
        let had = self.hovered.is_some();
        self.hovered = None;
        had
    }

    #[must_use]
    pub fn hovered(self) -> Option<HitTarget> {
        self.hovered
    }
}
