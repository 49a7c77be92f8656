use crate::core::{TrellisLayout, ValueScale};
use crate::error::TrellisResult;
use crate::render::svg::{StrokeStyle, SvgNode};

const LABEL_INSET_PX: f64 = 4.0;
const LABEL_RISE_PX: f64 = 4.0;

/// A fully resolved reference line for one panel. The value has already
/// been folded into the panel's range, so the scale always contains it.
#[derive(Debug)]
pub struct ReferenceLineSpec<'a> {
    pub value: f64,
    /// Formatted value text; `None` hides the label.
    pub label: Option<String>,
    pub color: &'a str,
    pub style: StrokeStyle,
    pub stroke_width: f64,
    pub font_size: f64,
}

/// Horizontal rule across the panel at the reference value, with an
/// optional left-aligned label just above it.
pub fn build_reference_line(
    layout: &TrellisLayout,
    scale: &ValueScale,
    panel_top: f64,
    spec: &ReferenceLineSpec<'_>,
) -> TrellisResult<SvgNode> {
    let y = scale.value_to_y(spec.value, panel_top, layout.measure_row_height)?;

    let mut line = SvgNode::new("line")
        .coord("x1", layout.plot_left())
        .coord("y1", y)
        .coord("x2", layout.plot_right())
        .coord("y2", y)
        .attr("stroke", spec.color)
        .coord("stroke-width", spec.stroke_width);
    if let Some(dash) = spec.style.dash_array() {
        line = line.attr("stroke-dasharray", dash);
    }

    let mut group = SvgNode::new("g").attr("class", "reference-line").child(line);
    if let Some(text) = &spec.label {
        group.push(
            SvgNode::new("text")
                .coord("x", layout.plot_left() + LABEL_INSET_PX)
                .coord("y", y - LABEL_RISE_PX)
                .attr("fill", spec.color)
                .coord("font-size", spec.font_size)
                .attr("font-family", "sans-serif")
                .attr("text-anchor", "start")
                .text(text.clone()),
        );
    }
    Ok(group)
}

#[cfg(test)]
mod tests {
    use crate::core::{LayoutInputs, ValueScale, compute_layout};
    use crate::render::svg::{StrokeStyle, fmt_coord};

    use super::{ReferenceLineSpec, build_reference_line};

    fn fixture() -> (crate::core::TrellisLayout, ValueScale) {
        let layout = compute_layout(LayoutInputs {
            measure_count: 1,
            category_count: 3,
            fit_width: false,
            fit_height: false,
            container: None,
            show_y_axis: true,
            measure_label_space: 0.0,
            x_label_space: 40.0,
            has_group_headers: false,
            fixed_bar_width: 40.0,
            fixed_bar_spacing: 20.0,
            fixed_row_height: 100.0,
            spacing_between_measures: 24.0,
        })
        .expect("layout");
        let scale = ValueScale::new(0.0, 100.0).expect("scale");
        (layout, scale)
    }

    #[test]
    fn dashed_line_sits_at_the_scaled_value() {
        let (layout, scale) = fixture();
        let spec = ReferenceLineSpec {
            value: 50.0,
            label: None,
            color: "#cc0000",
            style: StrokeStyle::Dashed,
            stroke_width: 1.0,
            font_size: 11.0,
        };
        let markup = build_reference_line(&layout, &scale, 10.0, &spec)
            .expect("reference")
            .to_markup();
        let y = scale.value_to_y(50.0, 10.0, 100.0).expect("y");
        assert!(markup.contains(&format!("y1=\"{}\"", fmt_coord(y))));
        assert!(markup.contains("stroke-dasharray=\"6 4\""));
        assert!(!markup.contains("<text"));
    }

    #[test]
    fn label_renders_left_aligned_above_the_line() {
        let (layout, scale) = fixture();
        let spec = ReferenceLineSpec {
            value: 75.0,
            label: Some("75".to_owned()),
            color: "#cc0000",
            style: StrokeStyle::Solid,
            stroke_width: 1.0,
            font_size: 11.0,
        };
        let markup = build_reference_line(&layout, &scale, 10.0, &spec)
            .expect("reference")
            .to_markup();
        assert!(markup.contains(">75</text>"));
        assert!(markup.contains("text-anchor=\"start\""));
        assert!(!markup.contains("stroke-dasharray"));
    }
}
