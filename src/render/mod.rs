mod axis;
mod document;
mod elements;
mod reference;
mod svg;

pub use axis::{
    DividerStyle, XAxisSpec, YAxisSpec, build_bar_dividers, build_group_dividers,
    build_group_headers, build_measure_dividers, build_measure_label, build_x_axis, build_y_axis,
    tick_values,
};
pub use document::{assemble_document, error_document, placeholder_document};
pub use elements::{LabelStyle, SeriesInputs, SeriesKind, ValueLabelPosition, build_series_layer};
pub use reference::{ReferenceLineSpec, build_reference_line};
pub use svg::{StrokeStyle, SvgNode, escape_xml, fmt_coord};
