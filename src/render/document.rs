use std::fmt::Write as FmtWrite;

use crate::render::svg::{SvgNode, fmt_coord};

const MESSAGE_FONT_SIZE_PX: f64 = 13.0;
const ERROR_BACKGROUND: &str = "#fdf2f2";
const ERROR_TEXT_COLOR: &str = "#9b1c1c";

/// Serializes a complete SVG document from pre-built layers. The whole
/// string is produced before the caller swaps it in, so the host never
/// observes a half-written document.
#[must_use]
pub fn assemble_document(
    width: f64,
    height: f64,
    background: &str,
    layers: Vec<SvgNode>,
) -> String {
    let mut out = String::with_capacity(4096);
    open_svg(&mut out, width, height);
    push_background(&mut out, background);
    for layer in layers {
        layer.write_into(&mut out, 1);
    }
    out.push_str("</svg>\n");
    out
}

/// Informational document shown when there is nothing to draw yet: no
/// rows, or fewer than one dimension or one measure.
#[must_use]
pub fn placeholder_document(
    width: f64,
    height: f64,
    message: &str,
    background: &str,
    text_color: &str,
) -> String {
    message_document(width, height, message, background, text_color)
}

/// In-place error panel replacing the chart when the render pipeline
/// fails. Always a complete document.
#[must_use]
pub fn error_document(width: f64, height: f64, message: &str) -> String {
    message_document(width, height, message, ERROR_BACKGROUND, ERROR_TEXT_COLOR)
}

fn message_document(
    width: f64,
    height: f64,
    message: &str,
    background: &str,
    text_color: &str,
) -> String {
    let mut out = String::with_capacity(512);
    open_svg(&mut out, width, height);
    push_background(&mut out, background);
    SvgNode::new("text")
        .coord("x", width / 2.0)
        .coord("y", height / 2.0)
        .attr("fill", text_color)
        .coord("font-size", MESSAGE_FONT_SIZE_PX)
        .attr("font-family", "sans-serif")
        .attr("text-anchor", "middle")
        .text(message)
        .write_into(&mut out, 1);
    out.push_str("</svg>\n");
    out
}

fn open_svg(out: &mut String, width: f64, height: f64) {
    let w = fmt_coord(width.max(1.0));
    let h = fmt_coord(height.max(1.0));
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
    );
}

fn push_background(out: &mut String, background: &str) {
    SvgNode::new("rect")
        .attr("width", "100%")
        .attr("height", "100%")
        .attr("fill", background)
        .write_into(out, 1);
}
