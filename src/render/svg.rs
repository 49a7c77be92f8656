use std::fmt::Write as FmtWrite;

use serde::{Deserialize, Serialize};

/// Stroke rendering for reference lines and dividers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// SVG `stroke-dasharray` value, or `None` for a solid stroke.
    #[must_use]
    pub const fn dash_array(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("6 4"),
            Self::Dotted => Some("2 3"),
        }
    }
}

/// Escape text and attribute values for XML embedding.
#[must_use]
pub fn escape_xml(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Formats a pixel coordinate with at most two decimals, trimming trailing
/// zeros so markup stays compact and stable across runs.
#[must_use]
pub fn fmt_coord(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_owned();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_owned();
    }
    let mut text = format!("{rounded:.2}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    text
}

/// One SVG element under construction. Attribute order is emission order,
/// which keeps rendered markup byte-stable for identical scenes.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgNode {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    text: Option<String>,
    children: Vec<SvgNode>,
}

impl SvgNode {
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    /// Numeric attribute routed through `fmt_coord`.
    #[must_use]
    pub fn coord(self, name: &'static str, value: f64) -> Self {
        self.attr(name, fmt_coord(value))
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn child(mut self, child: SvgNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, nodes: impl IntoIterator<Item = SvgNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn push(&mut self, child: SvgNode) {
        self.children.push(child);
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Serializes this node and its subtree with two-space indentation.
    pub fn write_into(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, r#" {name}="{}""#, escape_xml(value));
        }
        if self.children.is_empty() {
            if let Some(text) = &self.text {
                let _ = writeln!(out, ">{}</{}>", escape_xml(text), self.tag);
            } else {
                out.push_str("/>\n");
            }
        } else {
            out.push_str(">\n");
            for child in &self.children {
                child.write_into(out, depth + 1);
            }
            for _ in 0..depth {
                out.push_str("  ");
            }
            let _ = writeln!(out, "</{}>", self.tag);
        }
    }

    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut out = String::with_capacity(256);
        self.write_into(&mut out, 0);
        out
    }
}
