//! Normalization of host result-set cells.
//!
//! Hosts deliver cells in several shapes: bare primitives, `null`, a boxed
//! `{"v": primitive}`, or a boxed numeric-with-display `{"v": {"n": 12.5,
//! "s": "12.50 EUR"}}`. Everything downstream works on plain numbers and
//! strings, so the two accessors here are the only place those shapes exist.

use serde_json::Value;

/// Numeric interpretation of a cell. `None` for null, non-numeric text and
/// non-finite numbers; callers decide whether absence means "drop" or "zero".
#[must_use]
pub fn cell_number(cell: &Value) -> Option<f64> {
    match unbox(cell) {
        Value::Number(number) => number.as_f64().filter(|value| value.is_finite()),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        Value::Object(map) => map
            .get("n")
            .and_then(Value::as_f64)
            .filter(|value| value.is_finite()),
        _ => None,
    }
}

/// Display interpretation of a cell. Prefers the host-formatted `s` string
/// of a boxed numeric cell; numbers fall back to their plain rendering.
#[must_use]
pub fn cell_text(cell: &Value) -> Option<String> {
    match unbox(cell) {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Object(map) => {
            if let Some(Value::String(display)) = map.get("s") {
                return Some(display.clone());
            }
            map.get("n").and_then(Value::as_f64).map(|n| n.to_string())
        }
        _ => None,
    }
}

/// Strips the `{"v": ...}` box, if present.
fn unbox(cell: &Value) -> &Value {
    match cell {
        Value::Object(map) => map.get("v").unwrap_or(cell),
        _ => cell,
    }
}
