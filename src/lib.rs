//! trellis-rs: small-multiple charting engine.
//!
//! This crate lays out one panel per measure over a shared categorical
//! axis, renders the result as a self-contained SVG document, and keeps
//! the host-facing surface JSON-friendly end to end.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{EngineSignal, MeasureConfig, RenderOutcome, TrellisConfig, TrellisEngine};
pub use error::{TrellisError, TrellisResult};
