mod color_resolver;
mod config_resolve;
mod engine;
mod engine_config;
mod engine_snapshot;
mod format_cache;
mod measure_config;
mod render_cycle;
mod resize;
mod retry;
mod value_format;

pub use color_resolver::{
    ConditionalColorRule, DimensionColorRule, EQUALITY_TOLERANCE, ThresholdColorRule, ThresholdOp,
    palette_color, resolve_color, threshold_matches,
};
pub use config_resolve::{
    DimensionContext, ResolvedConfig, resolve_chart_config, resolve_config, resolve_measure_config,
};
pub use engine::{EngineSignal, RenderOutcome, TrellisEngine};
pub use engine_config::{DividerConfig, TrellisConfig};
pub use engine_snapshot::TrellisSnapshot;
pub use format_cache::{FormatCache, FormatCacheStats};
pub use measure_config::{AxisBound, MeasureConfig, ReferenceLineConfig, TooltipConfig};
pub use resize::{RESIZE_DEBOUNCE_SECONDS, ResizeCoordinator};
pub use retry::{MeasureRetryMachine, RetryPoll, RetryState, RetryTiming};
pub use value_format::{FormatStyle, NumericFormat};
