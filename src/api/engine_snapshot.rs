use serde::{Deserialize, Serialize};

use crate::core::{ContainerBox, DataGroup, DataSelection, MeasureRange, TrellisLayout};
use crate::error::{TrellisError, TrellisResult};

use super::{FormatCacheStats, RetryState, TrellisEngine};

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrellisSnapshot {
    pub data_version: u64,
    pub container: Option<ContainerBox>,
    pub selection: DataSelection,
    pub category_count: usize,
    pub missing_measures: Vec<String>,
    pub retry_state: RetryState,
    pub retry_attempts: u32,
    pub ranges: Vec<MeasureRange>,
    pub layout: Option<TrellisLayout>,
    pub groups: Vec<DataGroup>,
    pub hit_target_count: usize,
    pub format_cache: FormatCacheStats,
}

impl TrellisSnapshot {
    /// Serializes the snapshot as pretty JSON for fixture-based checks.
    pub fn to_json_pretty(&self) -> TrellisResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TrellisError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}

impl TrellisEngine {
    /// Builds a deterministic snapshot of the last render cycle.
    #[must_use]
    pub fn snapshot(&self) -> TrellisSnapshot {
        let artifacts = self.artifacts.as_ref();
        TrellisSnapshot {
            data_version: self.data_version,
            container: self.resize.current(),
            selection: self.selection.clone(),
            category_count: artifacts.map_or(0, |a| a.category_count),
            missing_measures: self.retry.missing().to_vec(),
            retry_state: self.retry.state(),
            retry_attempts: self.retry.attempts(),
            ranges: artifacts.map_or_else(Vec::new, |a| a.ranges.clone()),
            layout: artifacts.map(|a| a.layout),
            groups: artifacts.map_or_else(Vec::new, |a| a.groups.clone()),
            hit_target_count: self.hits.len(),
            format_cache: self.format_cache.stats(),
        }
    }
}
