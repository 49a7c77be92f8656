use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::NumericFormat;

/// Runtime metrics exposed by the per-engine format cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormatCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FormatCacheKey {
    measure_index: usize,
    value_nanos: i64,
}

/// TTL cache for formatted values, owned by the engine and passed into
/// render cycles. Axis ticks repeat across cycles, so each distinct value
/// is formatted once per TTL window. Entries key on the measure index, so
/// the engine clears the cache whenever measure configuration changes.
#[derive(Debug, Default)]
pub struct FormatCache {
    entries: HashMap<FormatCacheKey, (String, f64)>,
    hits: u64,
    misses: u64,
}

impl FormatCache {
    const MAX_ENTRIES: usize = 4096;
    const TTL_SECONDS: f64 = 30.0;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Formats through the cache, inserting on miss.
    pub fn format(
        &mut self,
        measure_index: usize,
        format: &NumericFormat,
        value: f64,
        now: f64,
    ) -> String {
        if let Some(text) = self.get(measure_index, value, now) {
            return text;
        }
        let text = format.format_value(value);
        self.insert(measure_index, value, text.clone(), now);
        text
    }

    pub fn get(&mut self, measure_index: usize, value: f64, now: f64) -> Option<String> {
        let key = FormatCacheKey {
            measure_index,
            value_nanos: quantize_format_value(value),
        };
        let expired = match self.entries.get(&key) {
            Some((text, expires_at)) => {
                if *expires_at > now {
                    self.hits = self.hits.saturating_add(1);
                    return Some(text.clone());
                }
                true
            }
            None => false,
        };
        if expired {
            self.entries.remove(&key);
        }
        None
    }

    pub fn insert(&mut self, measure_index: usize, value: f64, text: String, now: f64) {
        self.misses = self.misses.saturating_add(1);
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.clear();
        }
        let key = FormatCacheKey {
            measure_index,
            value_nanos: quantize_format_value(value),
        };
        self.entries.insert(key, (text, now + Self::TTL_SECONDS));
    }

    /// Drops expired entries; called once per engine tick.
    pub fn prune(&mut self, now: f64) {
        self.entries.retain(|_, (_, expires_at)| *expires_at > now);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn stats(&self) -> FormatCacheStats {
        FormatCacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
        }
    }
}

fn quantize_format_value(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let nanos = (value * 1_000_000_000.0).round();
    if nanos > (i64::MAX as f64) {
        i64::MAX
    } else if nanos < (i64::MIN as f64) {
        i64::MIN
    } else {
        nanos as i64
    }
}
