use serde::{Deserialize, Serialize};

use crate::core::DataPoint;

/// One contiguous run of data points sharing the same formatted
/// secondary-dimension label.
///
/// Invariant: the groups computed for a sequence partition `[0, n)` without
/// gaps or overlap, ordered by `start_idx`. Both indices are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataGroup {
    pub start_idx: usize,
    pub end_idx: usize,
    pub label: String,
}

impl DataGroup {
    #[must_use]
    pub fn new(start_idx: usize, end_idx: usize, label: impl Into<String>) -> Self {
        Self {
            start_idx,
            end_idx,
            label: label.into(),
        }
    }

    /// Number of points covered by the run; never zero by construction.
    #[must_use]
    pub fn span(&self) -> usize {
        self.end_idx - self.start_idx + 1
    }
}

/// Partitions the ordered point sequence into contiguous runs of equal
/// secondary label at `secondary_index`.
///
/// A single left-to-right scan: a change in the formatted label closes the
/// current run and opens a new one. Points beyond their secondary width
/// compare as the empty string, so sequences without that dimension fold
/// into one group.
#[must_use]
pub fn group_by_secondary(points: &[DataPoint], secondary_index: usize) -> Vec<DataGroup> {
    let mut groups = Vec::new();
    let Some(first) = points.first() else {
        return groups;
    };

    let mut run_start = 0usize;
    let mut run_label = first.secondary_label(secondary_index);

    for (idx, point) in points.iter().enumerate().skip(1) {
        let label = point.secondary_label(secondary_index);
        if label != run_label {
            groups.push(DataGroup {
                start_idx: run_start,
                end_idx: idx - 1,
                label: run_label.to_owned(),
            });
            run_start = idx;
            run_label = label;
        }
    }

    groups.push(DataGroup {
        start_idx: run_start,
        end_idx: points.len() - 1,
        label: run_label.to_owned(),
    });
    groups
}
