use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use tracing::warn;

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::cell::{cell_number, cell_text};
use crate::core::{Column, ColumnRole, DataPoint, SecondaryLabels};

/// Which columns of the result set drive the chart.
///
/// All references are column ids; the projector resolves them against the
/// column metadata, never against positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSelection {
    pub primary_dimension: String,
    pub secondary_dimensions: Vec<String>,
    pub measures: Vec<String>,
}

impl DataSelection {
    /// Derives the conventional selection from column order: the first
    /// dimension is primary, remaining dimensions are secondary, and every
    /// measure participates.
    #[must_use]
    pub fn from_columns(columns: &[Column]) -> Self {
        let mut primary_dimension = String::new();
        let mut secondary_dimensions = Vec::new();
        let mut measures = Vec::new();

        for column in columns {
            match column.role {
                ColumnRole::Dimension => {
                    if primary_dimension.is_empty() {
                        primary_dimension = column.id.clone();
                    } else {
                        secondary_dimensions.push(column.id.clone());
                    }
                }
                ColumnRole::Measure => measures.push(column.id.clone()),
            }
        }

        Self {
            primary_dimension,
            secondary_dimensions,
            measures,
        }
    }

    #[must_use]
    pub fn dimension_count(&self) -> usize {
        usize::from(!self.primary_dimension.is_empty()) + self.secondary_dimensions.len()
    }
}

/// Result of projecting raw rows against a selection.
///
/// Zero points is a reported condition, never an error: the caller decides
/// between a placeholder and the missing-measure retry path.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub points: Vec<DataPoint>,
    /// Configured measures absent from the column set entirely.
    pub missing_measures: Vec<String>,
    /// Rows dropped for lacking a primary dimension value.
    pub dropped_rows: usize,
}

/// Projects raw rows into the ordered `DataPoint` sequence.
///
/// A row without a primary dimension value is dropped; a row missing a
/// measure cell contributes `0.0` for that measure. Measures whose column id
/// does not exist at all are reported in `missing_measures` and contribute a
/// constant `0.0` column so `values.len()` stays equal to the configured
/// measure count.
#[must_use]
pub fn project_rows(
    columns: &[Column],
    rows: &[Vec<Value>],
    selection: &DataSelection,
) -> Projection {
    let index_by_id: HashMap<&str, usize> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| (column.id.as_str(), index))
        .collect();

    let primary_idx = index_by_id.get(selection.primary_dimension.as_str()).copied();
    let secondary_idx: SmallVec<[Option<usize>; 2]> = selection
        .secondary_dimensions
        .iter()
        .map(|id| index_by_id.get(id.as_str()).copied())
        .collect();
    let measure_idx: Vec<Option<usize>> = selection
        .measures
        .iter()
        .map(|id| index_by_id.get(id.as_str()).copied())
        .collect();

    let missing_measures: Vec<String> = selection
        .measures
        .iter()
        .zip(&measure_idx)
        .filter(|(_, idx)| idx.is_none())
        .map(|(id, _)| id.clone())
        .collect();
    if !missing_measures.is_empty() {
        warn!(
            missing = ?missing_measures,
            "configured measures absent from the column set"
        );
    }

    let Some(primary_idx) = primary_idx else {
        // Without the primary column every row lacks its category label.
        warn!(
            primary = %selection.primary_dimension,
            dropped = rows.len(),
            "primary dimension column not found; dropping all rows"
        );
        return Projection {
            points: Vec::new(),
            missing_measures,
            dropped_rows: rows.len(),
        };
    };

    let project_one = |row: &Vec<Value>| -> Option<DataPoint> {
        let primary_label = row.get(primary_idx).and_then(cell_text)?;
        let secondary_labels: SecondaryLabels = secondary_idx
            .iter()
            .map(|idx| {
                idx.and_then(|i| row.get(i))
                    .and_then(cell_text)
                    .unwrap_or_default()
            })
            .collect();
        let values: Vec<f64> = measure_idx
            .iter()
            .map(|idx| {
                idx.and_then(|i| row.get(i))
                    .and_then(cell_number)
                    .unwrap_or(0.0)
            })
            .collect();
        Some(DataPoint::new(primary_label, secondary_labels, values))
    };

    // The optional parallel path must keep the row order of the sequential
    // one, so rows map to an indexed Option column before flattening.
    #[cfg(feature = "parallel-projection")]
    let projected: Vec<Option<DataPoint>> = rows.par_iter().map(project_one).collect();

    #[cfg(not(feature = "parallel-projection"))]
    let projected: Vec<Option<DataPoint>> = rows.iter().map(project_one).collect();

    let mut points = Vec::with_capacity(projected.len());
    let mut dropped_rows = 0usize;
    for candidate in projected {
        match candidate {
            Some(point) => points.push(point),
            None => dropped_rows += 1,
        }
    }

    if dropped_rows > 0 {
        warn!(dropped_rows, kept = points.len(), "rows without a primary label dropped");
    }

    Projection {
        points,
        missing_measures,
        dropped_rows,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::core::Column;

    use super::{DataSelection, project_rows};

    fn columns() -> Vec<Column> {
        vec![
            Column::dimension("region", "Region"),
            Column::dimension("segment", "Segment"),
            Column::measure("revenue", "Revenue"),
            Column::measure("count", "Count"),
        ]
    }

    #[test]
    fn selection_from_columns_follows_column_order() {
        let selection = DataSelection::from_columns(&columns());
        assert_eq!(selection.primary_dimension, "region");
        assert_eq!(selection.secondary_dimensions, vec!["segment".to_owned()]);
        assert_eq!(selection.measures.len(), 2);
        assert_eq!(selection.dimension_count(), 2);
    }

    #[test]
    fn rows_project_in_order_with_one_value_per_measure() {
        let columns = columns();
        let selection = DataSelection::from_columns(&columns);
        let rows = vec![
            vec![json!("north"), json!("retail"), json!(10.5), json!(3)],
            vec![json!("south"), json!("retail"), json!({"v": {"n": 20.0, "s": "20"}}), json!(4)],
        ];

        let projection = project_rows(&columns, &rows, &selection);
        assert_eq!(projection.points.len(), 2);
        assert_eq!(projection.dropped_rows, 0);
        assert!(projection.missing_measures.is_empty());
        assert_eq!(projection.points[0].primary_label, "north");
        assert_eq!(projection.points[0].secondary_label(0), "retail");
        assert_eq!(projection.points[0].values, vec![10.5, 3.0]);
        assert_eq!(projection.points[1].values, vec![20.0, 4.0]);
    }

    #[test]
    fn row_without_primary_label_is_dropped_not_zeroed() {
        let columns = columns();
        let selection = DataSelection::from_columns(&columns);
        let rows = vec![
            vec![json!(null), json!("retail"), json!(1), json!(1)],
            vec![json!("west"), json!("retail"), json!(2), json!(2)],
        ];

        let projection = project_rows(&columns, &rows, &selection);
        assert_eq!(projection.points.len(), 1);
        assert_eq!(projection.dropped_rows, 1);
        assert_eq!(projection.points[0].primary_label, "west");
    }

    #[test]
    fn missing_measure_cell_contributes_zero() {
        let columns = columns();
        let selection = DataSelection::from_columns(&columns);
        let rows = vec![vec![json!("east"), json!("retail"), json!("n/a")]];

        let projection = project_rows(&columns, &rows, &selection);
        assert_eq!(projection.points[0].values, vec![0.0, 0.0]);
    }

    #[test]
    fn measure_absent_from_column_set_is_reported() {
        let columns = columns();
        let mut selection = DataSelection::from_columns(&columns);
        selection.measures.push("margin".to_owned());
        let rows = vec![vec![json!("north"), json!("retail"), json!(5), json!(1)]];

        let projection = project_rows(&columns, &rows, &selection);
        assert_eq!(projection.missing_measures, vec!["margin".to_owned()]);
        // The absent measure still occupies a value slot.
        assert_eq!(projection.points[0].values, vec![5.0, 1.0, 0.0]);
    }

    #[test]
    fn lookup_is_by_id_not_position() {
        let columns = vec![
            Column::measure("revenue", "Revenue"),
            Column::dimension("region", "Region"),
        ];
        let selection = DataSelection::from_columns(&columns);
        let rows = vec![vec![json!(42.0), json!("north")]];

        let projection = project_rows(&columns, &rows, &selection);
        assert_eq!(projection.points[0].primary_label, "north");
        assert_eq!(projection.points[0].values, vec![42.0]);
    }
}
