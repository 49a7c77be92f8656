pub mod cell;
pub mod grouping;
pub mod layout;
pub mod projection;
pub mod range;
pub mod scale;
pub mod transform;
pub mod types;

pub use cell::{cell_number, cell_text};
pub use grouping::{DataGroup, group_by_secondary};
pub use layout::{LayoutInputs, TrellisLayout, compute_layout};
pub use projection::{DataSelection, Projection, project_rows};
pub use range::{MeasureRange, RangeOverrides, compute_measure_range, compute_measure_ranges};
pub use scale::ValueScale;
pub use transform::{PercentOfTotalRule, apply_percent_of_total};
pub use types::{Column, ColumnRole, ContainerBox, DataPoint, DimensionSlot, SecondaryLabels};
