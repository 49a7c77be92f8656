use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Host container bounds in device-independent pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerBox {
    pub width: u32,
    pub height: u32,
}

impl ContainerBox {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Resize observers deliver zero-size boxes while the container is still
    /// being laid out; those carry no usable geometry.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Dimension,
    Measure,
}

/// Column metadata supplied by the host. Identity is the `id`, never the
/// position in the result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub name: String,
    pub role: ColumnRole,
}

impl Column {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: ColumnRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }

    #[must_use]
    pub fn dimension(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, ColumnRole::Dimension)
    }

    #[must_use]
    pub fn measure(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, ColumnRole::Measure)
    }
}

/// Secondary-label storage; nearly every chart carries zero, one or two
/// secondary dimensions, so the labels live inline.
pub type SecondaryLabels = SmallVec<[String; 2]>;

/// Addresses one categorical dimension of a projected point: the primary
/// axis, or a secondary dimension by its position in configured order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionSlot {
    Primary,
    Secondary(usize),
}

/// One projected row: the primary category label, the secondary-dimension
/// labels in configured order, and one value per configured measure.
///
/// Invariant: `values.len()` equals the configured measure count for every
/// point in a projection. Points are immutable once projected; transforms
/// produce derived copies instead of mutating in place.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub primary_label: String,
    pub secondary_labels: SecondaryLabels,
    pub values: Vec<f64>,
}

impl DataPoint {
    #[must_use]
    pub fn new(
        primary_label: impl Into<String>,
        secondary_labels: SecondaryLabels,
        values: Vec<f64>,
    ) -> Self {
        Self {
            primary_label: primary_label.into(),
            secondary_labels,
            values,
        }
    }

    /// Secondary label at `index`, or the empty string when the point has
    /// fewer secondary dimensions than requested.
    #[must_use]
    pub fn secondary_label(&self, index: usize) -> &str {
        self.secondary_labels
            .get(index)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Value for measure `index`, or `0.0` outside the projected width.
    #[must_use]
    pub fn value(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }

    /// Label of the addressed dimension for this point.
    #[must_use]
    pub fn label_for(&self, slot: DimensionSlot) -> &str {
        match slot {
            DimensionSlot::Primary => &self.primary_label,
            DimensionSlot::Secondary(index) => self.secondary_label(index),
        }
    }
}
