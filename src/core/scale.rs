use crate::error::{TrellisError, TrellisResult};

/// Linear mapping from an effective measure range onto one panel's inverted
/// vertical pixel span. The maximum of the range sits at the panel top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    domain_min: f64,
    domain_max: f64,
}

impl ValueScale {
    pub fn new(domain_min: f64, domain_max: f64) -> TrellisResult<Self> {
        if !domain_min.is_finite() || !domain_max.is_finite() || domain_min == domain_max {
            return Err(TrellisError::InvalidData(
                "value scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_min,
            domain_max,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    /// Maps a value to a pixel Y inside `[row_top, row_top + row_height]`,
    /// clamped to that span. Values outside the domain pin to the nearest
    /// panel edge rather than escaping into neighbouring panels.
    pub fn value_to_y(self, value: f64, row_top: f64, row_height: f64) -> TrellisResult<f64> {
        if !row_top.is_finite() || !row_height.is_finite() || row_height <= 0.0 {
            return Err(TrellisError::InvalidData(
                "panel row span must be finite with positive height".to_owned(),
            ));
        }
        if !value.is_finite() {
            return Err(TrellisError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_max - self.domain_min;
        let normalized = ((value - self.domain_min) / span).clamp(0.0, 1.0);
        Ok(row_top + row_height * (1.0 - normalized))
    }

    /// Pixel Y of the bar baseline: zero when the domain contains it,
    /// otherwise the domain edge closest to zero.
    pub fn baseline_y(self, row_top: f64, row_height: f64) -> TrellisResult<f64> {
        self.value_to_y(self.domain_min.max(0.0), row_top, row_height)
    }
}
