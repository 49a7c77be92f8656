use serde::{Deserialize, Serialize};

/// Numeric rendering style for a measure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatStyle {
    #[default]
    Decimal,
    /// Appends `%` without rescaling: percentage-of-total already produces
    /// values on the 0..=100 scale.
    Percent,
    /// Prepends `$` unless an explicit prefix overrides it.
    Currency,
    Scientific,
    Integer,
}

/// Per-measure numeric formatting, shared by axis ticks, value labels,
/// reference-line labels and tooltips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericFormat {
    #[serde(default)]
    pub style: FormatStyle,
    #[serde(default)]
    pub decimals: u8,
    #[serde(default)]
    pub thousands_separator: bool,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    /// Folds magnitudes to `K`/`M`/`B`/`T` suffixes.
    #[serde(default)]
    pub compact: bool,
}

impl Default for NumericFormat {
    fn default() -> Self {
        Self {
            style: FormatStyle::default(),
            decimals: 0,
            thousands_separator: false,
            prefix: String::new(),
            suffix: String::new(),
            compact: false,
        }
    }
}

impl NumericFormat {
    /// Sets the rendering style.
    #[must_use]
    pub fn with_style(mut self, style: FormatStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets the number of fractional digits.
    #[must_use]
    pub const fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    /// Enables or disables thousands grouping.
    #[must_use]
    pub const fn with_thousands_separator(mut self, enabled: bool) -> Self {
        self.thousands_separator = enabled;
        self
    }

    /// Sets a literal prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets a literal suffix.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Enables or disables compact magnitude notation.
    #[must_use]
    pub const fn with_compact(mut self, enabled: bool) -> Self {
        self.compact = enabled;
        self
    }

    #[must_use]
    pub fn format_value(&self, value: f64) -> String {
        if !value.is_finite() {
            return "nan".to_owned();
        }

        if self.style == FormatStyle::Scientific {
            let precision = usize::from(self.decimals);
            return format!("{}{value:.precision$e}{}", self.prefix, self.suffix);
        }

        let precision = match self.style {
            FormatStyle::Integer => 0,
            _ => usize::from(self.decimals),
        };
        let (scaled, magnitude) = if self.compact {
            compact_scale(value)
        } else {
            (value, "")
        };
        let mut text = format!("{scaled:.precision$}");
        if self.thousands_separator {
            text = group_thousands(&text);
        }
        text.push_str(magnitude);
        if self.style == FormatStyle::Percent {
            text.push('%');
        }

        let prefix = if self.style == FormatStyle::Currency && self.prefix.is_empty() {
            "$"
        } else {
            self.prefix.as_str()
        };
        format!("{prefix}{text}{}", self.suffix)
    }
}

fn compact_scale(value: f64) -> (f64, &'static str) {
    let abs = value.abs();
    if abs >= 1e12 {
        (value / 1e12, "T")
    } else if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "K")
    } else {
        (value, "")
    }
}

fn group_thousands(text: &str) -> String {
    let (int_part, frac) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text, None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.char_indices() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{FormatStyle, NumericFormat};

    #[test]
    fn decimal_respects_precision() {
        let format = NumericFormat::default().with_decimals(2);
        assert_eq!(format.format_value(1234.567), "1234.57");
        assert_eq!(format.format_value(0.0), "0.00");
    }

    #[test]
    fn percent_appends_without_rescaling() {
        let format = NumericFormat::default()
            .with_style(FormatStyle::Percent)
            .with_decimals(1);
        assert_eq!(format.format_value(42.5), "42.5%");
        assert_eq!(format.format_value(100.0), "100.0%");
    }

    #[test]
    fn currency_defaults_to_dollar_prefix() {
        let format = NumericFormat::default()
            .with_style(FormatStyle::Currency)
            .with_decimals(2)
            .with_thousands_separator(true);
        assert_eq!(format.format_value(1234567.891), "$1,234,567.89");

        let euro = format.with_prefix("EUR ");
        assert_eq!(euro.format_value(10.0), "EUR 10.00");
    }

    #[test]
    fn integer_drops_fractional_digits() {
        let format = NumericFormat::default()
            .with_style(FormatStyle::Integer)
            .with_decimals(4);
        assert_eq!(format.format_value(12.6), "13");
    }

    #[test]
    fn scientific_uses_exponent_notation() {
        let format = NumericFormat::default()
            .with_style(FormatStyle::Scientific)
            .with_decimals(2);
        assert_eq!(format.format_value(12345.0), "1.23e4");
    }

    #[test]
    fn compact_folds_magnitudes() {
        let format = NumericFormat::default().with_compact(true).with_decimals(1);
        assert_eq!(format.format_value(950.0), "950.0");
        assert_eq!(format.format_value(1_500.0), "1.5K");
        assert_eq!(format.format_value(2_000_000.0), "2.0M");
        assert_eq!(format.format_value(3_100_000_000.0), "3.1B");
        assert_eq!(format.format_value(4_000_000_000_000.0), "4.0T");
        assert_eq!(format.format_value(-1_500.0), "-1.5K");
    }

    #[test]
    fn thousands_grouping_handles_negatives_and_fractions() {
        let format = NumericFormat::default()
            .with_decimals(2)
            .with_thousands_separator(true);
        assert_eq!(format.format_value(-1234567.5), "-1,234,567.50");
        assert_eq!(format.format_value(999.0), "999.00");
    }

    #[test]
    fn suffix_applies_after_percent_sign() {
        let format = NumericFormat::default()
            .with_style(FormatStyle::Percent)
            .with_suffix(" pts");
        assert_eq!(format.format_value(5.0), "5% pts");
    }

    #[test]
    fn non_finite_values_format_as_nan() {
        let format = NumericFormat::default();
        assert_eq!(format.format_value(f64::NAN), "nan");
        assert_eq!(format.format_value(f64::INFINITY), "nan");
    }
}
