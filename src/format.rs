//! Magnitude formatting for chart labels.
//!
//! Purely presentational: formatting never feeds back into the model.
//!
//! | Value            | Output (prefix `$`) |
//! |------------------|---------------------|
//! | `>= 1_000_000`   | `$1.2M`             |
//! | `>= 1_000`       | `$12k`              |
//! | otherwise        | `$12`               |

/// Formats values as currency-like magnitudes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueFormatter {
    prefix: String,
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self::new("$")
    }
}

impl ValueFormatter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// A formatter with no prefix.
    pub fn plain() -> Self {
        Self::new("")
    }

    /// Format one value.
    ///
    /// Rounds half away from zero, so `2.5` becomes `3`.
    pub fn format(&self, value: f64) -> String {
        if value >= 1_000_000.0 {
            let tenths = round(value / 100_000.0) / 10.0;
            format!("{}{:.1}M", self.prefix, tenths)
        } else if value >= 1_000.0 {
            format!("{}{:.0}k", self.prefix, round(value / 1_000.0))
        } else {
            format!("{}{:.0}", self.prefix, round(value))
        }
    }
}

/// Format with the default `$` prefix.
pub fn format_value(value: f64) -> String {
    ValueFormatter::default().format(value)
}

// `+ 0.0` folds a negative zero so that -0.4 prints as "0".
fn round(value: f64) -> f64 {
    value.round() + 0.0
}
