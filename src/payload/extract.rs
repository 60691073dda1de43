//! Observation extraction from untyped points.
//!
//! Raw chart payloads mix bare numbers with point objects such as
//! `{ "x": "2024-01-01", "y": 10 }` or `{ "label": "Q1", "value": 10 }`.
//! Values and labels are read by ordered lists of extractors; the first one
//! that matches wins, and a fixed fallback applies when none does.

use serde_json::Value;

use crate::lenient;

/// A single observation read from a raw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Display label. Defaults to the 1-based position.
    pub label: String,
    /// The measured value, or `None` when a value field was present but
    /// could not be read as a finite number.
    pub value: Option<f64>,
}

impl Observation {
    /// Read the observation at zero-based position `index`.
    pub fn extract(index: usize, point: &Value) -> Self {
        let value = VALUE_EXTRACTORS
            .iter()
            .find_map(|extract| extract(point))
            .unwrap_or(Extracted::Number(0.0));
        let label = LABEL_EXTRACTORS
            .iter()
            .find_map(|extract| extract(point))
            .unwrap_or_else(|| (index + 1).to_string());

        Self {
            label,
            value: match value {
                Extracted::Number(v) => Some(v),
                Extracted::Unreadable => None,
            },
        }
    }

    /// The value to plot: the observation, or `0` when unreadable.
    pub fn plotted_value(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }
}

/// Outcome of a value extractor that recognised its field.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Extracted {
    Number(f64),
    Unreadable,
}

type ValueExtractor = fn(&Value) -> Option<Extracted>;
type LabelExtractor = fn(&Value) -> Option<String>;

const VALUE_EXTRACTORS: &[ValueExtractor] = &[bare_number, y_field, value_field];
const LABEL_EXTRACTORS: &[LabelExtractor] = &[x_field, label_field];

/// A bare number, or a bare string that reads as one. Any other bare string
/// is not a value and falls through to the default.
fn bare_number(point: &Value) -> Option<Extracted> {
    lenient::as_f64(point).map(Extracted::Number)
}

fn y_field(point: &Value) -> Option<Extracted> {
    numeric_field(point, "y")
}

fn value_field(point: &Value) -> Option<Extracted> {
    numeric_field(point, "value")
}

fn x_field(point: &Value) -> Option<String> {
    text_field(point, "x")
}

fn label_field(point: &Value) -> Option<String> {
    text_field(point, "label")
}

/// Read `key` as a number. `null` counts as absent; numeric strings are
/// accepted since SQL decimals often arrive quoted.
fn numeric_field(point: &Value, key: &str) -> Option<Extracted> {
    match point.get(key)? {
        Value::Null => None,
        value => Some(lenient::as_f64(value).map_or(Extracted::Unreadable, Extracted::Number)),
    }
}

fn text_field(point: &Value, key: &str) -> Option<String> {
    match point.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_number() {
        let obs = Observation::extract(0, &json!(42.5));
        assert_eq!(obs.value, Some(42.5));
        assert_eq!(obs.label, "1");
    }

    #[test]
    fn test_xy_point() {
        let obs = Observation::extract(3, &json!({ "x": "2024-01-01", "y": 10 }));
        assert_eq!(obs.value, Some(10.0));
        assert_eq!(obs.label, "2024-01-01");
    }

    #[test]
    fn test_label_value_point() {
        let obs = Observation::extract(0, &json!({ "label": "Q1", "value": 7 }));
        assert_eq!(obs.value, Some(7.0));
        assert_eq!(obs.label, "Q1");
    }

    #[test]
    fn test_y_takes_priority_over_value() {
        let obs = Observation::extract(0, &json!({ "y": 1, "value": 2, "x": "a", "label": "b" }));
        assert_eq!(obs.value, Some(1.0));
        assert_eq!(obs.label, "a");
    }

    #[test]
    fn test_null_falls_through() {
        let point = json!({ "x": null, "label": "L", "y": null, "value": 3 });
        let obs = Observation::extract(1, &point);
        assert_eq!(obs.value, Some(3.0));
        assert_eq!(obs.label, "L");
    }

    #[test]
    fn test_unrecognized_defaults_to_zero() {
        for point in [json!({ "foo": 1 }), json!("abc"), json!(null), json!(true), json!([])] {
            let obs = Observation::extract(4, &point);
            assert_eq!(obs.value, Some(0.0), "point {point}");
            assert_eq!(obs.label, "5");
        }
    }

    #[test]
    fn test_bare_numeric_string() {
        assert_eq!(Observation::extract(0, &json!("12")).value, Some(12.0));
        assert_eq!(Observation::extract(0, &json!(" -3.5 ")).value, Some(-3.5));
        assert_eq!(Observation::extract(0, &json!("inf")).value, Some(0.0));
        assert_eq!(Observation::extract(0, &json!("abc")).value, Some(0.0));
    }

    #[test]
    fn test_numeric_string_field() {
        let obs = Observation::extract(0, &json!({ "y": " 12.5 " }));
        assert_eq!(obs.value, Some(12.5));
    }

    #[test]
    fn test_unreadable_field() {
        let points = [
            json!({ "y": "n/a" }),
            json!({ "y": true }),
            json!({ "value": {} }),
            json!({ "y": "NaN" }),
        ];
        for point in points {
            let obs = Observation::extract(0, &point);
            assert_eq!(obs.value, None, "point {point}");
            assert!(obs.plotted_value().abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_numeric_label_uses_json_text() {
        let obs = Observation::extract(0, &json!({ "x": 2024, "y": 1 }));
        assert_eq!(obs.label, "2024");
    }
}
