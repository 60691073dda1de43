//! Classification of untyped chart payloads.
//!
//! The backend delivers chart data in one of several shapes. [`classify`]
//! resolves a payload once, up front, into a [`ChartInput`]:
//!
//! - [`ChartInput::Precomputed`] — `{ "chartData": [...], "statistics": {...} }`
//!   with limits and signals already computed upstream
//! - [`ChartInput::Raw`] — an ordered array of numbers or point objects
//! - [`ChartInput::Empty`] — anything else

mod extract;

pub use extract::Observation;

use serde::Deserialize;
use serde_json::Value;

use crate::lenient;
use crate::model::{ChartRecord, Statistics};

/// A classified chart payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartInput {
    /// Points and statistics computed upstream; passed through as-is.
    Precomputed(PrecomputedChart),
    /// Observations to compute limits and signals for.
    Raw(Vec<Observation>),
    /// No usable data.
    Empty,
}

/// A pre-computed chart as sent by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecomputedChart {
    /// The `chartData` entries, in order. Entries that are not objects are
    /// kept as all-default points.
    pub points: Vec<PrecomputedPoint>,
    /// The `statistics` block, read field by field.
    pub statistics: Statistics,
}

/// One point of a pre-computed chart, in the backend's field names.
///
/// Every field is optional, and a field of the wrong type reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PrecomputedPoint {
    /// x-axis label. Strings are used verbatim, other values as JSON text.
    pub label: Option<Value>,
    /// The observed value.
    #[serde(deserialize_with = "lenient::opt_number")]
    pub individual: Option<f64>,
    /// Center line at this point.
    #[serde(rename = "centralLine", deserialize_with = "lenient::opt_number")]
    pub central_line: Option<f64>,
    /// Upper control limit at this point.
    #[serde(rename = "UCL", deserialize_with = "lenient::opt_number")]
    pub ucl: Option<f64>,
    /// Lower control limit at this point.
    #[serde(rename = "LCL", deserialize_with = "lenient::opt_number")]
    pub lcl: Option<f64>,
    /// Whether the backend flagged this point.
    #[serde(rename = "isIndividualSignal", deserialize_with = "lenient::opt_bool")]
    pub is_individual_signal: Option<bool>,
}

impl PrecomputedPoint {
    /// Rename into a chart record. Nothing is recomputed.
    pub fn to_record(&self) -> ChartRecord {
        let label = match &self.label {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        ChartRecord {
            label,
            value: self.individual.unwrap_or(0.0),
            central_line: self.central_line.unwrap_or(0.0),
            ucl: self.ucl.unwrap_or(0.0),
            lcl: self.lcl.unwrap_or(0.0),
            is_signal: self.is_individual_signal.unwrap_or(false),
        }
    }
}

impl PrecomputedChart {
    /// Read the two halves of a pre-computed payload. Never fails: whatever
    /// cannot be read falls back to its default.
    pub fn parse(points: &[Value], statistics: &Value) -> Self {
        let points = points
            .iter()
            .map(|point| {
                PrecomputedPoint::deserialize(point).unwrap_or_else(|error| {
                    tracing::warn!(error = %error, "unreadable pre-computed point");
                    PrecomputedPoint::default()
                })
            })
            .collect();
        let statistics = Statistics::deserialize(statistics).unwrap_or_else(|error| {
            tracing::warn!(error = %error, "unreadable statistics block");
            Statistics::default()
        });
        Self { points, statistics }
    }
}

/// Resolve a payload into one of the three recognised shapes.
///
/// Total over all JSON values: shapes that are not recognised classify as
/// [`ChartInput::Empty`]. A recognised pre-computed payload keeps its points
/// even when parts of it are malformed.
pub fn classify(input: &Value) -> ChartInput {
    match input {
        Value::Object(map) => match (map.get("chartData"), map.get("statistics")) {
            (Some(Value::Array(points)), Some(stats)) if !stats.is_null() => {
                ChartInput::Precomputed(PrecomputedChart::parse(points, stats))
            }
            _ => {
                tracing::warn!(keys = map.len(), "unrecognized chart payload object");
                ChartInput::Empty
            }
        },
        Value::Array(items) => ChartInput::Raw(
            items
                .iter()
                .enumerate()
                .map(|(i, point)| Observation::extract(i, point))
                .collect(),
        ),
        Value::Null => ChartInput::Empty,
        other => {
            tracing::warn!(payload = %type_name(other), "unrecognized chart payload");
            ChartInput::Empty
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
