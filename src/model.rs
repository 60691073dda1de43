//! Renderable chart model.
//!
//! The output of the engine: one [`ChartRecord`] per observation plus a
//! chart-wide [`Statistics`] block. Field names on the wire follow the
//! statistics payload exchanged with the chart backend (`centralLine`,
//! `UCL_Individual`, `individualSignals`, ...), so a model serializes to the
//! same shape a pre-computed payload arrives in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;
use crate::spc::SignalType;

/// A single plotted observation.
///
/// `central_line`, `ucl` and `lcl` repeat the chart-wide limits so that a
/// renderer can draw reference lines straight from the point list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecord {
    /// Display label for the x-axis.
    pub label: String,
    /// Observed value (`0` when it could not be read).
    pub value: f64,
    #[serde(rename = "centralLine")]
    pub central_line: f64,
    #[serde(rename = "UCL")]
    pub ucl: f64,
    #[serde(rename = "LCL")]
    pub lcl: f64,
    #[serde(rename = "isSignal")]
    pub is_signal: bool,
}

/// An observation outside the individuals limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualSignal {
    /// Zero-based index into the point list.
    pub index: usize,
    pub value: f64,
    #[serde(rename = "type")]
    pub signal_type: SignalType,
}

/// A moving range above the moving-range UCL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSignal {
    /// Index of the later observation of the pair (1-based over pairs).
    pub index: usize,
    pub value: f64,
}

/// Chart-wide statistics.
///
/// Deserialization never fails on an object: numbers may arrive as floats or
/// strings, unreadable fields fall back to zero / empty, and keys this crate
/// does not know are kept in `extra` and written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    #[serde(rename = "centralLine", deserialize_with = "lenient::number")]
    pub central_line: f64,
    #[serde(rename = "averageMovingRange", deserialize_with = "lenient::number")]
    pub average_moving_range: f64,
    #[serde(rename = "UCL_Individual", deserialize_with = "lenient::number")]
    pub ucl_individual: f64,
    #[serde(rename = "LCL_Individual", deserialize_with = "lenient::number")]
    pub lcl_individual: f64,
    #[serde(rename = "UCL_MovingRange", deserialize_with = "lenient::number")]
    pub ucl_moving_range: f64,
    #[serde(rename = "LCL_MovingRange", deserialize_with = "lenient::number")]
    pub lcl_moving_range: f64,
    #[serde(rename = "individualSignals", deserialize_with = "lenient::individual_signals")]
    pub individual_signals: Vec<IndividualSignal>,
    #[serde(rename = "rangeSignals", deserialize_with = "lenient::range_signals")]
    pub range_signals: Vec<RangeSignal>,
    #[serde(rename = "dataPoints", deserialize_with = "lenient::count")]
    pub data_points: usize,
    #[serde(rename = "validRanges", deserialize_with = "lenient::count")]
    pub valid_ranges: usize,
    #[serde(rename = "invalidRanges", deserialize_with = "lenient::count")]
    pub invalid_ranges: usize,
    /// Fields sent by the backend that have no typed counterpart.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Statistics {
    /// Distance between the individuals control limits.
    pub fn process_width(&self) -> f64 {
        self.ucl_individual - self.lcl_individual
    }

    /// True when neither chart carries a signal.
    pub fn is_in_control(&self) -> bool {
        self.individual_signals.is_empty() && self.range_signals.is_empty()
    }
}

/// One moving range, for a moving-range chart panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingRangeRecord {
    /// Index of the later observation of the pair.
    pub index: usize,
    /// `|x[index] - x[index - 1]|`, or `0` when invalid.
    pub value: f64,
    /// Both endpoints were readable numbers.
    pub valid: bool,
    #[serde(rename = "isSignal")]
    pub is_signal: bool,
}

/// The normalized chart: what a renderer draws.
///
/// A pure projection of the payload it was computed from; build a new one
/// rather than editing it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartModel {
    #[serde(rename = "chartData")]
    pub points: Vec<ChartRecord>,
    pub statistics: Statistics,
    /// Recomputed moving ranges. Empty for pre-computed payloads.
    #[serde(rename = "movingRanges", default, skip_serializing_if = "Vec::is_empty")]
    pub moving_ranges: Vec<MovingRangeRecord>,
}

impl ChartModel {
    /// The model for a payload with no usable data.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when there is nothing to plot.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Labels of all points, in order.
    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    /// Values of all points, in order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Label of the point an individual signal refers to, or `"Unknown"`.
    pub fn signal_label(&self, signal: &IndividualSignal) -> &str {
        self.points
            .get(signal.index)
            .map(|p| p.label.as_str())
            .filter(|label| !label.is_empty())
            .unwrap_or("Unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_statistics_wire_names() {
        let stats = Statistics {
            central_line: 11.0,
            ucl_individual: 14.0,
            lcl_individual: 8.0,
            data_points: 2,
            valid_ranges: 1,
            individual_signals: vec![IndividualSignal {
                index: 1,
                value: 15.0,
                signal_type: SignalType::High,
            }],
            ..Statistics::default()
        };
        let value = serde_json::to_value(&stats).expect("serialize");
        assert_eq!(value["centralLine"], json!(11.0));
        assert_eq!(value["UCL_Individual"], json!(14.0));
        assert_eq!(value["LCL_Individual"], json!(8.0));
        assert_eq!(value["dataPoints"], json!(2));
        assert_eq!(value["individualSignals"][0]["type"], json!("high"));
        assert_eq!(value["rangeSignals"], json!([]));
    }

    #[test]
    fn test_partial_statistics_default_to_zero() {
        let input = json!({ "centralLine": 5.0, "dataPoints": 3 });
        let stats: Statistics = serde_json::from_value(input).expect("lenient");
        assert!((stats.central_line - 5.0).abs() < f64::EPSILON);
        assert_eq!(stats.data_points, 3);
        assert!(stats.ucl_individual.abs() < f64::EPSILON);
        assert!(stats.individual_signals.is_empty());
    }

    #[test]
    fn test_integral_float_counts() {
        let stats: Statistics = serde_json::from_value(json!({
            "dataPoints": 2.0,
            "validRanges": "1",
            "centralLine": "4.5",
            "individualSignals": [
                { "index": 1.0, "value": 70.0, "type": "high" },
                { "index": 0.5, "value": 1.0, "type": "high" },
                { "index": 0, "value": 1.0, "type": "sideways" }
            ],
            "rangeSignals": [{ "index": 1.0, "value": 20 }, { "value": 3.0 }]
        }))
        .expect("lenient");
        assert_eq!(stats.data_points, 2);
        assert_eq!(stats.valid_ranges, 1);
        assert!((stats.central_line - 4.5).abs() < f64::EPSILON);
        assert_eq!(stats.individual_signals.len(), 1);
        assert_eq!(stats.individual_signals[0].index, 1);
        assert_eq!(stats.range_signals.len(), 1);
        assert_eq!(stats.range_signals[0].index, 1);
    }

    #[test]
    fn test_wrong_types_default_per_field() {
        let stats: Statistics = serde_json::from_value(json!({
            "centralLine": [1],
            "dataPoints": "many",
            "individualSignals": "none",
            "UCL_Individual": 9.0
        }))
        .expect("lenient");
        assert!(stats.central_line.abs() < f64::EPSILON);
        assert_eq!(stats.data_points, 0);
        assert!(stats.individual_signals.is_empty());
        assert!((stats.ucl_individual - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_keys_round_trip() {
        let input = json!({ "dataPoints": 1, "processStable": true });
        let stats: Statistics = serde_json::from_value(input).expect("lenient");
        assert_eq!(stats.extra.get("processStable"), Some(&json!(true)));
        let value = serde_json::to_value(&stats).expect("serialize");
        assert_eq!(value["processStable"], json!(true));
        assert_eq!(value["dataPoints"], json!(1));
    }

    #[test]
    fn test_process_width() {
        let stats = Statistics {
            ucl_individual: 14.0,
            lcl_individual: 8.0,
            ..Statistics::default()
        };
        assert!((stats.process_width() - 6.0).abs() < f64::EPSILON);
        assert!(stats.is_in_control());
    }

    #[test]
    fn test_signal_label_falls_back_to_unknown() {
        let model = ChartModel {
            points: vec![ChartRecord {
                label: "Jan".to_string(),
                value: 1.0,
                central_line: 0.0,
                ucl: 0.0,
                lcl: 0.0,
                is_signal: true,
            }],
            ..ChartModel::default()
        };
        let hit = IndividualSignal {
            index: 0,
            value: 1.0,
            signal_type: SignalType::High,
        };
        let miss = IndividualSignal { index: 7, ..hit.clone() };
        assert_eq!(model.signal_label(&hit), "Jan");
        assert_eq!(model.signal_label(&miss), "Unknown");
    }

    #[test]
    fn test_empty_model_omits_moving_ranges() {
        let value = serde_json::to_value(ChartModel::empty()).expect("serialize");
        assert!(value.get("movingRanges").is_none());
        assert_eq!(value["chartData"], json!([]));
        assert_eq!(value["statistics"]["dataPoints"], json!(0));
    }
}
