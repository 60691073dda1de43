//! Core control chart types and trait.
//!
//! Defines the building blocks shared by the individuals chart and its
//! moving-range companion: control limits, chart points with signal
//! annotations, and the [`ControlChart`] trait.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - Wheeler, D.J. (2012). *Making Sense of Data*, SPC Press.

use serde::{Deserialize, Serialize};

/// Control limits for a chart.
///
/// Represents the upper control limit (UCL), center line (CL), and lower
/// control limit (LCL). Limits are computed once from the whole data set and
/// held constant for every point on the chart.
///
/// # Invariants
///
/// - `lcl <= cl <= ucl`
/// - All values are finite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlLimits {
    /// Upper control limit.
    pub ucl: f64,
    /// Center line (process mean, or average moving range).
    pub cl: f64,
    /// Lower control limit.
    pub lcl: f64,
}

impl ControlLimits {
    /// Limits of a chart with no usable data: everything at zero.
    pub const ZERO: ControlLimits = ControlLimits {
        ucl: 0.0,
        cl: 0.0,
        lcl: 0.0,
    };

    /// Symmetric limits `center ± spread`.
    pub fn symmetric(center: f64, spread: f64) -> Self {
        Self {
            ucl: center + spread,
            cl: center,
            lcl: center - spread,
        }
    }

    /// Distance between the upper and lower limit.
    pub fn width(&self) -> f64 {
        self.ucl - self.lcl
    }
}

/// Direction of a signal relative to the control limits.
///
/// Serialized as `"high"` / `"low"`, matching the `type` field of the
/// chart statistics block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    /// Value above the upper control limit.
    High,
    /// Value below the lower control limit.
    Low,
}

/// A single point on a control chart.
///
/// Each point is either an individual observation or a moving range between
/// two consecutive observations.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// The plotted value. `0.0` for invalid points.
    pub value: f64,
    /// Position in the sequence. Individuals are zero-based; moving ranges
    /// are numbered by the later observation of their pair, starting at 1.
    pub index: usize,
    /// Whether the value came from finite data. Invalid points are plotted
    /// but never contribute to limits or signals.
    pub valid: bool,
    /// Signal detected at this point, if any.
    pub signal: Option<SignalType>,
}

impl ChartPoint {
    /// A valid point with no signal.
    pub fn new(index: usize, value: f64) -> Self {
        Self {
            value,
            index,
            valid: true,
            signal: None,
        }
    }

    /// A placeholder for data that could not be read as a number.
    pub fn invalid(index: usize) -> Self {
        Self {
            value: 0.0,
            index,
            valid: false,
            signal: None,
        }
    }
}

/// A signal detected on the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    /// The index of the point that triggered the signal.
    pub point_index: usize,
    /// The value at that point.
    pub value: f64,
    /// Which limit was crossed.
    pub signal_type: SignalType,
}

/// Trait for control charts built from a fixed sequence of data.
pub trait ControlChart {
    /// Get the computed control limits, or `None` if there is no usable data.
    fn control_limits(&self) -> Option<ControlLimits>;

    /// Get all chart points, in sequence order.
    fn points(&self) -> &[ChartPoint];

    /// Get all signals, in ascending index order.
    fn signals(&self) -> Vec<Signal> {
        self.points()
            .iter()
            .filter_map(|p| {
                p.signal.map(|signal_type| Signal {
                    point_index: p.index,
                    value: p.value,
                    signal_type,
                })
            })
            .collect()
    }

    /// Check if the process is in statistical control.
    fn is_in_control(&self) -> bool {
        self.points().iter().all(|p| p.signal.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<ChartPoint>);

    impl ControlChart for Fixed {
        fn control_limits(&self) -> Option<ControlLimits> {
            None
        }

        fn points(&self) -> &[ChartPoint] {
            &self.0
        }
    }

    #[test]
    fn test_symmetric_limits() {
        let limits = ControlLimits::symmetric(11.0, 3.0);
        assert!((limits.ucl - 14.0).abs() < f64::EPSILON);
        assert!((limits.cl - 11.0).abs() < f64::EPSILON);
        assert!((limits.lcl - 8.0).abs() < f64::EPSILON);
        assert!((limits.width() - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_limits() {
        assert_eq!(ControlLimits::ZERO, ControlLimits::symmetric(0.0, 0.0));
    }

    #[test]
    fn test_invalid_point_is_zero() {
        let point = ChartPoint::invalid(3);
        assert!(!point.valid);
        assert_eq!(point.index, 3);
        assert!(point.value.abs() < f64::EPSILON);
    }

    #[test]
    fn test_signals_collected_in_order() {
        let mut a = ChartPoint::new(0, 1.0);
        a.signal = Some(SignalType::Low);
        let b = ChartPoint::new(1, 5.0);
        let mut c = ChartPoint::new(2, 9.0);
        c.signal = Some(SignalType::High);
        let chart = Fixed(vec![a, b, c]);

        let signals = chart.signals();
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].point_index, 0);
        assert_eq!(signals[0].signal_type, SignalType::Low);
        assert_eq!(signals[1].point_index, 2);
        assert_eq!(signals[1].signal_type, SignalType::High);
        assert!(!chart.is_in_control());
    }

    #[test]
    fn test_signal_type_serde() {
        let json = serde_json::to_string(&SignalType::High).expect("serialize");
        assert_eq!(json, "\"high\"");
        let back: SignalType = serde_json::from_str("\"low\"").expect("deserialize");
        assert_eq!(back, SignalType::Low);
    }
}
