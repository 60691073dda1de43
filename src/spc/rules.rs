//! Signal rules for detecting special-cause points.
//!
//! An XmR chart uses the first Shewhart test only: a point beyond its
//! control limits. Individuals can fall outside either limit; moving ranges
//! have no meaningful lower bound, so only upper exceedances are tested.
//!
//! # References
//!
//! - Nelson, L.S. (1984). "The Shewhart Control Chart — Tests for Special Causes",
//!   *Journal of Quality Technology* 16(4), pp. 237-239.
//! - Wheeler, D.J. (2012). *Making Sense of Data*, SPC Press.

use super::chart::{ChartPoint, ControlLimits, SignalType};

/// Trait for applying a signal rule to chart data.
pub trait SignalRule {
    /// Check points against this rule and return `(point_index, signal)`
    /// pairs in ascending index order. Invalid points are skipped.
    fn check(&self, points: &[ChartPoint], limits: &ControlLimits) -> Vec<(usize, SignalType)>;
}

/// Point strictly above the UCL or strictly below the LCL.
///
/// Used for the individuals chart.
pub struct BeyondLimits;

/// Point strictly above the UCL.
///
/// Used for the moving-range chart.
pub struct AboveUpperLimit;

impl SignalRule for BeyondLimits {
    fn check(&self, points: &[ChartPoint], limits: &ControlLimits) -> Vec<(usize, SignalType)> {
        points
            .iter()
            .filter(|p| p.valid)
            .filter_map(|p| {
                if p.value > limits.ucl {
                    Some((p.index, SignalType::High))
                } else if p.value < limits.lcl {
                    Some((p.index, SignalType::Low))
                } else {
                    None
                }
            })
            .collect()
    }
}

impl SignalRule for AboveUpperLimit {
    fn check(&self, points: &[ChartPoint], limits: &ControlLimits) -> Vec<(usize, SignalType)> {
        points
            .iter()
            .filter(|p| p.valid && p.value > limits.ucl)
            .map(|p| (p.index, SignalType::High))
            .collect()
    }
}

/// Write rule results back onto the points, matching by index.
pub(crate) fn apply_signals(points: &mut [ChartPoint], signals: &[(usize, SignalType)]) {
    for &(idx, signal) in signals {
        if let Some(point) = points.iter_mut().find(|p| p.index == idx) {
            point.signal = Some(signal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: create chart points from a slice of values.
    fn make_points(values: &[f64]) -> Vec<ChartPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| ChartPoint::new(i, v))
            .collect()
    }

    fn limits() -> ControlLimits {
        ControlLimits {
            ucl: 30.0,
            cl: 25.0,
            lcl: 20.0,
        }
    }

    #[test]
    fn test_beyond_limits_both_sides() {
        let points = make_points(&[25.0, 31.0, 19.0, 26.0]);
        let result = BeyondLimits.check(&points, &limits());
        assert_eq!(result, vec![(1, SignalType::High), (2, SignalType::Low)]);
    }

    #[test]
    fn test_on_the_limit_is_not_a_signal() {
        let points = make_points(&[30.0, 20.0]);
        assert!(BeyondLimits.check(&points, &limits()).is_empty());
    }

    #[test]
    fn test_invalid_points_skipped() {
        let mut points = make_points(&[25.0, 40.0]);
        points[1].valid = false;
        assert!(BeyondLimits.check(&points, &limits()).is_empty());
        assert!(AboveUpperLimit.check(&points, &limits()).is_empty());
    }

    #[test]
    fn test_above_upper_ignores_low_side() {
        let points = make_points(&[0.0, 35.0, 10.0]);
        let result = AboveUpperLimit.check(&points, &limits());
        assert_eq!(result, vec![(1, SignalType::High)]);
    }

    #[test]
    fn test_apply_signals_by_index() {
        let mut points: Vec<ChartPoint> = (1..=3).map(|i| ChartPoint::new(i, 0.0)).collect();
        apply_signals(&mut points, &[(2, SignalType::High)]);
        assert_eq!(points[0].signal, None);
        assert_eq!(points[1].signal, Some(SignalType::High));
        assert_eq!(points[2].signal, None);
    }
}
