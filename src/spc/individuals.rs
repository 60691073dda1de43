//! Individuals and Moving Range (XmR) chart.
//!
//! The XmR chart monitors a sequence of single observations. The individuals
//! chart plots each observation against limits around the process mean; the
//! moving-range chart plots `|x[i] - x[i-1]|` against an upper limit derived
//! from the average moving range.
//!
//! # Control Chart Factors
//!
//! - E2 = 3 / d2(n=2) = 3 / 1.128 ≈ 2.660
//! - D4(n=2) = 3.267
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts
//! - Wheeler, D.J. (2012). *Making Sense of Data*, SPC Press.

use serde::{Deserialize, Serialize};
use u_numflow::stats;

use super::chart::{ChartPoint, ControlChart, ControlLimits};
use super::rules::{apply_signals, AboveUpperLimit, BeyondLimits, SignalRule};

/// E2 factor for Individual chart UCL/LCL.
///
/// UCL = X-bar + E2 * MR-bar, LCL = X-bar - E2 * MR-bar.
const E2: f64 = 2.660;

/// D4 factor for MR chart (n=2 moving range).
const D4_MR: f64 = 3.267;

/// Width of the individuals limits in standard deviations for [`LimitMethod::Sigma`].
const SIGMA_MULTIPLIER: f64 = 3.0;

/// How the individuals chart limits are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitMethod {
    /// `mean ± 3σ` using the population standard deviation of the series.
    #[default]
    Sigma,
    /// Classical XmR: `mean ± 2.66 · average moving range`.
    MovingRange,
}

/// Individuals and Moving Range (XmR) control chart.
///
/// Built in one pass from a sequence of observations. `None` entries mark
/// observations that could not be read as numbers: they are kept as invalid
/// points so indices stay aligned with the input, are excluded from the
/// mean and spread, and invalidate both moving ranges they touch.
///
/// # Examples
///
/// ```
/// use xmr_chart::spc::{ControlChart, IndividualMRChart, LimitMethod};
///
/// let data = [Some(10.0), Some(12.0)];
/// let chart = IndividualMRChart::from_observations(&data, LimitMethod::Sigma);
///
/// let limits = chart.control_limits().expect("two valid points");
/// assert!((limits.cl - 11.0).abs() < 1e-12);
/// assert!((limits.ucl - 14.0).abs() < 1e-12);
/// assert!((limits.lcl - 8.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct IndividualMRChart {
    /// Limit derivation used for the individuals chart.
    method: LimitMethod,
    /// Individuals chart points, one per observation.
    i_points: Vec<ChartPoint>,
    /// Moving range chart points, one per consecutive pair.
    mr_points: Vec<ChartPoint>,
    /// Individuals chart limits.
    i_limits: Option<ControlLimits>,
    /// Moving range chart limits.
    mr_limits: Option<ControlLimits>,
    /// Population standard deviation of the valid observations.
    std_dev: f64,
}

impl IndividualMRChart {
    /// Build the chart from an ordered sequence of observations.
    ///
    /// Signals are not evaluated; call [`detect_signals`](Self::detect_signals).
    pub fn from_observations(observations: &[Option<f64>], method: LimitMethod) -> Self {
        let i_points: Vec<ChartPoint> = observations
            .iter()
            .enumerate()
            .map(|(i, obs)| match obs {
                Some(v) if v.is_finite() => ChartPoint::new(i, *v),
                _ => ChartPoint::invalid(i),
            })
            .collect();

        // MR_0 is undefined, so moving ranges are numbered from 1.
        let mr_points: Vec<ChartPoint> = i_points
            .windows(2)
            .map(|w| {
                let index = w[1].index;
                let range = (w[1].value - w[0].value).abs();
                if w[0].valid && w[1].valid && range.is_finite() {
                    ChartPoint::new(index, range)
                } else {
                    ChartPoint::invalid(index)
                }
            })
            .collect();

        let values: Vec<f64> = i_points.iter().filter(|p| p.valid).map(|p| p.value).collect();
        let ranges: Vec<f64> = mr_points.iter().filter(|p| p.valid).map(|p| p.value).collect();

        let x_bar = stats::mean(&values).filter(|m| m.is_finite());
        let mr_bar = stats::mean(&ranges)
            .filter(|m| m.is_finite())
            .unwrap_or(0.0);
        let std_dev = population_std_dev(&values);

        let i_limits = x_bar.map(|cl| {
            let limits = match method {
                LimitMethod::Sigma => ControlLimits::symmetric(cl, SIGMA_MULTIPLIER * std_dev),
                LimitMethod::MovingRange => ControlLimits::symmetric(cl, E2 * mr_bar),
            };
            if limits.ucl.is_finite() && limits.lcl.is_finite() {
                limits
            } else {
                ControlLimits::symmetric(cl, 0.0)
            }
        });

        // LCL is always 0 for n=2
        let mr_limits = if ranges.is_empty() || !(D4_MR * mr_bar).is_finite() {
            None
        } else {
            Some(ControlLimits {
                ucl: D4_MR * mr_bar,
                cl: mr_bar,
                lcl: 0.0,
            })
        };

        Self {
            method,
            i_points,
            mr_points,
            i_limits,
            mr_limits,
            std_dev,
        }
    }

    /// Evaluate the limit rules on both charts and annotate the points.
    pub fn detect_signals(&mut self) {
        if let Some(ref limits) = self.i_limits {
            let signals = BeyondLimits.check(&self.i_points, limits);
            apply_signals(&mut self.i_points, &signals);
        }
        if let Some(ref limits) = self.mr_limits {
            let signals = AboveUpperLimit.check(&self.mr_points, limits);
            apply_signals(&mut self.mr_points, &signals);
        }
    }

    /// The limit derivation this chart was built with.
    pub fn method(&self) -> LimitMethod {
        self.method
    }

    /// Get the MR chart control limits, or `None` if there are no valid ranges.
    pub fn mr_limits(&self) -> Option<ControlLimits> {
        self.mr_limits
    }

    /// Get the MR chart points.
    pub fn mr_points(&self) -> &[ChartPoint] {
        &self.mr_points
    }

    /// Population standard deviation of the valid observations.
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Number of moving ranges whose endpoints are both valid.
    pub fn valid_ranges(&self) -> usize {
        self.mr_points.iter().filter(|p| p.valid).count()
    }

    /// Number of moving ranges touching an invalid observation.
    pub fn invalid_ranges(&self) -> usize {
        self.mr_points.len() - self.valid_ranges()
    }
}

impl ControlChart for IndividualMRChart {
    fn control_limits(&self) -> Option<ControlLimits> {
        self.i_limits
    }

    fn points(&self) -> &[ChartPoint] {
        &self.i_points
    }

    fn is_in_control(&self) -> bool {
        self.i_points.iter().all(|p| p.signal.is_none())
            && self.mr_points.iter().all(|p| p.signal.is_none())
    }
}

/// Population (divide-by-n) standard deviation; `0` below two values.
fn population_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    stats::variance(values)
        .map(|v| (v * (n - 1) as f64 / n as f64).sqrt())
        .filter(|s| s.is_finite())
        .unwrap_or(0.0)
}
