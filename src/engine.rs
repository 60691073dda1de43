//! XmR chart engine.
//!
//! Turns any chart payload into a [`ChartModel`]. The engine is total: every
//! JSON value, including `null` and malformed objects, produces a model, so
//! a renderer can always draw something (possibly "no data").
//!
//! # Algorithm
//!
//! 1. [`classify`] the payload once.
//! 2. Pre-computed payloads are renamed into records; their statistics are
//!    trusted and copied verbatim.
//! 3. Raw observations go through [`IndividualMRChart`]: mean, spread and
//!    average moving range over the valid data, constant limits for every
//!    point, then the limit rules when signal detection is enabled.
//! 4. Anything else yields [`ChartModel::empty`].

use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::model::{
    ChartModel, ChartRecord, IndividualSignal, MovingRangeRecord, RangeSignal, Statistics,
};
use crate::payload::{classify, ChartInput, Observation, PrecomputedChart};
use crate::spc::{ControlChart, ControlLimits, IndividualMRChart};

/// Compute a chart model with the default configuration.
///
/// ```
/// use serde_json::json;
/// use xmr_chart::compute_xmr_chart;
///
/// let model = compute_xmr_chart(&json!([10, 12]));
/// assert_eq!(model.statistics.data_points, 2);
/// assert!((model.statistics.ucl_individual - 14.0).abs() < 1e-12);
/// ```
pub fn compute_xmr_chart(input: &Value) -> ChartModel {
    XmrEngine::default().compute(input)
}

/// A configured chart engine. Cheap to copy and safe to share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XmrEngine {
    config: EngineConfig,
}

impl XmrEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute the chart model for a payload.
    pub fn compute(&self, input: &Value) -> ChartModel {
        match classify(input) {
            ChartInput::Precomputed(chart) => {
                tracing::debug!(points = chart.points.len(), "pre-computed chart payload");
                project_precomputed(chart)
            }
            ChartInput::Raw(observations) => {
                tracing::debug!(
                    points = observations.len(),
                    method = ?self.config.limit_method,
                    "raw chart payload"
                );
                self.compute_raw(&observations)
            }
            ChartInput::Empty => ChartModel::empty(),
        }
    }

    /// Compute limits and signals for a sequence of observations.
    pub fn compute_raw(&self, observations: &[Observation]) -> ChartModel {
        let values: Vec<Option<f64>> = observations.iter().map(|o| o.value).collect();

        let unreadable = values.iter().filter(|v| v.is_none()).count();
        if unreadable > 0 {
            tracing::warn!(
                unreadable,
                total = values.len(),
                "observations without a numeric value"
            );
        }

        let mut chart = IndividualMRChart::from_observations(&values, self.config.limit_method);
        if self.config.detect_signals {
            chart.detect_signals();
        }

        let limits = chart.control_limits().unwrap_or(ControlLimits::ZERO);
        let mr_limits = chart.mr_limits().unwrap_or(ControlLimits::ZERO);

        let points = observations
            .iter()
            .zip(chart.points())
            .map(|(obs, point)| ChartRecord {
                label: obs.label.clone(),
                value: obs.plotted_value(),
                central_line: limits.cl,
                ucl: limits.ucl,
                lcl: limits.lcl,
                is_signal: point.signal.is_some(),
            })
            .collect();

        let moving_ranges = chart
            .mr_points()
            .iter()
            .map(|p| MovingRangeRecord {
                index: p.index,
                value: p.value,
                valid: p.valid,
                is_signal: p.signal.is_some(),
            })
            .collect();

        let individual_signals = chart
            .signals()
            .into_iter()
            .map(|s| IndividualSignal {
                index: s.point_index,
                value: s.value,
                signal_type: s.signal_type,
            })
            .collect();

        let range_signals = chart
            .mr_points()
            .iter()
            .filter(|p| p.signal.is_some())
            .map(|p| RangeSignal {
                index: p.index,
                value: p.value,
            })
            .collect();

        let statistics = Statistics {
            central_line: limits.cl,
            average_moving_range: mr_limits.cl,
            ucl_individual: limits.ucl,
            lcl_individual: limits.lcl,
            ucl_moving_range: mr_limits.ucl,
            lcl_moving_range: mr_limits.lcl,
            individual_signals,
            range_signals,
            data_points: observations.len(),
            valid_ranges: chart.valid_ranges(),
            invalid_ranges: chart.invalid_ranges(),
            extra: Map::new(),
        };

        ChartModel {
            points,
            statistics,
            moving_ranges,
        }
    }
}

fn project_precomputed(chart: PrecomputedChart) -> ChartModel {
    ChartModel {
        points: chart.points.iter().map(|p| p.to_record()).collect(),
        statistics: chart.statistics,
        moving_ranges: Vec::new(),
    }
}
