//! Statistical Process Control (SPC) for individual observations.
//!
//! # Charts
//!
//! - [`IndividualMRChart`] — Individuals and Moving Range (XmR) chart
//!
//! # Signal Rules
//!
//! - [`BeyondLimits`] — point outside the individuals limits (high or low)
//! - [`AboveUpperLimit`] — moving range above its upper limit
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts
//! - Wheeler, D.J. (2012). *Making Sense of Data*, SPC Press.

mod chart;
mod individuals;
mod rules;

pub use chart::{ChartPoint, ControlChart, ControlLimits, Signal, SignalType};
pub use individuals::{IndividualMRChart, LimitMethod};
pub use rules::{AboveUpperLimit, BeyondLimits, SignalRule};
