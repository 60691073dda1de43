//! # xmr-chart
//!
//! XmR (Individuals and Moving Range) control charts for chart payloads of
//! unknown shape.
//!
//! A chat backend answers data questions with chart payloads that may be
//! fully computed, a bare list of numbers, a list of `{x, y}` points, or
//! something else entirely. This crate turns any of them into one uniform,
//! serializable [`ChartModel`]: per-point records with constant control
//! limits, plus a statistics block with the central line, moving-range
//! limits and the flagged signals.
//!
//! ## Modules
//!
//! - [`spc`] — Control limits, signal rules, and the Individual-MR chart
//! - [`payload`] — Payload classification and observation extraction
//! - [`engine`] — [`compute_xmr_chart`] and the configurable [`XmrEngine`]
//! - [`model`] — The chart model and its wire field names
//! - [`format`] — Magnitude formatting for labels (`$1.2M`, `$12k`)
//! - [`message`] — Chat message types and the render entry point
//! - [`config`] — Engine options and API location
//!
//! ## Design Philosophy
//!
//! - **Total**: the engine never fails; unusable payloads give an empty model
//! - **Pure**: a model is a projection of its input, recomputed on demand
//! - **Presentation-free**: formatting lives outside the computation
//!
//! ```
//! use serde_json::json;
//! use xmr_chart::compute_xmr_chart;
//!
//! let model = compute_xmr_chart(&json!([
//!     { "x": "2024-01-01", "y": 10 },
//!     { "x": "2024-01-02", "y": 12 },
//! ]));
//! assert_eq!(model.labels(), vec!["2024-01-01", "2024-01-02"]);
//! assert!((model.statistics.central_line - 11.0).abs() < 1e-12);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod format;
mod lenient;
pub mod logging;
pub mod message;
pub mod model;
pub mod payload;
pub mod spc;

pub use engine::{compute_xmr_chart, XmrEngine};
pub use error::{XmrError, XmrResult};
pub use model::{ChartModel, ChartRecord, Statistics};
