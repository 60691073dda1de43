//! Chat message boundary.
//!
//! Messages arrive from the chat backend as JSON. An assistant message may
//! carry the SQL it ran, the result rows, and chart data. Only chart data of
//! type `"xmr"` goes through the engine; table data and pre-rendered images
//! are passed along for display.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::ApiConfig;
use crate::engine::XmrEngine;
use crate::error::XmrResult;
use crate::lenient;
use crate::model::ChartModel;

/// One result row: column name to value.
pub type Row = Map<String, Value>;

/// Title the backend uses for images it failed to render.
const FAILED_IMAGE_TITLE: &str = "Chart generation failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_results: Option<Vec<Row>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_results: Option<Vec<Row>>,
    /// Chart payload. An unreadable one is dropped; the rest of the message
    /// is kept.
    #[serde(
        default,
        deserialize_with = "lenient::or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub chart_data: Option<ChartData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Chart payload attached to a message, tagged by `type`.
///
/// Types this crate does not render read as [`ChartData::Unknown`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartData {
    Xmr {
        #[serde(default)]
        data: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        insights: Option<Insights>,
        #[serde(
            default,
            deserialize_with = "lenient::or_none",
            skip_serializing_if = "Option::is_none"
        )]
        images: Option<ChartImages>,
    },
    Table {
        #[serde(default)]
        data: Value,
        #[serde(
            default,
            deserialize_with = "lenient::or_none",
            skip_serializing_if = "Option::is_none"
        )]
        images: Option<ChartImages>,
    },
    #[serde(other)]
    Unknown,
}

impl ChartData {
    pub fn images(&self) -> Option<&ChartImages> {
        match self {
            ChartData::Xmr { images, .. } | ChartData::Table { images, .. } => images.as_ref(),
            ChartData::Unknown => None,
        }
    }
}

/// Human-readable findings sent alongside an XmR chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Insights {
    Lines(Vec<String>),
    Summary(InsightSummary),
    /// Any other shape, shown as text.
    Other(Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsightSummary {
    pub process_stable: bool,
    #[serde(deserialize_with = "lenient::counts")]
    pub out_of_control_points: Vec<usize>,
    pub average_value: f64,
    pub average_range: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_capability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
}

impl Insights {
    /// Display lines, in order.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Insights::Lines(lines) => lines.clone(),
            Insights::Summary(summary) => summary.lines(),
            Insights::Other(Value::Array(items)) => items.iter().map(display_text).collect(),
            Insights::Other(other) => vec![display_text(other)],
        }
    }
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl InsightSummary {
    fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.process_stable {
            lines.push("Process is stable".to_string());
        } else {
            lines.push("Process shows special-cause variation".to_string());
        }
        if !self.out_of_control_points.is_empty() {
            let points: Vec<String> = self
                .out_of_control_points
                .iter()
                .map(|p| p.to_string())
                .collect();
            lines.push(format!("Out-of-control points: {}", points.join(", ")));
        }
        lines.push(format!("Average value: {:.2}", self.average_value));
        lines.push(format!("Average moving range: {:.2}", self.average_range));
        if let Some(capability) = &self.process_capability {
            lines.push(format!("Process capability: {capability}"));
        }
        if let Some(recommendations) = &self.recommendations {
            lines.extend(recommendations.iter().cloned());
        }
        lines
    }
}

/// Pre-rendered chart pictures supplied by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartImages {
    #[serde(deserialize_with = "lenient::or_none", skip_serializing_if = "Option::is_none")]
    pub main_chart: Option<ChartImage>,
    #[serde(deserialize_with = "lenient::or_none", skip_serializing_if = "Option::is_none")]
    pub summary_chart: Option<ChartImage>,
}

impl ChartImages {
    pub fn iter(&self) -> impl Iterator<Item = &ChartImage> {
        self.main_chart.iter().chain(self.summary_chart.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartImage {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base64_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What a renderer can do with a [`ChartImage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStatus {
    /// The backend reported a rendering error.
    Failed(String),
    /// Displayable: `src` for the image, `link` for opening or downloading it.
    Ready { src: String, link: Option<String> },
    /// Titled but without data yet.
    Pending,
    Unavailable,
}

impl ChartImage {
    pub fn status(&self, api: &ApiConfig) -> ImageStatus {
        if let Some(error) = non_empty(&self.error) {
            return ImageStatus::Failed(error.to_string());
        }
        let served = non_empty(&self.filename).map(|f| api.chart_image_url(f));
        let link = non_empty(&self.url).map(str::to_string).or_else(|| served.clone());

        if let Some(data) = non_empty(&self.base64_data) {
            return ImageStatus::Ready {
                src: format!("data:image/png;base64,{data}"),
                link,
            };
        }
        if let Some(src) = served {
            return ImageStatus::Ready { src, link };
        }
        if !self.title.is_empty() && self.title != FAILED_IMAGE_TITLE {
            ImageStatus::Pending
        } else {
            ImageStatus::Unavailable
        }
    }

    /// File name offered for download: the title with every character
    /// outside `[A-Za-z0-9]` replaced by `_`.
    pub fn download_name(&self) -> String {
        let stem: String = self
            .title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{stem}.png")
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// A chart ready for display.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedChart {
    Xmr {
        model: ChartModel,
        insights: Vec<String>,
    },
    Table {
        rows: Vec<Row>,
    },
}

impl Message {
    pub fn from_json(text: &str) -> XmrResult<Self> {
        let message: Message = serde_json::from_str(text)?;
        if let Some(chart) = &message.chart_data {
            log_chart_data(message.id, chart);
        }
        Ok(message)
    }

    /// Result rows, from `sqlResults` or else `queryResults`.
    pub fn results(&self) -> &[Row] {
        self.sql_results
            .as_deref()
            .or(self.query_results.as_deref())
            .unwrap_or(&[])
    }

    /// Build the displayable chart, if the message carries one.
    pub fn render_chart(&self, engine: &XmrEngine) -> Option<RenderedChart> {
        match self.chart_data.as_ref()? {
            ChartData::Xmr { data, insights, .. } => Some(RenderedChart::Xmr {
                model: engine.compute(data),
                insights: insights.as_ref().map(Insights::lines).unwrap_or_default(),
            }),
            ChartData::Table { data, .. } => Some(RenderedChart::Table {
                rows: table_rows(data),
            }),
            ChartData::Unknown => None,
        }
    }
}

fn table_rows(data: &Value) -> Vec<Row> {
    match data {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_object().cloned())
            .collect(),
        _ => Vec::new(),
    }
}

fn log_chart_data(message_id: i64, chart: &ChartData) {
    let kind = match chart {
        ChartData::Xmr { .. } => "xmr",
        ChartData::Table { .. } => "table",
        ChartData::Unknown => "unknown",
    };
    let Some(images) = chart.images() else {
        tracing::debug!(message_id, kind, has_images = false, "chart data received");
        return;
    };
    for image in images.iter() {
        tracing::debug!(
            message_id,
            kind,
            title = %image.title,
            image_type = %image.kind,
            base64_len = image.base64_data.as_deref().map_or(0, str::len),
            filename = ?image.filename,
            "chart image received"
        );
        if let Some(error) = non_empty(&image.error) {
            tracing::warn!(message_id, title = %image.title, error, "chart image failed to render");
        }
    }
}
