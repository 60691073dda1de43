//! Engine and API configuration.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{XmrError, XmrResult};
pub use crate::spc::LimitMethod;

/// Environment variable holding the API base path.
pub const API_BASE_ENV: &str = "XMR_API_BASE_URL";

/// Base path used when [`API_BASE_ENV`] is unset.
pub const DEFAULT_API_BASE: &str = "/api";

/// Options for [`XmrEngine`](crate::engine::XmrEngine).
///
/// ```
/// use xmr_chart::config::{EngineConfig, LimitMethod};
///
/// let config = EngineConfig::from_json(r#"{ "limit_method": "moving_range" }"#).unwrap();
/// assert_eq!(config.limit_method, LimitMethod::MovingRange);
/// assert!(config.detect_signals);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How individuals limits are derived for raw payloads.
    pub limit_method: LimitMethod,
    /// Flag points and ranges beyond their limits for raw payloads.
    pub detect_signals: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            limit_method: LimitMethod::Sigma,
            detect_signals: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> XmrResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_limit_method(mut self, method: LimitMethod) -> Self {
        self.limit_method = method;
        self
    }

    pub fn with_signal_detection(mut self, enabled: bool) -> Self {
        self.detect_signals = enabled;
        self
    }
}

/// Location of the chart backend API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Read the base path from [`API_BASE_ENV`], falling back to `/api`.
    pub fn from_env() -> XmrResult<Self> {
        match env::var(API_BASE_ENV) {
            Ok(base) if !base.is_empty() => Ok(Self::new(base)),
            Ok(_) | Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(env::VarError::NotUnicode(_)) => Err(XmrError::Config(format!(
                "{API_BASE_ENV} is not valid unicode"
            ))),
        }
    }

    /// Join `path` onto the base, inserting a `/` when `path` lacks one.
    pub fn api_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base, path)
        } else {
            format!("{}/{}", self.base, path)
        }
    }

    /// URL of a rendered chart image served by the backend.
    pub fn chart_image_url(&self, filename: &str) -> String {
        self.api_url(&format!("charts/{filename}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.limit_method, LimitMethod::Sigma);
        assert!(config.detect_signals);
    }

    #[test]
    fn test_engine_from_json() {
        let config = EngineConfig::from_json(r#"{ "detect_signals": false }"#).expect("valid");
        assert_eq!(config.limit_method, LimitMethod::Sigma);
        assert!(!config.detect_signals);

        assert!(EngineConfig::from_json(r#"{ "limit_method": "median" }"#).is_err());
    }

    #[test]
    fn test_engine_builders() {
        let config = EngineConfig::default()
            .with_limit_method(LimitMethod::MovingRange)
            .with_signal_detection(false);
        assert_eq!(config.limit_method, LimitMethod::MovingRange);
        assert!(!config.detect_signals);
    }

    #[test]
    fn test_api_url_joining() {
        let api = ApiConfig::default();
        assert_eq!(api.api_url("/chat"), "/api/chat");
        assert_eq!(api.api_url("chat"), "/api/chat");

        let remote = ApiConfig::new("https://backend.example.com/api");
        assert_eq!(
            remote.chart_image_url("xmr_1.png"),
            "https://backend.example.com/api/charts/xmr_1.png"
        );
    }
}
