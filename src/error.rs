//! Errors for the fallible edges of the crate.
//!
//! Chart computation itself cannot fail; only parsing messages and
//! configuration can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmrError {
    #[error("INVALID_JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("INVALID_CONFIG: {0}")]
    Config(String),
}

pub type XmrResult<T> = Result<T, XmrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_converts() {
        let err: XmrError = serde_json::from_str::<serde_json::Value>("{")
            .map_err(XmrError::from)
            .expect_err("truncated json");
        assert!(err.to_string().starts_with("INVALID_JSON:"));
    }

    #[test]
    fn test_config_error_message() {
        let err = XmrError::Config("XMR_API_BASE_URL is not valid unicode".to_string());
        assert_eq!(err.to_string(), "INVALID_CONFIG: XMR_API_BASE_URL is not valid unicode");
    }
}
