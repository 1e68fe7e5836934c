//! Common error types used across all Clinker crates
//! Provides consistent error handling and reporting

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base error type for all Clinker operations
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum ClinkerError {
    // Feed errors
    #[error("Feed connection failed: {message}")]
    FeedConnect { message: String },

    #[error("Feed protocol error: {message}")]
    FeedProtocol { message: String },

    #[error("Feed closed for path: {path}")]
    FeedClosed { path: String },

    #[error("Invalid feed path: {path}")]
    InvalidPath { path: String },

    // Data errors
    #[error("Data parse error: {message}")]
    DataParse {
        message: String,
        offset: Option<usize>,
    },

    // Configuration errors
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: String,
        field: Option<String>,
    },

    #[error("Unknown parameter: {key}")]
    UnknownParameter { key: String },

    // Browser errors
    #[error("JavaScript interop error: {message}")]
    JsInterop { message: String },

    #[error("Missing DOM element: {selector}")]
    MissingElement { selector: String },

    // Generic errors
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Result type alias for Clinker operations
pub type ClinkerResult<T> = Result<T, ClinkerError>;

/// Error response structure for JavaScript interop
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ClinkerError,
    pub timestamp: u64,
    pub context: Option<ErrorContext>,
}

/// Additional context for error reporting
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorContext {
    pub component: String,
    pub operation: String,
}

impl ErrorResponse {
    pub fn new(error: ClinkerError) -> Self {
        Self {
            success: false,
            error,
            timestamp: chrono::Utc::now().timestamp_millis() as u64,
            context: None,
        }
    }

    pub fn with_context(mut self, component: &str, operation: &str) -> Self {
        self.context = Some(ErrorContext {
            component: component.to_string(),
            operation: operation.to_string(),
        });
        self
    }

    /// Convert to JSON string for JavaScript
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"error":{"type":"Internal","details":{"message":"Failed to serialize error"}}}"#.to_string()
        })
    }
}

impl From<serde_json::Error> for ClinkerError {
    fn from(err: serde_json::Error) -> Self {
        ClinkerError::DataParse {
            message: err.to_string(),
            offset: Some(err.column()),
        }
    }
}

#[cfg(feature = "wasm")]
impl From<wasm_bindgen::JsValue> for ClinkerError {
    fn from(err: wasm_bindgen::JsValue) -> Self {
        ClinkerError::JsInterop {
            message: format!("{err:?}"),
        }
    }
}

#[cfg(feature = "wasm")]
impl From<ClinkerError> for wasm_bindgen::JsValue {
    fn from(err: ClinkerError) -> Self {
        wasm_bindgen::JsValue::from_str(&ErrorResponse::new(err).to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = ClinkerError::FeedConnect {
            message: "connection refused (URL: http://127.0.0.1:9000/live_data.json)".to_string(),
        };

        let response = ErrorResponse::new(error).with_context("RestStreamFeed", "subscribe");

        let json = response.to_json();
        assert!(json.contains("FeedConnect"));
        assert!(json.contains("connection refused"));
        assert!(json.contains("RestStreamFeed"));
    }

    #[test]
    fn test_json_error_conversion() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        match ClinkerError::from(err) {
            ClinkerError::DataParse { offset, .. } => assert!(offset.is_some()),
            other => panic!("Wrong error variant: {other:?}"),
        }
    }
}
