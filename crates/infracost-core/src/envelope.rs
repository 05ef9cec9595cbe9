//! Result Envelope
//!
//! The single currency passed between backend adapters and the dispatcher.
//! Constructors keep the invariants: a success never carries `error`, a
//! failure never carries `output` or `data` and always has a message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error text used when a backend fails without saying why
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CommandResult {
    /// Successful result carrying plain text output
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
            error: None,
            data: None,
        }
    }

    /// Successful result carrying text output and its structured form
    pub fn ok_with_data(output: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
            error: None,
            data: Some(data),
        }
    }

    /// Successful JSON result; `output` is the pretty-printed `data`
    pub fn json(data: Value) -> Self {
        let output = serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string());
        Self::ok_with_data(output, data)
    }

    /// Failed result. An empty message is replaced with a generic one.
    pub fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            error
        };
        Self {
            success: false,
            output: None,
            error: Some(error),
            data: None,
        }
    }

    /// Output text if present and not blank
    pub fn output_text(&self) -> Option<&str> {
        self.output.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn error_text(&self) -> Option<&str> {
        self.error.as_deref().filter(|s| !s.trim().is_empty())
    }
}
