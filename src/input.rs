//! Input parsing for validation requests
//!
//! The caller sends one JSON object on stdin naming the command to check.

use serde::Deserialize;

use crate::engine::common::redact_secrets;

/// A command validation request
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationRequest {
    /// Full command line, pipeline included
    pub command: String,

    /// Optional session identifier, recorded in the audit log
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ValidationRequest {
    /// Parse input from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get a redacted, truncated summary of the command for logging
    pub fn summary(&self) -> String {
        let redacted = redact_secrets(&self.command);
        if redacted.chars().count() > 200 {
            let head: String = redacted.chars().take(200).collect();
            format!("{}...", head)
        } else {
            redacted
        }
    }
}
