//! JSONL audit logging for aws-command-guard
//!
//! Records every decision to a JSONL file. Commands are written with AWS
//! credentials redacted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::warn;

use crate::input::ValidationRequest;
use crate::output::{Decision, ErrorKind, Outcome};

/// Log level for audit entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Allowed,
    Blocked,
    Warn,
}

impl From<Outcome> for LogLevel {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Allowed => LogLevel::Allowed,
            Outcome::Blocked => LogLevel::Blocked,
            Outcome::AllowedWithWarning => LogLevel::Warn,
        }
    }
}

/// An audit log entry
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    /// Timestamp of the decision
    pub timestamp: DateTime<Utc>,

    /// Log level (ALLOWED, BLOCKED, WARN)
    pub level: LogLevel,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,

    /// Pattern of the rule that matched (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,

    /// Redacted, truncated command
    pub command: String,

    pub reason: String,

    /// Session ID (if provided)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AuditEntry {
    /// Create a new audit entry from a request and its decision
    pub fn new(request: &ValidationRequest, decision: &Decision) -> Self {
        Self {
            timestamp: Utc::now(),
            level: decision.outcome.into(),
            kind: decision.kind,
            rule: decision.matched_rule.as_ref().map(|rule| rule.pattern.clone()),
            command: request.summary(),
            reason: decision.reason().to_string(),
            session_id: request.session_id.clone(),
        }
    }
}

/// Audit logger
#[derive(Default)]
pub struct AuditLogger {
    writer: Option<BufWriter<File>>,
}

impl AuditLogger {
    /// Create a new audit logger. An unwritable path disables logging.
    pub fn new(path: Option<&Path>) -> Self {
        let writer = path.and_then(|p| {
            if let Some(parent) = p.parent() {
                let _ = std::fs::create_dir_all(parent);
            }

            match OpenOptions::new().create(true).append(true).open(p) {
                Ok(file) => Some(BufWriter::new(file)),
                Err(e) => {
                    warn!(path = %p.display(), error = %e, "audit log disabled");
                    None
                }
            }
        });

        Self { writer }
    }

    /// Log an audit entry
    pub fn log(&mut self, entry: &AuditEntry) -> Result<(), std::io::Error> {
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(entry)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Log a decision
    pub fn log_decision(
        &mut self,
        request: &ValidationRequest,
        decision: &Decision,
    ) -> Result<(), std::io::Error> {
        let entry = AuditEntry::new(request, decision);
        self.log(&entry)
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }
}
