//! Load-time errors
//!
//! Classification never fails; only building the rule set and reading
//! settings can. Any of these errors must stop the process before it
//! starts accepting commands.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading settings or building the effective rule set.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// The file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not a valid document
    #[error("failed to parse {}{}: {message}", path.display(), fmt_line(*line))]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },

    /// A regex rule failed to compile
    #[error("invalid regex in {scope} rules `{pattern}`: {source}")]
    InvalidRegex {
        scope: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A rule was keyed by something other than `general` or a known service
    #[error("unknown service `{key}` under `{category}` in {}", path.display())]
    UnknownService {
        path: PathBuf,
        category: &'static str,
        key: String,
    },

    /// The security mode setting is neither `strict` nor `permissive`
    #[error("invalid security mode `{value}` (expected `strict` or `permissive`)")]
    InvalidSecurityMode { value: String },
}

fn fmt_line(line: Option<usize>) -> String {
    match line {
        Some(line) => format!(" (line {})", line),
        None => String::new(),
    }
}

/// Convert a byte offset into a 1-based line number
pub(crate) fn line_of(content: &str, offset: usize) -> usize {
    let end = offset.min(content.len());
    content.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}
