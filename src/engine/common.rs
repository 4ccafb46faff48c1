//! Common utilities for the engine
//!
//! Credential redaction for anything that ends up in logs.

use once_cell::sync::Lazy;
use regex::Regex;

/// Secret patterns and their replacements
static SECRET_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        // AWS access key IDs (long-term and temporary)
        (Regex::new(r"\b(?:AKIA|ASIA)[0-9A-Z]{16}\b").unwrap(), "[REDACTED]"),
        // Credential keys written through `aws configure set` or env syntax
        (
            Regex::new(r"(?i)\b(aws_secret_access_key|aws_session_token)(\s*=\s*|\s+)\S+").unwrap(),
            "${1}${2}[REDACTED]",
        ),
        // Secret-bearing CLI arguments
        (
            Regex::new(
                r#"(--(?:secret-string|secret-binary|master-user-password|new-password|old-password|password|private-key|auth-token)[\s=]+)(?:'[^']*'|"[^"]*"|\S+)"#,
            )
            .unwrap(),
            "${1}[REDACTED]",
        ),
    ]
});

/// Redact secrets in text for logging
pub fn redact_secrets(text: &str) -> String {
    let mut redacted = text.to_string();

    for (pattern, replacement) in SECRET_PATTERNS.iter() {
        redacted = pattern.replace_all(&redacted, *replacement).to_string();
    }

    redacted
}
