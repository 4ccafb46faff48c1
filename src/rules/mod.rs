//! Security rules for aws-command-guard
//!
//! Three independent rule categories, each keyed by service:
//! dangerous command prefixes, safe-pattern overrides and regex rules.
//! The built-in tables live in [`dangerous`], [`safe`] and [`regex_rules`];
//! [`overrides`] merges an external document over them.

pub mod dangerous;
pub mod overrides;
pub mod regex_rules;
pub mod safe;
pub mod service;
pub mod utilities;

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::ConfigLoadError;

pub use service::{Service, ServiceKey};

/// A built-in prefix rule (dangerous command or safe pattern)
#[derive(Debug, Clone, Copy)]
pub struct PrefixRule {
    /// Rule bucket
    pub key: ServiceKey,

    /// Leading text to match
    pub prefix: &'static str,

    /// Human-readable explanation
    pub description: &'static str,
}

impl PrefixRule {
    pub const fn new(key: ServiceKey, prefix: &'static str, description: &'static str) -> Self {
        Self {
            key,
            prefix,
            description,
        }
    }
}

/// A built-in regex rule
#[derive(Debug, Clone, Copy)]
pub struct RegexRuleDef {
    /// Rule bucket
    pub key: ServiceKey,

    /// Regex pattern matched against the full command
    pub pattern: &'static str,

    /// What the rule protects against
    pub description: &'static str,

    /// Message returned to the caller when the rule fires
    pub error_message: &'static str,
}

impl RegexRuleDef {
    pub const fn new(
        key: ServiceKey,
        pattern: &'static str,
        description: &'static str,
        error_message: &'static str,
    ) -> Self {
        Self {
            key,
            pattern,
            description,
            error_message,
        }
    }
}

/// Collapse whitespace runs to single spaces and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// How a safe pattern is located in a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchStyle {
    /// `aws iam get-` must lead the command
    Prefix,
    /// `--help` may appear anywhere as whole words
    Token,
    /// `help` must directly follow `aws <service>` or
    /// `aws <service> <operation>`
    Trailing,
}

/// A prefix-style rule entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternEntry {
    prefix: String,
    description: String,
    normalized: String,
    words: Vec<String>,
    style: MatchStyle,
}

impl PatternEntry {
    pub fn new(prefix: impl Into<String>, description: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let normalized = normalize_whitespace(&prefix);
        let words = normalized.split_whitespace().map(str::to_string).collect();
        let style = if normalized == "aws" || normalized.starts_with("aws ") {
            MatchStyle::Prefix
        } else if normalized.starts_with('-') {
            MatchStyle::Token
        } else {
            MatchStyle::Trailing
        };

        Self {
            prefix,
            description: description.into(),
            normalized,
            words,
            style,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Normalized leading-substring match. Empty entries never match.
    pub fn matches_prefix(&self, normalized_command: &str) -> bool {
        !self.normalized.is_empty() && normalized_command.starts_with(&self.normalized)
    }

    /// Safe-pattern match against the command's shell words. A quoted
    /// argument is a single word, so text inside it never matches a flag.
    pub fn matches_override(&self, words: &[String]) -> bool {
        let Some((last, head)) = self.words.split_last() else {
            return false;
        };

        match self.style {
            // Whole words, except the last may be a partial word (`get-`)
            MatchStyle::Prefix => {
                words.len() > head.len()
                    && words[..head.len()] == *head
                    && words[head.len()].starts_with(last.as_str())
            }
            MatchStyle::Token => words
                .windows(self.words.len())
                .any(|window| window == self.words.as_slice()),
            MatchStyle::Trailing => {
                let lead = words.len().saturating_sub(self.words.len());
                (2..=3).contains(&lead)
                    && words.ends_with(&self.words)
                    && !words[1..lead].iter().any(|word| word.starts_with('-'))
            }
        }
    }
}

/// A compiled regex rule
#[derive(Debug, Clone)]
pub struct RegexRule {
    regex: Regex,
    description: String,
    error_message: String,
}

impl RegexRule {
    /// Compile a rule. `scope` only labels the error.
    pub fn new(
        scope: ServiceKey,
        pattern: &str,
        description: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Result<Self, ConfigLoadError> {
        let regex = Regex::new(pattern).map_err(|source| ConfigLoadError::InvalidRegex {
            scope: scope.to_string(),
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            regex,
            description: description.into(),
            error_message: error_message.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Match against the unmodified command text
    pub fn is_match(&self, command: &str) -> bool {
        self.regex.is_match(command)
    }
}

/// The effective rule set. Built once, then shared read-only.
#[derive(Debug, Clone, Default)]
pub struct RuleConfig {
    pub(crate) dangerous_commands: BTreeMap<Service, Vec<PatternEntry>>,
    pub(crate) safe_patterns: BTreeMap<ServiceKey, Vec<PatternEntry>>,
    pub(crate) regex_rules: BTreeMap<ServiceKey, Vec<RegexRule>>,
}

impl RuleConfig {
    /// A rule set with no rules at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in rules
    pub fn baseline() -> Result<Self, ConfigLoadError> {
        let mut config = Self::empty();

        for rule in dangerous::DANGEROUS_COMMANDS {
            // Dangerous prefixes are service-scoped only
            if let ServiceKey::Service(service) = rule.key {
                config
                    .dangerous_commands
                    .entry(service)
                    .or_default()
                    .push(PatternEntry::new(rule.prefix, rule.description));
            }
        }

        for rule in safe::SAFE_PATTERNS {
            config
                .safe_patterns
                .entry(rule.key)
                .or_default()
                .push(PatternEntry::new(rule.prefix, rule.description));
        }

        for rule in regex_rules::REGEX_RULES {
            let compiled =
                RegexRule::new(rule.key, rule.pattern, rule.description, rule.error_message)?;
            config.regex_rules.entry(rule.key).or_default().push(compiled);
        }

        Ok(config)
    }

    pub fn dangerous_commands(&self, service: Service) -> &[PatternEntry] {
        self.dangerous_commands
            .get(&service)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn safe_patterns(&self, key: ServiceKey) -> &[PatternEntry] {
        self.safe_patterns
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn regex_rules(&self, key: ServiceKey) -> &[RegexRule] {
        self.regex_rules
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of rules across all categories
    pub fn rule_count(&self) -> usize {
        self.dangerous_commands.values().map(Vec::len).sum::<usize>()
            + self.safe_patterns.values().map(Vec::len).sum::<usize>()
            + self.regex_rules.values().map(Vec::len).sum::<usize>()
    }
}
