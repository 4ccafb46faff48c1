//! Command classification
//!
//! Produces the raw verdict for a command line before the security mode is
//! applied. Layers run in a fixed order:
//!
//! 1. general regex rules
//! 2. service regex rules
//! 3. dangerous prefixes for the service
//! 4. safe patterns (general, then service), only after a dangerous match
//!
//! A regex match blocks outright; safe patterns can only undo step 3.
//! A command that matches nothing is allowed. Regex rules see both the
//! raw text and its unquoted shell words, so quoting cannot split a match.

use crate::output::{ErrorKind, RuleCategory, RuleReference};
use crate::parser::pipeline::{split_pipeline, CommandSegment, SplitError, CLI_TOKEN};
use crate::rules::utilities::{is_allowed_utility, unsafe_argument, ALLOWED_UTILITIES};
use crate::rules::{RegexRule, RuleConfig, ServiceKey};

/// Verdict before the security mode is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// `rule` is the safe pattern that overrode a dangerous prefix, if any
    Allowed { rule: Option<RuleReference> },

    Blocked {
        kind: ErrorKind,
        reason: String,
        rule: RuleReference,
    },
}

impl Verdict {
    fn allowed() -> Self {
        Verdict::Allowed { rule: None }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Verdict::Blocked { .. })
    }
}

impl From<SplitError> for Verdict {
    fn from(err: SplitError) -> Self {
        let rule = match err.kind {
            ErrorKind::EmptyCommand => RuleReference::new(
                RuleCategory::PipelineSyntax,
                ServiceKey::General,
                "|",
                "Every pipeline segment must contain a command",
            ),
            ErrorKind::CommandInjectionRisk => RuleReference::new(
                RuleCategory::ShellSyntax,
                ServiceKey::General,
                err.operator.unwrap_or_default(),
                "Commands may not chain, background, redirect or substitute other commands",
            ),
            _ => RuleReference::new(
                RuleCategory::CommandFamily,
                ServiceKey::General,
                CLI_TOKEN,
                "Commands must be AWS CLI invocations",
            ),
        };
        Verdict::Blocked {
            kind: err.kind,
            reason: err.message,
            rule,
        }
    }
}

/// Classify a full command line, pipeline included
pub fn classify_command(command: &str, rules: &RuleConfig) -> Verdict {
    let segments = match split_pipeline(command) {
        Ok(segments) => segments,
        Err(err) => return err.into(),
    };

    if let Some(verdict) = check_utilities(&segments[1..]) {
        return verdict;
    }

    classify(&segments[0], rules)
}

/// Reject the first utility segment whose program is not allow-listed or
/// that passes it an option which writes files or runs programs
pub fn check_utilities(segments: &[CommandSegment]) -> Option<Verdict> {
    for segment in segments {
        let program = segment.tokens().first().cloned().unwrap_or_default();

        let reason = if !is_allowed_utility(&program) {
            format!(
                "Command '{}' at position {} in pipeline is not allowed; permitted utilities: {}",
                program,
                segment.position(),
                ALLOWED_UTILITIES.join(", ")
            )
        } else if let Some(arg) = unsafe_argument(segment.tokens()) {
            format!(
                "Argument '{}' of '{}' at position {} in pipeline writes files or runs programs",
                arg,
                program,
                segment.position()
            )
        } else {
            continue;
        };

        return Some(Verdict::Blocked {
            kind: ErrorKind::PipelineInjectionRisk,
            reason,
            rule: RuleReference::new(
                RuleCategory::UtilityAllowList,
                ServiceKey::General,
                program,
                "Only read-only text utilities may follow a pipe",
            ),
        });
    }
    None
}

fn regex_block(rule: &RegexRule, category: RuleCategory, scope: ServiceKey) -> Verdict {
    Verdict::Blocked {
        kind: ErrorKind::RuleBlocked,
        reason: rule.error_message().to_string(),
        rule: RuleReference::new(category, scope, rule.pattern(), rule.description()),
    }
}

/// Classify the primary segment against the rule layers
pub fn classify(segment: &CommandSegment, rules: &RuleConfig) -> Verdict {
    let text = segment.text();
    let normalized = segment.normalized();
    let matches = |rule: &&RegexRule| rule.is_match(text) || rule.is_match(&normalized);

    if let Some(rule) = rules.regex_rules(ServiceKey::General).iter().find(matches) {
        return regex_block(rule, RuleCategory::GeneralRegex, ServiceKey::General);
    }

    // Unknown services only have general rules
    let Some(service) = segment.service() else {
        return Verdict::allowed();
    };
    let key = ServiceKey::Service(service);

    if let Some(rule) = rules.regex_rules(key).iter().find(matches) {
        return regex_block(rule, RuleCategory::ServiceRegex, key);
    }

    let Some(dangerous) = rules
        .dangerous_commands(service)
        .iter()
        .find(|entry| entry.matches_prefix(&normalized))
    else {
        return Verdict::allowed();
    };

    let general = rules
        .safe_patterns(ServiceKey::General)
        .iter()
        .map(|entry| (ServiceKey::General, entry));
    let scoped = rules.safe_patterns(key).iter().map(|entry| (key, entry));
    if let Some((scope, safe)) = general
        .chain(scoped)
        .find(|(_, entry)| entry.matches_override(segment.tokens()))
    {
        return Verdict::Allowed {
            rule: Some(RuleReference::new(
                RuleCategory::SafePattern,
                scope,
                safe.prefix(),
                safe.description(),
            )),
        };
    }

    Verdict::Blocked {
        kind: ErrorKind::RuleBlocked,
        reason: dangerous.description().to_string(),
        rule: RuleReference::new(
            RuleCategory::DangerousCommand,
            key,
            dangerous.prefix(),
            dangerous.description(),
        ),
    }
}
