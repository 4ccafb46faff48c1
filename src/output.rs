//! Decisions and the JSON response written by the binary

use serde::Serialize;

use crate::rules::ServiceKey;

/// Why a command was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The primary segment is not an `aws <service> ...` invocation
    NotACloudCommand,

    /// A pipeline segment runs a program outside the utility allow-list,
    /// or passes an allow-listed one an option that writes files
    PipelineInjectionRisk,

    /// An unquoted shell operator (`;`, `&`, `<`, `>`, newline) or a
    /// command substitution would run or redirect something else
    CommandInjectionRisk,

    /// A dangerous-prefix or regex rule matched
    RuleBlocked,

    /// A pipeline segment after the first is empty (`a || b`, trailing `|`)
    EmptyCommand,
}

/// Which check produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Primary segment must start with `aws <service>`
    CommandFamily,
    /// Pipeline segments must not be empty
    PipelineSyntax,
    /// No shell operators or command substitution
    ShellSyntax,
    /// Utility segments must use an allow-listed program
    UtilityAllowList,
    /// Regex rule under `general`
    GeneralRegex,
    /// Regex rule under the command's service
    ServiceRegex,
    /// Dangerous command prefix
    DangerousCommand,
    /// Safe pattern that overrode a dangerous prefix
    SafePattern,
}

/// The rule behind a decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleReference {
    pub category: RuleCategory,
    pub scope: ServiceKey,
    pub pattern: String,
    pub description: String,
}

impl RuleReference {
    pub fn new(
        category: RuleCategory,
        scope: ServiceKey,
        pattern: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category,
            scope,
            pattern: pattern.into(),
            description: description.into(),
        }
    }
}

/// Final outcome surfaced to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Allowed,
    Blocked,
    AllowedWithWarning,
}

/// Decision for one command. `matched_rule` is empty only for the
/// default allow (no rule matched at all).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub outcome: Outcome,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(rename = "rule", skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<RuleReference>,
}

impl Decision {
    /// Default allow: nothing matched
    pub fn allow() -> Self {
        Decision {
            outcome: Outcome::Allowed,
            kind: None,
            reason: None,
            matched_rule: None,
        }
    }

    /// Allowed because a safe pattern overrode a dangerous prefix
    pub fn allow_by(rule: RuleReference) -> Self {
        Decision {
            outcome: Outcome::Allowed,
            kind: None,
            reason: None,
            matched_rule: Some(rule),
        }
    }

    /// Create a blocking decision
    pub fn block(kind: ErrorKind, reason: impl Into<String>, rule: RuleReference) -> Self {
        Decision {
            outcome: Outcome::Blocked,
            kind: Some(kind),
            reason: Some(reason.into()),
            matched_rule: Some(rule),
        }
    }

    /// Create a warning (would have been blocked)
    pub fn warn(kind: ErrorKind, reason: impl Into<String>, rule: RuleReference) -> Self {
        Decision {
            outcome: Outcome::AllowedWithWarning,
            kind: Some(kind),
            reason: Some(reason.into()),
            matched_rule: Some(rule),
        }
    }

    /// Execution may proceed (allowed or warned)
    pub fn permits_execution(&self) -> bool {
        !self.is_blocked()
    }

    pub fn is_allowed(&self) -> bool {
        self.outcome == Outcome::Allowed
    }

    pub fn is_blocked(&self) -> bool {
        self.outcome == Outcome::Blocked
    }

    pub fn is_warning(&self) -> bool {
        self.outcome == Outcome::AllowedWithWarning
    }

    /// Get the reason, empty for the default allow
    pub fn reason(&self) -> &str {
        self.reason.as_deref().unwrap_or("")
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
