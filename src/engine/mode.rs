//! Security mode handling
//!
//! Turns a raw verdict into the decision surfaced to callers. Strict mode
//! passes verdicts through. Permissive mode downgrades rule blocks to
//! warnings. Structural problems stay blocked in either mode: commands that
//! are not AWS CLI invocations, unsafe pipelines and shell syntax.

use tracing::warn;

use crate::config::SecurityMode;
use crate::engine::classifier::Verdict;
use crate::output::{Decision, ErrorKind};

/// Apply the security mode to a verdict
pub fn apply_mode(mode: SecurityMode, verdict: Verdict) -> Decision {
    match verdict {
        Verdict::Allowed { rule: None } => Decision::allow(),
        Verdict::Allowed { rule: Some(rule) } => Decision::allow_by(rule),
        Verdict::Blocked { kind, reason, rule } => {
            if mode == SecurityMode::Permissive && kind == ErrorKind::RuleBlocked {
                warn!(
                    reason = %reason,
                    pattern = %rule.pattern,
                    "permissive mode: allowing command that matched a security rule"
                );
                Decision::warn(kind, reason, rule)
            } else {
                Decision::block(kind, reason, rule)
            }
        }
    }
}
