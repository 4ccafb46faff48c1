//! Integration tests for aws-command-guard

mod classification;
mod modes;
mod overrides;

use aws_command_guard::{CommandGuard, RuleConfig, SecurityMode};

pub fn strict() -> CommandGuard {
    CommandGuard::new(RuleConfig::baseline().unwrap(), SecurityMode::Strict)
}

pub fn permissive() -> CommandGuard {
    CommandGuard::new(RuleConfig::baseline().unwrap(), SecurityMode::Permissive)
}
