//! Security engine for aws-command-guard
//!
//! Coordinates pipeline splitting, rule classification and the security
//! mode into a single decision per command.

pub mod classifier;
pub mod common;
pub mod mode;

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::config::{Config, SecurityMode};
use crate::error::ConfigLoadError;
use crate::output::Decision;
use crate::rules::overrides::load_rule_config;
use crate::rules::RuleConfig;

use classifier::Verdict;

/// The main security engine. Safe to share across threads; every check
/// reads an immutable snapshot of the rules.
pub struct CommandGuard {
    rules: RwLock<Arc<RuleConfig>>,
    mode: SecurityMode,
}

impl CommandGuard {
    /// Create a guard over an already built rule set
    pub fn new(rules: RuleConfig, mode: SecurityMode) -> Self {
        Self {
            rules: RwLock::new(Arc::new(rules)),
            mode,
        }
    }

    /// Build the effective rules described by `config`
    pub fn from_config(config: &Config) -> Result<Self, ConfigLoadError> {
        let rules = load_rule_config(config.override_path().as_deref())?;
        let mode = config.general.security_mode;
        info!(mode = mode.as_str(), "command guard ready");
        Ok(Self::new(rules, mode))
    }

    /// Get the current security mode
    pub fn mode(&self) -> SecurityMode {
        self.mode
    }

    /// Snapshot of the rules in effect
    pub fn rules(&self) -> Arc<RuleConfig> {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Publish a new rule set. Checks already running keep the snapshot
    /// they started with.
    pub fn reload_rules(&self, rules: RuleConfig) {
        let count = rules.rule_count();
        *self.rules.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(rules);
        info!(rules = count, "rules reloaded");
    }

    /// Raw verdict, before the security mode is applied
    pub fn classify(&self, command: &str) -> Verdict {
        classifier::classify_command(command, &self.rules())
    }

    /// Main entry point: check a command and return a decision
    pub fn check(&self, command: &str) -> Decision {
        let decision = mode::apply_mode(self.mode, self.classify(command));
        debug!(
            command = %common::redact_secrets(command),
            outcome = ?decision.outcome,
            reason = decision.reason(),
            "checked command"
        );
        decision
    }
}
