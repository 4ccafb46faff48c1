//! Configuration loading for aws-command-guard
//!
//! Supports TOML configuration with embedded defaults, overridden by
//! environment variables read once at startup.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{line_of, ConfigLoadError};

/// Environment variable selecting the security mode
pub const SECURITY_MODE_ENV: &str = "AWS_MCP_SECURITY_MODE";

/// Environment variable pointing at an override rule document
pub const SECURITY_CONFIG_ENV: &str = "AWS_MCP_SECURITY_CONFIG";

/// Security mode decides whether a blocked verdict stops execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SecurityMode {
    /// Blocked commands are rejected
    #[default]
    Strict,

    /// Blocked commands run, annotated with a warning
    Permissive,
}

impl SecurityMode {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Some(SecurityMode::Strict),
            "permissive" => Some(SecurityMode::Permissive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityMode::Strict => "strict",
            SecurityMode::Permissive => "permissive",
        }
    }
}

/// General configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Strict or permissive handling of blocked commands
    pub security_mode: SecurityMode,

    /// Enable audit logging
    pub audit_log: bool,

    /// Path to audit log file
    pub audit_path: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            security_mode: SecurityMode::Strict,
            audit_log: true,
            audit_path: Some("~/.aws-command-guard/audit.jsonl".to_string()),
        }
    }
}

/// Rule source configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RulesConfig {
    /// Path to an override rule document merged over the built-in rules
    pub override_file: Option<String>,
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub rules: RulesConfig,
}

impl Config {
    /// Load configuration from the standard locations, then apply the
    /// environment. Falls back to defaults when no settings file exists.
    pub fn load() -> Result<Self, ConfigLoadError> {
        let config_paths = [
            // User-specific config
            dirs::home_dir().map(|p| p.join(".aws-command-guard/config.toml")),
            // System-wide config
            Some(PathBuf::from("/etc/aws-command-guard/config.toml")),
        ];

        let mut config = Config::default();
        for path in config_paths.into_iter().flatten() {
            if path.exists() {
                config = Self::load_from(&path)?;
                break;
            }
        }

        config.apply_env()?;
        Ok(config)
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigLoadError::Parse {
            path: path.to_path_buf(),
            line: e.span().map(|span| line_of(&content, span.start)),
            message: e.message().to_string(),
        })
    }

    /// Apply `AWS_MCP_SECURITY_MODE` and `AWS_MCP_SECURITY_CONFIG`
    pub fn apply_env(&mut self) -> Result<(), ConfigLoadError> {
        self.apply_overrides(
            std::env::var(SECURITY_MODE_ENV).ok().as_deref(),
            std::env::var(SECURITY_CONFIG_ENV).ok().as_deref(),
        )
    }

    fn apply_overrides(
        &mut self,
        mode: Option<&str>,
        rules_path: Option<&str>,
    ) -> Result<(), ConfigLoadError> {
        if let Some(value) = mode.filter(|v| !v.trim().is_empty()) {
            self.general.security_mode = SecurityMode::from_str(value).ok_or_else(|| {
                ConfigLoadError::InvalidSecurityMode {
                    value: value.to_string(),
                }
            })?;
        }
        if let Some(path) = rules_path.filter(|p| !p.trim().is_empty()) {
            self.rules.override_file = Some(path.to_string());
        }
        Ok(())
    }

    /// Expand ~ in path strings
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get the audit log path (expanded)
    pub fn audit_path(&self) -> Option<PathBuf> {
        self.general.audit_path.as_ref().map(|p| Self::expand_path(p))
    }

    /// Get the override rule document path (expanded)
    pub fn override_path(&self) -> Option<PathBuf> {
        self.rules
            .override_file
            .as_ref()
            .map(|p| Self::expand_path(p))
    }
}

/// Embedded default configuration
pub const DEFAULT_CONFIG_TOML: &str = r#"
[general]
security_mode = "strict"
audit_log = true
audit_path = "~/.aws-command-guard/audit.jsonl"

[rules]
# override_file = "~/.aws-command-guard/rules.toml"
"#;
