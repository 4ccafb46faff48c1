//! aws-command-guard - Layered security gate for AWS CLI commands
//!
//! Decides whether an AWS CLI command line requested by an AI assistant
//! may run. Every command passes the same fixed sequence of checks:
//!
//! - **Pipeline splitting**: only `aws <service> ...` may come first, only
//!   read-only text utilities may follow a pipe, and shell operators such
//!   as `;`, `&&`, `>` or `$(...)` are refused
//! - **Regex rules**: general, then per-service; a match always blocks
//! - **Dangerous prefixes**: per-service command prefixes that block
//! - **Safe patterns**: `--help`, read-only verbs and similar overrides
//!   that lift a dangerous-prefix block
//! - **Security mode**: strict blocks, permissive only warns on rule blocks
//! - **Overrides**: TOML, YAML or JSON rule documents merged over the
//!   built-in rules
//! - **Audit logging**: JSONL log of all decisions
//!
//! # Example
//!
//! ```
//! use aws_command_guard::{CommandGuard, RuleConfig, SecurityMode};
//!
//! let guard = CommandGuard::new(RuleConfig::baseline().unwrap(), SecurityMode::Strict);
//!
//! assert!(guard.check("aws s3 ls").is_allowed());
//! assert!(guard.check("aws iam create-user --user-name bob").is_blocked());
//! assert!(guard.check("aws iam create-user --help").is_allowed());
//! assert!(guard.check("aws s3 ls; rm -rf ~").is_blocked());
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod output;
pub mod parser;
pub mod rules;

// Re-exports for convenience
pub use config::{Config, SecurityMode};
pub use engine::classifier::Verdict;
pub use engine::CommandGuard;
pub use error::ConfigLoadError;
pub use input::ValidationRequest;
pub use output::{Decision, ErrorKind, Outcome, RuleCategory, RuleReference};
pub use rules::{RuleConfig, Service, ServiceKey};
