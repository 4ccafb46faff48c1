//! aws-command-guard - Layered security gate for AWS CLI commands
//!
//! Reads one validation request from stdin and writes the decision to
//! stdout.
//!
//! # Usage
//!
//! ```bash
//! echo '{"command":"aws iam create-user --user-name bob"}' | aws-command-guard
//!
//! # Warn instead of blocking on rule matches
//! aws-command-guard --mode=permissive
//!
//! # Merge an override rule document over the built-in rules
//! aws-command-guard --rules ~/.aws-command-guard/rules.yaml
//! ```

use std::env;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process;

use tracing::error;
use tracing_subscriber::EnvFilter;

use aws_command_guard::{
    audit::AuditLogger,
    config::{Config, SecurityMode, SECURITY_CONFIG_ENV, SECURITY_MODE_ENV},
    engine::CommandGuard,
    error::ConfigLoadError,
    input::ValidationRequest,
    output::{Decision, ErrorKind, RuleCategory, RuleReference},
    rules::ServiceKey,
};

/// Exit status when settings or rules fail to load
const CONFIG_ERROR_EXIT: i32 = 2;

/// Print version information
fn print_version() {
    println!("aws-command-guard {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"aws-command-guard - Layered security gate for AWS CLI commands

USAGE:
    aws-command-guard [OPTIONS] < request.json

OPTIONS:
    -h, --help              Print this help message
    -v, --version           Print version information
    -m, --mode MODE         Security mode: strict, permissive (default: strict)
    -r, --rules PATH        Override rule document (.toml, .yaml, .json)
    -c, --config PATH       Path to config file
    -d, --dry-run           Same as --mode=permissive

ENVIRONMENT:
    {mode_env}   strict or permissive
    {config_env} Path to an override rule document
    RUST_LOG                Log filter for stderr diagnostics (default: warn)

INPUT:
    {{"command": "aws s3 ls", "session_id": "optional"}}

OUTPUT:
    {{"outcome": "allowed" | "blocked" | "allowed_with_warning",
     "kind": "...", "reason": "...", "rule": {{...}}}}
"#,
        mode_env = SECURITY_MODE_ENV,
        config_env = SECURITY_CONFIG_ENV,
    );
}

/// Parse command line arguments
struct Args {
    help: bool,
    version: bool,
    mode: Option<String>,
    dry_run: bool,
    rules_path: Option<String>,
    config_path: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut result = Args {
            help: false,
            version: false,
            mode: None,
            dry_run: false,
            rules_path: None,
            config_path: None,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => result.help = true,
                "-v" | "--version" => result.version = true,
                "-d" | "--dry-run" => result.dry_run = true,
                "-m" | "--mode" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.mode = Some(args[i].clone());
                    }
                }
                "-r" | "--rules" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.rules_path = Some(args[i].clone());
                    }
                }
                "-c" | "--config" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.config_path = Some(args[i].clone());
                    }
                }
                arg if arg.starts_with("--mode=") => {
                    result.mode = Some(arg.trim_start_matches("--mode=").to_string());
                }
                arg if arg.starts_with("--rules=") => {
                    result.rules_path = Some(arg.trim_start_matches("--rules=").to_string());
                }
                arg if arg.starts_with("--config=") => {
                    result.config_path = Some(arg.trim_start_matches("--config=").to_string());
                }
                _ => {}
            }
            i += 1;
        }

        result
    }
}

/// Settings file, then environment, then command line flags
fn load_config(args: &Args) -> Result<Config, ConfigLoadError> {
    let mut config = match args.config_path {
        Some(ref path) => {
            let mut config = Config::load_from(Path::new(path))?;
            config.apply_env()?;
            config
        }
        None => Config::load()?,
    };

    if let Some(ref value) = args.mode {
        config.general.security_mode = SecurityMode::from_str(value).ok_or_else(|| {
            ConfigLoadError::InvalidSecurityMode {
                value: value.clone(),
            }
        })?;
    }
    if args.dry_run {
        config.general.security_mode = SecurityMode::Permissive;
    }
    if let Some(ref path) = args.rules_path {
        config.rules.override_file = Some(path.clone());
    }

    Ok(config)
}

/// Response for input that could not be read as a request
fn malformed_request(message: String) -> Decision {
    Decision::block(
        ErrorKind::NotACloudCommand,
        message,
        RuleReference::new(
            RuleCategory::CommandFamily,
            ServiceKey::General,
            "aws",
            "Requests must carry an AWS CLI command",
        ),
    )
}

fn write_decision(decision: &Decision) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{}", decision.to_json());
    let _ = handle.flush();
}

fn main() {
    let args = Args::parse();

    // Handle help and version
    if args.help {
        print_help();
        return;
    }

    if args.version {
        print_version();
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    // Nothing is served until settings and rules load cleanly
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "configuration failed to load");
            eprintln!("Error: {}", e);
            process::exit(CONFIG_ERROR_EXIT);
        }
    };
    let guard = match CommandGuard::from_config(&config) {
        Ok(guard) => guard,
        Err(e) => {
            error!(error = %e, "rules failed to load");
            eprintln!("Error: {}", e);
            process::exit(CONFIG_ERROR_EXIT);
        }
    };

    let audit_path = if config.general.audit_log {
        config.audit_path()
    } else {
        None
    };
    let mut logger = AuditLogger::new(audit_path.as_deref());

    // Read JSON from stdin
    let mut input_json = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input_json) {
        write_decision(&malformed_request(format!("Failed to read request: {}", e)));
        return;
    }

    // Fail closed: a request that does not parse is never executed
    let request = match ValidationRequest::from_json(&input_json) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: Failed to parse request (blocking): {}", e);
            write_decision(&malformed_request(format!("Failed to parse request: {}", e)));
            return;
        }
    };

    let decision = guard.check(&request.command);

    if let Err(e) = logger.log_decision(&request, &decision) {
        eprintln!("Warning: Failed to write audit log: {}", e);
    }

    write_decision(&decision);
}
