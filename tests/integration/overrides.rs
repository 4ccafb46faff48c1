//! Integration tests for override rule documents and rule reloads

use std::io::Write;

use aws_command_guard::{
    config::Config, rules::overrides::load_rule_config, CommandGuard, ConfigLoadError,
    RuleCategory, RuleConfig, SecurityMode,
};
use tempfile::NamedTempFile;

fn rules_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn guard_with(file: &NamedTempFile) -> CommandGuard {
    let rules = load_rule_config(Some(file.path())).unwrap();
    CommandGuard::new(rules, SecurityMode::Strict)
}

#[test]
fn test_yaml_override_adds_rules() {
    let file = rules_file(
        ".yaml",
        r#"
dangerous_commands:
  lambda:
    - prefix: "aws lambda invoke"
      description: "Invoking functions runs arbitrary code"
regex_rules:
  general:
    - pattern: "--region\\s+cn-"
      description: "China regions"
      error_message: "China regions are out of scope"
"#,
    );
    let guard = guard_with(&file);

    let decision = guard.check("aws lambda invoke --function-name f out.json");
    assert!(decision.is_blocked());
    assert_eq!(decision.reason(), "Invoking functions runs arbitrary code");

    let decision = guard.check("aws s3 ls --region cn-north-1");
    assert_eq!(decision.reason(), "China regions are out of scope");

    // built-in rules survive a union merge
    assert!(guard.check("aws iam create-user --user-name bob").is_blocked());
}

#[test]
fn test_toml_override_safe_pattern() {
    let file = rules_file(
        ".toml",
        r#"
[safe_patterns]
iam = ["aws iam create-user --user-name ci-"]
"#,
    );
    let guard = guard_with(&file);

    let decision = guard.check("aws iam create-user --user-name ci-runner");
    assert!(decision.is_allowed());
    assert_eq!(
        decision.matched_rule.map(|r| r.category),
        Some(RuleCategory::SafePattern)
    );
    assert!(guard.check("aws iam create-user --user-name bob").is_blocked());
}

#[test]
fn test_service_safe_pattern_flag_override() {
    let file = rules_file(
        ".toml",
        r#"
[dangerous_commands]
s3 = [{ prefix = "aws s3 cp", description = "Copying objects" }]

[safe_patterns]
s3 = ["--dryrun"]
"#,
    );
    let guard = guard_with(&file);

    assert!(guard.check("aws s3 cp ./a s3://bucket/a --dryrun").is_allowed());
    assert!(guard.check("aws s3 cp ./a s3://bucket/a").is_blocked());
    assert!(guard
        .check("aws s3 cp ./a s3://bucket/a --metadata '{\"note\":\"--dryrun\"}'")
        .is_blocked());
    // a service-scoped flag does not override other services
    assert!(guard.check("aws iam create-user --user-name bob --dryrun").is_blocked());
}

#[test]
fn test_replace_merge_drops_builtin_service_rules() {
    let file = rules_file(
        ".json",
        r#"{
  "merge": "replace",
  "dangerous_commands": {
    "iam": [{"prefix": "aws iam delete-user", "description": "Deleting users"}]
  }
}"#,
    );
    let guard = guard_with(&file);

    assert!(guard.check("aws iam create-user --user-name bob").is_allowed());
    assert!(guard.check("aws iam delete-user --user-name bob").is_blocked());
    // services not named in the document keep their rules
    assert!(guard.check("aws s3 rb s3://bucket").is_blocked());
}

#[test]
fn test_unknown_service_is_load_error() {
    let file = rules_file(
        ".yaml",
        r#"
dangerous_commands:
  not-a-service:
    - "aws not-a-service destroy"
"#,
    );
    let err = load_rule_config(Some(file.path())).unwrap_err();
    assert!(matches!(err, ConfigLoadError::UnknownService { .. }), "{err}");
}

#[test]
fn test_invalid_regex_is_load_error() {
    let file = rules_file(
        ".toml",
        r#"
[[regex_rules.s3]]
pattern = "(unclosed"
description = "broken"
"#,
    );
    let err = load_rule_config(Some(file.path())).unwrap_err();
    assert!(matches!(err, ConfigLoadError::InvalidRegex { .. }), "{err}");
}

#[test]
fn test_malformed_document_is_load_error() {
    let file = rules_file(".json", "{ \"dangerous_commands\": ");
    let err = load_rule_config(Some(file.path())).unwrap_err();
    assert!(matches!(err, ConfigLoadError::Parse { .. }), "{err}");
}

#[test]
fn test_missing_document_is_load_error() {
    let mut config = Config::default();
    config.rules.override_file = Some("/nonexistent/aws-command-guard/rules.yaml".to_string());
    let err = CommandGuard::from_config(&config).err().unwrap();
    assert!(matches!(err, ConfigLoadError::Read { .. }), "{err}");
}

#[test]
fn test_config_points_at_override_document() {
    let rules = rules_file(
        ".toml",
        r#"
[dangerous_commands]
sns = ["aws sns publish"]
"#,
    );
    let mut settings = rules_file(".toml", "");
    writeln!(
        settings,
        "[general]\nsecurity_mode = \"permissive\"\naudit_log = false\n\n[rules]\noverride_file = {:?}",
        rules.path().display().to_string()
    )
    .unwrap();

    let config = Config::load_from(settings.path()).unwrap();
    let guard = CommandGuard::from_config(&config).unwrap();

    assert_eq!(guard.mode(), SecurityMode::Permissive);
    assert!(guard.check("aws sns publish --topic-arn t --message m").is_warning());
}

#[test]
fn test_reload_is_atomic_for_concurrent_readers() {
    let guard = CommandGuard::new(RuleConfig::baseline().unwrap(), SecurityMode::Strict);
    let command = "aws iam create-user --user-name bob";

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..200 {
                    let decision = guard.check(command);
                    // either snapshot, never a half-built one
                    assert!(decision.is_blocked() || decision.matched_rule.is_none());
                }
            });
        }
        scope.spawn(|| {
            for i in 0..50 {
                let rules = if i % 2 == 0 {
                    RuleConfig::empty()
                } else {
                    RuleConfig::baseline().unwrap()
                };
                guard.reload_rules(rules);
            }
        });
    });
}
