//! Regex rules
//!
//! Matched against the full primary command, argument values included.
//! These take precedence over every prefix rule and cannot be overridden
//! by a safe pattern.

use crate::rules::{RegexRuleDef, Service, ServiceKey};

pub const REGEX_RULES: &[RegexRuleDef] = &[
    RegexRuleDef::new(
        ServiceKey::General,
        r#"\s--profile[\s=]+['"]?(?:root|admin|administrator)['"]?(?:\s|$)"#,
        "Prevent use of sensitive profiles",
        "Using sensitive profiles (root, admin, administrator) is restricted",
    ),
    RegexRuleDef::new(
        ServiceKey::General,
        r"\bconfigure\s+set\s+(?:\S+\.)?(?:aws_access_key_id|aws_secret_access_key|aws_session_token)\b",
        "Prevent writing credentials into CLI configuration",
        "Storing credentials with `aws configure set` is restricted",
    ),
    RegexRuleDef::new(
        ServiceKey::General,
        r"\s--no-verify-ssl\b",
        "Prevent disabling TLS certificate verification",
        "Disabling TLS certificate verification (--no-verify-ssl) is restricted",
    ),
    RegexRuleDef::new(
        ServiceKey::Service(Service::Iam),
        r"\biam\s+attach-(?:user|role|group)-policy\b.*\bpolicy/AdministratorAccess\b",
        "Prevent attaching the AdministratorAccess managed policy",
        "Attaching the AdministratorAccess policy is restricted; request a narrower policy",
    ),
    RegexRuleDef::new(
        ServiceKey::Service(Service::Iam),
        r#"\biam\s+(?:put-(?:user|role|group)-policy|create-policy(?:-version)?)\b.*\\?"Action\\?"\s*:\s*(?:\[\s*)?\\?"\*\\?""#,
        "Prevent policies that grant every action",
        "Policies granting all actions (\"Action\": \"*\") are restricted; list the actions needed",
    ),
    RegexRuleDef::new(
        ServiceKey::Service(Service::S3Api),
        r#"\bs3api\s+put-bucket-policy\b.*\\?"Principal\\?"\s*:\s*(?:\{\s*\\?"AWS\\?"\s*:\s*)?\\?"\*\\?""#,
        "Prevent public bucket policies",
        "Creating public bucket policies (\"Principal\": \"*\") is restricted",
    ),
    RegexRuleDef::new(
        ServiceKey::Service(Service::S3Api),
        r"\bs3api\s+put-(?:bucket|object)-acl\b.*(?:--acl[\s=]+public-read(?:-write)?\b|groups/global/(?:AllUsers|AuthenticatedUsers))",
        "Prevent public ACLs",
        "Public bucket and object ACLs are restricted",
    ),
    RegexRuleDef::new(
        ServiceKey::Service(Service::S3),
        r"\bs3\s+(?:cp|mv|sync)\b.*--acl[\s=]+public-read(?:-write)?\b",
        "Prevent uploading public objects",
        "Uploading objects with a public ACL is restricted",
    ),
    RegexRuleDef::new(
        ServiceKey::Service(Service::Ec2),
        r"\bec2\s+authorize-security-group-ingress\b(?:.*--port[\s=]+(?:22|3389)\b.*--cidr[\s=]+0\.0\.0\.0/0|.*--cidr[\s=]+0\.0\.0\.0/0.*--port[\s=]+(?:22|3389)\b)",
        "Prevent opening SSH or RDP to the internet",
        "Opening SSH (22) or RDP (3389) to 0.0.0.0/0 is restricted",
    ),
    RegexRuleDef::new(
        ServiceKey::Service(Service::Lambda),
        r#"\blambda\s+add-permission\b.*--principal[\s=]+['"]?\*"#,
        "Prevent public function invocation",
        "Granting invoke permission to every principal (*) is restricted",
    ),
];
