//! Safe patterns that override a dangerous-prefix match
//!
//! Entries starting with `aws` must lead the command, flags may appear
//! anywhere, bare words must close it. They never undo a regex block.

use crate::rules::{PrefixRule, Service, ServiceKey};

const fn general(prefix: &'static str, description: &'static str) -> PrefixRule {
    PrefixRule::new(ServiceKey::General, prefix, description)
}

const fn rule(service: Service, prefix: &'static str, description: &'static str) -> PrefixRule {
    PrefixRule::new(ServiceKey::Service(service), prefix, description)
}

pub const SAFE_PATTERNS: &[PrefixRule] = &[
    general("--help", "Help output"),
    general("help", "Help output"),
    general("--dry-run", "Dry runs check permissions without acting"),
    general("--generate-cli-skeleton", "Skeleton generation prints a template without acting"),
    rule(Service::Iam, "aws iam get-", "Reading IAM configuration"),
    rule(Service::Iam, "aws iam list-", "Listing IAM resources"),
    rule(Service::Iam, "aws iam simulate-", "Simulating IAM policies"),
    rule(Service::Iam, "aws iam generate-credential-report", "Generating the credential report"),
    rule(Service::Organizations, "aws organizations describe-", "Reading organization configuration"),
    rule(Service::Organizations, "aws organizations list-", "Listing organization resources"),
    rule(Service::CloudTrail, "aws cloudtrail describe-", "Reading trail configuration"),
    rule(Service::CloudTrail, "aws cloudtrail get-", "Reading trail status"),
    rule(Service::CloudTrail, "aws cloudtrail lookup-events", "Reading audit events"),
    rule(Service::GuardDuty, "aws guardduty get-", "Reading detector configuration"),
    rule(Service::GuardDuty, "aws guardduty list-", "Listing findings"),
    rule(Service::S3, "aws s3 ls", "Listing buckets and objects"),
    rule(Service::S3Api, "aws s3api get-", "Reading bucket and object configuration"),
    rule(Service::S3Api, "aws s3api list-", "Listing buckets and objects"),
    rule(Service::S3Api, "aws s3api head-", "Reading object metadata"),
    rule(Service::Ec2, "aws ec2 describe-", "Describing EC2 resources"),
    rule(Service::Rds, "aws rds describe-", "Describing database resources"),
    rule(Service::DynamoDb, "aws dynamodb describe-", "Describing tables"),
    rule(Service::DynamoDb, "aws dynamodb list-", "Listing tables"),
    rule(Service::Kms, "aws kms describe-", "Describing keys"),
    rule(Service::Kms, "aws kms list-", "Listing keys"),
    rule(Service::SecretsManager, "aws secretsmanager describe-secret", "Reading secret metadata"),
    rule(Service::SecretsManager, "aws secretsmanager list-", "Listing secrets"),
    rule(Service::Lambda, "aws lambda get-", "Reading function configuration"),
    rule(Service::Lambda, "aws lambda list-", "Listing functions"),
    rule(Service::CloudFormation, "aws cloudformation describe-", "Describing stacks"),
    rule(Service::CloudFormation, "aws cloudformation list-", "Listing stacks"),
    rule(Service::Logs, "aws logs describe-", "Describing log groups"),
    rule(Service::Logs, "aws logs filter-log-events", "Reading log events"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_patterns_are_prefixes() {
        for rule in SAFE_PATTERNS {
            if let ServiceKey::Service(service) = rule.key {
                let expected = format!("aws {} ", service.as_str());
                assert!(rule.prefix.starts_with(&expected), "{}", rule.prefix);
            }
        }
    }

    #[test]
    fn test_general_help_present() {
        assert!(SAFE_PATTERNS
            .iter()
            .any(|r| r.key == ServiceKey::General && r.prefix == "--help"));
    }
}
