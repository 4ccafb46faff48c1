//! Dangerous command prefixes
//!
//! Each entry is a leading substring of an AWS CLI invocation that changes
//! identity, audit, data or infrastructure state in a way that is hard to
//! undo. Anything not listed here (or caught by a regex rule) is allowed.

use crate::rules::{PrefixRule, Service, ServiceKey};

const fn rule(service: Service, prefix: &'static str, description: &'static str) -> PrefixRule {
    PrefixRule::new(ServiceKey::Service(service), prefix, description)
}

pub const DANGEROUS_COMMANDS: &[PrefixRule] = &[
    // Identity and access
    rule(Service::Iam, "aws iam create-user", "Creating IAM users grants new identities access to the account"),
    rule(Service::Iam, "aws iam create-access-key", "Creating access keys issues long-lived credentials"),
    rule(Service::Iam, "aws iam update-access-key", "Reactivating or changing access keys alters credential state"),
    rule(Service::Iam, "aws iam create-login-profile", "Creating console passwords enables interactive sign-in"),
    rule(Service::Iam, "aws iam update-login-profile", "Changing console passwords can take over a user"),
    rule(Service::Iam, "aws iam attach-user-policy", "Attaching policies to users escalates their permissions"),
    rule(Service::Iam, "aws iam attach-role-policy", "Attaching policies to roles escalates their permissions"),
    rule(Service::Iam, "aws iam attach-group-policy", "Attaching policies to groups escalates member permissions"),
    rule(Service::Iam, "aws iam put-user-policy", "Inline user policies escalate permissions"),
    rule(Service::Iam, "aws iam put-role-policy", "Inline role policies escalate permissions"),
    rule(Service::Iam, "aws iam put-group-policy", "Inline group policies escalate member permissions"),
    rule(Service::Iam, "aws iam create-policy-version", "New policy versions can silently widen existing policies"),
    rule(Service::Iam, "aws iam update-assume-role-policy", "Changing role trust policies lets new principals assume the role"),
    rule(Service::Iam, "aws iam add-user-to-group", "Adding users to groups escalates their permissions"),
    rule(Service::Iam, "aws iam delete-user", "Deleting IAM users removes identities and their audit trail"),
    rule(Service::Iam, "aws iam delete-role", "Deleting IAM roles breaks workloads that assume them"),
    rule(Service::Iam, "aws iam deactivate-mfa-device", "Deactivating MFA weakens account protection"),
    rule(Service::Organizations, "aws organizations leave-organization", "Leaving the organization removes guardrails applied to the account"),
    rule(Service::Organizations, "aws organizations delete-organization", "Deleting the organization removes all organization controls"),
    rule(Service::Organizations, "aws organizations remove-account-from-organization", "Removing accounts detaches them from organization policies"),
    rule(Service::Organizations, "aws organizations detach-policy", "Detaching service control policies lifts organization restrictions"),
    rule(Service::Sts, "aws sts get-federation-token", "Federation tokens mint credentials outside normal role controls"),
    // Audit and detection
    rule(Service::CloudTrail, "aws cloudtrail stop-logging", "Stopping CloudTrail logging hides account activity"),
    rule(Service::CloudTrail, "aws cloudtrail delete-trail", "Deleting trails removes the account audit log"),
    rule(Service::CloudTrail, "aws cloudtrail update-trail", "Changing trails can redirect or disable audit logging"),
    rule(Service::CloudTrail, "aws cloudtrail put-event-selectors", "Changing event selectors can exclude activity from the audit log"),
    rule(Service::GuardDuty, "aws guardduty delete-detector", "Deleting detectors disables threat detection"),
    rule(Service::GuardDuty, "aws guardduty disassociate-from-master-account", "Disassociating hides findings from the security account"),
    rule(Service::GuardDuty, "aws guardduty update-detector", "Changing detectors can disable threat detection"),
    rule(Service::ConfigService, "aws configservice stop-configuration-recorder", "Stopping the configuration recorder hides resource changes"),
    rule(Service::ConfigService, "aws configservice delete-configuration-recorder", "Deleting the configuration recorder hides resource changes"),
    rule(Service::ConfigService, "aws configservice delete-delivery-channel", "Deleting delivery channels stops configuration history"),
    rule(Service::SecurityHub, "aws securityhub disable-security-hub", "Disabling Security Hub removes security findings"),
    // Data
    rule(Service::S3, "aws s3 rb", "Removing buckets deletes stored data"),
    rule(Service::S3, "aws s3 rm", "Removing objects deletes stored data"),
    rule(Service::S3Api, "aws s3api delete-bucket", "Deleting buckets or bucket configuration destroys data or protections"),
    rule(Service::S3Api, "aws s3api delete-object", "Deleting objects destroys stored data"),
    rule(Service::S3Api, "aws s3api put-bucket-policy", "Bucket policies can expose data publicly"),
    rule(Service::S3Api, "aws s3api put-bucket-acl", "Bucket ACLs can expose data publicly"),
    rule(Service::S3Api, "aws s3api put-object-acl", "Object ACLs can expose data publicly"),
    rule(Service::S3Api, "aws s3api delete-public-access-block", "Removing the public access block allows public exposure"),
    rule(Service::Rds, "aws rds delete-db-instance", "Deleting database instances destroys data"),
    rule(Service::Rds, "aws rds delete-db-cluster", "Deleting database clusters destroys data"),
    rule(Service::Rds, "aws rds modify-db-instance", "Modifying database instances can expose or disrupt them"),
    rule(Service::Rds, "aws rds delete-db-snapshot", "Deleting snapshots destroys backups"),
    rule(Service::DynamoDb, "aws dynamodb delete-table", "Deleting tables destroys data"),
    rule(Service::DynamoDb, "aws dynamodb delete-backup", "Deleting backups destroys recovery points"),
    rule(Service::Kms, "aws kms schedule-key-deletion", "Deleting KMS keys makes encrypted data unrecoverable"),
    rule(Service::Kms, "aws kms disable-key", "Disabling KMS keys blocks access to encrypted data"),
    rule(Service::Kms, "aws kms put-key-policy", "Key policies control who can decrypt data"),
    rule(Service::Kms, "aws kms create-grant", "Grants give other principals use of the key"),
    rule(Service::SecretsManager, "aws secretsmanager delete-secret", "Deleting secrets breaks dependent workloads"),
    rule(Service::SecretsManager, "aws secretsmanager put-secret-value", "Overwriting secret values breaks dependent workloads"),
    rule(Service::SecretsManager, "aws secretsmanager get-secret-value", "Reading secret values exposes credentials"),
    rule(Service::Ssm, "aws ssm get-parameter --with-decryption", "Decrypting parameters exposes secrets"),
    rule(Service::Ssm, "aws ssm send-command", "Remote commands execute arbitrary code on instances"),
    rule(Service::Backup, "aws backup delete-backup-vault", "Deleting backup vaults destroys recovery points"),
    rule(Service::Backup, "aws backup delete-recovery-point", "Deleting recovery points destroys backups"),
    // Compute and infrastructure
    rule(Service::Ec2, "aws ec2 terminate-instances", "Terminating instances destroys them and their instance storage"),
    rule(Service::Ec2, "aws ec2 delete-vpc", "Deleting VPCs removes network infrastructure"),
    rule(Service::Ec2, "aws ec2 delete-subnet", "Deleting subnets removes network infrastructure"),
    rule(Service::Ec2, "aws ec2 delete-security-group", "Deleting security groups removes network controls"),
    rule(Service::Ec2, "aws ec2 authorize-security-group-ingress", "Opening security group ingress exposes resources to the network"),
    rule(Service::Ec2, "aws ec2 modify-instance-attribute", "Modifying instance attributes can change user data or security groups"),
    rule(Service::Ec2, "aws ec2 delete-volume", "Deleting volumes destroys data"),
    rule(Service::Ec2, "aws ec2 delete-snapshot", "Deleting snapshots destroys backups"),
    rule(Service::Ec2, "aws ec2 modify-snapshot-attribute", "Snapshot permissions can share data with other accounts"),
    rule(Service::Ec2, "aws ec2 modify-image-attribute", "Image permissions can share AMIs with other accounts"),
    rule(Service::Lambda, "aws lambda delete-function", "Deleting functions breaks dependent workloads"),
    rule(Service::Lambda, "aws lambda add-permission", "Function permissions let other principals invoke it"),
    rule(Service::Lambda, "aws lambda update-function-code", "Replacing function code runs arbitrary code"),
    rule(Service::Lambda, "aws lambda update-function-configuration", "Changing function configuration can alter roles and environment"),
    rule(Service::CloudFormation, "aws cloudformation delete-stack", "Deleting stacks removes every resource they manage"),
    rule(Service::Eks, "aws eks delete-cluster", "Deleting clusters removes running workloads"),
    rule(Service::Ecs, "aws ecs delete-cluster", "Deleting clusters removes running workloads"),
    rule(Service::Ecr, "aws ecr delete-repository", "Deleting repositories destroys container images"),
    rule(Service::Ecr, "aws ecr set-repository-policy", "Repository policies can expose images"),
    rule(Service::Route53, "aws route53 delete-hosted-zone", "Deleting hosted zones breaks DNS"),
    rule(Service::Route53, "aws route53 change-resource-record-sets", "Changing DNS records can redirect traffic"),
    rule(Service::Sns, "aws sns delete-topic", "Deleting topics breaks notifications"),
    rule(Service::Sqs, "aws sqs delete-queue", "Deleting queues destroys messages"),
    rule(Service::Sqs, "aws sqs purge-queue", "Purging queues destroys messages"),
    rule(Service::Logs, "aws logs delete-log-group", "Deleting log groups destroys logs"),
    rule(Service::Logs, "aws logs put-retention-policy", "Shortening retention destroys logs"),
    rule(Service::Wafv2, "aws wafv2 delete-web-acl", "Deleting web ACLs removes application protection"),
];
