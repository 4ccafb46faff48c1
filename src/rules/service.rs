//! AWS service identifiers used to key rules

use serde::{Serialize, Serializer};
use std::fmt;

macro_rules! services {
    ($($variant:ident => $name:literal,)+) => {
        /// Closed set of AWS CLI service names that can carry service rules
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Service {
            $($variant,)+
        }

        impl Service {
            pub const ALL: &'static [Service] = &[$(Service::$variant,)+];

            /// The CLI spelling (`aws <service> ...`)
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Service::$variant => $name,)+
                }
            }

            /// Parse a CLI service token. Case-sensitive, like the CLI itself.
            pub fn from_str(s: &str) -> Option<Self> {
                match s {
                    $($name => Some(Service::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

services! {
    Acm => "acm",
    ApiGateway => "apigateway",
    Athena => "athena",
    AutoScaling => "autoscaling",
    Backup => "backup",
    CloudFormation => "cloudformation",
    CloudFront => "cloudfront",
    CloudTrail => "cloudtrail",
    CloudWatch => "cloudwatch",
    CognitoIdp => "cognito-idp",
    ConfigService => "configservice",
    DynamoDb => "dynamodb",
    Ec2 => "ec2",
    Ecr => "ecr",
    Ecs => "ecs",
    Efs => "efs",
    Eks => "eks",
    ElastiCache => "elasticache",
    Elbv2 => "elbv2",
    Events => "events",
    Glue => "glue",
    GuardDuty => "guardduty",
    Iam => "iam",
    Kinesis => "kinesis",
    Kms => "kms",
    Lambda => "lambda",
    Logs => "logs",
    Organizations => "organizations",
    Rds => "rds",
    Redshift => "redshift",
    Route53 => "route53",
    S3 => "s3",
    S3Api => "s3api",
    SecretsManager => "secretsmanager",
    SecurityHub => "securityhub",
    Sns => "sns",
    Sqs => "sqs",
    Ssm => "ssm",
    StepFunctions => "stepfunctions",
    Sts => "sts",
    Wafv2 => "wafv2",
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of a rule list: the universal `general` bucket or one service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceKey {
    General,
    Service(Service),
}

impl ServiceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKey::General => "general",
            ServiceKey::Service(service) => service.as_str(),
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        if s == "general" {
            return Some(ServiceKey::General);
        }
        Service::from_str(s).map(ServiceKey::Service)
    }
}

impl From<Service> for ServiceKey {
    fn from(service: Service) -> Self {
        ServiceKey::Service(service)
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ServiceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
