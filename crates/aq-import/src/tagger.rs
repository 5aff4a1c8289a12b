use std::{collections::BTreeSet, sync::LazyLock};

use aq_db::models::NewQuestion;
use regex::Regex;

/// Service names recognized in question and option text
pub const AWS_SERVICES: &[&str] = &[
    "S3", "EC2", "EBS", "EFS", "RDS", "DynamoDB", "Aurora",
    "Lambda", "API Gateway", "CloudFront", "Route 53", "Route53",
    "VPC", "IAM", "CloudWatch", "CloudTrail", "SNS", "SQS",
    "Kinesis", "Redshift", "Athena", "EMR", "Glue",
    "ElastiCache", "ECS", "EKS", "Fargate", "ECR",
    "CloudFormation", "Elastic Beanstalk", "CodePipeline", "CodeBuild", "CodeDeploy",
    "Secrets Manager", "Systems Manager", "Parameter Store",
    "KMS", "ACM", "WAF", "Shield", "GuardDuty", "Inspector",
    "Config", "Organizations", "Control Tower", "RAM",
    "Direct Connect", "Transit Gateway", "VPN", "PrivateLink",
    "Storage Gateway", "DataSync", "Transfer Family", "Snow",
    "Backup", "FSx", "Global Accelerator", "Auto Scaling",
    "ALB", "NLB", "ELB", "Elastic Load Balancer",
    "SageMaker", "Rekognition", "Comprehend", "Textract", "Polly", "Lex",
    "Step Functions", "EventBridge", "AppSync", "Amplify",
    "Cognito", "Directory Service", "SSO", "Identity Center",
    "Cost Explorer", "Budgets", "Trusted Advisor", "Well-Architected",
    "X-Ray", "Service Catalog", "License Manager",
    "Neptune", "DocumentDB", "QLDB", "Timestream", "Keyspaces",
    "MQ", "MSK", "OpenSearch", "Elasticsearch",
    "Outposts", "Wavelength", "Local Zones",
];

/// (tag, whole-word case-insensitive pattern) per service
static SERVICE_PATTERNS: LazyLock<Vec<(String, Regex)>> = LazyLock::new(|| {
    AWS_SERVICES
        .iter()
        .map(|service| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(service));
            (
                service.replace(' ', "-"),
                Regex::new(&pattern).expect("escaped service name is a valid pattern"),
            )
        })
        .collect()
});

/// Tags of every service named in `text`.
///
/// # Examples
/// ```
/// use aq_import::tagger::extract_tags;
///
/// let tags = extract_tags("Use an API gateway in front of lambda");
/// assert_eq!(tags.into_iter().collect::<Vec<_>>(), ["API-Gateway", "Lambda"]);
/// ```
pub fn extract_tags(text: &str) -> BTreeSet<String> {
    SERVICE_PATTERNS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(text))
        .map(|(tag, _)| tag.clone())
        .collect()
}

/// Sorted tags for a question: its own tags plus every service named in the
/// question text or any option.
pub fn tag_question(question: &NewQuestion) -> Vec<String> {
    let mut tags = extract_tags(&question.question_text);
    for option in question.options.values() {
        tags.extend(extract_tags(option));
    }
    tags.extend(question.tags.iter().cloned());
    tags.into_iter().collect()
}
