//! Supported resource types and identifier-prefix inference.

use crate::error::{AwslogError, Result};
use regex::Regex;

const NAMESPACE: &str = "AWS::";

/// Resource types AWS Config can record that awslog knows how to query.
const SUPPORTED_TYPES: &[&str] = &[
    "AWS::EC2::CustomerGateway",
    "AWS::EC2::EIP",
    "AWS::EC2::Host",
    "AWS::EC2::Instance",
    "AWS::EC2::InternetGateway",
    "AWS::EC2::NetworkAcl",
    "AWS::EC2::NetworkInterface",
    "AWS::EC2::RouteTable",
    "AWS::EC2::SecurityGroup",
    "AWS::EC2::Subnet",
    "AWS::CloudTrail::Trail",
    "AWS::EC2::Volume",
    "AWS::EC2::VPC",
    "AWS::EC2::VPNConnection",
    "AWS::EC2::VPNGateway",
    "AWS::IAM::Group",
    "AWS::IAM::Policy",
    "AWS::IAM::Role",
    "AWS::IAM::User",
    "AWS::ACM::Certificate",
    "AWS::RDS::DBInstance",
    "AWS::RDS::DBSubnetGroup",
    "AWS::RDS::DBSecurityGroup",
    "AWS::RDS::DBSnapshot",
    "AWS::RDS::EventSubscription",
    "AWS::ElasticLoadBalancingV2::LoadBalancer",
    "AWS::S3::Bucket",
    "AWS::SSM::ManagedInstanceInventory",
    "AWS::Redshift::Cluster",
    "AWS::Redshift::ClusterSnapshot",
    "AWS::Redshift::ClusterParameterGroup",
    "AWS::Redshift::ClusterSecurityGroup",
    "AWS::Redshift::ClusterSubnetGroup",
    "AWS::Redshift::EventSubscription",
    "AWS::CloudWatch::Alarm",
    "AWS::CloudFormation::Stack",
    "AWS::DynamoDB::Table",
    "AWS::AutoScaling::AutoScalingGroup",
    "AWS::AutoScaling::LaunchConfiguration",
    "AWS::AutoScaling::ScalingPolicy",
    "AWS::AutoScaling::ScheduledAction",
    "AWS::CodeBuild::Project",
    "AWS::WAF::RateBasedRule",
    "AWS::WAF::Rule",
    "AWS::WAF::WebACL",
    "AWS::WAFRegional::RateBasedRule",
    "AWS::WAFRegional::Rule",
    "AWS::WAFRegional::WebACL",
    "AWS::CloudFront::Distribution",
    "AWS::CloudFront::StreamingDistribution",
    "AWS::WAF::RuleGroup",
    "AWS::WAFRegional::RuleGroup",
    "AWS::Lambda::Function",
    "AWS::ElasticBeanstalk::Application",
    "AWS::ElasticBeanstalk::ApplicationVersion",
    "AWS::ElasticBeanstalk::Environment",
    "AWS::ElasticLoadBalancing::LoadBalancer",
    "AWS::XRay::EncryptionConfig",
];

/// Identifier shapes that give away the resource type. First match wins.
const PREFIX_RULES: &[(&str, &str)] = &[
    (r"^i-[0-9a-f]+$", "AWS::EC2::Instance"),
    (r"^sg-[0-9a-f]+$", "AWS::EC2::SecurityGroup"),
    (r"^subnet-[0-9a-f]+$", "AWS::EC2::Subnet"),
    (r"^vpc-[0-9a-f]+$", "AWS::EC2::VPC"),
    (r"^vpn-[0-9a-f]+$", "AWS::EC2::VPNConnection"),
    (r"^vgw-[0-9a-f]+$", "AWS::EC2::VPNGateway"),
    (r"^cgw-[0-9a-f]+$", "AWS::EC2::CustomerGateway"),
    (r"^igw-[0-9a-f]+$", "AWS::EC2::InternetGateway"),
    (r"^acl-[0-9a-f]+$", "AWS::EC2::NetworkAcl"),
    (r"^rtb-[0-9a-f]+$", "AWS::EC2::RouteTable"),
    (r"^eni-[0-9a-f]+$", "AWS::EC2::NetworkInterface"),
    (r"^vol-[0-9a-f]+$", "AWS::EC2::Volume"),
    (r"^eipalloc-[0-9a-f]+$", "AWS::EC2::EIP"),
    (r"^h-[0-9a-f]+$", "AWS::EC2::Host"),
    (r"^AROA[0-9A-Z]{12,}$", "AWS::IAM::Role"),
    (r"^AIDA[0-9A-Z]{12,}$", "AWS::IAM::User"),
    (r"^AGPA[0-9A-Z]{12,}$", "AWS::IAM::Group"),
    (r"^ANPA[0-9A-Z]{12,}$", "AWS::IAM::Policy"),
    (r"^arn:aws[a-z-]*:acm:", "AWS::ACM::Certificate"),
    (
        r"^arn:aws[a-z-]*:elasticloadbalancing:.*:loadbalancer/(app|net)/",
        "AWS::ElasticLoadBalancingV2::LoadBalancer",
    ),
];

/// A single identifier-shape rule.
#[derive(Debug, Clone)]
pub struct PrefixRule {
    pattern: Regex,
    resource_type: String,
}

impl PrefixRule {
    /// Compile a rule mapping identifiers matching `pattern` to `resource_type`.
    pub fn new(pattern: &str, resource_type: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| AwslogError::config(format!("Invalid prefix pattern '{pattern}': {e}")))?;
        Ok(Self {
            pattern,
            resource_type: resource_type.into(),
        })
    }

    pub fn matches(&self, identifier: &str) -> bool {
        self.pattern.is_match(identifier)
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }
}

/// Immutable set of supported resource types plus the ordered inference table.
#[derive(Debug, Clone)]
pub struct ResourceTypeRegistry {
    types: Vec<String>,
    rules: Vec<PrefixRule>,
}

impl ResourceTypeRegistry {
    /// Build a registry from explicit types and rules.
    ///
    /// Types missing the `AWS::` namespace get it added. Every rule must
    /// point at one of the given types.
    pub fn new<I, S>(types: I, rules: Vec<PrefixRule>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let types: Vec<String> = types.into_iter().map(|t| with_namespace(t.as_ref())).collect();
        if let Some(rule) = rules
            .iter()
            .find(|r| !types.iter().any(|t| t == r.resource_type()))
        {
            return Err(AwslogError::config(format!(
                "Prefix rule targets unknown resource type {}",
                rule.resource_type()
            )));
        }
        Ok(Self { types, rules })
    }

    /// The registry of types awslog supports out of the box.
    #[must_use]
    pub fn aws_default() -> Self {
        let rules = PREFIX_RULES
            .iter()
            .map(|(pattern, resource_type)| PrefixRule {
                pattern: Regex::new(pattern).expect("static regex"),
                resource_type: (*resource_type).to_string(),
            })
            .collect();
        Self {
            types: SUPPORTED_TYPES.iter().map(|t| (*t).to_string()).collect(),
            rules,
        }
    }

    /// Supported types in registry order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Canonical spelling of a user-supplied type, if supported.
    ///
    /// Accepts `EC2::Instance`, `aws::ec2::instance` and `AWS::EC2::Instance`
    /// alike.
    pub fn canonical_type(&self, input: &str) -> Option<&str> {
        let wanted = with_namespace(input.trim());
        self.types
            .iter()
            .find(|t| t.eq_ignore_ascii_case(&wanted))
            .map(String::as_str)
    }

    pub fn contains(&self, input: &str) -> bool {
        self.canonical_type(input).is_some()
    }

    /// Guess the type of an identifier from its shape.
    pub fn infer_type(&self, identifier: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(identifier))
            .map(PrefixRule::resource_type)
    }
}

impl Default for ResourceTypeRegistry {
    fn default() -> Self {
        Self::aws_default()
    }
}

fn with_namespace(input: &str) -> String {
    let has_namespace = input
        .get(..NAMESPACE.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(NAMESPACE));
    if has_namespace {
        input.to_string()
    } else {
        format!("{NAMESPACE}{input}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_size() {
        let registry = ResourceTypeRegistry::aws_default();
        assert_eq!(registry.len(), 58);
        assert!(registry.types().all(|t| t.starts_with("AWS::")));
    }

    #[test]
    fn test_every_builtin_rule_targets_a_supported_type() {
        let registry = ResourceTypeRegistry::aws_default();
        for (_, resource_type) in PREFIX_RULES {
            assert!(registry.contains(resource_type), "{resource_type}");
        }
    }

    #[test]
    fn test_canonical_type_variants() {
        let registry = ResourceTypeRegistry::aws_default();
        assert_eq!(registry.canonical_type("EC2::Instance"), Some("AWS::EC2::Instance"));
        assert_eq!(
            registry.canonical_type("aws::ec2::securitygroup"),
            Some("AWS::EC2::SecurityGroup")
        );
        assert_eq!(registry.canonical_type("AWS::S3::Bucket"), Some("AWS::S3::Bucket"));
        assert_eq!(registry.canonical_type("AWS::Foo::Bar"), None);
    }

    #[test]
    fn test_infer_ec2_ids() {
        let registry = ResourceTypeRegistry::aws_default();
        assert_eq!(registry.infer_type("i-0123456789abcdef0"), Some("AWS::EC2::Instance"));
        assert_eq!(registry.infer_type("sg-12345678"), Some("AWS::EC2::SecurityGroup"));
        assert_eq!(registry.infer_type("subnet-0abc"), Some("AWS::EC2::Subnet"));
        assert_eq!(registry.infer_type("eipalloc-1234"), Some("AWS::EC2::EIP"));
        assert_eq!(registry.infer_type("my-bucket"), None);
    }

    #[test]
    fn test_infer_iam_and_arns() {
        let registry = ResourceTypeRegistry::aws_default();
        assert_eq!(registry.infer_type("AROAJ2UCCR6DPCEXAMPLE"), Some("AWS::IAM::Role"));
        assert_eq!(
            registry.infer_type("arn:aws:acm:eu-west-1:123456789012:certificate/abc"),
            Some("AWS::ACM::Certificate")
        );
        assert_eq!(
            registry.infer_type(
                "arn:aws:elasticloadbalancing:eu-west-1:123456789012:loadbalancer/app/web/50dc6c495c0c9188"
            ),
            Some("AWS::ElasticLoadBalancingV2::LoadBalancer")
        );
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            PrefixRule::new("^x-", "AWS::Custom::First").unwrap(),
            PrefixRule::new("^x-1", "AWS::Custom::Second").unwrap(),
        ];
        let registry =
            ResourceTypeRegistry::new(["Custom::First", "AWS::Custom::Second"], rules).unwrap();
        assert_eq!(registry.infer_type("x-1"), Some("AWS::Custom::First"));
    }

    #[test]
    fn test_rule_for_unknown_type_rejected() {
        let rules = vec![PrefixRule::new("^q-", "AWS::Nope::Thing").unwrap()];
        assert!(ResourceTypeRegistry::new(["AWS::EC2::VPC"], rules).is_err());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(PrefixRule::new("(unclosed", "AWS::EC2::VPC").is_err());
    }
}
