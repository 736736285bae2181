//! Request and response types for the AWS Config operations awslog uses.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// One page of results plus the token for the next page, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// A page with no continuation.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }

    /// A page followed by another one.
    pub fn with_next(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: Some(next_token.into()),
        }
    }
}

/// Parameters for `ListDiscoveredResources`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDiscoveredResourcesRequest {
    pub resource_type: String,
    pub resource_name: String,
    pub include_deleted: bool,
    pub limit: usize,
    pub next_token: Option<String>,
}

/// A resource returned by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredResource {
    pub resource_type: String,
    pub resource_id: String,
    pub resource_name: Option<String>,
}

impl DiscoveredResource {
    pub fn new(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            resource_name: None,
        }
    }
}

/// Parameters for `GetResourceConfigHistory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigHistoryRequest {
    pub resource_type: String,
    pub resource_id: String,
    /// Lower time bound (`earlierTime`)
    pub earlier_time: Option<DateTime<Utc>>,
    /// Upper time bound (`laterTime`)
    pub later_time: Option<DateTime<Utc>>,
    pub limit: usize,
    pub next_token: Option<String>,
}

/// A configuration item as delivered by the history API.
///
/// `configuration` is whatever the service sent: the real API delivers a
/// JSON document serialized into a string, which the normalizer expands.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationItem {
    pub capture_time: DateTime<Utc>,
    pub arn: String,
    pub resource_id: Option<String>,
    pub status: Option<String>,
    pub configuration: Value,
    pub relationships: Value,
    pub supplementary_configuration: Value,
}

impl ConfigurationItem {
    /// Item with the given configuration and no relationships.
    pub fn new(capture_time: DateTime<Utc>, arn: impl Into<String>, configuration: Value) -> Self {
        Self {
            capture_time,
            arn: arn.into(),
            resource_id: None,
            status: None,
            configuration,
            relationships: Value::Array(Vec::new()),
            supplementary_configuration: Value::Null,
        }
    }
}
