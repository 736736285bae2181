//! AWS Config HTTP client (JSON 1.1 protocol over blocking reqwest).

use super::credentials::Credentials;
use super::sigv4::{sign_json_post, SigningParams};
use super::types::{
    ConfigHistoryRequest, ConfigurationItem, DiscoveredResource, ListDiscoveredResourcesRequest,
    Page,
};
use super::ConfigService;
use crate::error::{AwslogError, Result, UpstreamErrorKind};
use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;

const SERVICE: &str = "config";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const TARGET_PREFIX: &str = "StarlingDoveService";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// AWS Config client configuration.
#[derive(Debug, Clone)]
pub struct ConfigClientConfig {
    /// AWS region, e.g. `eu-west-1`
    pub region: String,
    /// Endpoint override (LocalStack, VPC endpoints, proxies under a path)
    pub endpoint_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl ConfigClientConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// The URL requests are sent to.
    pub fn endpoint(&self) -> Result<Url> {
        let raw = self
            .endpoint_url
            .clone()
            .unwrap_or_else(|| format!("https://config.{}.amazonaws.com/", self.region));
        Url::parse(&raw).map_err(|e| AwslogError::config(format!("invalid endpoint URL '{raw}': {e}")))
    }
}

/// Blocking HTTP client for the AWS Config API.
pub struct ConfigClient {
    client: Client,
    endpoint: Url,
    host: String,
    path: String,
    region: String,
    credentials: Credentials,
}

/// Helper to convert reqwest errors to upstream errors
fn network_error(operation: &str, err: reqwest::Error) -> AwslogError {
    AwslogError::upstream(operation, UpstreamErrorKind::Network(err.to_string()))
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    code: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

/// Map a non-success response body to an upstream error.
fn service_error(operation: &str, status: u16, body: &str) -> AwslogError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let (code, message) = match parsed {
        Some(ErrorBody { code, message }) => (
            code.unwrap_or_else(|| format!("HTTP {status}")),
            message.unwrap_or_default(),
        ),
        None => (format!("HTTP {status}"), body.trim().to_string()),
    };
    AwslogError::upstream(operation, UpstreamErrorKind::from_service_code(&code, message))
}

impl ConfigClient {
    /// Create a new AWS Config client.
    pub fn new(config: ConfigClientConfig, credentials: Credentials) -> Result<Self> {
        let endpoint = config.endpoint()?;
        let host = match (endpoint.host_str(), endpoint.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(AwslogError::config(format!(
                    "endpoint URL has no host: {endpoint}"
                )))
            }
        };

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| network_error("creating HTTP client", e))?;

        tracing::debug!("AWS Config endpoint: {}", endpoint);

        let path = endpoint.path().to_string();
        Ok(Self {
            client,
            endpoint,
            host,
            path,
            region: config.region,
            credentials,
        })
    }

    /// Send one signed JSON request and decode the response.
    fn call<B: Serialize, R: DeserializeOwned>(&self, operation: &str, body: &B) -> Result<R> {
        let payload = serde_json::to_vec(body).map_err(|e| {
            AwslogError::upstream(operation, UpstreamErrorKind::Validation(e.to_string()))
        })?;
        let target = format!("{TARGET_PREFIX}.{operation}");

        let params = SigningParams {
            credentials: &self.credentials,
            region: &self.region,
            service: SERVICE,
            time: Utc::now(),
        };
        let signed = sign_json_post(
            &params,
            &self.host,
            &self.path,
            CONTENT_TYPE,
            &target,
            &payload,
        );

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header("content-type", CONTENT_TYPE)
            .header("x-amz-target", target.as_str())
            .header("x-amz-date", signed.amz_date.as_str())
            .header("authorization", signed.authorization.as_str());
        if let Some(token) = &signed.security_token {
            request = request.header("x-amz-security-token", token.as_str());
        }

        tracing::debug!("POST {} ({})", self.endpoint, target);
        let response = request
            .body(payload)
            .send()
            .map_err(|e| network_error(operation, e))?;

        let status = response.status();
        let text = response.text().map_err(|e| network_error(operation, e))?;
        if !status.is_success() {
            return Err(service_error(operation, status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            AwslogError::upstream(operation, UpstreamErrorKind::InvalidResponse(e.to_string()))
        })
    }
}

impl ConfigService for ConfigClient {
    fn list_discovered_resources(
        &self,
        request: &ListDiscoveredResourcesRequest,
    ) -> Result<Page<DiscoveredResource>> {
        let body = ListDiscoveredResourcesBody {
            resource_type: &request.resource_type,
            resource_name: &request.resource_name,
            include_deleted_resources: request.include_deleted,
            limit: request.limit,
            next_token: request.next_token.as_deref(),
        };
        let response: ListDiscoveredResourcesResponse =
            self.call("ListDiscoveredResources", &body)?;
        Ok(response.into_page())
    }

    fn get_resource_config_history(
        &self,
        request: &ConfigHistoryRequest,
    ) -> Result<Page<ConfigurationItem>> {
        let body = GetResourceConfigHistoryBody {
            resource_type: &request.resource_type,
            resource_id: &request.resource_id,
            earlier_time: request.earlier_time.map(to_epoch_seconds),
            later_time: request.later_time.map(to_epoch_seconds),
            chronological_order: "Reverse",
            limit: request.limit,
            next_token: request.next_token.as_deref(),
        };
        let response: GetResourceConfigHistoryResponse =
            self.call("GetResourceConfigHistory", &body)?;
        Ok(response.into_page())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListDiscoveredResourcesBody<'a> {
    resource_type: &'a str,
    resource_name: &'a str,
    include_deleted_resources: bool,
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDiscoveredResourcesResponse {
    #[serde(default)]
    resource_identifiers: Vec<ResourceIdentifierWire>,
    next_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceIdentifierWire {
    #[serde(default)]
    resource_type: String,
    resource_id: String,
    resource_name: Option<String>,
}

impl ListDiscoveredResourcesResponse {
    fn into_page(self) -> Page<DiscoveredResource> {
        let items = self
            .resource_identifiers
            .into_iter()
            .map(|r| DiscoveredResource {
                resource_type: r.resource_type,
                resource_id: r.resource_id,
                resource_name: r.resource_name,
            })
            .collect();
        Page {
            items,
            next_token: self.next_token.filter(|t| !t.is_empty()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GetResourceConfigHistoryBody<'a> {
    resource_type: &'a str,
    resource_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    earlier_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    later_time: Option<f64>,
    chronological_order: &'static str,
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetResourceConfigHistoryResponse {
    #[serde(default)]
    configuration_items: Vec<ConfigurationItemWire>,
    next_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigurationItemWire {
    #[serde(deserialize_with = "epoch_seconds")]
    configuration_item_capture_time: DateTime<Utc>,
    #[serde(default)]
    arn: String,
    resource_id: Option<String>,
    configuration_item_status: Option<String>,
    #[serde(default)]
    configuration: Value,
    #[serde(default)]
    relationships: Value,
    #[serde(default)]
    supplementary_configuration: Value,
}

impl GetResourceConfigHistoryResponse {
    fn into_page(self) -> Page<ConfigurationItem> {
        let items = self
            .configuration_items
            .into_iter()
            .map(|item| ConfigurationItem {
                capture_time: item.configuration_item_capture_time,
                arn: item.arn,
                resource_id: item.resource_id,
                status: item.configuration_item_status,
                configuration: item.configuration,
                relationships: item.relationships,
                supplementary_configuration: item.supplementary_configuration,
            })
            .collect();
        Page {
            items,
            next_token: self.next_token.filter(|t| !t.is_empty()),
        }
    }
}

/// Millisecond precision, the same as the service reports capture times.
fn to_epoch_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// AWS JSON timestamps are fractional epoch seconds.
fn epoch_seconds<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = f64::deserialize(deserializer)?;
    let millis = (seconds * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {seconds}")))
}
