//! Configuration validation for awslog.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{AppConfig, AwsConfig, HistoryConfig};
use crate::service::MAX_PAGE_SIZE;
use regex::Regex;
use std::sync::OnceLock;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.aws.validate());
        errors.extend(self.history.validate());
        errors
    }
}

fn region_pattern() -> &'static Regex {
    static REGION: OnceLock<Regex> = OnceLock::new();
    REGION.get_or_init(|| Regex::new(r"^[a-z]{2}(-[a-z]+)+-\d+$").expect("static regex"))
}

impl Validatable for AwsConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref region) = self.region {
            if !region_pattern().is_match(region) {
                errors.push(ConfigError::new(
                    "aws.region",
                    format!("'{region}' does not look like an AWS region (e.g. eu-west-1)"),
                ));
            }
        }

        if let Some(ref url) = self.endpoint_url {
            match reqwest::Url::parse(url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => errors.push(ConfigError::new(
                    "aws.endpoint_url",
                    format!("Unsupported scheme '{}', use http or https", parsed.scheme()),
                )),
                Err(e) => errors.push(ConfigError::new(
                    "aws.endpoint_url",
                    format!("Invalid URL '{url}': {e}"),
                )),
            }
        }

        if self.timeout_secs == 0 {
            errors.push(ConfigError::new("aws.timeout_secs", "Timeout must be at least 1 second"));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            errors.push(ConfigError::new(
                "aws.page_size",
                format!(
                    "Page size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                    self.page_size
                ),
            ));
        }

        errors
    }
}

impl Validatable for HistoryConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.number == 0 {
            errors.push(ConfigError::new("history.number", "Number of changes must be at least 1"));
        }
        errors
    }
}

// ============================================================================
// Tests
// ============================================================================
