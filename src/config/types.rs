//! Configuration types for awslog.

use super::defaults::{
    DEFAULT_CONTEXT_LINES, DEFAULT_NUMBER, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS,
};
use crate::timeparse::NaiveTimezone;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// Every section has defaults, so a config file only needs the keys it
/// wants to change. CLI arguments are layered on top via [`ConfigOverrides`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// AWS connection settings
    pub aws: AwsConfig,
    /// What history to fetch and how to diff it
    pub history: HistoryConfig,
    /// Output configuration
    pub output: OutputConfig,
    /// Date/time interpretation
    pub time: TimeConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// AWS connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AwsConfig {
    /// Region to query; falls back to the AWS environment and shared config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Named profile in the shared credentials/config files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Endpoint override, e.g. `http://localhost:4566` for LocalStack
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    /// Request timeout in seconds
    #[schemars(range(min = 1))]
    pub timeout_secs: u64,
    /// Items requested per page (AWS allows at most 100)
    #[schemars(range(min = 1, max = 100))]
    pub page_size: usize,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: None,
            profile: None,
            endpoint_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// History retrieval and diff settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct HistoryConfig {
    /// Number of changes to show
    #[schemars(range(min = 1))]
    pub number: usize,
    /// Lines of context around each change
    pub context: usize,
    /// Include resources AWS Config recorded as deleted
    pub include_deleted: bool,
    /// Sort list elements before diffing
    pub sort_lists: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            number: DEFAULT_NUMBER,
            context: DEFAULT_CONTEXT_LINES,
            include_deleted: false,
            sort_lists: false,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Disable colored output
    pub no_color: bool,
}

/// Date/time interpretation for `--before` / `--after`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TimeConfig {
    /// Timezone for date-times written without an offset
    pub naive_timezone: NaiveTimezone,
}

// ============================================================================
// CLI overrides
// ============================================================================

/// Values given on the command line. `None`/`false` leaves the file value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
    pub number: Option<usize>,
    pub context: Option<usize>,
    pub include_deleted: bool,
    pub sort_lists: bool,
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.aws.timeout_secs, 30);
        assert_eq!(config.aws.page_size, 100);
        assert_eq!(config.history.number, 1);
        assert_eq!(config.history.context, 10);
        assert!(!config.history.sort_lists);
        assert_eq!(config.time.naive_timezone, NaiveTimezone::Local);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AppConfig = serde_yaml::from_str("history:\n  number: 3\n").unwrap();
        assert_eq!(config.history.number, 3);
        assert_eq!(config.history.context, 10);
        assert_eq!(config.aws, AwsConfig::default());
    }

    #[test]
    fn test_timezone_spelling() {
        let config: AppConfig = serde_yaml::from_str("time:\n  naive_timezone: utc\n").unwrap();
        assert_eq!(config.time.naive_timezone, NaiveTimezone::Utc);
    }

    #[test]
    fn test_unset_options_are_not_serialized() {
        let yaml = serde_yaml::to_string(&AppConfig::default()).unwrap();
        assert!(!yaml.contains("region"));
        assert!(yaml.contains("page_size: 100"));
    }
}
