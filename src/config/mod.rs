//! Configuration module for awslog.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use awslog::config::{load_or_default, ConfigOverrides};
//!
//! let (mut config, loaded_from) = load_or_default(None);
//! config.apply_overrides(&ConfigOverrides {
//!     number: Some(3),
//!     ..ConfigOverrides::default()
//! });
//! ```
//!
//! # Configuration File
//!
//! Place a `.awslog.yaml` file in your project root or `~/.config/awslog/`:
//!
//! ```yaml
//! aws:
//!   region: eu-west-1
//!   profile: audit
//! history:
//!   number: 3
//!   context: 5
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

// Re-export main types
pub use defaults::{DEFAULT_CONTEXT_LINES, DEFAULT_NUMBER, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS};
pub use types::{AppConfig, AwsConfig, ConfigOverrides, HistoryConfig, OutputConfig, TimeConfig};
pub use validation::{ConfigError, Validatable};

// Re-export file utilities
pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.awslog.yaml` config files. It can be used by editors for
/// validation and autocompletion.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).expect("schema serialization should not fail")
}
