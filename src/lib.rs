//! **Show what changed in an AWS resource, snapshot by snapshot.**
//!
//! `awslog` reads the configuration history AWS Config records for a
//! resource and renders unified diffs between consecutive snapshots. It
//! powers the `awslog` command-line tool and can be used as a library with
//! any [`ConfigService`] implementation.
//!
//! ## How it works
//!
//! 1. **Resolve**: a name or id plus an optional type becomes a
//!    [`ResourceIdentity`]. Types are checked against a
//!    [`ResourceTypeRegistry`] before anything goes over the wire; ids like
//!    `i-...` or `sg-...` imply their type.
//! 2. **Fetch**: history is paged lazily through a [`Paginator`], bounded by
//!    count and an exclusive [`TimeWindow`].
//! 3. **Normalize**: each configuration is canonicalized with
//!    [`normalize()`]: keys sorted, JSON embedded in strings (URL-encoded or
//!    not) expanded, so only real changes show up.
//! 4. **Render**: [`DiffRenderer`] diffs configuration, relationships and
//!    supplementary configuration of each adjacent pair.
//!
//! ## Core Concepts & Modules
//!
//! - **[`service`]**: the [`ConfigService`] trait and its HTTP
//!   implementation, [`ConfigClient`], with SigV4 signing and credential
//!   discovery.
//! - **[`resolve`]**: [`Resolver`] and the supported-type registry.
//! - **[`history`]**: [`fetch_history`] turns history pages into [`Snapshot`]s.
//! - **[`normalize`]**: canonical forms for configuration documents.
//! - **[`render`]**: unified diff blocks with optional ANSI color.
//! - **[`pipeline`]**: [`run_history`] ties everything together.
//!
//! ## Example: diffing with a custom service
//!
//! ```no_run
//! use awslog::{run_history, HistoryRequest, ResourceTypeRegistry};
//! use awslog::service::{resolve_region, ConfigClient, ConfigClientConfig, Credentials};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let region = resolve_region(None, None)?;
//!     let client = ConfigClient::new(ConfigClientConfig::new(region), Credentials::load(None)?)?;
//!
//!     let mut request = HistoryRequest::new("sg-0123456789abcdef0");
//!     request.number = 3;
//!
//!     let outcome = run_history(
//!         &client,
//!         &ResourceTypeRegistry::aws_default(),
//!         &request,
//!         &mut std::io::stdout(),
//!     )?;
//!     eprintln!("{} of {} pairs changed", outcome.pairs_changed, outcome.pairs_compared);
//!     Ok(())
//! }
//! ```
//!
//! ## Normalization
//!
//! ```
//! use awslog::{normalize, NormalizeOptions};
//! use serde_json::json;
//!
//! let encoded = json!("%7B%22b%22%3A1%2C%22a%22%3A2%7D");
//! let value = normalize(&encoded, &NormalizeOptions::default());
//! assert_eq!(value.as_value(), &json!({"a": 2, "b": 1}));
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Epoch seconds arrive as f64 and are bounded in practice
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    // Doc completeness: # Errors / # Panics sections are aspirational
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Config and request structs legitimately use many bools for toggle flags
    clippy::struct_excessive_bools,
    // Variable names like `older`/`newer` are clear in context
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod resolve;
pub mod service;
pub mod timeparse;

// Re-export main types for convenience
pub use config::{AppConfig, ConfigError, ConfigOverrides, Validatable};
pub use error::{AwslogError, ErrorContext, Result, UpstreamErrorKind};
pub use history::{fetch_history, HistoryQuery};
pub use model::{ResourceIdentity, Snapshot, TimeWindow};
pub use normalize::{normalize, normalize_value, NormalizeOptions, NormalizedValue};
pub use pipeline::{run_history, HistoryOutcome, HistoryRequest};
pub use render::{render_diff, DiffBlock, DiffLine, DiffRenderer, LineClass};
pub use resolve::{PrefixRule, ResourceTypeRegistry, Resolver};
pub use service::{ConfigClient, ConfigService, Paginator};
pub use timeparse::{parse_time_bound, NaiveTimezone};
