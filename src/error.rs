//! Unified error types for awslog.
//!
//! Every failure aborts the run: resolution and validation problems are
//! reported to the user as-is, upstream failures carry the operation that
//! was in flight as context.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for awslog operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AwslogError {
    /// An explicit resource type is not in the supported registry
    #[error("Unsupported resource type: {resource_type} (see --list-types)")]
    UnsupportedType { resource_type: String },

    /// No type was given and the identifier matched no known prefix
    #[error("Cannot infer resource type for '{name}', pass one with --type")]
    UnresolvedType { name: String },

    /// Discovery returned more than one resource for a name
    #[error("Multiple resources found for {name} with type {resource_type}")]
    AmbiguousResource { name: String, resource_type: String },

    /// Failures surfaced by the AWS Config service or its transport
    #[error("AWS Config request failed: {context}")]
    Upstream {
        context: String,
        #[source]
        source: UpstreamErrorKind,
    },

    /// A --before/--after value could not be understood
    #[error("Cannot parse date/time '{input}'")]
    DateParse { input: String },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Specific upstream error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum UpstreamErrorKind {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited: {0}")]
    Throttled(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not discovered: {0}")]
    ResourceNotDiscovered(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("{code}: {message}")]
    Service { code: String, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("No credentials: {0}")]
    Credentials(String),
}

impl UpstreamErrorKind {
    /// Classify an AWS JSON error code (the `__type` field) into a kind.
    ///
    /// Codes may arrive namespaced (`com.amazonaws...#ThrottlingException`),
    /// only the part after `#` is significant.
    #[must_use]
    pub fn from_service_code(code: &str, message: String) -> Self {
        let short = code.rsplit('#').next().unwrap_or(code);
        match short {
            "ThrottlingException" | "Throttling" | "TooManyRequestsException" => {
                Self::Throttled(message)
            }
            "AccessDeniedException"
            | "UnrecognizedClientException"
            | "InvalidSignatureException"
            | "ExpiredTokenException"
            | "MissingAuthenticationTokenException" => Self::AccessDenied(message),
            "ResourceNotDiscoveredException" => Self::ResourceNotDiscovered(message),
            "ValidationException"
            | "InvalidTimeRangeException"
            | "InvalidLimitException"
            | "InvalidNextTokenException" => Self::Validation(message),
            _ => Self::Service {
                code: short.to_string(),
                message,
            },
        }
    }
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for awslog operations
pub type Result<T> = std::result::Result<T, AwslogError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl AwslogError {
    /// Create an upstream error with context
    pub fn upstream(context: impl Into<String>, source: UpstreamErrorKind) -> Self {
        Self::Upstream {
            context: context.into(),
            source,
        }
    }

    /// Create a date parse error
    pub fn date_parse(input: impl Into<String>) -> Self {
        Self::DateParse {
            input: input.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for AwslogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The new context is prepended to any context the error already carries,
/// so a failure reads from the outermost operation inwards:
///
/// ```ignore
/// use awslog::error::ErrorContext;
///
/// let page = service
///     .get_resource_config_history(&request)
///     .with_context(|| format!("fetching history for {}", identity))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<AwslogError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
///
/// User-facing resolution errors already name what failed and are returned
/// untouched.
fn add_context_to_error(err: AwslogError, new_ctx: &str) -> AwslogError {
    match err {
        AwslogError::Upstream {
            context: existing,
            source,
        } => AwslogError::Upstream {
            context: chain_context(new_ctx, &existing),
            source,
        },
        AwslogError::Io {
            path,
            message,
            source,
        } => AwslogError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        AwslogError::Config(msg) => AwslogError::Config(chain_context(new_ctx, &msg)),
        other => other,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_message_names_resource_and_type() {
        let err = AwslogError::AmbiguousResource {
            name: "web".to_string(),
            resource_type: "AWS::EC2::SecurityGroup".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("web"), "{display}");
        assert!(display.contains("AWS::EC2::SecurityGroup"), "{display}");
    }

    #[test]
    fn test_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = AwslogError::io("/path/to/config.yaml", io_err);

        assert!(err.to_string().contains("/path/to/config.yaml"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(AwslogError::upstream(
                "base",
                UpstreamErrorKind::Network("connection reset".to_string()),
            ))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(AwslogError::Upstream { context, .. }) => {
                assert_eq!(context, "outer layer: middle layer: base");
            }
            other => panic!("Expected Upstream error, got {other:?}"),
        }
    }

    #[test]
    fn test_context_leaves_resolution_errors_alone() {
        let result: Result<()> = Err(AwslogError::UnresolvedType {
            name: "my-thing".to_string(),
        });
        match result.context("resolving") {
            Err(AwslogError::UnresolvedType { name }) => assert_eq!(name, "my-thing"),
            other => panic!("Expected UnresolvedType, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(AwslogError::config("bad"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_service_code_classification() {
        let kind = UpstreamErrorKind::from_service_code(
            "com.amazonaws.starling.dove#ThrottlingException",
            "slow down".to_string(),
        );
        assert!(matches!(kind, UpstreamErrorKind::Throttled(_)));

        let kind = UpstreamErrorKind::from_service_code(
            "ResourceNotDiscoveredException",
            "not here".to_string(),
        );
        assert!(matches!(kind, UpstreamErrorKind::ResourceNotDiscovered(_)));

        let kind = UpstreamErrorKind::from_service_code("InternalFailure", "oops".to_string());
        match kind {
            UpstreamErrorKind::Service { code, message } => {
                assert_eq!(code, "InternalFailure");
                assert_eq!(message, "oops");
            }
            other => panic!("Expected Service kind, got {other:?}"),
        }
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
