//! Default values for awslog configuration.

use crate::render;
use crate::service;

// ============================================================================
// Default Value Constants
// ============================================================================

/// Default number of changes to show.
pub const DEFAULT_NUMBER: usize = 1;

/// Default context lines around each change.
pub const DEFAULT_CONTEXT_LINES: usize = render::DEFAULT_CONTEXT_LINES;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = service::DEFAULT_TIMEOUT.as_secs();

/// Default (and maximum) items per page.
pub const DEFAULT_PAGE_SIZE: usize = service::MAX_PAGE_SIZE;

// ============================================================================
// Tests
// ============================================================================
