//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.

mod history;

pub use history::{build_request, list_types, run_history, HistoryCommand};
