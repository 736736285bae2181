//! Output helpers for the history pipeline.

use crate::error::{ErrorContext, Result};
use std::io::{IsTerminal, Write};

/// Determine if color should be used based on flags, environment and
/// whether stdout is a terminal
pub fn should_use_color(no_color_flag: bool) -> bool {
    color_enabled(
        no_color_flag,
        std::env::var_os("NO_COLOR").is_some(),
        std::io::stdout().is_terminal(),
    )
}

fn color_enabled(no_color_flag: bool, no_color_env: bool, stdout_is_terminal: bool) -> bool {
    !no_color_flag && !no_color_env && stdout_is_terminal
}

/// Write the complete rendered output in one go.
pub fn write_output(content: &str, out: &mut dyn Write) -> Result<()> {
    if content.is_empty() {
        return Ok(());
    }
    out.write_all(content.as_bytes())
        .and_then(|()| out.flush())
        .context("writing diff output")
}
