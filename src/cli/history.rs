//! History command handler.
//!
//! Turns the merged configuration and positional arguments into a
//! [`HistoryRequest`], builds the AWS Config client and runs the pipeline
//! against stdout.

use crate::config::{AppConfig, Validatable};
use crate::model::TimeWindow;
use crate::normalize::NormalizeOptions;
use crate::pipeline::{self, exit_codes, should_use_color, HistoryRequest};
use crate::resolve::ResourceTypeRegistry;
use crate::service::{resolve_region, ConfigClient, ConfigClientConfig, Credentials};
use crate::timeparse::parse_time_bound;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::io::Write;
use std::time::Duration;

/// Arguments of one history invocation.
#[derive(Debug, Clone)]
pub struct HistoryCommand {
    /// Resource name or id
    pub name: String,
    /// Explicit resource type
    pub resource_type: Option<String>,
    /// Raw `--before` value
    pub before: Option<String>,
    /// Raw `--after` value
    pub after: Option<String>,
    /// File configuration with CLI overrides applied
    pub config: AppConfig,
}

/// Build the pipeline request, validating configuration and parsing dates.
pub fn build_request(command: &HistoryCommand, now: DateTime<Utc>) -> Result<HistoryRequest> {
    let config = &command.config;

    let errors = config.validate();
    if !errors.is_empty() {
        let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("invalid configuration:\n  {}", details.join("\n  "));
    }

    let timezone = config.time.naive_timezone;
    let parse = |value: &Option<String>| {
        value
            .as_deref()
            .map(|raw| parse_time_bound(raw, now, timezone))
            .transpose()
    };
    let window = TimeWindow::new(
        parse(&command.after).context("invalid --after")?,
        parse(&command.before).context("invalid --before")?,
    );

    Ok(HistoryRequest {
        name: command.name.clone(),
        resource_type: command.resource_type.clone(),
        number: config.history.number,
        window,
        include_deleted: config.history.include_deleted,
        context_lines: config.history.context,
        color: should_use_color(config.output.no_color),
        normalize: NormalizeOptions {
            sort_sequences: config.history.sort_lists,
        },
        page_size: config.aws.page_size,
    })
}

/// Run the history command, returning the desired exit code.
#[allow(clippy::needless_pass_by_value)]
pub fn run_history(command: HistoryCommand) -> Result<i32> {
    let request = build_request(&command, Utc::now())?;
    let aws = &command.config.aws;

    let region = resolve_region(aws.region.as_deref(), aws.profile.as_deref())?;
    let credentials = Credentials::load(aws.profile.as_deref())?;
    let client = ConfigClient::new(
        ConfigClientConfig {
            region,
            endpoint_url: aws.endpoint_url.clone(),
            timeout: Duration::from_secs(aws.timeout_secs),
        },
        credentials,
    )?;

    let registry = ResourceTypeRegistry::aws_default();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = pipeline::run_history(&client, &registry, &request, &mut out)?;

    tracing::info!(
        "{}: {} snapshot(s), {} of {} pair(s) changed",
        outcome.identity,
        outcome.snapshots.len(),
        outcome.pairs_changed,
        outcome.pairs_compared
    );
    Ok(exit_codes::SUCCESS)
}

/// Print every supported resource type, one per line.
pub fn list_types(registry: &ResourceTypeRegistry, out: &mut dyn Write) -> Result<()> {
    for resource_type in registry.types() {
        writeln!(out, "{resource_type}")?;
    }
    Ok(())
}
