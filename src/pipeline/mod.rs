//! Pipeline orchestration: resolve, fetch, diff, write.
//!
//! [`run_history`] is the whole tool minus argument parsing. It resolves
//! the resource, fetches `number + 1` snapshots and diffs each adjacent
//! pair oldest-to-newest. Output is assembled in memory and written once,
//! so an error part way through never leaves half a diff on stdout.

mod output;

pub use output::{should_use_color, write_output};

use crate::error::Result;
use crate::history::{fetch_history, HistoryQuery};
use crate::model::{ResourceIdentity, Snapshot, TimeWindow};
use crate::normalize::NormalizeOptions;
use crate::render::{DiffRenderer, DEFAULT_CONTEXT_LINES};
use crate::resolve::{ResourceTypeRegistry, Resolver};
use crate::service::{ConfigService, MAX_PAGE_SIZE};
use std::io::Write;

/// Exit codes for the CLI
pub mod exit_codes {
    /// Success, whether or not anything changed
    pub const SUCCESS: i32 = 0;
    /// An error occurred
    pub const ERROR: i32 = 1;
}

/// Everything one history run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    /// Resource name or id as given by the user
    pub name: String,
    /// Explicit resource type; inferred from `name` when absent
    pub resource_type: Option<String>,
    /// Number of changes (snapshot pairs) to show
    pub number: usize,
    pub window: TimeWindow,
    /// Let discovery return deleted resources
    pub include_deleted: bool,
    pub context_lines: usize,
    pub color: bool,
    pub normalize: NormalizeOptions,
    /// Items requested per history page
    pub page_size: usize,
}

impl HistoryRequest {
    /// A request for the latest change to `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_type: None,
            number: 1,
            window: TimeWindow::unbounded(),
            include_deleted: false,
            context_lines: DEFAULT_CONTEXT_LINES,
            color: false,
            normalize: NormalizeOptions::default(),
            page_size: MAX_PAGE_SIZE,
        }
    }
}

/// What a run did, for logging and tests.
#[derive(Debug, Clone)]
pub struct HistoryOutcome {
    pub identity: ResourceIdentity,
    /// Snapshots as fetched, newest first
    pub snapshots: Vec<Snapshot>,
    pub pairs_compared: usize,
    /// Pairs that produced at least one diff block
    pub pairs_changed: usize,
}

/// Run the full resolve, fetch, diff pipeline and write the result to `out`.
pub fn run_history<S: ConfigService + ?Sized>(
    service: &S,
    registry: &ResourceTypeRegistry,
    request: &HistoryRequest,
    out: &mut dyn Write,
) -> Result<HistoryOutcome> {
    let identity = Resolver::new(service, registry)
        .include_deleted(request.include_deleted)
        .resolve(&request.name, request.resource_type.as_deref())?;
    tracing::info!("Fetching history for {}", identity);

    let query = HistoryQuery::new(request.number.saturating_add(1))
        .with_window(request.window)
        .with_page_size(request.page_size);
    let snapshots = fetch_history(service, &identity, &query, &request.normalize)?;

    let renderer = DiffRenderer::new(request.context_lines, request.color);
    let mut text = String::new();
    let mut pairs_compared = 0;
    let mut pairs_changed = 0;

    for pair in snapshots.windows(2) {
        let (newer, older) = (&pair[0], &pair[1]);
        pairs_compared += 1;

        let blocks = renderer.render_pair(older, newer);
        if blocks.is_empty() {
            tracing::debug!(
                "No changes between {} and {}",
                older.formatted_time(),
                newer.formatted_time()
            );
            continue;
        }

        pairs_changed += 1;
        for block in &blocks {
            text.push_str(&block.render(request.color));
            text.push('\n');
        }
        text.push('\n');
    }

    if snapshots.len() < 2 {
        tracing::info!(
            "Found {} snapshot(s) of {}, nothing to compare",
            snapshots.len(),
            identity
        );
    }

    write_output(&text, out)?;

    Ok(HistoryOutcome {
        identity,
        snapshots,
        pairs_compared,
        pairs_changed,
    })
}
