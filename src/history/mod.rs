//! Bounded, windowed retrieval of configuration history.

use crate::error::{ErrorContext, Result};
use crate::model::{ResourceIdentity, Snapshot, TimeWindow};
use crate::normalize::{normalize, NormalizeOptions};
use crate::service::{
    ConfigHistoryRequest, ConfigService, ConfigurationItem, Paginator, MAX_PAGE_SIZE,
};

/// What to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Maximum number of snapshots to return
    pub limit: usize,
    /// Capture-time bounds
    pub window: TimeWindow,
    /// Items requested per page
    pub page_size: usize,
}

impl HistoryQuery {
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            limit,
            window: TimeWindow::unbounded(),
            page_size: MAX_PAGE_SIZE,
        }
    }

    #[must_use]
    pub const fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub const fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Fetch up to `query.limit` snapshots of `identity`, newest first.
///
/// Pages are pulled lazily and consumption stops at the first empty page.
/// Items the service returns outside the window are dropped and do not
/// count towards the limit.
pub fn fetch_history<S: ConfigService + ?Sized>(
    service: &S,
    identity: &ResourceIdentity,
    query: &HistoryQuery,
    options: &NormalizeOptions,
) -> Result<Vec<Snapshot>> {
    if query.window.is_empty() {
        tracing::warn!("Time window is empty, no history can match");
        return Ok(Vec::new());
    }

    let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);
    let window = query.window;
    let mut paginator = Paginator::new(query.limit, page_size, |next_token, limit| {
        service.get_resource_config_history(&ConfigHistoryRequest {
            resource_type: identity.resource_type.clone(),
            resource_id: identity.id.clone(),
            earlier_time: window.after,
            later_time: window.before,
            limit,
            next_token,
        })
    })
    .with_filter(|item: &ConfigurationItem| {
        let inside = window.contains(item.capture_time);
        if !inside {
            tracing::debug!(
                "Dropping item captured at {} outside the requested window",
                item.capture_time
            );
        }
        inside
    });

    let mut snapshots = Vec::new();
    for page in paginator.by_ref() {
        let page = page.with_context(|| format!("fetching history for {identity}"))?;
        snapshots.extend(page.into_iter().map(|item| to_snapshot(item, options)));
    }

    tracing::debug!(
        "Fetched {} snapshot(s) of {} in {} request(s)",
        snapshots.len(),
        identity,
        paginator.pages_fetched()
    );
    Ok(snapshots)
}

fn to_snapshot(item: ConfigurationItem, options: &NormalizeOptions) -> Snapshot {
    let supplementary = Some(normalize(&item.supplementary_configuration, options))
        .filter(|value| !value.is_empty());
    Snapshot {
        capture_time: item.capture_time,
        arn: item.arn,
        status: item.status,
        configuration: normalize(&item.configuration, options),
        relationships: item.relationships,
        supplementary,
    }
}
