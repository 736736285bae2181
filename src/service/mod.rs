//! Access to the AWS Config service.
//!
//! The rest of the crate talks to AWS Config only through the
//! [`ConfigService`] trait, one call per page. [`ConfigClient`] is the
//! production implementation; tests substitute in-memory stubs.

mod client;
mod credentials;
mod paginate;
mod sigv4;
mod types;

pub use client::{ConfigClient, ConfigClientConfig, DEFAULT_TIMEOUT};
pub use credentials::{resolve_region, Credentials};
pub use paginate::Paginator;
pub use sigv4::{signing_key, SigningParams};
pub use types::{
    ConfigHistoryRequest, ConfigurationItem, DiscoveredResource, ListDiscoveredResourcesRequest,
    Page,
};

use crate::error::Result;

/// Largest page either list operation accepts.
pub const MAX_PAGE_SIZE: usize = 100;

/// The two AWS Config operations awslog needs.
///
/// Each call fetches exactly one page; pagination is driven by
/// [`Paginator`].
pub trait ConfigService {
    /// `ListDiscoveredResources`: look up resource ids by name within a type.
    fn list_discovered_resources(
        &self,
        request: &ListDiscoveredResourcesRequest,
    ) -> Result<Page<DiscoveredResource>>;

    /// `GetResourceConfigHistory`: configuration items, newest first.
    fn get_resource_config_history(
        &self,
        request: &ConfigHistoryRequest,
    ) -> Result<Page<ConfigurationItem>>;
}
