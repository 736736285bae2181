//! Core data types shared by the resolver, fetcher and renderer.

mod identity;
mod snapshot;

pub use identity::ResourceIdentity;
pub use snapshot::{Snapshot, TimeWindow, CAPTURE_TIME_FORMAT};
