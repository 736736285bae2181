//! Resource identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The (type, id) pair that addresses one resource tracked by AWS Config.
///
/// Built by the resolver; the type is always a member of the registry the
/// resolver was constructed with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentity {
    /// Namespaced resource type, e.g. `AWS::EC2::Instance`
    pub resource_type: String,
    /// Resource id as AWS Config indexes it
    pub id: String,
}

impl ResourceIdentity {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.resource_type, self.id)
    }
}
