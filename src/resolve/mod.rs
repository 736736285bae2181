//! Resolving user input to a resource identity.
//!
//! The resolver turns a name or id plus an optional type hint into the
//! `(type, id)` pair the history API is keyed on. Type problems are caught
//! before anything is sent to AWS; discovery is asked for at most two
//! matches, which is enough to tell "unique" from "ambiguous".

mod registry;

pub use registry::{PrefixRule, ResourceTypeRegistry};

use crate::error::{AwslogError, ErrorContext, Result};
use crate::model::ResourceIdentity;
use crate::service::{ConfigService, ListDiscoveredResourcesRequest, Paginator};

/// Matches requested from discovery; two is enough to detect ambiguity.
const DISCOVERY_LIMIT: usize = 2;

/// Resolves names and ids against a registry and the discovery API.
pub struct Resolver<'a, S: ConfigService + ?Sized> {
    service: &'a S,
    registry: &'a ResourceTypeRegistry,
    include_deleted: bool,
}

impl<'a, S: ConfigService + ?Sized> Resolver<'a, S> {
    pub fn new(service: &'a S, registry: &'a ResourceTypeRegistry) -> Self {
        Self {
            service,
            registry,
            include_deleted: false,
        }
    }

    /// Also consider resources AWS Config has recorded as deleted.
    #[must_use]
    pub fn include_deleted(mut self, include_deleted: bool) -> Self {
        self.include_deleted = include_deleted;
        self
    }

    /// Pick the resource type: the explicit one if supported, otherwise the
    /// first prefix rule matching the input.
    pub fn resource_type(&self, name_or_id: &str, explicit_type: Option<&str>) -> Result<String> {
        match explicit_type {
            Some(requested) => self
                .registry
                .canonical_type(requested)
                .map(str::to_string)
                .ok_or_else(|| AwslogError::UnsupportedType {
                    resource_type: requested.to_string(),
                }),
            None => {
                let inferred = self.registry.infer_type(name_or_id).ok_or_else(|| {
                    AwslogError::UnresolvedType {
                        name: name_or_id.to_string(),
                    }
                })?;
                tracing::debug!("Inferred type {} for '{}'", inferred, name_or_id);
                Ok(inferred.to_string())
            }
        }
    }

    /// Resolve `name_or_id` to a single resource identity.
    ///
    /// When discovery knows nothing by that name the input is used as the id
    /// as-is, which is what deleted resources need.
    pub fn resolve(&self, name_or_id: &str, explicit_type: Option<&str>) -> Result<ResourceIdentity> {
        let resource_type = self.resource_type(name_or_id, explicit_type)?;

        let matches = Paginator::new(DISCOVERY_LIMIT, DISCOVERY_LIMIT, |next_token, limit| {
            self.service
                .list_discovered_resources(&ListDiscoveredResourcesRequest {
                    resource_type: resource_type.clone(),
                    resource_name: name_or_id.to_string(),
                    include_deleted: self.include_deleted,
                    limit,
                    next_token,
                })
        })
        .collect_items()
        .with_context(|| format!("discovering {resource_type} '{name_or_id}'"))?;

        match matches.as_slice() {
            [] => {
                tracing::debug!("No discovered resource named '{}', using it as the id", name_or_id);
                Ok(ResourceIdentity::new(resource_type, name_or_id))
            }
            [found] => {
                tracing::debug!("Resolved '{}' to {}", name_or_id, found.resource_id);
                Ok(ResourceIdentity::new(resource_type, found.resource_id.clone()))
            }
            _ => Err(AwslogError::AmbiguousResource {
                name: name_or_id.to_string(),
                resource_type,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpstreamErrorKind;
    use crate::service::{ConfigHistoryRequest, ConfigurationItem, DiscoveredResource, Page};
    use std::cell::RefCell;

    /// Discovery stub answering every lookup with a fixed list.
    struct Discovery {
        found: Vec<&'static str>,
        requests: RefCell<Vec<ListDiscoveredResourcesRequest>>,
    }

    impl Discovery {
        fn returning(found: &[&'static str]) -> Self {
            Self {
                found: found.to_vec(),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl ConfigService for Discovery {
        fn list_discovered_resources(
            &self,
            request: &ListDiscoveredResourcesRequest,
        ) -> Result<Page<DiscoveredResource>> {
            self.requests.borrow_mut().push(request.clone());
            let items = self
                .found
                .iter()
                .map(|id| DiscoveredResource::new(request.resource_type.clone(), *id))
                .collect();
            Ok(Page::last(items))
        }

        fn get_resource_config_history(
            &self,
            _request: &ConfigHistoryRequest,
        ) -> Result<Page<ConfigurationItem>> {
            unreachable!("resolver never fetches history")
        }
    }

    #[test]
    fn test_unique_match_uses_discovered_id() {
        let registry = ResourceTypeRegistry::aws_default();
        let service = Discovery::returning(&["sg-0abc"]);
        let identity = Resolver::new(&service, &registry)
            .resolve("web", Some("EC2::SecurityGroup"))
            .unwrap();
        assert_eq!(identity, ResourceIdentity::new("AWS::EC2::SecurityGroup", "sg-0abc"));
    }

    #[test]
    fn test_no_match_falls_back_to_input() {
        let registry = ResourceTypeRegistry::aws_default();
        let service = Discovery::returning(&[]);
        let identity = Resolver::new(&service, &registry)
            .include_deleted(true)
            .resolve("i-0123456789abcdef0", None)
            .unwrap();
        assert_eq!(identity.id, "i-0123456789abcdef0");
        assert_eq!(identity.resource_type, "AWS::EC2::Instance");

        let requests = service.requests.borrow();
        assert!(requests[0].include_deleted);
        assert_eq!(requests[0].limit, 2);
    }

    #[test]
    fn test_two_matches_is_ambiguous() {
        let registry = ResourceTypeRegistry::aws_default();
        let service = Discovery::returning(&["sg-1", "sg-2"]);
        let err = Resolver::new(&service, &registry)
            .resolve("web", Some("AWS::EC2::SecurityGroup"))
            .unwrap_err();
        match err {
            AwslogError::AmbiguousResource {
                name,
                resource_type,
            } => {
                assert_eq!(name, "web");
                assert_eq!(resource_type, "AWS::EC2::SecurityGroup");
            }
            other => panic!("Expected AmbiguousResource, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_type_makes_no_request() {
        let registry = ResourceTypeRegistry::aws_default();
        let service = Discovery::returning(&["x"]);
        let err = Resolver::new(&service, &registry)
            .resolve("thing", Some("AWS::Imaginary::Widget"))
            .unwrap_err();
        assert!(matches!(err, AwslogError::UnsupportedType { .. }));
        assert!(service.requests.borrow().is_empty());
    }

    #[test]
    fn test_uninferable_name_makes_no_request() {
        let registry = ResourceTypeRegistry::aws_default();
        let service = Discovery::returning(&["x"]);
        let err = Resolver::new(&service, &registry)
            .resolve("my-database", None)
            .unwrap_err();
        assert!(matches!(err, AwslogError::UnresolvedType { .. }));
        assert!(service.requests.borrow().is_empty());
    }

    #[test]
    fn test_discovery_errors_propagate_with_context() {
        struct Failing;
        impl ConfigService for Failing {
            fn list_discovered_resources(
                &self,
                _request: &ListDiscoveredResourcesRequest,
            ) -> Result<Page<DiscoveredResource>> {
                Err(AwslogError::upstream(
                    "ListDiscoveredResources",
                    UpstreamErrorKind::AccessDenied("no".to_string()),
                ))
            }
            fn get_resource_config_history(
                &self,
                _request: &ConfigHistoryRequest,
            ) -> Result<Page<ConfigurationItem>> {
                unreachable!()
            }
        }

        let registry = ResourceTypeRegistry::aws_default();
        let err = Resolver::new(&Failing, &registry)
            .resolve("vpc-1", None)
            .unwrap_err();
        match err {
            AwslogError::Upstream { context, source } => {
                assert!(context.starts_with("discovering AWS::EC2::VPC 'vpc-1'"));
                assert!(matches!(source, UpstreamErrorKind::AccessDenied(_)));
            }
            other => panic!("Expected Upstream, got {other:?}"),
        }
    }
}
