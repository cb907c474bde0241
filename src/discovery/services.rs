//! Service selector matching
//!
//! Determines which Services in a namespace target a workload's pods, using
//! the cluster's equality-based label selection:
//!
//! - LoadBalancer Services are external endpoints and never count
//! - a Service without a selector matches no pods (not every pod)
//! - otherwise every selector pair must be present with the same value on the pod

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Service;

use super::error::DiscoveryResult;

/// Read access to the Services of a namespace
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceLister: Send + Sync {
    /// List every Service in `namespace`
    ///
    /// Failures are reported as `DiscoveryError::ClusterQuery`.
    async fn list_services(&self, namespace: &str) -> DiscoveryResult<Vec<Service>>;
}

/// Service exposure type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ServiceType {
    #[default]
    ClusterIP,
    NodePort,
    LoadBalancer,
    ExternalName,
    /// A type this crate does not know about, kept verbatim
    Other(String),
}

impl ServiceType {
    pub fn as_str(&self) -> &str {
        match self {
            ServiceType::ClusterIP => "ClusterIP",
            ServiceType::NodePort => "NodePort",
            ServiceType::LoadBalancer => "LoadBalancer",
            ServiceType::ExternalName => "ExternalName",
            ServiceType::Other(other) => other,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for ServiceType {
    fn from(s: &str) -> Self {
        match s {
            "ClusterIP" => ServiceType::ClusterIP,
            "NodePort" => ServiceType::NodePort,
            "LoadBalancer" => ServiceType::LoadBalancer,
            "ExternalName" => ServiceType::ExternalName,
            other => ServiceType::Other(other.to_string()),
        }
    }
}

/// Read-only view of a Service, reduced to what selection needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub name: String,
    pub namespace: String,
    pub service_type: ServiceType,
    /// `None` means the Service has no selector at all
    pub selector: Option<BTreeMap<String, String>>,
}

impl ServiceDescriptor {
    /// Whether this Service targets pods carrying `pod_labels`
    pub fn selects(&self, pod_labels: &BTreeMap<String, String>) -> bool {
        if self.service_type == ServiceType::LoadBalancer {
            return false;
        }

        // A nil selector selects nothing
        let Some(selector) = &self.selector else {
            return false;
        };

        selector_matches(selector, pod_labels)
    }
}

impl From<&Service> for ServiceDescriptor {
    fn from(service: &Service) -> Self {
        let spec = service.spec.as_ref();
        Self {
            name: service.metadata.name.clone().unwrap_or_default(),
            namespace: service.metadata.namespace.clone().unwrap_or_default(),
            service_type: spec
                .and_then(|s| s.type_.as_deref())
                .map(ServiceType::from)
                .unwrap_or_default(),
            selector: spec.and_then(|s| s.selector.clone()),
        }
    }
}

/// Equality-based selection: all selector pairs must be present on the pod
pub fn selector_matches(
    selector: &BTreeMap<String, String>,
    pod_labels: &BTreeMap<String, String>,
) -> bool {
    selector
        .iter()
        .all(|(key, value)| pod_labels.get(key) == Some(value))
}

/// Names of the Services among `services` that select `pod_labels`
pub fn matching_service_names<'a>(
    pod_labels: &BTreeMap<String, String>,
    services: impl IntoIterator<Item = &'a Service>,
) -> BTreeSet<String> {
    services
        .into_iter()
        .map(ServiceDescriptor::from)
        .filter(|service| !service.name.is_empty() && service.selects(pod_labels))
        .map(|service| service.name)
        .collect()
}

/// List the Services of `namespace` and return the names that select `pod_labels`
pub async fn match_services(
    lister: &dyn ServiceLister,
    namespace: &str,
    pod_labels: &BTreeMap<String, String>,
) -> DiscoveryResult<BTreeSet<String>> {
    let services = lister.list_services(namespace).await?;
    let matched = matching_service_names(pod_labels, &services);

    tracing::debug!(
        "Matched {} of {} services in namespace {}",
        matched.len(),
        services.len(),
        namespace
    );

    Ok(matched)
}

/// In-memory Service source
///
/// Used for offline manifest inspection, where Services come from the same
/// files as the workloads.
#[derive(Debug, Clone, Default)]
pub struct StaticServiceLister {
    services: Vec<Service>,
}

impl StaticServiceLister {
    pub fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[async_trait]
impl ServiceLister for StaticServiceLister {
    async fn list_services(&self, namespace: &str) -> DiscoveryResult<Vec<Service>> {
        Ok(self
            .services
            .iter()
            .filter(|s| s.metadata.namespace.as_deref() == Some(namespace))
            .cloned()
            .collect())
    }
}
