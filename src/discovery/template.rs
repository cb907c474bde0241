//! Pod template extraction
//!
//! Converts a generic workload object into its typed form and pulls out the
//! single pod template it carries. A bare Pod has no template indirection:
//! its own spec is the template.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{Pod, PodSpec, PodTemplateSpec};
use kube::core::DynamicObject;
use serde::de::DeserializeOwned;

use super::error::{DiscoveryError, DiscoveryResult};
use crate::models::WorkloadKind;

/// Namespace assumed for objects that do not carry one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Canonical pod template of a workload
#[derive(Debug, Clone, PartialEq)]
pub struct PodTemplate {
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
    pub spec: PodSpec,
}

impl WorkloadKind {
    /// Resolve the pod template of `object`, which must be of this kind
    pub fn pod_template(&self, object: &DynamicObject) -> DiscoveryResult<PodTemplate> {
        let name = object.metadata.name.as_deref().unwrap_or_default();
        let namespace = object
            .metadata
            .namespace
            .clone()
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let malformed = |reason: &str| DiscoveryError::malformed(self.as_str(), name, reason);

        let template = match self {
            WorkloadKind::Deployment => convert::<Deployment>(self, object)?
                .spec
                .map(|spec| spec.template),
            WorkloadKind::StatefulSet => convert::<StatefulSet>(self, object)?
                .spec
                .map(|spec| spec.template),
            WorkloadKind::DaemonSet => convert::<DaemonSet>(self, object)?
                .spec
                .map(|spec| spec.template),
            WorkloadKind::Job => convert::<Job>(self, object)?
                .spec
                .map(|spec| spec.template),
            WorkloadKind::Pod => {
                let pod = convert::<Pod>(self, object)?;
                let spec = pod.spec.ok_or_else(|| malformed("missing spec"))?;
                return Ok(PodTemplate {
                    namespace,
                    labels: pod.metadata.labels.unwrap_or_default(),
                    spec,
                });
            }
        };

        let PodTemplateSpec { metadata, spec } = template.ok_or_else(|| malformed("missing spec"))?;
        let spec = spec.ok_or_else(|| malformed("pod template has no spec"))?;

        Ok(PodTemplate {
            namespace,
            labels: metadata.and_then(|m| m.labels).unwrap_or_default(),
            spec,
        })
    }
}

/// Convert a generic object into the typed structure of its kind
fn convert<K: DeserializeOwned>(kind: &WorkloadKind, object: &DynamicObject) -> DiscoveryResult<K> {
    let name = object.metadata.name.as_deref().unwrap_or_default();

    let value = serde_json::to_value(object).map_err(|e| {
        DiscoveryError::malformed(kind.as_str(), name, format!("failed to serialize object: {}", e))
    })?;

    serde_json::from_value(value).map_err(|e| {
        DiscoveryError::malformed(
            kind.as_str(),
            name,
            format!("failed to convert {} from unstructured object: {}", kind, e),
        )
    })
}
