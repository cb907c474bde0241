//! Batch discovery
//!
//! Runs the registry over many objects. Each object is processed on its own;
//! a malformed object or a failed Service list only affects its own report.

use futures::stream::{self, StreamExt};
use kube::core::DynamicObject;

use super::error::DiscoveryResult;
use super::registry::DependencyRegistry;
use super::services::ServiceLister;
use crate::models::{DependencyResult, ObjectKey, WorkloadReport};

/// Outcome of discovery for one object of a batch
#[derive(Debug)]
pub struct BatchOutcome {
    pub workload: ObjectKey,
    pub result: DiscoveryResult<DependencyResult>,
}

impl BatchOutcome {
    /// Flatten into a serializable report row
    pub fn into_report(self) -> WorkloadReport {
        match self.result {
            Ok(dependencies) => WorkloadReport {
                workload: self.workload,
                dependencies: dependencies.into_vec(),
                error: None,
            },
            Err(e) => WorkloadReport {
                workload: self.workload,
                dependencies: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }
}

/// Identity of a generic object for reporting
pub fn object_key(object: &DynamicObject) -> ObjectKey {
    let (api_version, kind) = object
        .types
        .as_ref()
        .map(|t| (t.api_version.clone(), t.kind.clone()))
        .unwrap_or_default();
    ObjectKey {
        api_version,
        kind,
        namespace: object.metadata.namespace.clone().unwrap_or_default(),
        name: object.metadata.name.clone().unwrap_or_default(),
    }
}

/// Discover dependencies of every object, at most `concurrency` at a time
///
/// Outcomes are returned in input order.
pub async fn discover_batch(
    registry: &DependencyRegistry,
    lister: &dyn ServiceLister,
    objects: &[DynamicObject],
    concurrency: usize,
) -> Vec<BatchOutcome> {
    stream::iter(objects)
        .map(|object| async move {
            let workload = object_key(object);
            let result = registry.get_dependencies(lister, object).await;
            if let Err(e) = &result {
                if e.is_unsupported() {
                    tracing::debug!("Skipping {}: {}", workload, e);
                } else {
                    tracing::warn!("Failed to discover dependencies of {}: {}", workload, e);
                }
            }
            BatchOutcome { workload, result }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}
