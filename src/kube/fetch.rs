//! Workload fetching
//!
//! Fetches a live workload as a generic object so it can go through the
//! same dispatch path as manifests read from disk.

use anyhow::{Context, Result};
use kube::Api;
use kube::core::{ApiResource, DynamicObject, GroupVersionKind, TypeMeta};

use crate::models::WorkloadKind;

/// Fetch a workload of `kind` from the Kubernetes API
pub async fn fetch_workload(
    client: &kube::Client,
    kind: WorkloadKind,
    namespace: &str,
    name: &str,
) -> Result<DynamicObject> {
    let id = kind.id();
    let gvk = GroupVersionKind::gvk(&id.group, &id.version, &id.kind);
    let api_resource = ApiResource::from_gvk(&gvk);
    let api: Api<DynamicObject> = Api::namespaced_with(client.clone(), namespace, &api_resource);

    let mut obj = api
        .get(name)
        .await
        .with_context(|| format!("Failed to fetch {} {}/{}", kind, namespace, name))?;

    // Dispatch needs type metadata, which some responses omit
    if obj.types.is_none() {
        obj.types = Some(TypeMeta {
            api_version: id.api_version(),
            kind: id.kind.clone(),
        });
    }

    Ok(obj)
}
