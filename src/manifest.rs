//! Manifest loading
//!
//! Reads Kubernetes objects from multi-document YAML so they can be inspected
//! without a cluster. Services found alongside workloads can stand in for the
//! cluster's Service list.

use std::path::Path;

use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::Service;
use kube::core::DynamicObject;
use serde::Deserialize;

/// Parse every object in a (possibly multi-document) YAML string
///
/// Empty documents are skipped and list kinds (`List`, `*List`) are
/// flattened into their items.
pub fn parse_objects(contents: &str) -> Result<Vec<DynamicObject>> {
    let mut objects = Vec::new();

    for (idx, document) in serde_yaml::Deserializer::from_str(contents).enumerate() {
        let value = serde_yaml::Value::deserialize(document)
            .with_context(|| format!("Failed to parse YAML document {}", idx + 1))?;
        if value.is_null() {
            continue;
        }
        collect_objects(value, &mut objects)
            .with_context(|| format!("Invalid object in YAML document {}", idx + 1))?;
    }

    Ok(objects)
}

fn collect_objects(value: serde_yaml::Value, objects: &mut Vec<DynamicObject>) -> Result<()> {
    let is_list = value
        .get("kind")
        .and_then(|k| k.as_str())
        .is_some_and(|kind| kind.ends_with("List"));

    if is_list {
        if let Some(items) = value.get("items").and_then(|i| i.as_sequence()) {
            for item in items {
                collect_objects(item.clone(), objects)?;
            }
            return Ok(());
        }
    }

    let object: DynamicObject =
        serde_yaml::from_value(value).context("Failed to read Kubernetes object")?;
    objects.push(object);
    Ok(())
}

/// Read and parse objects from a set of files
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<DynamicObject>> {
    let mut objects = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let parsed = parse_objects(&contents)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))?;
        tracing::debug!("Loaded {} objects from {}", parsed.len(), path.display());
        objects.extend(parsed);
    }
    Ok(objects)
}

fn is_service(object: &DynamicObject) -> bool {
    object
        .types
        .as_ref()
        .is_some_and(|t| t.api_version == "v1" && t.kind == "Service")
}

/// Separate core Services from the remaining objects
pub fn split_services(objects: Vec<DynamicObject>) -> Result<(Vec<DynamicObject>, Vec<Service>)> {
    let mut workloads = Vec::new();
    let mut services = Vec::new();

    for object in objects {
        if is_service(&object) {
            let name = object.metadata.name.clone().unwrap_or_default();
            let value = serde_json::to_value(&object)
                .with_context(|| format!("Failed to serialize Service '{}'", name))?;
            let service: Service = serde_json::from_value(value)
                .with_context(|| format!("Invalid Service '{}'", name))?;
            services.push(service);
        } else {
            workloads.push(object);
        }
    }

    Ok((workloads, services))
}

/// Assign `namespace` to every object that has none
pub fn with_default_namespace<T: kube::Resource>(mut objects: Vec<T>, namespace: &str) -> Vec<T> {
    for object in &mut objects {
        let meta = object.meta_mut();
        if meta.namespace.as_deref().is_none_or(str::is_empty) {
            meta.namespace = Some(namespace.to_string());
        }
    }
    objects
}
