//! Dependency references and results
//!
//! `DependentObjectReference` is the wire shape consumed by binding and
//! propagation logic; `DependencyResult` is the grouped list a single
//! discovery call produces.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const CONFIG_MAP_KIND: &str = "ConfigMap";
pub const SECRET_KIND: &str = "Secret";
pub const SERVICE_KIND: &str = "Service";

/// A structural pointer to an auxiliary resource a workload relies on
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependentObjectReference {
    pub api_version: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl DependentObjectReference {
    fn core(kind: &str, namespace: &str, name: &str) -> Self {
        Self {
            api_version: "v1".to_string(),
            kind: kind.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    pub fn config_map(namespace: &str, name: &str) -> Self {
        Self::core(CONFIG_MAP_KIND, namespace, name)
    }

    pub fn secret(namespace: &str, name: &str) -> Self {
        Self::core(SECRET_KIND, namespace, name)
    }

    pub fn service(namespace: &str, name: &str) -> Self {
        Self::core(SERVICE_KIND, namespace, name)
    }
}

impl fmt::Display for DependentObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.namespace, self.name)
    }
}

/// Dependencies of one workload, grouped ConfigMap, Secret, Service
///
/// Order inside a group carries no meaning; compare with [`Self::as_set`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyResult {
    references: Vec<DependentObjectReference>,
}

impl DependencyResult {
    /// Assemble a result from the three name sets of one namespace
    pub fn from_name_sets<'a>(
        namespace: &str,
        config_maps: impl IntoIterator<Item = &'a String>,
        secrets: impl IntoIterator<Item = &'a String>,
        services: impl IntoIterator<Item = &'a String>,
    ) -> Self {
        let references = config_maps
            .into_iter()
            .map(|name| DependentObjectReference::config_map(namespace, name))
            .chain(
                secrets
                    .into_iter()
                    .map(|name| DependentObjectReference::secret(namespace, name)),
            )
            .chain(
                services
                    .into_iter()
                    .map(|name| DependentObjectReference::service(namespace, name)),
            )
            .collect();
        Self { references }
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DependentObjectReference> {
        self.references.iter()
    }

    pub fn into_vec(self) -> Vec<DependentObjectReference> {
        self.references
    }

    /// References of a single kind
    pub fn of_kind<'a>(
        &'a self,
        kind: &'a str,
    ) -> impl Iterator<Item = &'a DependentObjectReference> + 'a {
        self.references.iter().filter(move |r| r.kind == kind)
    }

    /// Names of a single kind, for set comparison
    pub fn names_of_kind(&self, kind: &str) -> BTreeSet<String> {
        self.of_kind(kind).map(|r| r.name.clone()).collect()
    }

    pub fn contains(&self, kind: &str, name: &str) -> bool {
        self.references
            .iter()
            .any(|r| r.kind == kind && r.name == name)
    }

    /// The result as a set of (kind, name) pairs
    pub fn as_set(&self) -> BTreeSet<(String, String)> {
        self.references
            .iter()
            .map(|r| (r.kind.clone(), r.name.clone()))
            .collect()
    }
}

impl IntoIterator for DependencyResult {
    type Item = DependentObjectReference;
    type IntoIter = std::vec::IntoIter<DependentObjectReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.references.into_iter()
    }
}

impl<'a> IntoIterator for &'a DependencyResult {
    type Item = &'a DependentObjectReference;
    type IntoIter = std::slice::Iter<'a, DependentObjectReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.references.iter()
    }
}

/// Identity of an inspected workload, used in reports
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectKey {
    pub api_version: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    pub name: String,
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}/{}", self.kind, self.name)
        } else {
            write!(f, "{}/{}/{}", self.kind, self.namespace, self.name)
        }
    }
}

/// Outcome of discovery for one workload in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadReport {
    pub workload: ObjectKey,
    #[serde(default)]
    pub dependencies: Vec<DependentObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
