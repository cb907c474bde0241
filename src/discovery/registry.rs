//! Dependency interpreter registry
//!
//! Maps a workload's (group, version, kind) to the pipeline that knows how
//! to read its pod template. The table is built once and never mutated; a
//! single registry can be shared by every worker that needs it.
//!
//! To support a new workload kind, add a variant to [`WorkloadKind`] and a
//! conversion arm in `template.rs`; it is registered automatically.

use std::collections::HashMap;

use kube::core::DynamicObject;

use super::error::{DiscoveryError, DiscoveryResult};
use super::scanner::scan_pod_spec;
use super::services::{ServiceLister, match_services};
use crate::models::{DependencyResult, WorkloadKind, WorkloadKindId};

/// Immutable dispatch table from workload kind identifier to extractor
#[derive(Debug, Clone)]
pub struct DependencyRegistry {
    interpreters: HashMap<WorkloadKindId, WorkloadKind>,
}

impl Default for DependencyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyRegistry {
    /// Build the registry of every supported workload kind
    pub fn new() -> Self {
        Self::with_kinds(WorkloadKind::all())
    }

    /// Build a registry restricted to `kinds`
    pub fn with_kinds(kinds: &[WorkloadKind]) -> Self {
        let interpreters = kinds.iter().map(|kind| (kind.id(), *kind)).collect();
        Self { interpreters }
    }

    /// Extractor registered for `id`, if any
    pub fn lookup(&self, id: &WorkloadKindId) -> Option<WorkloadKind> {
        self.interpreters.get(id).copied()
    }

    pub fn supports(&self, id: &WorkloadKindId) -> bool {
        self.interpreters.contains_key(id)
    }

    /// Registered kinds, sorted by identifier
    pub fn kinds(&self) -> Vec<WorkloadKindId> {
        let mut ids: Vec<WorkloadKindId> = self.interpreters.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Kind identifier of a generic object
    pub fn kind_of(object: &DynamicObject) -> DiscoveryResult<WorkloadKindId> {
        let types = object.types.as_ref().ok_or_else(|| {
            DiscoveryError::malformed(
                "object",
                object.metadata.name.as_deref().unwrap_or_default(),
                "missing apiVersion/kind",
            )
        })?;
        Ok(WorkloadKindId::from_type_meta(types))
    }

    /// Discover the ConfigMaps, Secrets and Services `object` depends on
    ///
    /// Returns `UnsupportedKind` when no extractor is registered for the
    /// object's kind.
    pub async fn get_dependencies(
        &self,
        lister: &dyn ServiceLister,
        object: &DynamicObject,
    ) -> DiscoveryResult<DependencyResult> {
        let id = Self::kind_of(object)?;
        let kind = self
            .lookup(&id)
            .ok_or(DiscoveryError::UnsupportedKind(id))?;

        kind.get_dependencies(lister, object).await
    }
}

impl WorkloadKind {
    /// Extractor for this kind: template, references, then matching Services
    pub async fn get_dependencies(
        &self,
        lister: &dyn ServiceLister,
        object: &DynamicObject,
    ) -> DiscoveryResult<DependencyResult> {
        let template = self.pod_template(object)?;
        let references = scan_pod_spec(&template.spec);

        tracing::debug!(
            "{} {}/{}: {} configmaps, {} secrets referenced",
            self,
            template.namespace,
            object.metadata.name.as_deref().unwrap_or_default(),
            references.config_maps.len(),
            references.secrets.len()
        );

        let services = match_services(lister, &template.namespace, &template.labels).await?;

        Ok(DependencyResult::from_name_sets(
            &template.namespace,
            &references.config_maps,
            &references.secrets,
            &services,
        ))
    }
}
