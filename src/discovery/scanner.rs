//! ConfigMap and Secret reference scanning
//!
//! Walks a pod specification and collects the names of every ConfigMap and
//! Secret it refers to. Coverage follows the pod-spec visitors of the
//! platform: environment imports, per-variable key references, volume
//! sources (including projected volumes and the secret references of
//! storage plugins) and image pull secrets.

use std::collections::BTreeSet;

use k8s_openapi::api::core::v1::{
    ConfigMapEnvSource, ConfigMapKeySelector, ConfigMapProjection, ConfigMapVolumeSource,
    EnvFromSource, EnvVar, LocalObjectReference, PodSpec, SecretEnvSource, SecretKeySelector,
    SecretProjection, Volume,
};

/// ConfigMap and Secret names referenced by one pod specification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodReferences {
    pub config_maps: BTreeSet<String>,
    pub secrets: BTreeSet<String>,
}

impl PodReferences {
    pub fn is_empty(&self) -> bool {
        self.config_maps.is_empty() && self.secrets.is_empty()
    }
}

/// Anything that names a referenced object
///
/// Empty names refer to nothing and are reported as `None`.
trait ReferencedName {
    fn referenced_name(&self) -> Option<&str>;
}

impl ReferencedName for String {
    fn referenced_name(&self) -> Option<&str> {
        Some(self.as_str()).filter(|name| !name.is_empty())
    }
}

impl<T: ReferencedName> ReferencedName for Option<T> {
    fn referenced_name(&self) -> Option<&str> {
        self.as_ref().and_then(ReferencedName::referenced_name)
    }
}

macro_rules! impl_referenced_name {
    ($($type:ty),* $(,)?) => {
        $(
            impl ReferencedName for $type {
                fn referenced_name(&self) -> Option<&str> {
                    self.name.referenced_name()
                }
            }
        )*
    };
}

impl_referenced_name!(
    LocalObjectReference,
    ConfigMapEnvSource,
    SecretEnvSource,
    ConfigMapKeySelector,
    SecretKeySelector,
    ConfigMapVolumeSource,
    ConfigMapProjection,
    SecretProjection,
);

fn insert(set: &mut BTreeSet<String>, reference: &impl ReferencedName) {
    if let Some(name) = reference.referenced_name() {
        set.insert(name.to_string());
    }
}

/// Collect every ConfigMap and Secret name referenced by a pod specification
pub fn scan_pod_spec(spec: &PodSpec) -> PodReferences {
    let mut refs = PodReferences::default();

    for container in &spec.containers {
        scan_env(&mut refs, container.env.as_deref(), container.env_from.as_deref());
    }
    for container in spec.init_containers.iter().flatten() {
        scan_env(&mut refs, container.env.as_deref(), container.env_from.as_deref());
    }
    for container in spec.ephemeral_containers.iter().flatten() {
        scan_env(&mut refs, container.env.as_deref(), container.env_from.as_deref());
    }

    for volume in spec.volumes.iter().flatten() {
        scan_volume(&mut refs, volume);
    }

    for pull_secret in spec.image_pull_secrets.iter().flatten() {
        insert(&mut refs.secrets, pull_secret);
    }

    refs
}

fn scan_env(refs: &mut PodReferences, env: Option<&[EnvVar]>, env_from: Option<&[EnvFromSource]>) {
    for source in env_from.unwrap_or_default() {
        insert(&mut refs.config_maps, &source.config_map_ref);
        insert(&mut refs.secrets, &source.secret_ref);
    }

    for var in env.unwrap_or_default() {
        if let Some(value_from) = &var.value_from {
            insert(&mut refs.config_maps, &value_from.config_map_key_ref);
            insert(&mut refs.secrets, &value_from.secret_key_ref);
        }
    }
}

fn scan_volume(refs: &mut PodReferences, volume: &Volume) {
    insert(&mut refs.config_maps, &volume.config_map);

    if let Some(secret) = &volume.secret {
        insert(&mut refs.secrets, &secret.secret_name);
    }

    if let Some(projected) = &volume.projected {
        for source in projected.sources.iter().flatten() {
            insert(&mut refs.config_maps, &source.config_map);
            insert(&mut refs.secrets, &source.secret);
        }
    }

    // Storage plugins that authenticate with a Secret in the pod's namespace
    if let Some(azure_file) = &volume.azure_file {
        insert(&mut refs.secrets, &azure_file.secret_name);
    }
    if let Some(cephfs) = &volume.cephfs {
        insert(&mut refs.secrets, &cephfs.secret_ref);
    }
    if let Some(cinder) = &volume.cinder {
        insert(&mut refs.secrets, &cinder.secret_ref);
    }
    if let Some(flex) = &volume.flex_volume {
        insert(&mut refs.secrets, &flex.secret_ref);
    }
    if let Some(iscsi) = &volume.iscsi {
        insert(&mut refs.secrets, &iscsi.secret_ref);
    }
    if let Some(rbd) = &volume.rbd {
        insert(&mut refs.secrets, &rbd.secret_ref);
    }
    if let Some(scale_io) = &volume.scale_io {
        insert(&mut refs.secrets, &scale_io.secret_ref);
    }
    if let Some(storageos) = &volume.storageos {
        insert(&mut refs.secrets, &storageos.secret_ref);
    }
    if let Some(csi) = &volume.csi {
        insert(&mut refs.secrets, &csi.node_publish_secret_ref);
    }
}
