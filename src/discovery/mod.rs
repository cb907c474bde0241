//! Dependency discovery engine
//!
//! Computes the ConfigMaps, Secrets and Services a workload depends on:
//!
//! 1. the registry maps the object's kind to a [`WorkloadKind`](crate::models::WorkloadKind)
//! 2. the kind's extractor resolves the pod template (`template.rs`)
//! 3. the scanner collects ConfigMap and Secret names (`scanner.rs`)
//! 4. the matcher lists the namespace's Services and keeps the ones whose
//!    selector targets the template labels (`services.rs`)
//!
//! The engine keeps no state between calls and performs no caching or
//! retries; every call re-lists Services.

mod batch;
mod error;
mod registry;
mod scanner;
mod services;
mod template;

pub use batch::{BatchOutcome, discover_batch, object_key};
pub use error::{BoxError, DiscoveryError, DiscoveryResult};
pub use registry::DependencyRegistry;
pub use scanner::{PodReferences, scan_pod_spec};
pub use services::{
    ServiceDescriptor, ServiceLister, ServiceType, StaticServiceLister, match_services,
    matching_service_names, selector_matches,
};
pub use template::{DEFAULT_NAMESPACE, PodTemplate};
