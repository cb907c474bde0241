//! Workload dependency discovery
//!
//! Finds the ConfigMaps, Secrets and Services a Kubernetes workload depends
//! on so they can be propagated alongside it. The library backs the
//! `kubedeps` binary and can be embedded directly.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod kube;
pub mod manifest;
pub mod models;
pub mod output;
pub mod services;

// Re-export commonly used types for convenience
pub use discovery::{
    DependencyRegistry, DiscoveryError, DiscoveryResult, ServiceLister, StaticServiceLister,
    discover_batch,
};
pub use models::{DependencyResult, DependentObjectReference, WorkloadKind, WorkloadKindId};
