//! Dependency service for live clusters
//!
//! Wraps a Kubernetes client and the dependency registry so callers can ask
//! for the dependencies of a workload by name, or of objects they already
//! hold, without wiring the lister themselves.

use anyhow::{Context, Result};
use kube::core::DynamicObject;

use crate::discovery::{
    BatchOutcome, DependencyRegistry, DiscoveryResult, discover_batch,
};
use crate::kube::KubeServiceLister;
use crate::models::{DependencyResult, WorkloadKind};

/// Service for discovering workload dependencies against a cluster
///
/// # Example
///
/// ```rust,no_run
/// use kubedeps::models::WorkloadKind;
/// use kubedeps::services::DependencyService;
///
/// # async fn example() -> anyhow::Result<()> {
/// let service = DependencyService::connect_default().await?;
/// let deps = service
///     .dependencies_for(WorkloadKind::Deployment, "default", "web")
///     .await?;
/// for reference in &deps {
///     println!("{}", reference);
/// }
/// # Ok(())
/// # }
/// ```
pub struct DependencyService {
    client: kube::Client,
    lister: KubeServiceLister,
    registry: DependencyRegistry,
}

impl DependencyService {
    pub fn new(client: kube::Client) -> Self {
        Self {
            lister: KubeServiceLister::new(client.clone()),
            client,
            registry: DependencyRegistry::new(),
        }
    }

    /// Connect using the default kubeconfig loading strategy
    pub async fn connect_default() -> Result<Self> {
        let client = crate::kube::create_client()
            .await
            .context("Failed to create Kubernetes client")?;
        Ok(Self::new(client))
    }

    /// Connect using a specific kubeconfig context
    pub async fn connect(context: &str) -> Result<Self> {
        let client = crate::kube::create_client_for_context(context)
            .await
            .with_context(|| format!("Failed to connect to context '{}'", context))?;
        Ok(Self::new(client))
    }

    /// Fetch a live workload and discover its dependencies
    pub async fn dependencies_for(
        &self,
        kind: WorkloadKind,
        namespace: &str,
        name: &str,
    ) -> Result<DependencyResult> {
        let object = crate::kube::fetch_workload(&self.client, kind, namespace, name).await?;
        self.dependencies_of(&object).await.with_context(|| {
            format!(
                "Failed to discover dependencies of {} {}/{}",
                kind, namespace, name
            )
        })
    }

    /// Discover the dependencies of an object the caller already holds
    pub async fn dependencies_of(&self, object: &DynamicObject) -> DiscoveryResult<DependencyResult> {
        self.registry.get_dependencies(&self.lister, object).await
    }

    /// Discover the dependencies of many objects against this cluster
    pub async fn dependencies_of_all(
        &self,
        objects: &[DynamicObject],
        concurrency: usize,
    ) -> Vec<BatchOutcome> {
        discover_batch(&self.registry, &self.lister, objects, concurrency).await
    }
}
