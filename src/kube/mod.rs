//! Kubernetes client module
//!
//! Handles connection to the Kubernetes API server and provides the
//! cluster-backed implementations the discovery engine reads through.
//!
//! Proxy settings are taken from the standard environment variables
//! (`HTTP_PROXY`, `HTTPS_PROXY`, `NO_PROXY`) by kube-rs itself.

mod fetch;

pub use fetch::fetch_workload;

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Service;
use kube::api::{Api, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

use crate::discovery::{DiscoveryError, DiscoveryResult, ServiceLister};

/// Initialize and return a Kubernetes client
///
/// Uses the default kubeconfig loading strategy:
/// 1. In-cluster config (if running in a pod)
/// 2. KUBECONFIG environment variable
/// 3. ~/.kube/config
pub async fn create_client() -> Result<Client> {
    let config = Config::infer()
        .await
        .context("Failed to infer Kubernetes configuration")?;
    tracing::debug!("Connecting to cluster at {}", config.cluster_url);

    let client = Client::try_from(config).context("Failed to create Kubernetes client")?;
    Ok(client)
}

/// Create a client for a specific kubeconfig context
pub async fn create_client_for_context(context: &str) -> Result<Client> {
    let options = KubeConfigOptions {
        context: Some(context.to_string()),
        ..Default::default()
    };
    let config = Config::from_kubeconfig(&options)
        .await
        .with_context(|| format!("Failed to load kubeconfig context '{}'", context))?;
    tracing::debug!(
        "Connecting to cluster at {} (context {})",
        config.cluster_url,
        context
    );

    let client = Client::try_from(config).context("Failed to create Kubernetes client")?;
    Ok(client)
}

/// Get the current Kubernetes context name
///
/// Falls back to "in-cluster" when no kubeconfig can be read.
pub fn get_context() -> String {
    Kubeconfig::read()
        .ok()
        .and_then(|kubeconfig| kubeconfig.current_context)
        .unwrap_or_else(|| "in-cluster".to_string())
}

/// Service lister backed by the cluster API
///
/// Every call performs a fresh namespaced list; nothing is cached.
#[derive(Clone)]
pub struct KubeServiceLister {
    client: Client,
}

impl KubeServiceLister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ServiceLister for KubeServiceLister {
    async fn list_services(&self, namespace: &str) -> DiscoveryResult<Vec<Service>> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| DiscoveryError::cluster_query(namespace, e))?;

        tracing::debug!(
            "Listed {} services in namespace {}",
            list.items.len(),
            namespace
        );
        Ok(list.items)
    }
}
