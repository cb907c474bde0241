//! End-to-end dependency discovery tests
//!
//! Run generic workload objects through the registry against in-memory and
//! failing Service listers.

use std::collections::BTreeSet;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Service;
use kube::core::DynamicObject;
use kubedeps::discovery::{DiscoveryResult, discover_batch};
use kubedeps::models::{CONFIG_MAP_KIND, SECRET_KIND, SERVICE_KIND};
use kubedeps::{DependencyRegistry, DiscoveryError, ServiceLister, StaticServiceLister};
use serde_json::json;

fn object(value: serde_json::Value) -> DynamicObject {
    serde_json::from_value(value).expect("valid object")
}

fn service(name: &str, namespace: &str, spec: serde_json::Value) -> Service {
    serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": {"name": name, "namespace": namespace},
        "spec": spec
    }))
    .expect("valid service")
}

fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Pod spec shared by every workload fixture
fn pod_spec() -> serde_json::Value {
    json!({
        "containers": [{
            "name": "app",
            "image": "registry.example.com/app:1.0",
            "envFrom": [{"configMapRef": {"name": "app-config"}}],
            "env": [{"name": "TOKEN", "valueFrom": {"secretKeyRef": {"name": "api-token", "key": "token"}}}]
        }],
        "volumes": [{"name": "config", "configMap": {"name": "app-config"}}],
        "imagePullSecrets": [{"name": "registry-creds"}]
    })
}

fn template() -> serde_json::Value {
    json!({
        "metadata": {"labels": {"app": "web", "tier": "frontend"}},
        "spec": pod_spec()
    })
}

fn selector() -> serde_json::Value {
    json!({"matchLabels": {"app": "web"}})
}

fn deployment(name: &str) -> DynamicObject {
    object(json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": {"name": name, "namespace": "default"},
        "spec": {"selector": selector(), "template": template()}
    }))
}

fn all_workloads() -> Vec<DynamicObject> {
    vec![
        deployment("web"),
        object(json!({
            "apiVersion": "apps/v1",
            "kind": "StatefulSet",
            "metadata": {"name": "web-sts", "namespace": "default"},
            "spec": {"selector": selector(), "serviceName": "web", "template": template()}
        })),
        object(json!({
            "apiVersion": "apps/v1",
            "kind": "DaemonSet",
            "metadata": {"name": "web-ds", "namespace": "default"},
            "spec": {"selector": selector(), "template": template()}
        })),
        object(json!({
            "apiVersion": "batch/v1",
            "kind": "Job",
            "metadata": {"name": "web-job", "namespace": "default"},
            "spec": {"template": template()}
        })),
        object(json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {
                "name": "web-pod",
                "namespace": "default",
                "labels": {"app": "web", "tier": "frontend"}
            },
            "spec": pod_spec()
        })),
    ]
}

fn cluster_services() -> StaticServiceLister {
    StaticServiceLister::new(vec![
        service("svc-a", "default", json!({"type": "ClusterIP", "selector": {"app": "web"}})),
        service(
            "svc-b",
            "default",
            json!({"type": "ClusterIP", "selector": {"app": "web", "tier": "backend"}}),
        ),
        service("svc-lb", "default", json!({"type": "LoadBalancer", "selector": {"app": "web"}})),
        service("svc-nil", "default", json!({"type": "ClusterIP"})),
        service("svc-other-ns", "other", json!({"selector": {"app": "web"}})),
    ])
}

/// Lister standing in for an unreachable API server
struct UnreachableCluster;

#[async_trait]
impl ServiceLister for UnreachableCluster {
    async fn list_services(&self, namespace: &str) -> DiscoveryResult<Vec<Service>> {
        Err(DiscoveryError::cluster_query(
            namespace,
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
        ))
    }
}

#[tokio::test]
async fn test_every_supported_kind_yields_template_references() {
    let registry = DependencyRegistry::new();
    let lister = cluster_services();

    for workload in all_workloads() {
        let kind = workload.types.clone().unwrap().kind;
        let result = registry
            .get_dependencies(&lister, &workload)
            .await
            .unwrap_or_else(|e| panic!("{} failed: {}", kind, e));

        assert_eq!(result.names_of_kind(CONFIG_MAP_KIND), names(&["app-config"]), "{}", kind);
        assert_eq!(
            result.names_of_kind(SECRET_KIND),
            names(&["api-token", "registry-creds"]),
            "{}",
            kind
        );
        assert_eq!(result.names_of_kind(SERVICE_KIND), names(&["svc-a"]), "{}", kind);
    }
}

#[tokio::test]
async fn test_result_shape_and_grouping() {
    let registry = DependencyRegistry::new();
    let result = registry
        .get_dependencies(&cluster_services(), &deployment("web"))
        .await
        .unwrap();

    // ConfigMap referenced through envFrom and a volume appears once
    assert_eq!(result.len(), 4);

    let kinds: Vec<&str> = result.iter().map(|r| r.kind.as_str()).collect();
    assert_eq!(kinds, vec!["ConfigMap", "Secret", "Secret", "Service"]);
    assert!(result
        .iter()
        .all(|r| r.api_version == "v1" && r.namespace == "default"));
}

#[tokio::test]
async fn test_discovery_is_deterministic() {
    let registry = DependencyRegistry::new();
    let lister = cluster_services();
    let workload = deployment("web");

    let first = registry.get_dependencies(&lister, &workload).await.unwrap();
    for _ in 0..5 {
        let again = registry.get_dependencies(&lister, &workload).await.unwrap();
        assert_eq!(again.as_set(), first.as_set());
    }
}

#[tokio::test]
async fn test_workload_without_references() {
    let registry = DependencyRegistry::new();
    let pod = object(json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {"name": "lonely", "namespace": "default"},
        "spec": {"containers": [{"name": "app"}]}
    }));

    let result = registry
        .get_dependencies(&StaticServiceLister::default(), &pod)
        .await
        .unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_missing_namespace_uses_default() {
    let registry = DependencyRegistry::new();
    let mut workload = deployment("web");
    workload.metadata.namespace = None;

    let result = registry
        .get_dependencies(&cluster_services(), &workload)
        .await
        .unwrap();
    assert!(result.iter().all(|r| r.namespace == "default"));
    assert!(result.contains(SERVICE_KIND, "svc-a"));
}

#[tokio::test]
async fn test_unsupported_kind() {
    let registry = DependencyRegistry::new();
    let cron = object(json!({
        "apiVersion": "batch/v1",
        "kind": "CronJob",
        "metadata": {"name": "nightly", "namespace": "default"},
        "spec": {"schedule": "0 0 * * *", "jobTemplate": {"spec": {"template": template()}}}
    }));

    // The lister is never consulted for unsupported kinds
    let err = registry
        .get_dependencies(&UnreachableCluster, &cron)
        .await
        .unwrap_err();
    assert!(err.is_unsupported());
    assert!(err.to_string().contains("CronJob"));
}

#[tokio::test]
async fn test_malformed_workload() {
    let registry = DependencyRegistry::new();
    let broken = object(json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": {"name": "broken", "namespace": "default"},
        "spec": {"selector": selector(), "template": {"spec": {"containers": 42}}}
    }));

    let err = registry
        .get_dependencies(&cluster_services(), &broken)
        .await
        .unwrap_err();
    assert!(err.is_malformed());
    assert!(err.to_string().contains("broken"));
}

#[tokio::test]
async fn test_object_without_type_metadata_is_malformed() {
    let registry = DependencyRegistry::new();
    let mut workload = deployment("web");
    workload.types = None;

    let err = registry
        .get_dependencies(&cluster_services(), &workload)
        .await
        .unwrap_err();
    assert!(err.is_malformed());
}

#[tokio::test]
async fn test_cluster_query_failure_is_propagated() {
    let registry = DependencyRegistry::new();

    let err = registry
        .get_dependencies(&UnreachableCluster, &deployment("web"))
        .await
        .unwrap_err();
    assert!(err.is_cluster_query());
    assert!(err.to_string().contains("connection refused"));
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn test_batch_isolates_malformed_objects() {
    let registry = DependencyRegistry::new();
    let mut objects = all_workloads();
    objects.insert(
        2,
        object(json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {"name": "no-spec", "namespace": "default"}
        })),
    );

    let outcomes = discover_batch(&registry, &cluster_services(), &objects, 3).await;
    assert_eq!(outcomes.len(), objects.len());

    let succeeded: Vec<&str> = outcomes
        .iter()
        .filter(|o| o.result.is_ok())
        .map(|o| o.workload.name.as_str())
        .collect();
    assert_eq!(
        succeeded,
        vec!["web", "web-sts", "web-ds", "web-job", "web-pod"]
    );

    let failed = &outcomes[2];
    assert_eq!(failed.workload.name, "no-spec");
    assert!(failed.result.as_ref().is_err_and(|e| e.is_malformed()));
}

#[tokio::test]
async fn test_batch_reports() {
    let registry = DependencyRegistry::new();
    let outcomes = discover_batch(&registry, &UnreachableCluster, &[deployment("web")], 1).await;

    let report = outcomes.into_iter().next().unwrap().into_report();
    assert_eq!(report.workload.kind, "Deployment");
    assert!(report.dependencies.is_empty());
    assert!(report.error.unwrap().contains("namespace 'default'"));
}
