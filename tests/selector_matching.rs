//! Service selector matching tests

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Service;
use kubedeps::discovery::{
    ServiceDescriptor, ServiceType, StaticServiceLister, match_services, matching_service_names,
    selector_matches,
};
use serde_json::json;

fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn service(name: &str, spec: serde_json::Value) -> Service {
    serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": {"name": name, "namespace": "default"},
        "spec": spec
    }))
    .expect("valid service")
}

#[test]
fn test_selector_must_be_subset_of_pod_labels() {
    let pod = labels(&[("app", "web"), ("tier", "frontend")]);
    let services = vec![
        service("svc-a", json!({"type": "ClusterIP", "selector": {"app": "web"}})),
        service(
            "svc-b",
            json!({"type": "ClusterIP", "selector": {"app": "web", "tier": "backend"}}),
        ),
    ];

    let matched = matching_service_names(&pod, &services);
    assert_eq!(matched.into_iter().collect::<Vec<_>>(), vec!["svc-a"]);
}

#[test]
fn test_service_without_selector_never_matches() {
    let pod = labels(&[("app", "web")]);
    let services = vec![service("svc-nil", json!({"type": "ClusterIP"}))];

    assert!(matching_service_names(&pod, &services).is_empty());
    assert!(matching_service_names(&BTreeMap::new(), &services).is_empty());
}

#[test]
fn test_load_balancer_is_excluded() {
    let pod = labels(&[("app", "web")]);
    let services = vec![service(
        "svc-lb",
        json!({"type": "LoadBalancer", "selector": {"app": "web"}}),
    )];

    assert!(matching_service_names(&pod, &services).is_empty());
}

#[test]
fn test_other_service_types_are_eligible() {
    let pod = labels(&[("app", "web")]);
    let services = vec![
        service("node-port", json!({"type": "NodePort", "selector": {"app": "web"}})),
        service("untyped", json!({"selector": {"app": "web"}})),
    ];

    let matched = matching_service_names(&pod, &services);
    assert!(matched.contains("node-port"));
    assert!(matched.contains("untyped"));
}

#[test]
fn test_empty_selector_matches_every_pod() {
    let empty = BTreeMap::new();
    assert!(selector_matches(&empty, &labels(&[("app", "web")])));
    assert!(selector_matches(&empty, &BTreeMap::new()));

    let services = vec![service("catch-all", json!({"selector": {}}))];
    let matched = matching_service_names(&labels(&[("app", "web")]), &services);
    assert!(matched.contains("catch-all"));
}

#[test]
fn test_value_mismatch() {
    assert!(!selector_matches(
        &labels(&[("app", "web")]),
        &labels(&[("app", "api")])
    ));
    assert!(!selector_matches(&labels(&[("app", "web")]), &BTreeMap::new()));
}

#[test]
fn test_descriptor_from_service() {
    let descriptor = ServiceDescriptor::from(&service(
        "svc-lb",
        json!({"type": "LoadBalancer", "selector": {"app": "web"}}),
    ));

    assert_eq!(descriptor.name, "svc-lb");
    assert_eq!(descriptor.namespace, "default");
    assert_eq!(descriptor.service_type, ServiceType::LoadBalancer);
    assert_eq!(descriptor.selector, Some(labels(&[("app", "web")])));
    assert!(!descriptor.selects(&labels(&[("app", "web")])));
}

#[tokio::test]
async fn test_match_services_only_lists_requested_namespace() {
    let mut other = service("elsewhere", json!({"selector": {"app": "web"}}));
    other.metadata.namespace = Some("other".to_string());
    let lister = StaticServiceLister::new(vec![
        service("here", json!({"selector": {"app": "web"}})),
        other,
    ]);

    let matched = match_services(&lister, "default", &labels(&[("app", "web")]))
        .await
        .unwrap();
    assert_eq!(matched.into_iter().collect::<Vec<_>>(), vec!["here"]);
}
