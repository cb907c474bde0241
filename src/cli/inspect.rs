//! Discovery command handlers
//!
//! `inspect` reads workloads from manifests, `get` fetches one live workload
//! and `kinds` lists what the registry understands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::Config;
use crate::discovery::{BatchOutcome, DependencyRegistry, StaticServiceLister, discover_batch};
use crate::manifest;
use crate::models::{ObjectKey, WorkloadKind, WorkloadReport};
use crate::output::{self, OutputFormat};
use crate::services::DependencyService;

/// Arguments of `kubedeps inspect`
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Manifest files to inspect (multi-document YAML)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Match against Services found in the manifests instead of the cluster
    #[arg(long)]
    pub offline: bool,

    /// Namespace for objects that do not declare one
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Output format: yaml, json or table
    #[arg(long, short = 'o')]
    pub output: Option<OutputFormat>,

    /// Kubeconfig context to use instead of the current one
    #[arg(long)]
    pub context: Option<String>,

    /// Leave objects of unsupported kinds out of the report
    #[arg(long)]
    pub skip_unsupported: bool,
}

/// Arguments of `kubedeps get`
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Workload kind (deployment, statefulset, daemonset, job, pod or an alias)
    #[arg(value_parser = parse_kind)]
    pub kind: WorkloadKind,

    /// Workload name
    pub name: String,

    /// Namespace of the workload
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Output format: yaml, json or table
    #[arg(long, short = 'o')]
    pub output: Option<OutputFormat>,

    /// Kubeconfig context to use instead of the current one
    #[arg(long)]
    pub context: Option<String>,
}

/// Connect to the requested kubeconfig context, or the current one
async fn connect(context: Option<&str>) -> Result<DependencyService> {
    match context {
        Some(context) => {
            tracing::debug!("Using kube context {}", context);
            DependencyService::connect(context).await
        }
        None => {
            tracing::debug!("Using kube context {}", crate::kube::get_context());
            DependencyService::connect_default().await
        }
    }
}

fn parse_kind(s: &str) -> Result<WorkloadKind, String> {
    WorkloadKind::from_str_case_insensitive(s).ok_or_else(|| {
        let known: Vec<&str> = WorkloadKind::all().iter().map(|k| k.as_str()).collect();
        format!(
            "unsupported workload kind '{}' (expected one of {})",
            s,
            known.join(", ")
        )
    })
}

/// Inspect workloads read from manifest files
pub async fn handle_inspect(args: InspectArgs, config: &Config) -> Result<()> {
    let namespace = args
        .namespace
        .as_deref()
        .unwrap_or(&config.default_namespace);
    let format = args.output.unwrap_or(config.output.format);
    let skip_unsupported = args.skip_unsupported || config.discovery.skip_unsupported;
    let concurrency = config.discovery.concurrency;

    let objects = manifest::load_files(&args.files)?;
    let objects = manifest::with_default_namespace(objects, namespace);
    let (workloads, services) = manifest::split_services(objects)?;

    tracing::debug!(
        "Inspecting {} objects ({} services in manifests)",
        workloads.len(),
        services.len()
    );

    let outcomes = if args.offline {
        let lister = StaticServiceLister::new(services);
        tracing::debug!("Matching against {} manifest services", lister.len());
        discover_batch(&DependencyRegistry::new(), &lister, &workloads, concurrency).await
    } else {
        if !services.is_empty() {
            tracing::debug!(
                "Ignoring {} manifest services, matching against the cluster",
                services.len()
            );
        }
        let service = connect(args.context.as_deref()).await?;
        service.dependencies_of_all(&workloads, concurrency).await
    };

    let total = outcomes.len();
    let (reports, failed) = summarize(outcomes, skip_unsupported);
    print!("{}", output::render(&reports, format)?);

    if failed > 0 {
        anyhow::bail!(
            "{} of {} workloads failed dependency discovery",
            failed,
            total
        );
    }
    Ok(())
}

/// Discover the dependencies of one live workload
pub async fn handle_get(args: GetArgs, config: &Config) -> Result<()> {
    let namespace = args
        .namespace
        .as_deref()
        .unwrap_or(&config.default_namespace);
    let format = args.output.unwrap_or(config.output.format);

    let service = connect(args.context.as_deref()).await?;
    let dependencies = service
        .dependencies_for(args.kind, namespace, &args.name)
        .await?;

    let id = args.kind.id();
    let report = WorkloadReport {
        workload: ObjectKey {
            api_version: id.api_version(),
            kind: id.kind,
            namespace: namespace.to_string(),
            name: args.name,
        },
        dependencies: dependencies.into_vec(),
        error: None,
    };

    print!(
        "{}",
        output::render(&[report], format).context("Failed to render report")?
    );
    Ok(())
}

/// List the workload kinds the registry handles
pub fn handle_kinds() {
    print!("{}", kinds_table(&DependencyRegistry::new()));
}

fn kinds_table(registry: &DependencyRegistry) -> String {
    let rows = registry
        .kinds()
        .into_iter()
        .map(|id| {
            let api_version = id.api_version();
            vec![id.kind, api_version]
        });
    output::plain_table(&["KIND", "APIVERSION"], rows)
}

/// Turn outcomes into report rows and count failures
///
/// Unsupported kinds never count as failures; with `skip_unsupported` they
/// are dropped from the rows as well.
pub fn summarize(
    outcomes: Vec<BatchOutcome>,
    skip_unsupported: bool,
) -> (Vec<WorkloadReport>, usize) {
    let mut failed = 0;
    let mut reports = Vec::with_capacity(outcomes.len());

    for outcome in outcomes {
        match &outcome.result {
            Err(e) if e.is_unsupported() && skip_unsupported => continue,
            Err(e) if !e.is_unsupported() => failed += 1,
            _ => {}
        }
        reports.push(outcome.into_report());
    }

    (reports, failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{DiscoveryError, object_key};
    use crate::models::{DependencyResult, WorkloadKindId};
    use kube::core::DynamicObject;
    use serde_json::json;

    fn outcome(
        kind: &str,
        name: &str,
        result: Result<DependencyResult, DiscoveryError>,
    ) -> BatchOutcome {
        let object: DynamicObject = serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": kind,
            "metadata": {"name": name, "namespace": "default"}
        }))
        .unwrap();
        BatchOutcome {
            workload: object_key(&object),
            result,
        }
    }

    #[derive(clap::Parser, Debug)]
    enum TestCli {
        Inspect(InspectArgs),
        Get(GetArgs),
    }

    #[test]
    fn test_inspect_args() {
        use clap::Parser;

        let TestCli::Inspect(args) = TestCli::try_parse_from([
            "kubedeps", "inspect", "app.yaml", "--context", "staging", "-o", "table",
        ])
        .unwrap() else {
            panic!("expected inspect");
        };
        assert_eq!(args.files, vec![PathBuf::from("app.yaml")]);
        assert_eq!(args.context.as_deref(), Some("staging"));
        assert_eq!(args.output, Some(OutputFormat::Table));
        assert!(!args.offline);

        // At least one manifest is required
        assert!(TestCli::try_parse_from(["kubedeps", "inspect"]).is_err());
    }

    #[test]
    fn test_get_args() {
        use clap::Parser;

        let TestCli::Get(args) =
            TestCli::try_parse_from(["kubedeps", "get", "sts", "db", "-n", "data"]).unwrap()
        else {
            panic!("expected get");
        };
        assert_eq!(args.kind, WorkloadKind::StatefulSet);
        assert_eq!(args.name, "db");
        assert_eq!(args.namespace.as_deref(), Some("data"));
        assert_eq!(args.context, None);

        assert!(TestCli::try_parse_from(["kubedeps", "get", "cronjob", "nightly"]).is_err());
    }

    #[test]
    fn test_kinds_table() {
        let registry = DependencyRegistry::with_kinds(&[WorkloadKind::Job, WorkloadKind::Pod]);
        insta::assert_snapshot!(kinds_table(&registry), @r"
        KIND   APIVERSION
        Pod    v1
        Job    batch/v1
        ");
    }

    #[test]
    fn test_parse_kind_aliases() {
        assert_eq!(parse_kind("deploy"), Ok(WorkloadKind::Deployment));
        assert_eq!(parse_kind("Pod"), Ok(WorkloadKind::Pod));
        assert!(parse_kind("cronjob").unwrap_err().contains("DaemonSet"));
    }

    #[test]
    fn test_summarize_counts_failures() {
        let outcomes = vec![
            outcome("Pod", "ok", Ok(DependencyResult::default())),
            outcome(
                "Pod",
                "bad",
                Err(DiscoveryError::malformed("Pod", "bad", "missing spec")),
            ),
            outcome(
                "ConfigMap",
                "cm",
                Err(DiscoveryError::UnsupportedKind(WorkloadKindId::new(
                    "",
                    "v1",
                    "ConfigMap",
                ))),
            ),
        ];

        let (reports, failed) = summarize(outcomes, false);
        assert_eq!(failed, 1);
        assert_eq!(reports.len(), 3);
        assert!(reports[2].error.is_some());
    }

    #[test]
    fn test_summarize_skips_unsupported() {
        let outcomes = vec![
            outcome("Pod", "ok", Ok(DependencyResult::default())),
            outcome(
                "ConfigMap",
                "cm",
                Err(DiscoveryError::UnsupportedKind(WorkloadKindId::new(
                    "",
                    "v1",
                    "ConfigMap",
                ))),
            ),
        ];

        let (reports, failed) = summarize(outcomes, true);
        assert_eq!(failed, 0);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].workload.name, "ok");
    }
}
