//! Workload kind definitions
//!
//! This module provides the closed set of workload kinds whose pod template
//! can be inspected for dependencies, together with the (group, version, kind)
//! identifier used to look them up.

use std::fmt;
use std::str::FromStr;

use kube::core::TypeMeta;

/// (group, version, kind) triple identifying a resource schema
///
/// The core group is represented by an empty `group`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkloadKindId {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl WorkloadKindId {
    pub fn new(group: &str, version: &str, kind: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Build an identifier from an `apiVersion` string and a kind
    ///
    /// `"v1"` maps to the core group, `"apps/v1"` to group `apps`.
    pub fn from_api_version(api_version: &str, kind: &str) -> Self {
        match api_version.split_once('/') {
            Some((group, version)) => Self::new(group, version, kind),
            None => Self::new("", api_version, kind),
        }
    }

    /// Identifier of an object's type metadata
    pub fn from_type_meta(types: &TypeMeta) -> Self {
        Self::from_api_version(&types.api_version, &types.kind)
    }

    /// The `apiVersion` string for this identifier
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for WorkloadKindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.api_version(), self.kind)
    }
}

/// Enumeration of all workload kinds with an embedded pod specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    // apps/v1 controllers
    Deployment,
    StatefulSet,
    DaemonSet,
    // batch/v1 run-to-completion controller
    Job,
    // core/v1 bare pod
    Pod,
}

impl WorkloadKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadKind::Deployment => "Deployment",
            WorkloadKind::StatefulSet => "StatefulSet",
            WorkloadKind::DaemonSet => "DaemonSet",
            WorkloadKind::Job => "Job",
            WorkloadKind::Pod => "Pod",
        }
    }

    /// API group the kind is served from (empty for the core group)
    pub fn group(&self) -> &'static str {
        match self {
            WorkloadKind::Deployment | WorkloadKind::StatefulSet | WorkloadKind::DaemonSet => {
                "apps"
            }
            WorkloadKind::Job => "batch",
            WorkloadKind::Pod => "",
        }
    }

    pub fn version(&self) -> &'static str {
        "v1"
    }

    /// The registry key for this kind
    pub fn id(&self) -> WorkloadKindId {
        WorkloadKindId::new(self.group(), self.version(), self.as_str())
    }

    /// Try to parse a string into a WorkloadKind, returning None if invalid
    pub fn parse_optional(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Get all supported workload kinds
    pub fn all() -> &'static [Self] {
        &[
            WorkloadKind::Deployment,
            WorkloadKind::StatefulSet,
            WorkloadKind::DaemonSet,
            WorkloadKind::Job,
            WorkloadKind::Pod,
        ]
    }

    /// Try to parse a string (case-insensitive, kubectl-style aliases) into a WorkloadKind
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deployment" | "deployments" | "deploy" => Some(WorkloadKind::Deployment),
            "statefulset" | "statefulsets" | "sts" => Some(WorkloadKind::StatefulSet),
            "daemonset" | "daemonsets" | "ds" => Some(WorkloadKind::DaemonSet),
            "job" | "jobs" => Some(WorkloadKind::Job),
            "pod" | "pods" | "po" => Some(WorkloadKind::Pod),
            _ => None,
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkloadKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Deployment" => Ok(WorkloadKind::Deployment),
            "StatefulSet" => Ok(WorkloadKind::StatefulSet),
            "DaemonSet" => Ok(WorkloadKind::DaemonSet),
            "Job" => Ok(WorkloadKind::Job),
            "Pod" => Ok(WorkloadKind::Pod),
            _ => Err(format!("Unknown workload kind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_api_version() {
        let id = WorkloadKindId::from_api_version("apps/v1", "Deployment");
        assert_eq!(id.group, "apps");
        assert_eq!(id.version, "v1");
        assert_eq!(id.kind, "Deployment");

        let core = WorkloadKindId::from_api_version("v1", "Pod");
        assert_eq!(core.group, "");
        assert_eq!(core.api_version(), "v1");
    }

    #[test]
    fn test_kind_ids() {
        assert_eq!(WorkloadKind::Deployment.id().api_version(), "apps/v1");
        assert_eq!(WorkloadKind::Job.id().api_version(), "batch/v1");
        assert_eq!(WorkloadKind::Pod.id().api_version(), "v1");
    }

    #[test]
    fn test_display_id() {
        assert_eq!(
            WorkloadKind::DaemonSet.id().to_string(),
            "apps/v1, Kind=DaemonSet"
        );
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!(
            WorkloadKind::from_str_case_insensitive("deploy"),
            Some(WorkloadKind::Deployment)
        );
        assert_eq!(
            WorkloadKind::from_str_case_insensitive("STS"),
            Some(WorkloadKind::StatefulSet)
        );
        assert_eq!(WorkloadKind::from_str_case_insensitive("cronjob"), None);
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(WorkloadKind::parse_optional("Job"), Some(WorkloadKind::Job));
        assert_eq!(WorkloadKind::parse_optional("job"), None);
    }
}
