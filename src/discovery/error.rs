//! Discovery errors

use crate::models::WorkloadKindId;

/// Boxed source error of a failed cluster read
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while discovering a workload's dependencies
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// No extractor is registered for the object's kind
    #[error("no dependency interpreter registered for {0}")]
    UnsupportedKind(WorkloadKindId),

    /// The object could not be converted into its typed form
    #[error("malformed {kind} '{name}': {reason}")]
    MalformedWorkload {
        kind: String,
        name: String,
        reason: String,
    },

    /// Listing Services in the workload's namespace failed
    #[error("failed to list services in namespace '{namespace}': {source}")]
    ClusterQuery {
        namespace: String,
        #[source]
        source: BoxError,
    },
}

impl DiscoveryError {
    pub fn malformed(kind: &str, name: &str, reason: impl Into<String>) -> Self {
        DiscoveryError::MalformedWorkload {
            kind: kind.to_string(),
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn cluster_query(namespace: &str, source: impl Into<BoxError>) -> Self {
        DiscoveryError::ClusterQuery {
            namespace: namespace.to_string(),
            source: source.into(),
        }
    }

    /// Benign "not applicable" outcome; callers treat it as zero dependencies
    pub fn is_unsupported(&self) -> bool {
        matches!(self, DiscoveryError::UnsupportedKind(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, DiscoveryError::MalformedWorkload { .. })
    }

    pub fn is_cluster_query(&self) -> bool {
        matches!(self, DiscoveryError::ClusterQuery { .. })
    }
}

/// Result type for discovery operations
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
