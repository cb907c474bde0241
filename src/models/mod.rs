//! Model layer
//!
//! Structure:
//! - `workload_kind.rs` - supported workload kinds and their GVK identifiers
//! - `reference.rs` - dependency references, results and batch reports

pub mod reference;
pub mod workload_kind;

pub use reference::{
    CONFIG_MAP_KIND, DependencyResult, DependentObjectReference, ObjectKey, SECRET_KIND,
    SERVICE_KIND, WorkloadReport,
};
pub use workload_kind::{WorkloadKind, WorkloadKindId};
