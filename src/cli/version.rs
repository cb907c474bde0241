//! Version command handler

use crate::models::WorkloadKind;

/// Display version information
pub fn display_version() {
    println!("kubedeps {}", env!("CARGO_PKG_VERSION"));
    println!("  {}", env!("CARGO_PKG_DESCRIPTION"));
    println!("  License: {}", env!("CARGO_PKG_LICENSE"));
    println!("  Workload kinds: {}", WorkloadKind::all().len());
}
