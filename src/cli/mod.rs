//! CLI command handling module
//!
//! Handles all CLI subcommands; argument parsing lives in `main.rs`.

mod commands;
mod inspect;
mod logging;
mod version;

pub use commands::{ConfigSubcommand, handle_config_command};
pub use inspect::{GetArgs, InspectArgs, handle_get, handle_inspect, handle_kinds, summarize};
pub use logging::init_logging;
pub use version::display_version;
