//! kubedeps - discover the ConfigMaps, Secrets and Services a Kubernetes
//! workload depends on
//!
//! Inspects workloads from manifest files or from the current kube context.

use anyhow::Result;
use clap::{Parser, Subcommand};

use kubedeps::cli::{self, ConfigSubcommand, GetArgs, InspectArgs};
use kubedeps::config::{Config, ConfigLoader};

/// Discover the ConfigMaps, Secrets and Services a workload depends on
#[derive(Parser, Debug)]
#[command(name = "kubedeps")]
#[command(about = "Discover the ConfigMaps, Secrets and Services a Kubernetes workload depends on", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect workloads from manifest files
    Inspect(InspectArgs),
    /// Inspect a live workload in the current kube context
    Get(GetArgs),
    /// List supported workload kinds
    Kinds,
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Show version information
    Version,
}

/// Load configuration and initialize logging for discovery commands
fn setup(debug: bool) -> Result<Config> {
    let config = ConfigLoader::load()?;
    if let Some(log_path) = cli::init_logging(debug, &config.logger)? {
        if debug {
            eprintln!(
                "Debug logging enabled. Logs written to: {}",
                log_path.display()
            );
        }
    }

    tracing::debug!(
        "Configuration loaded: defaultNamespace={}, concurrency={}",
        config.default_namespace,
        config.discovery.concurrency
    );
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        // Config and informational commands do not need logging set up
        Command::Config { subcommand } => cli::handle_config_command(subcommand),
        Command::Version => {
            cli::display_version();
            Ok(())
        }
        Command::Kinds => {
            cli::handle_kinds();
            Ok(())
        }
        Command::Inspect(inspect) => {
            let config = setup(args.debug)?;
            cli::handle_inspect(inspect, &config).await
        }
        Command::Get(get) => {
            let config = setup(args.debug)?;
            cli::handle_get(get, &config).await
        }
    }
}
