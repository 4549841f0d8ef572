//! CLI - Command Line Interface
//!
//! Available Commands:
//! - agentsmd hook           - Bridge host tool events (stdin) to injections (stdout)
//! - agentsmd resolve <path> - Show the markers a read of <path> would inject
//! - agentsmd config         - Print the effective configuration

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::BufReader;
use tracing::info;

use agentsmd_core::{InjectError, InjectorConfig, create_local_fs};
use agentsmd_runtime::{InjectionCoordinator, SharedHost};

use crate::bridge::{HookBridge, JsonLinesHost};

/// CLI Errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] InjectError),

    #[error("Hook bridge failed: {0}")]
    Bridge(String),
}

/// agentsmd CLI
#[derive(Parser, Debug)]
#[command(name = "agentsmd")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Project root directory
    #[arg(short, long, global = true, env = "AGENTSMD_PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,

    /// Configuration file (defaults to <root>/.agentsmd.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (tracing on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Read host events from stdin, write host commands to stdout
    Hook,

    /// List the markers a read of PATH would inject
    Resolve(ResolveArgs),

    /// Print the effective configuration as YAML
    Config,
}

#[derive(Args, Debug)]
pub(crate) struct ResolveArgs {
    /// File path, absolute or relative to the project root
    pub path: String,

    /// Print absolute marker paths
    #[arg(long)]
    pub absolute: bool,
}

/// Settings resolved from flags, environment and config file
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Absolute project root
    pub project_root: PathBuf,

    /// Loaded injector configuration
    pub injector: InjectorConfig,
}

impl CliConfig {
    /// Flag/env root wins over the config file, which wins over `cwd`
    pub fn resolve(
        project_root: Option<&Path>,
        config_file: Option<&Path>,
        cwd: &Path,
    ) -> Result<Self, CliError> {
        let flag_root = project_root.map(|root| absolute(root, cwd));

        let mut injector = match config_file {
            Some(path) => InjectorConfig::load(&absolute(path, cwd))?,
            None => InjectorConfig::discover(flag_root.as_deref().unwrap_or(cwd))?,
        };

        let project_root = flag_root.unwrap_or_else(|| injector.effective_project_root(cwd));
        injector.project_root = Some(project_root.clone());

        Ok(Self {
            project_root,
            injector,
        })
    }

    pub fn coordinator(&self, host: SharedHost) -> InjectionCoordinator {
        InjectionCoordinator::new(&self.project_root, create_local_fs(), host)
            .with_service_name(self.injector.service_name.clone())
    }
}

fn absolute(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Parse CLI arguments and execute commands
pub async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let cwd = std::env::current_dir().map_err(CliError::WorkingDir)?;
    let config = CliConfig::resolve(cli.project_root.as_deref(), cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Hook => cmd_hook(&config).await,
        Commands::Resolve(args) => cmd_resolve(args, &config),
        Commands::Config => cmd_config(&config),
    }
}

async fn cmd_hook(config: &CliConfig) -> Result<(), CliError> {
    info!("Hook bridge rooted at {}", config.project_root.display());

    let host: SharedHost = Arc::new(JsonLinesHost::new(tokio::io::stdout()));
    let coordinator = Arc::new(config.coordinator(host));
    let bridge = HookBridge::new(coordinator, config.injector.clone());

    bridge
        .run(BufReader::new(tokio::io::stdin()))
        .await
        .map_err(|e| CliError::Bridge(format!("{:#}", e)))?;
    Ok(())
}

fn cmd_resolve(args: ResolveArgs, config: &CliConfig) -> Result<(), CliError> {
    // Resolution never touches the host
    let (_recorder, host) = agentsmd_runtime::create_recording_host();
    let coordinator = config.coordinator(host);

    for marker in coordinator.markers_for(&args.path) {
        if args.absolute {
            println!("{}", marker.path.display());
        } else {
            println!("{}", marker.display_path());
        }
    }
    Ok(())
}

fn cmd_config(config: &CliConfig) -> Result<(), CliError> {
    print!("{}", config.injector.to_yaml()?);
    Ok(())
}

/// Entry point used by the binary
pub async fn run_cli() -> anyhow::Result<()> {
    run().await?;
    Ok(())
}
