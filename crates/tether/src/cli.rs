//! Commands behind the `tether` binary
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tether check` | Run every linked declaration and resolve; fails on any error |
//! | `tether list` | List linked declarations |
//! | `tether demo` | Start the demo services, print what they stored, stop |
//! | `tether run` | Start the linked services and wait for Ctrl-C |
//! | `tether config` | Print the effective configuration as TOML |

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tether_domain::StoreStats;
use tether_domain::declare::list_declarations;
use tether_infrastructure::config::ServicesConfig;
use tether_infrastructure::{ConfigLoader, TetherConfig, bootstrap};
use tether_services::{Lifecycle, ServiceContext};
use tracing::info;

use crate::demo::{self, recorder::UserName};

/// Command line interface for tether
#[derive(Parser, Debug)]
#[command(name = "tether")]
#[command(about = "Tether - dependency declaration and resolution")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Declare everything linked into the binary and resolve it
    Check,
    /// List linked declarations
    List,
    /// Start the demo services, print the store, stop
    Demo {
        /// User recorded as having started the services
        #[arg(long, default_value = "Peter")]
        user: String,
    },
    /// Start the linked services and wait for Ctrl-C
    Run,
    /// Print the effective configuration as TOML
    Config,
}

/// Load configuration from `path`, or from the default locations
pub fn load_config(path: Option<&Path>) -> anyhow::Result<TetherConfig> {
    let loader = match path {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    loader.load().context("failed to load configuration")
}

/// Lifecycle over the linked service list, configured by `config`
pub fn service_lifecycle(config: &ServicesConfig) -> Lifecycle {
    Lifecycle::global()
        .with_verbose(config.verbose)
        .with_stop_timeout(config.stop_timeout())
}

/// Resolve every linked declaration, then reset the registry
pub fn check(config: &TetherConfig) -> anyhow::Result<StoreStats> {
    let mut registry = bootstrap(config);
    let stats = registry.stats();
    let resolved = registry.resolve_all();
    registry.reset();
    resolved.context("resolution failed")?;
    Ok(stats)
}

/// Start the demo services as `user` and return what the recorder stored
pub async fn demo(
    config: &TetherConfig,
    user: &str,
) -> anyhow::Result<Vec<(&'static str, Option<String>)>> {
    let mut registry = bootstrap(config);
    let mut lifecycle = service_lifecycle(&config.services);
    let ctx = ServiceContext::new().with_value(UserName(user.to_string()));

    let started = lifecycle.resolve_and_start(&mut registry, ctx).await;
    let report = match started {
        Ok(ctx) => demo::report(&ctx).map_err(anyhow::Error::from),
        Err(error) => Err(anyhow::Error::from(error)),
    };
    lifecycle.stop_and_reset(&mut registry).await;
    report.context("demo failed")
}

/// Effective configuration rendered as TOML
pub fn config_toml(config: &TetherConfig) -> anyhow::Result<String> {
    toml::to_string_pretty(config).context("failed to serialize configuration")
}

/// Run `command` with `config`, printing results to stdout
pub async fn execute(command: &Command, config: &TetherConfig) -> anyhow::Result<()> {
    match command {
        Command::Check => {
            let stats = check(config)?;
            println!(
                "ok: {} targets, {} requirements, {} provisions",
                stats.targets, stats.requirements, stats.provisions
            );
        }
        Command::List => {
            for (module, description) in list_declarations() {
                println!("{module:<24} {description}");
            }
        }
        Command::Demo { user } => {
            for (key, value) in demo(config, user).await? {
                println!("{key:<12} {}", value.as_deref().unwrap_or("-"));
            }
        }
        Command::Run => {
            let mut registry = bootstrap(config);
            let mut lifecycle = service_lifecycle(&config.services);
            info!("running until interrupted");
            lifecycle
                .run(&mut registry, ServiceContext::new())
                .await
                .context("services failed")?;
        }
        Command::Config => print!("{}", config_toml(config)?),
    }
    Ok(())
}
