//! Restake daemon: replays a scenario of blocks through the restake node and
//! prints each block's result as a JSON line.

mod scenario;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use restake_node::{init_logging, App, LogFormat, NodeConfig};
use restake_types::Dec;

use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "restake-daemon", about = "Restake ledger daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "RESTAKE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "RESTAKE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "RESTAKE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Staking denomination.
    #[arg(long, env = "RESTAKE_BOND_DENOM")]
    bond_denom: Option<String>,

    /// Default auto-restake ratio written at genesis.
    #[arg(long, env = "RESTAKE_AUTO_RESTAKE_RATIO")]
    auto_restake_ratio: Option<Dec>,

    /// Print Prometheus metrics to stderr after the run.
    #[arg(long, env = "RESTAKE_ENABLE_METRICS")]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Execute a JSON scenario and print one result per block.
    Simulate {
        /// Scenario file holding a genesis and a list of blocks.
        #[arg(long)]
        scenario: PathBuf,
    },
    /// Print the effective configuration as TOML.
    #[command(name = "config")]
    ShowConfig,
}

impl Cli {
    fn node_config(&self) -> anyhow::Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => NodeConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => NodeConfig::default(),
        };
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        if let Some(denom) = &self.bond_denom {
            config.bond_denom = denom.clone();
        }
        if let Some(ratio) = self.auto_restake_ratio {
            config.restaking.default_auto_restake_ratio = ratio;
        }
        config.enable_metrics |= self.metrics;
        Ok(config)
    }
}

fn simulate(config: &NodeConfig, scenario: &Scenario) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    app.init_genesis(&scenario.genesis)
        .context("applying genesis")?;
    tracing::info!(
        blocks = scenario.blocks.len(),
        ratio = %app.auto_restake_ratio(),
        "replaying scenario"
    );

    for block in &scenario.blocks {
        let result = app
            .execute_block(block)
            .with_context(|| format!("executing block {}", block.height))?;
        println!("{}", serde_json::to_string(&result)?);
    }

    if config.enable_metrics {
        eprintln!("{}", app.metrics().encode()?);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.node_config()?;

    let format: LogFormat = config.log_format()?;
    init_logging(format, &config.log_level)?;

    match &cli.command {
        Command::Simulate { scenario } => {
            let scenario = Scenario::load(scenario)?;
            simulate(&config, &scenario)?;
            tracing::info!("scenario finished");
        }
        Command::ShowConfig => print!("{}", config.to_toml_string()?),
    }
    Ok(())
}
