// Path: crates/cli/src/commands/node.rs

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use pulsar_cli::{Genesis, ValidatorNode};
use pulsar_telemetry::http::{run_server, Readiness};
use pulsar_types::config::ValidatorConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;

#[derive(Parser, Debug)]
pub struct NodeArgs {
    #[clap(subcommand)]
    pub command: NodeCommands,
}

#[derive(Subcommand, Debug)]
pub enum NodeCommands {
    /// Assemble the validator core and serve health and metrics until Ctrl-C.
    Start {
        #[clap(long, default_value = "validator.toml")]
        config: PathBuf,
        /// Validator set and key registrations at height zero.
        #[clap(long)]
        genesis: Option<PathBuf>,
    },
}

pub async fn run(args: NodeArgs) -> Result<()> {
    match args.command {
        NodeCommands::Start { config, genesis } => start(config, genesis).await,
    }
}

async fn start(config_path: PathBuf, genesis_path: Option<PathBuf>) -> Result<()> {
    let config = ValidatorConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let genesis = match genesis_path {
        Some(path) => Genesis::load(path)?,
        None => Genesis::default(),
    };

    // The sink must be in place before the components capture it.
    if config.telemetry.enabled {
        let sink = pulsar_telemetry::prometheus::install()?;
        pulsar_telemetry::sinks::SINK
            .set(sink)
            .map_err(|_| anyhow!("metrics sink already installed"))?;
    }

    let node = ValidatorNode::build(config, &genesis)?;
    tracing::info!(
        target: "node",
        app_hash = %hex::encode(node.app_hash()),
        verifier = %node.config().verifier.base_url,
        "node started"
    );

    let readiness = Readiness::new();
    readiness.set_ready(true);

    if node.config().telemetry.enabled {
        let addr: SocketAddr = node
            .config()
            .telemetry
            .listen_address
            .parse()
            .context("telemetry.listen_address")?;
        run_server(addr, readiness.clone(), async {
            let _ = signal::ctrl_c().await;
        })
        .await?;
    } else {
        signal::ctrl_c().await?;
    }

    readiness.set_ready(false);
    tracing::info!(target: "node", "stopped");
    Ok(())
}
