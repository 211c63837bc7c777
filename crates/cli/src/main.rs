// Path: crates/cli/src/main.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Pulsar CLI
//!
//! Key management, configuration, and a standalone validator node.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::*;

#[derive(Parser, Debug)]
#[clap(
    name = "pulsar",
    version,
    about = "The Pulsar validator toolkit.",
    long_about = "Generates and inspects foreign-chain keys, writes and checks validator configuration, and runs a standalone validator core."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage foreign-chain signing keys.
    Keys(keys::KeysArgs),

    /// Generate and validate validator configuration.
    Config(config::ConfigCmdArgs),

    /// Run the validator core.
    Node(node::NodeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output on stdout stays scriptable.
    pulsar_telemetry::init::init_tracing()?;

    match cli.command {
        Commands::Keys(args) => keys::run(args),
        Commands::Config(args) => config::run(args),
        Commands::Node(args) => node::run(args).await,
    }
}
