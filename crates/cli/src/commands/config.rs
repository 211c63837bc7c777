// Path: crates/cli/src/commands/config.rs

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use pulsar_crypto::Keypair;
use pulsar_types::config::ValidatorConfig;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct ConfigCmdArgs {
    #[clap(subcommand)]
    pub command: ConfigSubCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubCommands {
    /// Write a default validator.toml.
    New {
        #[clap(long, default_value = "validator.toml")]
        out: PathBuf,
        #[clap(long, default_value = "pulsar-devnet")]
        chain_id: String,
        /// Path to a file holding the base58check secret key.
        #[clap(long)]
        signing_key_file: Option<String>,
        /// Base URL of the action verifier.
        #[clap(long)]
        verifier_url: Option<String>,
        /// Path to the pinned Poseidon table (JSON).
        #[clap(long, conflicts_with = "development_params")]
        poseidon_params: Option<String>,
        /// Use the built-in development Poseidon parameters.
        #[clap(long)]
        development_params: bool,
        #[clap(long)]
        force: bool,
    },
    /// Parse and validate a validator.toml, including its signing key.
    Check { path: PathBuf },
}

pub fn run(args: ConfigCmdArgs) -> Result<()> {
    match args.command {
        ConfigSubCommands::New {
            out,
            chain_id,
            signing_key_file,
            verifier_url,
            poseidon_params,
            development_params,
            force,
        } => {
            if out.exists() && !force {
                return Err(anyhow!(
                    "{} already exists (pass --force to overwrite)",
                    out.display()
                ));
            }
            let mut config = ValidatorConfig {
                chain_id,
                signing_key_file,
                ..ValidatorConfig::default()
            };
            if let Some(url) = verifier_url {
                config.verifier.base_url = url;
            }
            config.accumulator.poseidon_params = poseidon_params;
            config.accumulator.development_params = development_params;
            config.validate()?;
            fs::write(&out, config.to_toml_string()?)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("✅ Wrote {}", out.display());
        }
        ConfigSubCommands::Check { path } => {
            let config = ValidatorConfig::load(&path)?;
            let material = config.signing_key_material()?;
            let kp = Keypair::from_base58(&material).context("Invalid signing key")?;
            println!("✅ {} is valid", path.display());
            println!("   • Chain ID:  {}", config.chain_id);
            println!("   • Network:   {:?}", config.network);
            println!("   • Address:   {}", kp.address());
            println!("   • Verifier:  {}", config.verifier.base_url);
            match &config.accumulator.poseidon_params {
                Some(path) => println!("   • Poseidon:  {}", path),
                None if config.accumulator.development_params => {
                    println!("   • Poseidon:  development parameters (not chain-compatible)")
                }
                None => println!("   • Poseidon:  not configured; the node will refuse to start"),
            }
        }
    }
    Ok(())
}
