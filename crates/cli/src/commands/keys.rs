// Path: crates/cli/src/commands/keys.rs

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use pulsar_crypto::Keypair;
use pulsar_services::KeyStoreService;
use rand::rngs::OsRng;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct KeysArgs {
    #[clap(subcommand)]
    pub command: KeysCommands,
}

#[derive(Subcommand, Debug)]
pub enum KeysCommands {
    /// Generate a new foreign-chain keypair.
    Generate {
        /// Write the secret key here instead of printing it.
        #[clap(long)]
        out: Option<PathBuf>,
        /// Overwrite `out` if it exists.
        #[clap(long)]
        force: bool,
    },
    /// Show the curve coordinates behind a base58check address.
    Inspect { address: String },
}

pub fn run(args: KeysArgs) -> Result<()> {
    match args.command {
        KeysCommands::Generate { out, force } => {
            let kp = Keypair::generate(&mut OsRng).map_err(|e| anyhow!("Gen failed: {}", e))?;
            println!("Address:     {}", kp.address());
            let secret = kp.secret().to_base58();
            match out {
                Some(path) => {
                    if path.exists() && !force {
                        return Err(anyhow!(
                            "{} already exists (pass --force to overwrite)",
                            path.display()
                        ));
                    }
                    fs::write(&path, format!("{}\n", secret.as_str()))
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Secret key:  written to {}", path.display());
                }
                None => println!("Secret key:  {}", secret.as_str()),
            }
        }
        KeysCommands::Inspect { address } => {
            let coordinates = KeyStoreService::new()
                .foreign_pubkey_coordinates(&address)
                .context("Invalid address")?;
            println!("{}", serde_json::to_string_pretty(&coordinates)?);
        }
    }
    Ok(())
}
