// Path: crates/cli/src/node.rs
//! Wires the validator core together from configuration.

use crate::genesis::{Genesis, StaticValidatorSource};
use anyhow::{bail, Context, Result};
use parking_lot::RwLock;
use pulsar_api::registry::KeyRegistry;
use pulsar_consensus::VoteExtHandler;
use pulsar_crypto::poseidon::PoseidonParams;
use pulsar_crypto::{ActionAccumulator, Keypair};
use pulsar_services::{
    BridgeKeeper, HttpActionVerifier, KeyStoreService, StateBank, VoteExtStore,
};
use pulsar_state::memory::MemoryState;
use pulsar_types::config::ValidatorConfig;
use std::sync::Arc;

/// A validator core over an in-memory state.
///
/// The handler and keeper are the same types a host chain would embed; the
/// node only owns their shared collaborators and the state they write to.
pub struct ValidatorNode {
    config: ValidatorConfig,
    state: RwLock<MemoryState>,
    keys: Arc<KeyStoreService>,
    records: Arc<VoteExtStore>,
    bridge: BridgeKeeper,
    vote_ext: VoteExtHandler,
}

impl std::fmt::Debug for ValidatorNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorNode")
            .field("chain_id", &self.config.chain_id)
            .field("own_address", &self.vote_ext.own_address())
            .finish_non_exhaustive()
    }
}

impl ValidatorNode {
    /// Builds the core and applies `genesis`.
    ///
    /// Fails if the signing key is missing or malformed, if the Poseidon table
    /// is missing or does not reproduce the pinned genesis hash, if the
    /// verifier client cannot be built, or if a genesis registration is
    /// rejected.
    pub fn build(config: ValidatorConfig, genesis: &Genesis) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        install_poseidon_params(&config)?;
        let material = config
            .signing_key_material()
            .context("resolving the signing key")?;
        let signing_key =
            Keypair::from_base58(&material).context("the configured signing key is invalid")?;

        let mut state = MemoryState::new();
        let keys = Arc::new(KeyStoreService::new());
        for msg in &genesis.key_stores {
            keys.register(&mut state, msg)
                .with_context(|| format!("genesis registration for {}", msg.creator))?;
        }

        let verifier = Arc::new(
            HttpActionVerifier::new(&config.verifier).context("building the verifier client")?,
        );
        let bridge = BridgeKeeper::new(
            Arc::new(StateBank::new()),
            keys.clone(),
            verifier,
            &config.accumulator,
        )?;
        bridge.set_params(&mut state, &config.bridge)?;

        let records = Arc::new(VoteExtStore::new());
        let validators = Arc::new(StaticValidatorSource::new(genesis.validators.clone()));
        let vote_ext = VoteExtHandler::new(
            signing_key,
            config.network,
            keys.clone(),
            validators,
            records.clone(),
        )?
        .with_state_root_retention(config.state_root_retention);

        if !keys.is_foreign_key_registered(&state, vote_ext.own_address())? {
            tracing::warn!(
                target: "node",
                address = vote_ext.own_address(),
                "signing key is not registered at genesis; own votes will be skipped until it is"
            );
        }
        tracing::info!(
            target: "node",
            chain_id = %config.chain_id,
            address = vote_ext.own_address(),
            validators = genesis.validators.len(),
            registrations = genesis.key_stores.len(),
            "validator core assembled"
        );

        Ok(Self {
            config,
            state: RwLock::new(state),
            keys,
            records,
            bridge,
            vote_ext,
        })
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// The node's state. Callbacks take it by reference from here.
    pub fn state(&self) -> &RwLock<MemoryState> {
        &self.state
    }

    pub fn key_store(&self) -> &KeyStoreService {
        &self.keys
    }

    pub fn vote_ext_records(&self) -> &VoteExtStore {
        &self.records
    }

    pub fn bridge(&self) -> &BridgeKeeper {
        &self.bridge
    }

    pub fn vote_ext(&self) -> &VoteExtHandler {
        &self.vote_ext
    }

    /// The commitment over the current state, in the form passed as `app_hash`.
    pub fn app_hash(&self) -> Vec<u8> {
        self.state.read().root_hash().to_vec()
    }
}

/// Installs the configured Poseidon table and checks it against the pinned
/// genesis hash. Everything that hashes must be built after this runs.
fn install_poseidon_params(config: &ValidatorConfig) -> Result<()> {
    let accumulator = &config.accumulator;
    match &accumulator.poseidon_params {
        Some(path) => {
            let params = PoseidonParams::load(path)
                .with_context(|| format!("loading the Poseidon table from {}", path))?;
            PoseidonParams::install(params)?;
            ActionAccumulator::new(accumulator)?
                .verify_genesis()
                .with_context(|| format!("the Poseidon table in {} is not the attested chain's", path))?;
            tracing::info!(target: "node", table = %path, "Poseidon parameters installed");
        }
        None if accumulator.development_params => {
            if PoseidonParams::is_installed() {
                bail!("a pinned Poseidon table is installed; development parameters cannot be used");
            }
            tracing::warn!(
                target: "node",
                "running on development Poseidon parameters; hashes will not match the attested chain"
            );
        }
        None => bail!(
            "accumulator.poseidon_params is not set (set accumulator.development_params = true for local testing)"
        ),
    }
    Ok(())
}
