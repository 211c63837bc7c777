// Path: crates/consensus/src/vote_ext/handler.rs
use super::cache::VoteCache;
use super::wire::{SignedVoteExtension, VoteExtPayload, VoteExtensionBody, GENESIS_STATE_ROOT_HEX};
use crate::merkleizer::Merkleizer;
use parking_lot::RwLock;
use pulsar_api::consensus::{
    CrossChainValidatorSource, ProposalStatus, RejectReason, VerifyStatus, VoteExtRecordSink,
    VoteExtensionApp,
};
use pulsar_api::registry::KeyRegistry;
use pulsar_api::state::{commit_change_set, StateAccess, StateOverlay};
use pulsar_crypto::{schnorr, Keypair, Poseidon, PublicKey, Signature};
use pulsar_telemetry::sinks::VoteExtMetricsSink;
use pulsar_telemetry::time::Timer;
use pulsar_types::app::{ForeignValidatorUpdate, ValidatorInfo, VoteExtRecord};
use pulsar_types::config::NetworkId;
use pulsar_types::error::VoteExtError;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Heights of local state roots kept when none is configured.
pub const DEFAULT_STATE_ROOT_RETENTION: u64 = 100;

/// The node's vote-extension component. One instance lives for the process.
pub struct VoteExtHandler {
    registry: Arc<dyn KeyRegistry>,
    validators: Arc<dyn CrossChainValidatorSource>,
    records: Arc<dyn VoteExtRecordSink>,
    signing_key: Keypair,
    own_address: String,
    network: NetworkId,
    merkleizer: Merkleizer,
    poseidon: Poseidon<'static>,
    votes: VoteCache,
    state_roots: RwLock<BTreeMap<u64, Vec<u8>>>,
    genesis_state_root: Vec<u8>,
    retention: u64,
    metrics: &'static dyn VoteExtMetricsSink,
}

impl std::fmt::Debug for VoteExtHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoteExtHandler")
            .field("own_address", &self.own_address)
            .field("network", &self.network)
            .field("retention", &self.retention)
            .finish_non_exhaustive()
    }
}

impl VoteExtHandler {
    pub fn new(
        signing_key: Keypair,
        network: NetworkId,
        registry: Arc<dyn KeyRegistry>,
        validators: Arc<dyn CrossChainValidatorSource>,
        records: Arc<dyn VoteExtRecordSink>,
    ) -> Result<Self, VoteExtError> {
        let genesis_state_root = hex::decode(GENESIS_STATE_ROOT_HEX)
            .map_err(|e| VoteExtError::GenesisRoot(e.to_string()))?;
        let own_address = signing_key.address();
        Ok(Self {
            registry,
            validators,
            records,
            signing_key,
            own_address,
            network,
            merkleizer: Merkleizer::new(),
            poseidon: Poseidon::kimchi(),
            votes: VoteCache::new(),
            state_roots: RwLock::new(BTreeMap::new()),
            genesis_state_root,
            retention: DEFAULT_STATE_ROOT_RETENTION,
            metrics: pulsar_telemetry::vote_ext_metrics(),
        })
    }

    /// Keeps state roots for the last `retention` heights (at least two).
    pub fn with_state_root_retention(mut self, retention: u64) -> Self {
        self.retention = retention.max(2);
        self
    }

    /// Reports to `metrics` instead of the global sink.
    pub fn with_metrics(mut self, metrics: &'static dyn VoteExtMetricsSink) -> Self {
        self.metrics = metrics;
        self
    }

    /// This node's foreign address, the key of its own votes.
    pub fn own_address(&self) -> &str {
        &self.own_address
    }

    /// The in-memory vote cache.
    pub fn votes(&self) -> &VoteCache {
        &self.votes
    }

    /// The state root recorded for `height`, if any.
    pub fn state_root(&self, height: u64) -> Option<Vec<u8>> {
        self.state_roots.read().get(&height).cloned()
    }

    fn seed_genesis_roots(&self) {
        let mut roots = self.state_roots.write();
        roots.insert(0, vec![0u8; 32]);
        roots.insert(1, self.genesis_state_root.clone());
    }

    fn record_state_root(&self, height: u64, app_hash: &[u8]) {
        self.state_roots.write().insert(height, app_hash.to_vec());
    }

    fn prune_state_roots(&self, height: u64) {
        let min_height = height.saturating_sub(self.retention);
        let mut roots = self.state_roots.write();
        *roots = roots.split_off(&min_height);
    }

    fn resolve_foreign_address(
        &self,
        state: &dyn StateAccess,
        consensus_address: &str,
    ) -> Result<String, VoteExtError> {
        self.registry
            .get(state, consensus_address)
            .map_err(|e| VoteExtError::UnknownValidator(format!("{}: {}", consensus_address, e)))?
            .map(|entry| entry.foreign_public_key)
            .ok_or_else(|| VoteExtError::UnknownValidator(consensus_address.to_string()))
    }

    /// This node's view of the transition `height-1 -> height`.
    fn build_body(
        &self,
        state: &dyn StateAccess,
        height: u64,
    ) -> Result<VoteExtensionBody, VoteExtError> {
        let initial = self
            .validators
            .cross_chain_validators()?
            .into_iter()
            .map(|v| {
                Ok(ValidatorInfo {
                    foreign_address: self.resolve_foreign_address(state, &v.address)?,
                    power: v.power,
                })
            })
            .collect::<Result<Vec<_>, VoteExtError>>()?;
        let initial = self.merkleizer.sort_validators(initial);
        let initial_root = self.merkleizer.root(&initial)?;

        let new_root = match self.validators.pending_changes()? {
            Some(changes) => {
                let updates = changes
                    .into_iter()
                    .map(|u| {
                        Ok(ForeignValidatorUpdate {
                            foreign_address: self.resolve_foreign_address(state, &u.address)?,
                            power: u.power,
                        })
                    })
                    .collect::<Result<Vec<_>, VoteExtError>>()?;
                let next = self.merkleizer.apply_updates(&initial, &updates);
                debug!(target: "vote_ext", height, validators = next.len(), "applied pending validator changes");
                self.merkleizer.root(&next)?
            }
            None => initial_root.clone(),
        };

        let previous = height.saturating_sub(1);
        let (initial_state_root, new_state_root) = {
            let roots = self.state_roots.read();
            (
                roots.get(&previous).cloned().unwrap_or_default(),
                roots.get(&height).cloned().unwrap_or_default(),
            )
        };

        Ok(VoteExtensionBody {
            initial_validator_set_root: initial_root,
            initial_state_root,
            initial_block_height: to_body_height(previous)?,
            new_validator_set_root: new_root,
            new_state_root,
            new_block_height: to_body_height(height)?,
        })
    }

    fn check_vote_extension(
        &self,
        state: &dyn StateAccess,
        height: u64,
        validator_address: &str,
        extension: &[u8],
    ) -> Result<(), RejectReason> {
        let ext = SignedVoteExtension::from_bytes(extension)
            .map_err(|e| RejectReason::MalformedExtension(e.to_string()))?;

        let entry = self
            .registry
            .get(state, validator_address)
            .map_err(|e| RejectReason::UnknownValidator(format!("{}: {}", validator_address, e)))?
            .ok_or_else(|| RejectReason::UnknownValidator(validator_address.to_string()))?;

        let registered = PublicKey::from_address(&entry.foreign_public_key)
            .map_err(|e| RejectReason::InvalidRegisteredKey(e.to_string()))?;

        let signature = Signature::from_bytes(&ext.signature)
            .map_err(|e| RejectReason::InvalidSignatureEncoding(e.to_string()))?;

        let registered_address = registered.to_address();
        if ext.signer_address != registered_address {
            return Err(RejectReason::SignerMismatch {
                claimed: ext.signer_address,
                expected: registered_address,
            });
        }

        let message = ext.body.signing_message(&self.poseidon);
        if !schnorr::verify(&registered, &message, &signature, self.network) {
            return Err(RejectReason::InvalidSignature);
        }
        self.votes
            .store_vote(height, &ext.signer_address, extension.to_vec());

        let expected = self
            .build_body(state, height)
            .map_err(|e| RejectReason::ExpectedBodyUnavailable(e.to_string()))?;
        match expected.first_mismatch(&ext.body) {
            Some(field) => Err(RejectReason::FieldMismatch(field)),
            None => Ok(()),
        }
    }

    fn check_proposal(&self, height: u64, txs: &[Vec<u8>]) -> Result<(), RejectReason> {
        let tx = txs.first().ok_or(RejectReason::MissingMarker)?;
        let payload = VoteExtPayload::decode_tx(tx)?;

        for bytes in payload.votes.values() {
            match SignedVoteExtension::from_bytes(bytes) {
                Ok(ext) => self.votes.store_vote(height, &ext.signer_address, bytes.clone()),
                Err(e) => debug!(target: "vote_ext", height, error = %e, "skipping malformed vote in proposal"),
            }
        }

        let own = payload
            .votes
            .get(&self.own_address)
            .ok_or(RejectReason::MissingOwnVote)?;
        let own = SignedVoteExtension::from_bytes(own)
            .map_err(|e| RejectReason::InvalidOwnVote(e.to_string()))?;
        let signature = Signature::from_bytes(&own.signature)
            .map_err(|e| RejectReason::InvalidOwnVote(e.to_string()))?;
        let message = own.body.signing_message(&self.poseidon);
        if !schnorr::verify(self.signing_key.public(), &message, &signature, self.network) {
            return Err(RejectReason::InvalidOwnVote(
                "signature verification failed".into(),
            ));
        }
        Ok(())
    }
}

fn to_body_height(height: u64) -> Result<i64, VoteExtError> {
    i64::try_from(height)
        .map_err(|_| VoteExtError::Serialization(format!("height {} exceeds i64", height)))
}

impl VoteExtensionApp for VoteExtHandler {
    fn extend_vote(&self, state: &dyn StateAccess, height: u64) -> Result<Vec<u8>, VoteExtError> {
        let _timer = Timer::new(self.metrics, "extend_vote");
        let body = self.build_body(state, height)?;
        let message = body.signing_message(&self.poseidon);
        let signature = schnorr::sign(self.signing_key.secret(), &message, self.network)?;
        let ext = SignedVoteExtension {
            signer_address: self.own_address.clone(),
            signature: signature.to_bytes().to_vec(),
            body,
        };
        let bytes = ext.to_bytes()?;
        self.votes.store_vote(height, &self.own_address, bytes.clone());
        self.metrics.set_cached_votes(self.votes.count(height));
        info!(
            target: "vote_ext",
            height,
            signer = %self.own_address,
            new_validator_set_root = %ext.body.new_validator_set_root,
            "extended vote"
        );
        Ok(bytes)
    }

    fn verify_vote_extension(
        &self,
        state: &dyn StateAccess,
        height: u64,
        validator_address: &str,
        extension: &[u8],
    ) -> VerifyStatus {
        let _timer = Timer::new(self.metrics, "verify_vote_extension");
        match self.check_vote_extension(state, height, validator_address, extension) {
            Ok(()) => {
                self.metrics.inc_vote_ext_verified("accept");
                self.metrics.set_cached_votes(self.votes.count(height));
                debug!(target: "vote_ext", height, validator = validator_address, "vote extension verified");
                VerifyStatus::Accept
            }
            Err(reason) => {
                self.metrics.inc_vote_ext_verified(reason.label());
                warn!(
                    target: "vote_ext",
                    height,
                    validator = validator_address,
                    reason = %reason,
                    "rejected vote extension"
                );
                VerifyStatus::Reject(reason)
            }
        }
    }

    fn prepare_proposal(
        &self,
        _state: &dyn StateAccess,
        height: u64,
        txs: Vec<Vec<u8>>,
        app_hash: &[u8],
    ) -> Result<Vec<Vec<u8>>, VoteExtError> {
        let _timer = Timer::new(self.metrics, "prepare_proposal");
        if height == 1 {
            self.seed_genesis_roots();
            info!(target: "vote_ext", height, "seeded genesis state roots");
            return Ok(txs);
        }
        self.record_state_root(height, app_hash);

        let target = height - 1;
        let votes = self.votes.fetch_votes(target);
        if votes.is_empty() {
            info!(target: "vote_ext", height, target, "no votes for previous height");
            return Ok(txs);
        }
        let count = votes.len();
        let tx = VoteExtPayload {
            height: target,
            votes,
        }
        .encode_tx()?;
        let mut out = Vec::with_capacity(txs.len() + 1);
        out.push(tx);
        out.extend(txs);
        info!(target: "vote_ext", height, target, votes = count, "prepended VOTEEXT transaction");
        Ok(out)
    }

    fn process_proposal(
        &self,
        _state: &dyn StateAccess,
        height: u64,
        txs: &[Vec<u8>],
        app_hash: &[u8],
    ) -> ProposalStatus {
        let _timer = Timer::new(self.metrics, "process_proposal");
        if height == 1 {
            self.seed_genesis_roots();
            self.metrics.inc_proposal_verdict("accept");
            return ProposalStatus::Accept;
        }
        self.state_roots
            .write()
            .entry(height)
            .or_insert_with(|| app_hash.to_vec());

        let target = height - 1;
        if self.votes.count(target) == 0 {
            debug!(target: "vote_ext", height, target, "no votes for previous height, accepting");
            self.metrics.inc_proposal_verdict("accept");
            return ProposalStatus::Accept;
        }

        match self.check_proposal(height, txs) {
            Ok(()) => {
                self.metrics.inc_proposal_verdict("accept");
                ProposalStatus::Accept
            }
            Err(reason) => {
                self.metrics.inc_proposal_verdict(reason.label());
                warn!(target: "vote_ext", height, reason = %reason, "rejected proposal");
                ProposalStatus::Reject(reason)
            }
        }
    }

    fn pre_finalize(
        &self,
        state: &mut dyn StateAccess,
        height: u64,
        app_hash: &[u8],
    ) -> Result<(), VoteExtError> {
        let _timer = Timer::new(self.metrics, "pre_finalize");
        if height == 1 {
            self.record_state_root(height, app_hash);
            return Ok(());
        }

        let target = height - 1;
        let votes = self.votes.fetch_votes(target);
        let mut persisted = 0u64;
        let changes = {
            let mut overlay = StateOverlay::new(&*state);
            for (signer, bytes) in &votes {
                let ext = match SignedVoteExtension::from_bytes(bytes) {
                    Ok(ext) => ext,
                    Err(e) => {
                        debug!(target: "vote_ext", target, signer = %signer, error = %e, "skipping malformed cached vote");
                        continue;
                    }
                };
                let index = VoteExtRecord::index_for(target, signer);
                let record = VoteExtRecord {
                    index: index.clone(),
                    height: target,
                    validator_addr: ext.signer_address,
                    signature: hex::encode(&ext.signature),
                };
                self.records.set_vote_ext(&mut overlay, &record)?;
                self.records
                    .set_vote_ext_index(&mut overlay, target, &index)?;
                persisted += 1;
            }
            overlay.into_ordered_batch()
        };
        commit_change_set(state, changes)?;

        self.votes.delete_votes(target);
        self.votes.prune_below(height.saturating_sub(self.retention));
        self.prune_state_roots(height);
        self.metrics.inc_votes_persisted(persisted);
        info!(target: "vote_ext", height, target, persisted, "persisted vote extensions");
        Ok(())
    }
}
