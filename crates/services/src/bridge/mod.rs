// Path: crates/services/src/bridge/mod.rs
//! # Bridge Keeper
//!
//! Resolves batches of attested-chain actions against the chain-local
//! balances. A batch is validated, checked by the external verifier, then
//! applied action by action into a [`StateOverlay`]. Nothing reaches the
//! caller's state unless the whole batch succeeds.
//!
//! Two rolling hashes track the log: `allHash` folds every action that passed
//! the verifier, `approvedHash` only the ones that were applied.

mod query;
pub(crate) mod state;

pub use query::BridgeQuery;

use pulsar_api::ledger::Ledger;
use pulsar_api::registry::KeyRegistry;
use pulsar_api::state::{commit_change_set, StateAccess, StateOverlay};
use pulsar_api::verifier::{ActionVerifier, VerifyActionsRequest};
use pulsar_crypto::{ActionAccumulator, PublicKey};
use pulsar_telemetry::sinks::BridgeMetricsSink;
use pulsar_types::app::{
    Action, ActionType, BridgeEvent, BridgeParams, DepositMinaMsg, DepositRecord, EventLog,
    LockForWithdrawalMsg, ResolveActionsMsg, ResolveOutcome,
};
use pulsar_types::config::AccumulatorConfig;
use pulsar_types::error::{BridgeError, ErrorCode};
use pulsar_types::keys::{BRIDGE_ALL_HASH_KEY, BRIDGE_APPROVED_HASH_KEY};
use pulsar_types::prelude::OptionExt;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Why an action that passed the verifier was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Approved,
    Ignored(&'static str),
}

/// The bridge module's message handlers.
pub struct BridgeKeeper {
    ledger: Arc<dyn Ledger>,
    registry: Arc<dyn KeyRegistry>,
    verifier: Arc<dyn ActionVerifier>,
    accumulator: ActionAccumulator,
    metrics: &'static dyn BridgeMetricsSink,
}

impl fmt::Debug for BridgeKeeper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeKeeper")
            .field("accumulator", &self.accumulator)
            .finish_non_exhaustive()
    }
}

impl BridgeKeeper {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        registry: Arc<dyn KeyRegistry>,
        verifier: Arc<dyn ActionVerifier>,
        accumulator: &AccumulatorConfig,
    ) -> Result<Self, BridgeError> {
        Ok(Self {
            ledger,
            registry,
            verifier,
            accumulator: ActionAccumulator::new(accumulator)?,
            metrics: pulsar_telemetry::bridge_metrics(),
        })
    }

    /// Replaces the global metrics sink.
    pub fn with_metrics(mut self, metrics: &'static dyn BridgeMetricsSink) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn accumulator(&self) -> &ActionAccumulator {
        &self.accumulator
    }

    /// A read-only view over `state`.
    pub fn query<'a>(&'a self, state: &'a dyn StateAccess) -> BridgeQuery<'a> {
        BridgeQuery::new(state, &self.accumulator)
    }

    /// Validates, verifies and applies one batch.
    ///
    /// Events are appended to `events` only when the call succeeds.
    pub async fn resolve_actions(
        &self,
        state: &mut dyn StateAccess,
        events: &mut EventLog,
        msg: &ResolveActionsMsg,
    ) -> Result<ResolveOutcome, BridgeError> {
        self.resolve(state, events, msg).await.map_err(|e| {
            pulsar_telemetry::error_metrics().inc_error("bridge", e.code());
            e
        })
    }

    async fn resolve(
        &self,
        state: &mut dyn StateAccess,
        events: &mut EventLog,
        msg: &ResolveActionsMsg,
    ) -> Result<ResolveOutcome, BridgeError> {
        let settled = state::settled_height(&*state)?;
        validate_batch(msg, settled)?;

        let mut balances = BTreeMap::new();
        for action in &msg.actions {
            let balance = state::withdrawal_balance(&*state, &action.public_key)?;
            balances.insert(action.public_key.clone(), balance.to_string());
        }
        let request = VerifyActionsRequest {
            actions: msg.actions.clone(),
            balances,
            witness: msg.merkle_witness.clone(),
            settled_height: settled,
            next_height: msg.next_block_height,
        };

        let started = Instant::now();
        let verdict = self.verifier.verify(&request).await;
        self.metrics
            .observe_verifier_latency(started.elapsed().as_secs_f64());
        let mask = verdict.map_err(|e| {
            self.metrics.inc_verifier_failures();
            warn!(target: "bridge", error = %e, "action verifier failed");
            BridgeError::Verifier(e)
        })?;
        let accepted = filter_by_mask(&msg.actions, &mask);

        let mut staged = EventLog::new();
        let (outcome, changes) = {
            let mut overlay = StateOverlay::new(&*state);
            let outcome = self.apply_batch(&mut overlay, &mut staged, msg, &accepted)?;
            (outcome, overlay.into_ordered_batch())
        };
        commit_change_set(state, changes)?;

        staged.emit(BridgeEvent::ResolveActions {
            prover: msg.creator.clone(),
            processed_count: outcome.processed,
            approved_count: outcome.approved,
            ignored_count: outcome.ignored,
            block_height: msg.next_block_height,
        });
        events.append(&mut staged);

        info!(
            target: "bridge",
            prover = %msg.creator,
            processed = outcome.processed,
            approved = outcome.approved,
            ignored = outcome.ignored,
            settled_height = msg.next_block_height,
            "resolved action batch"
        );
        Ok(outcome)
    }

    fn apply_batch(
        &self,
        overlay: &mut StateOverlay<'_>,
        events: &mut EventLog,
        msg: &ResolveActionsMsg,
        actions: &[&Action],
    ) -> Result<ResolveOutcome, BridgeError> {
        let params = state::params(overlay)?;
        let mut approved_log = state::approved_actions(overlay)?;
        let mut all_hash = state::hash_or_genesis(overlay, BRIDGE_ALL_HASH_KEY, &self.accumulator)?;
        let mut approved_hash =
            state::hash_or_genesis(overlay, BRIDGE_APPROVED_HASH_KEY, &self.accumulator)?;
        let mut outcome = ResolveOutcome::default();

        for (position, action) in actions.iter().enumerate() {
            outcome.processed += 1;
            self.metrics
                .inc_actions_processed(action.action_type.as_str());
            all_hash = self.accumulator.update(&all_hash, action)?;

            debug!(
                target: "bridge",
                position,
                action_type = %action.action_type,
                public_key = %action.public_key,
                amount = %action.amount,
                "processing action"
            );

            match self.apply_action(overlay, events, &params, action)? {
                Disposition::Approved => {
                    approved_hash = self.accumulator.update(&approved_hash, action)?;
                    approved_log.push((*action).clone());
                    outcome.approved += 1;
                    self.metrics
                        .inc_actions_approved(action.action_type.as_str());
                }
                Disposition::Ignored(reason) => {
                    outcome.ignored += 1;
                    self.metrics.inc_actions_ignored(reason);
                    info!(
                        target: "bridge",
                        reason,
                        action_type = %action.action_type,
                        public_key = %action.public_key,
                        amount = %action.amount,
                        "ignoring action"
                    );
                }
            }
        }

        state::set_approved_actions(overlay, &approved_log)?;
        state::set_hash(overlay, BRIDGE_ALL_HASH_KEY, &all_hash)?;
        state::set_hash(overlay, BRIDGE_APPROVED_HASH_KEY, &approved_hash)?;
        state::set_settled_height(overlay, msg.next_block_height)?;

        let reward = state::reward_balance(overlay, &msg.creator)?
            .checked_add(params.prover_reward)
            .required(BridgeError::Overflow("prover reward"))?;
        state::set_reward_balance(overlay, &msg.creator, reward)?;

        Ok(outcome)
    }

    fn apply_action(
        &self,
        overlay: &mut StateOverlay<'_>,
        events: &mut EventLog,
        params: &BridgeParams,
        action: &Action,
    ) -> Result<Disposition, BridgeError> {
        match action.action_type {
            ActionType::Deposit => {
                let Some(entry) = self
                    .registry
                    .get_by_foreign_key(&*overlay, &action.public_key)?
                else {
                    return Ok(Disposition::Ignored("deposit_unregistered"));
                };
                // Mint into a scratch layer so a failed mint leaves nothing behind.
                let minted = {
                    let mut scratch = StateOverlay::new(&*overlay);
                    self.ledger
                        .mint(&mut scratch, &params.denom, action.amount, &entry.creator)
                        .map(|()| scratch.into_ordered_batch())
                };
                let changes = match minted {
                    Ok(changes) => changes,
                    Err(e) => {
                        warn!(
                            target: "bridge",
                            public_key = %action.public_key,
                            recipient = %entry.creator,
                            error = %e,
                            "deposit mint failed"
                        );
                        return Ok(Disposition::Ignored("deposit_mint_failed"));
                    }
                };
                commit_change_set(overlay, changes)?;
                events.emit(BridgeEvent::DepositProcessed {
                    public_key: action.public_key.clone(),
                    cosmos_address: entry.creator,
                    amount: action.amount.to_string(),
                    block_height: action.block_height,
                });
                Ok(Disposition::Approved)
            }
            ActionType::Withdrawal => {
                let balance = state::withdrawal_balance(&*overlay, &action.public_key)?;
                let Some(remaining) = balance.checked_sub(action.amount) else {
                    return Ok(Disposition::Ignored("insufficient_withdrawal_balance"));
                };
                state::set_withdrawal_balance(overlay, &action.public_key, remaining)?;
                events.emit(BridgeEvent::WithdrawalProcessed {
                    public_key: action.public_key.clone(),
                    amount: action.amount.to_string(),
                    balance: remaining.to_string(),
                    block_height: action.block_height,
                });
                Ok(Disposition::Approved)
            }
            ActionType::Settlement => {
                events.emit(BridgeEvent::SettlementProcessed {
                    public_key: action.public_key.clone(),
                    amount: action.amount.to_string(),
                    block_height: action.block_height,
                });
                Ok(Disposition::Approved)
            }
        }
    }

    /// Burns `amount` from the creator and credits the commission-net amount
    /// to the foreign key's withdrawal balance.
    pub fn lock_for_withdrawal(
        &self,
        state: &mut dyn StateAccess,
        events: &mut EventLog,
        msg: &LockForWithdrawalMsg,
    ) -> Result<u128, BridgeError> {
        if msg.creator.trim().is_empty() {
            return Err(BridgeError::InvalidCreator("creator cannot be empty".into()));
        }
        if msg.amount == 0 {
            return Err(BridgeError::InvalidAmount);
        }
        let foreign = PublicKey::from_address(&msg.foreign_public_key)?.to_address();

        let params = state::params(&*state)?;
        let available = self.ledger.balance(&*state, &params.denom, &msg.creator)?;
        if available < msg.amount {
            return Err(BridgeError::InsufficientBalance {
                needed: msg.amount,
                available,
            });
        }
        let net = params.commission_rate.net_of(msg.amount)?;
        let commission = msg.amount.saturating_sub(net);

        let changes = {
            let mut overlay = StateOverlay::new(&*state);
            self.ledger
                .burn(&mut overlay, &params.denom, msg.amount, &msg.creator)?;
            let balance = state::withdrawal_balance(&overlay, &foreign)?
                .checked_add(net)
                .required(BridgeError::Overflow("withdrawal balance"))?;
            state::set_withdrawal_balance(&mut overlay, &foreign, balance)?;
            overlay.into_ordered_batch()
        };
        commit_change_set(state, changes)?;

        self.metrics.inc_withdrawals_locked();
        events.emit(BridgeEvent::WithdrawalLocked {
            sender: msg.creator.clone(),
            mina_public_key: foreign.clone(),
            amount: msg.amount.to_string(),
            net_amount: net.to_string(),
            commission: commission.to_string(),
        });
        info!(
            target: "bridge",
            sender = %msg.creator,
            foreign_public_key = %foreign,
            amount = %msg.amount,
            net_amount = %net,
            "locked funds for withdrawal"
        );
        Ok(net)
    }

    /// Adds `amount` to the recipient's deposit record.
    pub fn deposit_mina(
        &self,
        state: &mut dyn StateAccess,
        msg: &DepositMinaMsg,
    ) -> Result<DepositRecord, BridgeError> {
        if msg.creator.trim().is_empty() {
            return Err(BridgeError::InvalidCreator("creator cannot be empty".into()));
        }
        if msg.recipient.trim().is_empty() {
            return Err(BridgeError::InvalidCreator("recipient cannot be empty".into()));
        }
        if msg.amount == 0 {
            return Err(BridgeError::InvalidAmount);
        }
        let mut record = state::deposit_record(&*state, &msg.recipient)?.unwrap_or(DepositRecord {
            address: msg.recipient.clone(),
            amount: 0,
        });
        record.amount = record
            .amount
            .checked_add(msg.amount)
            .required(BridgeError::Overflow("deposit record"))?;
        state::set_deposit_record(state, &record)?;
        debug!(target: "bridge", recipient = %record.address, total = record.amount, "deposit recorded");
        Ok(record)
    }

    pub fn total_rewards(&self, state: &dyn StateAccess, prover: &str) -> Result<u128, BridgeError> {
        Ok(state::reward_balance(state, prover)?)
    }

    /// Zeroes the prover's reward balance, returning what it held.
    pub fn reset_reward_balance(
        &self,
        state: &mut dyn StateAccess,
        prover: &str,
    ) -> Result<u128, BridgeError> {
        let previous = state::reward_balance(&*state, prover)?;
        state::set_reward_balance(state, prover, 0)?;
        Ok(previous)
    }

    pub fn params(&self, state: &dyn StateAccess) -> Result<BridgeParams, BridgeError> {
        Ok(state::params(state)?)
    }

    pub fn set_params(
        &self,
        state: &mut dyn StateAccess,
        params: &BridgeParams,
    ) -> Result<(), BridgeError> {
        params.validate()?;
        state::set_params(state, params)?;
        Ok(())
    }
}

/// Whole-call checks that run before the verifier is contacted.
fn validate_batch(msg: &ResolveActionsMsg, settled: u64) -> Result<(), BridgeError> {
    if msg.creator.trim().is_empty() {
        return Err(BridgeError::InvalidCreator("creator cannot be empty".into()));
    }
    if msg.actions.is_empty() {
        return Err(BridgeError::EmptyActionList);
    }
    for (index, action) in msg.actions.iter().enumerate() {
        validate_action(action).map_err(|reason| BridgeError::InvalidAction { index, reason })?;
    }
    if msg.next_block_height <= settled {
        return Err(BridgeError::InvalidBlockHeight {
            settled,
            next: msg.next_block_height,
        });
    }
    if msg.merkle_witness.trim().is_empty() {
        return Err(BridgeError::InvalidWitness);
    }
    Ok(())
}

fn validate_action(action: &Action) -> Result<(), String> {
    PublicKey::from_address(&action.public_key).map_err(|e| e.to_string())?;
    if action.amount == 0 {
        return Err("amount must be positive".into());
    }
    if !action.has_auth() {
        return Err("missing local address or signature".into());
    }
    if action.block_height == 0 {
        return Err("block height must be positive".into());
    }
    Ok(())
}

/// Keeps the actions whose mask bit is set. The mask is index-aligned; actions
/// past its end are dropped.
fn filter_by_mask<'a>(actions: &'a [Action], mask: &[bool]) -> Vec<&'a Action> {
    if mask.len() != actions.len() {
        warn!(
            target: "bridge",
            mask_len = mask.len(),
            actions_len = actions.len(),
            "verifier mask length differs from batch"
        );
    }
    let mut kept = Vec::with_capacity(actions.len());
    for (index, action) in actions.iter().enumerate() {
        match mask.get(index) {
            Some(true) => kept.push(action),
            Some(false) => {
                warn!(target: "bridge", index, public_key = %action.public_key, "verifier rejected action")
            }
            None => {
                warn!(target: "bridge", index, public_key = %action.public_key, "action beyond verifier mask dropped")
            }
        }
    }
    kept
}
