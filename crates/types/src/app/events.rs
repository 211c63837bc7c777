// Path: crates/types/src/app/events.rs

use serde::{Deserialize, Serialize};

/// Observable state changes emitted by bridge transactions.
///
/// Attribute names follow the event schema indexers already consume
/// (`public_key`, `amount`, `block_height`, ...).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeEvent {
    /// A `ResolveActions` call completed.
    ResolveActions {
        /// The prover that submitted the batch.
        prover: String,
        /// Number of dispatched actions.
        processed_count: u64,
        /// Number of approved actions.
        approved_count: u64,
        /// Number of ignored actions.
        ignored_count: u64,
        /// The new settled height.
        block_height: u64,
    },
    /// A deposit was minted.
    DepositProcessed {
        /// The foreign public key.
        public_key: String,
        /// The local address credited.
        cosmos_address: String,
        /// The minted amount.
        amount: String,
        /// The attested-chain height of the action.
        block_height: u64,
    },
    /// A withdrawal was drawn from a withdrawal balance.
    WithdrawalProcessed {
        /// The foreign public key.
        public_key: String,
        /// The withdrawn amount.
        amount: String,
        /// The remaining balance.
        balance: String,
        /// The attested-chain height of the action.
        block_height: u64,
    },
    /// A settlement was recorded.
    SettlementProcessed {
        /// The foreign public key.
        public_key: String,
        /// The settled amount.
        amount: String,
        /// The attested-chain height of the action.
        block_height: u64,
    },
    /// Funds were locked for withdrawal.
    WithdrawalLocked {
        /// The local account that was debited.
        sender: String,
        /// The foreign public key credited.
        mina_public_key: String,
        /// The gross amount.
        amount: String,
        /// The amount credited after commission.
        net_amount: String,
        /// The burned commission.
        commission: String,
    },
}

impl BridgeEvent {
    /// The event type string.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeEvent::ResolveActions { .. } => "resolve_actions",
            BridgeEvent::DepositProcessed { .. } => "deposit_processed",
            BridgeEvent::WithdrawalProcessed { .. } => "withdrawal_processed",
            BridgeEvent::SettlementProcessed { .. } => "settlement_processed",
            BridgeEvent::WithdrawalLocked { .. } => "withdrawal_locked",
        }
    }
}

/// An ordered buffer of events produced by one transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<BridgeEvent>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn emit(&mut self, event: BridgeEvent) {
        self.events.push(event);
    }

    /// The events in emission order.
    pub fn events(&self) -> &[BridgeEvent] {
        &self.events
    }

    /// Moves all events out of `other` into this log.
    pub fn append(&mut self, other: &mut EventLog) {
        self.events.append(&mut other.events);
    }
}
