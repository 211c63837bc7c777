// Path: crates/services/src/bridge/query.rs
//! Read-only queries over the bridge module's state.

use super::state;
use crate::pagination::{paginate_prefix, paginate_slice};
use pulsar_api::state::StateAccess;
use pulsar_crypto::ActionAccumulator;
use pulsar_types::app::{
    Action, BalanceEntry, BridgeParams, BridgeStateSnapshot, DepositRecord, Page, PageRequest,
};
use pulsar_types::codec::from_bytes_canonical;
use pulsar_types::error::{BridgeError, StateError};
use pulsar_types::keys::{
    BRIDGE_ALL_HASH_KEY, BRIDGE_APPROVED_HASH_KEY, BRIDGE_DEPOSIT_PREFIX, BRIDGE_REWARD_PREFIX,
    BRIDGE_WITHDRAWAL_PREFIX,
};

/// A borrowed view of the bridge's balances, log and parameters.
#[derive(Clone, Copy)]
pub struct BridgeQuery<'a> {
    state: &'a dyn StateAccess,
    accumulator: &'a ActionAccumulator,
}

impl std::fmt::Debug for BridgeQuery<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeQuery").finish_non_exhaustive()
    }
}

fn balance_entry(owner: &[u8], value: &[u8]) -> Result<BalanceEntry, StateError> {
    let owner = std::str::from_utf8(owner)
        .map_err(|e| StateError::Decode(format!("balance owner: {}", e)))?;
    Ok(BalanceEntry {
        owner: owner.to_string(),
        amount: from_bytes_canonical(value).map_err(StateError::Decode)?,
    })
}

impl<'a> BridgeQuery<'a> {
    pub fn new(state: &'a dyn StateAccess, accumulator: &'a ActionAccumulator) -> Self {
        Self { state, accumulator }
    }

    pub fn withdrawal_balance(&self, foreign_public_key: &str) -> Result<u128, BridgeError> {
        Ok(state::withdrawal_balance(self.state, foreign_public_key)?)
    }

    pub fn withdrawal_balances(&self, page: &PageRequest) -> Result<Page<BalanceEntry>, BridgeError> {
        Ok(paginate_prefix(
            self.state,
            BRIDGE_WITHDRAWAL_PREFIX,
            page,
            balance_entry,
        )?)
    }

    pub fn reward_balance(&self, address: &str) -> Result<u128, BridgeError> {
        Ok(state::reward_balance(self.state, address)?)
    }

    pub fn reward_balances(&self, page: &PageRequest) -> Result<Page<BalanceEntry>, BridgeError> {
        Ok(paginate_prefix(
            self.state,
            BRIDGE_REWARD_PREFIX,
            page,
            balance_entry,
        )?)
    }

    /// The approved-action log, oldest first.
    pub fn approved_actions(&self, page: &PageRequest) -> Result<Page<Action>, BridgeError> {
        let log = state::approved_actions(self.state)?;
        Ok(paginate_slice(&log, page))
    }

    /// The settled height, both rolling hashes as decimal strings, and the
    /// current params.
    pub fn bridge_state(&self) -> Result<BridgeStateSnapshot, BridgeError> {
        let approved =
            state::hash_or_genesis(self.state, BRIDGE_APPROVED_HASH_KEY, self.accumulator)?;
        let all = state::hash_or_genesis(self.state, BRIDGE_ALL_HASH_KEY, self.accumulator)?;
        Ok(BridgeStateSnapshot {
            settled_block_height: state::settled_height(self.state)?,
            approved_action_hash: approved.to_string(),
            all_action_hash: all.to_string(),
            approved_actions_count: state::approved_actions(self.state)?.len() as u64,
            params: state::params(self.state)?,
        })
    }

    pub fn params(&self) -> Result<BridgeParams, BridgeError> {
        Ok(state::params(self.state)?)
    }

    pub fn deposit_record(&self, address: &str) -> Result<Option<DepositRecord>, BridgeError> {
        Ok(state::deposit_record(self.state, address)?)
    }

    pub fn deposit_records(&self, page: &PageRequest) -> Result<Page<DepositRecord>, BridgeError> {
        Ok(paginate_prefix(
            self.state,
            BRIDGE_DEPOSIT_PREFIX,
            page,
            |_, value| from_bytes_canonical(value).map_err(StateError::Decode),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_state::memory::MemoryState;
    use pulsar_types::config::AccumulatorConfig;

    fn accumulator() -> ActionAccumulator {
        ActionAccumulator::new(&AccumulatorConfig::default()).unwrap()
    }

    #[test]
    fn fresh_state_reports_genesis() {
        let state = MemoryState::new();
        let acc = accumulator();
        let query = BridgeQuery::new(&state, &acc);
        let snapshot = query.bridge_state().unwrap();
        assert_eq!(snapshot.settled_block_height, 0);
        assert_eq!(snapshot.approved_actions_count, 0);
        assert_eq!(snapshot.approved_action_hash, acc.initialize().to_string());
        assert_eq!(snapshot.all_action_hash, snapshot.approved_action_hash);
        assert_eq!(snapshot.params, BridgeParams::default());
    }

    #[test]
    fn balances_page_by_owner() {
        let mut state = MemoryState::new();
        for (owner, amount) in [("B62qc", 3u128), ("B62qa", 1), ("B62qb", 2)] {
            state::set_withdrawal_balance(&mut state, owner, amount).unwrap();
        }
        state::set_reward_balance(&mut state, "prover", 9).unwrap();

        let acc = accumulator();
        let query = BridgeQuery::new(&state, &acc);
        let page = query
            .withdrawal_balances(&PageRequest {
                offset: 1,
                limit: 5,
                count_total: true,
            })
            .unwrap();
        assert_eq!(
            page.items,
            vec![
                BalanceEntry { owner: "B62qb".into(), amount: 2 },
                BalanceEntry { owner: "B62qc".into(), amount: 3 },
            ]
        );
        assert_eq!(page.pagination.total, Some(3));
        assert_eq!(page.pagination.next_offset, None);

        let rewards = query.reward_balances(&PageRequest::default()).unwrap();
        assert_eq!(rewards.items.len(), 1);
        assert_eq!(query.reward_balance("prover").unwrap(), 9);
        assert_eq!(query.withdrawal_balance("B62qzz").unwrap(), 0);
    }

    #[test]
    fn deposit_records_are_listed() {
        let mut state = MemoryState::new();
        for (address, amount) in [("b", 2u64), ("a", 1)] {
            state::set_deposit_record(
                &mut state,
                &DepositRecord {
                    address: address.into(),
                    amount,
                },
            )
            .unwrap();
        }
        let acc = accumulator();
        let query = BridgeQuery::new(&state, &acc);
        let page = query.deposit_records(&PageRequest::default()).unwrap();
        let addresses: Vec<_> = page.items.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(addresses, vec!["a", "b"]);
        assert_eq!(query.deposit_record("b").unwrap().unwrap().amount, 2);
        assert_eq!(query.deposit_record("c").unwrap(), None);
    }
}
