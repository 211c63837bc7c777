// Path: crates/services/src/bridge/state.rs
//! Typed accessors for the bridge module's state keys.

use pulsar_api::state::{get_decoded, put_encoded, StateAccess};
use pulsar_crypto::{ActionAccumulator, Fp};
use pulsar_types::app::{Action, BridgeParams, DepositRecord};
use pulsar_types::error::{BridgeError, StateError};
use pulsar_types::keys::{
    deposit_key, reward_key, withdrawal_key, BRIDGE_APPROVED_ACTIONS_KEY, BRIDGE_PARAMS_KEY,
    BRIDGE_SETTLED_HEIGHT_KEY,
};

/// Stored params, or the defaults before genesis writes any.
pub(crate) fn params(state: &dyn StateAccess) -> Result<BridgeParams, StateError> {
    Ok(get_decoded(state, BRIDGE_PARAMS_KEY)?.unwrap_or_default())
}

pub(crate) fn set_params(
    state: &mut dyn StateAccess,
    params: &BridgeParams,
) -> Result<(), StateError> {
    put_encoded(state, BRIDGE_PARAMS_KEY, params)
}

pub(crate) fn settled_height(state: &dyn StateAccess) -> Result<u64, StateError> {
    Ok(get_decoded(state, BRIDGE_SETTLED_HEIGHT_KEY)?.unwrap_or(0))
}

pub(crate) fn set_settled_height(
    state: &mut dyn StateAccess,
    height: u64,
) -> Result<(), StateError> {
    put_encoded(state, BRIDGE_SETTLED_HEIGHT_KEY, &height)
}

pub(crate) fn approved_actions(state: &dyn StateAccess) -> Result<Vec<Action>, StateError> {
    Ok(get_decoded(state, BRIDGE_APPROVED_ACTIONS_KEY)?.unwrap_or_default())
}

pub(crate) fn set_approved_actions(
    state: &mut dyn StateAccess,
    actions: &[Action],
) -> Result<(), StateError> {
    put_encoded(state, BRIDGE_APPROVED_ACTIONS_KEY, &actions)
}

/// The stored hash under `key`, if any. Hashes are 32-byte little-endian
/// field elements.
pub(crate) fn stored_hash(state: &dyn StateAccess, key: &[u8]) -> Result<Option<Fp>, BridgeError> {
    match state.get(key)? {
        Some(bytes) => Ok(Some(Fp::from_bytes_le(&bytes)?)),
        None => Ok(None),
    }
}

/// The stored hash under `key`, starting from the accumulator's genesis.
pub(crate) fn hash_or_genesis(
    state: &dyn StateAccess,
    key: &[u8],
    accumulator: &ActionAccumulator,
) -> Result<Fp, BridgeError> {
    Ok(stored_hash(state, key)?.unwrap_or_else(|| accumulator.initialize()))
}

pub(crate) fn set_hash(state: &mut dyn StateAccess, key: &[u8], hash: &Fp) -> Result<(), StateError> {
    state.insert(key, &hash.to_bytes_le())
}

pub(crate) fn withdrawal_balance(
    state: &dyn StateAccess,
    foreign_public_key: &str,
) -> Result<u128, StateError> {
    Ok(get_decoded(state, &withdrawal_key(foreign_public_key))?.unwrap_or(0))
}

pub(crate) fn set_withdrawal_balance(
    state: &mut dyn StateAccess,
    foreign_public_key: &str,
    amount: u128,
) -> Result<(), StateError> {
    put_encoded(state, &withdrawal_key(foreign_public_key), &amount)
}

pub(crate) fn reward_balance(state: &dyn StateAccess, address: &str) -> Result<u128, StateError> {
    Ok(get_decoded(state, &reward_key(address))?.unwrap_or(0))
}

pub(crate) fn set_reward_balance(
    state: &mut dyn StateAccess,
    address: &str,
    amount: u128,
) -> Result<(), StateError> {
    put_encoded(state, &reward_key(address), &amount)
}

pub(crate) fn deposit_record(
    state: &dyn StateAccess,
    address: &str,
) -> Result<Option<DepositRecord>, StateError> {
    get_decoded(state, &deposit_key(address))
}

pub(crate) fn set_deposit_record(
    state: &mut dyn StateAccess,
    record: &DepositRecord,
) -> Result<(), StateError> {
    put_encoded(state, &deposit_key(&record.address), record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_state::memory::MemoryState;
    use pulsar_types::config::AccumulatorConfig;
    use pulsar_types::keys::BRIDGE_ALL_HASH_KEY;

    #[test]
    fn missing_values_read_as_defaults() {
        let state = MemoryState::new();
        assert_eq!(params(&state).unwrap(), BridgeParams::default());
        assert_eq!(settled_height(&state).unwrap(), 0);
        assert!(approved_actions(&state).unwrap().is_empty());
        assert_eq!(withdrawal_balance(&state, "B62q").unwrap(), 0);
        assert_eq!(reward_balance(&state, "prover").unwrap(), 0);
        assert_eq!(deposit_record(&state, "addr").unwrap(), None);
    }

    #[test]
    fn hash_starts_from_genesis_and_persists() {
        let accumulator = ActionAccumulator::new(&AccumulatorConfig::default()).unwrap();
        let mut state = MemoryState::new();
        assert_eq!(stored_hash(&state, BRIDGE_ALL_HASH_KEY).unwrap(), None);
        assert_eq!(
            hash_or_genesis(&state, BRIDGE_ALL_HASH_KEY, &accumulator).unwrap(),
            accumulator.initialize()
        );

        let h = Fp::from_u64(42);
        set_hash(&mut state, BRIDGE_ALL_HASH_KEY, &h).unwrap();
        assert_eq!(
            hash_or_genesis(&state, BRIDGE_ALL_HASH_KEY, &accumulator).unwrap(),
            h
        );

        state.insert(BRIDGE_ALL_HASH_KEY, &[1, 2, 3]).unwrap();
        assert!(stored_hash(&state, BRIDGE_ALL_HASH_KEY).is_err());
    }
}
