// Path: crates/test_utils/src/fixtures/mod.rs
//! Builders for the values bridge and vote-extension tests keep recreating.

use pulsar_state::memory::MemoryState;
use pulsar_types::app::{Action, ActionType, ResolveActionsMsg};

/// The local address tests submit batches from.
pub const PROVER: &str = "consumer1prover";

/// The witness tests attach to every batch.
pub const WITNESS: &str = "merkle-witness";

/// An empty in-memory state.
pub fn state() -> MemoryState {
    MemoryState::new()
}

/// A fully authenticated action observed at attested height 1.
pub fn action(action_type: ActionType, public_key: &str, amount: u128) -> Action {
    Action {
        public_key: public_key.to_string(),
        amount,
        action_type,
        block_height: 1,
        local_address: PROVER.to_string(),
        local_signature: vec![0xab; 64],
    }
}

pub fn deposit(public_key: &str, amount: u128) -> Action {
    action(ActionType::Deposit, public_key, amount)
}

pub fn withdrawal(public_key: &str, amount: u128) -> Action {
    action(ActionType::Withdrawal, public_key, amount)
}

pub fn settlement(public_key: &str, amount: u128) -> Action {
    action(ActionType::Settlement, public_key, amount)
}

/// A `ResolveActions` message from [`PROVER`] with the standard witness.
pub fn resolve_msg(actions: Vec<Action>, next_block_height: u64) -> ResolveActionsMsg {
    ResolveActionsMsg {
        creator: PROVER.to_string(),
        actions,
        next_block_height,
        merkle_witness: WITNESS.to_string(),
    }
}

/// A minimal `validator.toml` carrying `signing_key`, on development Poseidon
/// parameters.
pub fn validator_toml(signing_key: &str) -> String {
    format!(
        r#"chain_id = "pulsar-test"
network = "devnet"
signing_key = "{}"
state_root_retention = 10

[verifier]
base_url = "http://127.0.0.1:9101"
timeout_ms = 1000

[accumulator]
development_params = true

[bridge]
commission_rate = "0.02"
denom = "upmina"
prover_reward = "1000000"
"#,
        signing_key
    )
}

/// A JSON action in the prover's wire shape.
pub fn action_json(public_key: &str, amount: u128, action_type: ActionType) -> serde_json::Value {
    serde_json::json!({
        "publicKey": public_key,
        "amount": amount.to_string(),
        "actionType": action_type.as_str(),
        "blockHeight": 1,
        "cosmosAddress": PROVER,
        "cosmosSignature": "ab",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_json_matches_builder_shape() {
        let json = action_json("B62qkey", 5, ActionType::Withdrawal);
        let parsed: Action = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.action_type, ActionType::Withdrawal);
        assert_eq!(parsed.amount, 5);
        assert!(parsed.has_auth());
        assert!(deposit("B62qkey", 1).has_auth());
    }
}
