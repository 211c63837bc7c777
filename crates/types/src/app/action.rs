// Path: crates/types/src/app/action.rs

//! Data structures for cross-chain bridge actions.

use crate::serde_helpers::{amount_string, hex_bytes};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of action kinds the bridge understands.
#[derive(
    Serialize, Deserialize, Encode, Decode, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// Funds locked on the attested chain, to be minted locally.
    Deposit,
    /// Funds released on the attested chain, drawn from a withdrawal balance.
    Withdrawal,
    /// A settlement checkpoint; always approved.
    Settlement,
}

impl ActionType {
    /// The numeric tag used when the action is encoded into field elements.
    pub fn tag(self) -> u64 {
        match self {
            ActionType::Deposit => 1,
            ActionType::Withdrawal => 2,
            ActionType::Settlement => 3,
        }
    }

    /// The lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Deposit => "deposit",
            ActionType::Withdrawal => "withdrawal",
            ActionType::Settlement => "settlement",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(ActionType::Deposit),
            "withdrawal" => Ok(ActionType::Withdrawal),
            "settlement" => Ok(ActionType::Settlement),
            other => Err(format!("unknown action type '{}'", other)),
        }
    }
}

/// One cross-chain event, as relayed by the prover.
///
/// Actions are immutable values: they are compared and hashed by value, and the
/// JSON shape matches what the prover submits and the verifier service expects.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// The foreign-chain address (base58check) the action belongs to.
    pub public_key: String,
    /// The amount in the bridged denomination's base unit.
    #[serde(with = "amount_string")]
    pub amount: u128,
    /// What kind of action this is.
    pub action_type: ActionType,
    /// The attested-chain height the action was observed at.
    #[serde(default)]
    pub block_height: u64,
    /// The local-chain account that authorized the action.
    #[serde(rename = "cosmosAddress", default)]
    pub local_address: String,
    /// The local-chain signature over the action authorization.
    #[serde(rename = "cosmosSignature", with = "hex_bytes", default)]
    pub local_signature: Vec<u8>,
}

impl Action {
    /// Whether the action carries both pieces of local authentication material.
    pub fn has_auth(&self) -> bool {
        !self.local_address.is_empty() && !self.local_signature.is_empty()
    }
}
