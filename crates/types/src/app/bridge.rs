// Path: crates/types/src/app/bridge.rs

//! Bridge module parameters, messages and results.

use crate::app::Action;
use crate::error::BridgeError;
use crate::serde_helpers::amount_string;
use parity_scale_codec::{Decode, Encode};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The number of fractional units in one whole commission rate.
pub const COMMISSION_SCALE: u64 = 1_000_000;

/// A commission rate in `[0, 1]`, stored as parts-per-million.
///
/// On the wire and in configuration it is a decimal string such as `"0.02"`.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct CommissionRate(u64);

impl CommissionRate {
    /// A zero commission.
    pub const ZERO: CommissionRate = CommissionRate(0);

    /// Builds a rate from parts-per-million.
    pub fn from_ppm(ppm: u64) -> Self {
        CommissionRate(ppm)
    }

    /// The rate in parts-per-million.
    pub fn ppm(&self) -> u64 {
        self.0
    }

    /// The amount left after deducting the commission, truncated toward zero.
    pub fn net_of(&self, amount: u128) -> Result<u128, BridgeError> {
        let keep = u128::from(COMMISSION_SCALE.saturating_sub(self.0));
        let scaled = amount
            .checked_mul(keep)
            .ok_or(BridgeError::Overflow("commission"))?;
        Ok(scaled / u128::from(COMMISSION_SCALE))
    }
}

impl FromStr for CommissionRate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err("empty commission rate".into());
        }
        if frac.len() > 6 {
            return Err(format!("commission rate '{}' has more than 6 decimals", s));
        }
        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|e| format!("invalid commission rate '{}': {}", s, e))?
        };
        let frac_ppm: u64 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{:0<6}", frac);
            padded
                .parse()
                .map_err(|e| format!("invalid commission rate '{}': {}", s, e))?
        };
        whole
            .checked_mul(COMMISSION_SCALE)
            .and_then(|w| w.checked_add(frac_ppm))
            .map(CommissionRate)
            .ok_or_else(|| format!("commission rate '{}' out of range", s))
    }
}

impl fmt::Display for CommissionRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / COMMISSION_SCALE;
        let frac = self.0 % COMMISSION_SCALE;
        if frac == 0 {
            write!(f, "{}", whole)
        } else {
            let digits = format!("{:06}", frac);
            write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
        }
    }
}

impl Serialize for CommissionRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CommissionRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Bridge module parameters.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct BridgeParams {
    /// Fraction of a locked amount burned as commission.
    #[serde(default = "default_commission_rate")]
    pub commission_rate: CommissionRate,
    /// Denomination of the bridged asset on the local chain.
    #[serde(default = "default_denom")]
    pub denom: String,
    /// Reward credited to the prover for every successful resolution.
    #[serde(default = "default_prover_reward", with = "amount_string")]
    pub prover_reward: u128,
}

fn default_commission_rate() -> CommissionRate {
    CommissionRate::from_ppm(20_000)
}
fn default_denom() -> String {
    "upmina".to_string()
}
fn default_prover_reward() -> u128 {
    1_000_000
}

impl Default for BridgeParams {
    fn default() -> Self {
        Self {
            commission_rate: default_commission_rate(),
            denom: default_denom(),
            prover_reward: default_prover_reward(),
        }
    }
}

impl BridgeParams {
    /// Checks the parameter ranges.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.commission_rate.ppm() > COMMISSION_SCALE {
            return Err(BridgeError::InvalidParams(format!(
                "commission rate {} exceeds 1",
                self.commission_rate
            )));
        }
        if self.denom.trim().is_empty() {
            return Err(BridgeError::InvalidParams(
                "bridged denomination cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

/// The `ResolveActions` transaction submitted by the prover.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct ResolveActionsMsg {
    /// The prover's local address; receives the reward.
    pub creator: String,
    /// The batch of actions, in attested-chain order.
    pub actions: Vec<Action>,
    /// The attested-chain height this batch settles up to.
    pub next_block_height: u64,
    /// The merkle witness forwarded to the verifier.
    pub merkle_witness: String,
}

/// The outcome of a successful `ResolveActions`.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveOutcome {
    /// Actions that passed the verifier mask and were dispatched.
    pub processed: u64,
    /// Actions that were applied and appended to the approved log.
    pub approved: u64,
    /// Actions skipped by a business rule.
    pub ignored: u64,
}

/// Moves local funds into a foreign-key withdrawal balance.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct LockForWithdrawalMsg {
    /// The local account whose funds are burned.
    pub creator: String,
    /// The foreign-chain address credited with the withdrawal balance.
    pub foreign_public_key: String,
    /// The gross amount to lock.
    #[serde(with = "amount_string")]
    pub amount: u128,
}

/// Records an incoming deposit against a recipient (bookkeeping only).
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct DepositMinaMsg {
    /// The submitting account.
    pub creator: String,
    /// The address the deposit is recorded for.
    pub recipient: String,
    /// The deposited amount.
    pub amount: u64,
}

/// A per-recipient running total of recorded deposits.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct DepositRecord {
    /// The recipient address.
    pub address: String,
    /// The accumulated amount.
    pub amount: u64,
}

/// A keyed balance, as returned by list queries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BalanceEntry {
    /// The foreign public key or prover address.
    pub owner: String,
    /// The balance.
    #[serde(with = "amount_string")]
    pub amount: u128,
}

/// A read-only view of the bridge's durable state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BridgeStateSnapshot {
    /// The settled attested-chain height.
    pub settled_block_height: u64,
    /// The rolling hash over approved actions, as a decimal field element.
    pub approved_action_hash: String,
    /// The rolling hash over every processed action, as a decimal field element.
    pub all_action_hash: String,
    /// The number of actions in the approved log.
    pub approved_actions_count: u64,
    /// The active module parameters.
    pub params: BridgeParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commission_rate_parses_decimals() {
        assert_eq!("0.02".parse::<CommissionRate>().unwrap().ppm(), 20_000);
        assert_eq!("1".parse::<CommissionRate>().unwrap().ppm(), 1_000_000);
        assert_eq!(".5".parse::<CommissionRate>().unwrap().ppm(), 500_000);
        assert_eq!("0".parse::<CommissionRate>().unwrap(), CommissionRate::ZERO);
        assert!("0.0000001".parse::<CommissionRate>().is_err());
        assert!("abc".parse::<CommissionRate>().is_err());
        assert_eq!(CommissionRate::from_ppm(20_000).to_string(), "0.02");
        assert_eq!(CommissionRate::from_ppm(1_000_000).to_string(), "1");
    }

    #[test]
    fn net_amount_truncates() {
        let rate = CommissionRate::from_ppm(20_000);
        assert_eq!(rate.net_of(1000).unwrap(), 980);
        assert_eq!(rate.net_of(1).unwrap(), 0);
        assert_eq!(CommissionRate::ZERO.net_of(1000).unwrap(), 1000);
        assert!(rate.net_of(u128::MAX).is_err());
    }

    #[test]
    fn default_params_are_valid() {
        let params = BridgeParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.denom, "upmina");
        assert_eq!(params.prover_reward, 1_000_000);

        let bad = BridgeParams {
            commission_rate: CommissionRate::from_ppm(1_000_001),
            ..BridgeParams::default()
        };
        assert!(matches!(bad.validate(), Err(BridgeError::InvalidParams(_))));
    }
}
