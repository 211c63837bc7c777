// Path: crates/consensus/src/merkleizer.rs
//! Poseidon commitment to a validator set, keyed by foreign-chain public key.

use pulsar_crypto::{Fp, Poseidon, PublicKey};
use pulsar_types::app::{ForeignValidatorUpdate, ValidatorInfo};
use pulsar_types::error::VoteExtError;
use std::collections::BTreeMap;

/// Builds validator-set roots: `root = H([0])`, then for each validator in
/// ascending `x` order `root = H([root, H([x, parity])])`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Merkleizer {
    poseidon: Poseidon<'static>,
}

fn key_x(validator: &ValidatorInfo) -> Option<Fp> {
    PublicKey::from_address(&validator.foreign_address)
        .ok()
        .map(|pk| pk.x)
}

impl Merkleizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts parsable entries ascending by public-key `x`. Unparsable entries
    /// stay in their slots; trailing unparsable entries are then dropped.
    pub fn sort_validators(&self, validators: Vec<ValidatorInfo>) -> Vec<ValidatorInfo> {
        let keys: Vec<Option<Fp>> = validators.iter().map(key_x).collect();

        let mut parsable: Vec<(Fp, ValidatorInfo)> = keys
            .iter()
            .zip(validators.iter())
            .filter_map(|(x, v)| x.clone().map(|x| (x, v.clone())))
            .collect();
        parsable.sort_by(|a, b| a.0.cmp(&b.0));
        let mut in_order = parsable.into_iter().map(|(_, v)| v);

        let mut sorted: Vec<ValidatorInfo> = keys
            .iter()
            .zip(validators)
            .map(|(x, v)| match x {
                Some(_) => in_order.next().unwrap_or(v),
                None => v,
            })
            .collect();

        let keep = keys.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
        sorted.truncate(keep);
        sorted
    }

    /// The set's root. Sorts first; fails if an unparsable entry survives
    /// sorting (i.e. one that is followed by a parsable entry).
    pub fn root(&self, validators: &[ValidatorInfo]) -> Result<Fp, VoteExtError> {
        let sorted = self.sort_validators(validators.to_vec());
        let mut root = self.poseidon.hash(&[Fp::zero()]);
        for validator in &sorted {
            let pk = PublicKey::from_address(&validator.foreign_address).map_err(|e| {
                VoteExtError::Merkleize(format!("{}: {}", validator.foreign_address, e))
            })?;
            let leaf = self
                .poseidon
                .hash(&[pk.x, Fp::from_u64(u64::from(pk.is_odd))]);
            root = self.poseidon.hash(&[root, leaf]);
        }
        Ok(root)
    }

    /// Applies `updates` to `initial`, keyed by foreign address. A power of
    /// zero removes the validator; anything else inserts or replaces it.
    pub fn apply_updates(
        &self,
        initial: &[ValidatorInfo],
        updates: &[ForeignValidatorUpdate],
    ) -> Vec<ValidatorInfo> {
        let mut by_address: BTreeMap<&str, i64> = initial
            .iter()
            .map(|v| (v.foreign_address.as_str(), v.power))
            .collect();
        for update in updates {
            if update.power == 0 {
                by_address.remove(update.foreign_address.as_str());
            } else {
                by_address.insert(update.foreign_address.as_str(), update.power);
            }
        }
        let next = by_address
            .into_iter()
            .map(|(address, power)| ValidatorInfo {
                foreign_address: address.to_string(),
                power,
            })
            .collect();
        self.sort_validators(next)
    }
}
