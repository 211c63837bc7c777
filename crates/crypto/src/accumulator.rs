// Path: crates/crypto/src/accumulator.rs
//! The rolling hash accumulator over bridge actions.
//!
//! `new = H_combine([current, H_action(fields(action))])`, starting from a
//! pinned genesis element. The accumulator holds no state of its own; callers
//! persist the running value.
//!
//! The genesis element is the first word of the Poseidon state salted with
//! [`EMPTY_ACTION_STATE_PREFIX`], so it doubles as a fingerprint of the
//! parameter set: see [`ActionAccumulator::verify_genesis`].

use crate::error::CryptoError;
use crate::field::Fp;
use crate::keys::PublicKey;
use crate::poseidon::{Poseidon, State};
use pulsar_types::app::Action;
use pulsar_types::config::AccumulatorConfig;

/// Bytes packed into one field element when hashing authentication material.
pub const AUTH_CHUNK_LEN: usize = 31;

/// Number of field elements an action encodes to.
pub const ACTION_FIELDS: usize = 6;

/// The domain whose salted state yields the empty action state.
pub const EMPTY_ACTION_STATE_PREFIX: &str = "MinaZkappActionStateEmptyElt";

/// Folds actions into a running Poseidon hash.
#[derive(Clone, Debug)]
pub struct ActionAccumulator {
    genesis: Fp,
    action_salt: State,
    combine_salt: State,
    poseidon: Poseidon<'static>,
}

impl ActionAccumulator {
    /// Builds an accumulator from configuration, bound to the active Poseidon
    /// parameters. Fails on a malformed genesis hash or an overlong prefix.
    pub fn new(config: &AccumulatorConfig) -> Result<Self, CryptoError> {
        let genesis = Fp::from_decimal(&config.genesis_hash).map_err(|e| {
            CryptoError::InvalidParams(format!("accumulator genesis hash: {}", e))
        })?;
        let poseidon = Poseidon::kimchi();
        Ok(Self {
            genesis,
            action_salt: poseidon.salt(&config.action_prefix)?,
            combine_salt: poseidon.salt(&config.combine_prefix)?,
            poseidon,
        })
    }

    /// The pinned starting value.
    pub fn initialize(&self) -> Fp {
        self.genesis.clone()
    }

    /// The empty action state under this accumulator's Poseidon parameters.
    pub fn derived_genesis(&self) -> Result<Fp, CryptoError> {
        let [first, _, _] = self.poseidon.salt(EMPTY_ACTION_STATE_PREFIX)?;
        Ok(first)
    }

    /// Checks that the Poseidon parameters reproduce the pinned genesis value.
    ///
    /// A mismatch means every hash this accumulator produces would differ from
    /// the attested chain's.
    pub fn verify_genesis(&self) -> Result<(), CryptoError> {
        let derived = self.derived_genesis()?;
        if derived != self.genesis {
            return Err(CryptoError::InvalidParams(format!(
                "Poseidon parameters derive empty action state {}, expected {}",
                derived, self.genesis
            )));
        }
        Ok(())
    }

    /// `[type_tag, pk.x, pk.is_odd, amount, auth(address), auth(signature)]`.
    pub fn action_fields(&self, action: &Action) -> Result<[Fp; ACTION_FIELDS], CryptoError> {
        let pk = PublicKey::from_address(&action.public_key)?;
        Ok([
            Fp::from_u64(action.action_type.tag()),
            pk.x,
            Fp::from_u64(u64::from(pk.is_odd)),
            Fp::from_u128(action.amount),
            self.auth(action.local_address.as_bytes()),
            self.auth(&action.local_signature),
        ])
    }

    fn auth(&self, bytes: &[u8]) -> Fp {
        if bytes.is_empty() {
            return Fp::zero();
        }
        let packed: Vec<Fp> = bytes
            .chunks(AUTH_CHUNK_LEN)
            .map(Fp::from_bytes_le_reduce)
            .collect();
        self.poseidon.hash(&packed)
    }

    /// Folds one action into `current`.
    pub fn update(&self, current: &Fp, action: &Action) -> Result<Fp, CryptoError> {
        let fields = self.action_fields(action)?;
        let [digest, _, _] = self.poseidon.update(self.action_salt.clone(), &fields);
        let [next, _, _] = self
            .poseidon
            .update(self.combine_salt.clone(), &[current.clone(), digest]);
        Ok(next)
    }

    /// Folds `actions` in order.
    pub fn fold<'a, I>(&self, current: &Fp, actions: I) -> Result<Fp, CryptoError>
    where
        I: IntoIterator<Item = &'a Action>,
    {
        actions
            .into_iter()
            .try_fold(current.clone(), |acc, action| self.update(&acc, action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Keypair;
    use pulsar_types::app::ActionType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn action(seed: u64, action_type: ActionType, amount: u128) -> Action {
        let kp = Keypair::generate(&mut StdRng::seed_from_u64(seed)).unwrap();
        Action {
            public_key: kp.address(),
            amount,
            action_type,
            block_height: 10,
            local_address: "consumer1prover".into(),
            local_signature: vec![7u8; 40],
        }
    }

    fn accumulator() -> ActionAccumulator {
        ActionAccumulator::new(&AccumulatorConfig::default()).unwrap()
    }

    #[test]
    fn initialize_returns_pinned_genesis() {
        let acc = accumulator();
        assert_eq!(
            acc.initialize().to_string(),
            "25079927036070901246064867767436987657692091363973573142121686150614948079097"
        );
    }

    #[test]
    fn update_is_deterministic_and_order_sensitive() {
        let acc = accumulator();
        let a = action(1, ActionType::Deposit, 100);
        let b = action(2, ActionType::Withdrawal, 50);
        let start = acc.initialize();

        let ab = acc.fold(&start, [&a, &b]).unwrap();
        assert_eq!(ab, acc.fold(&start, [&a, &b]).unwrap());
        assert_ne!(ab, acc.fold(&start, [&b, &a]).unwrap());
        assert_ne!(acc.update(&start, &a).unwrap(), start);
    }

    #[test]
    fn every_field_feeds_the_digest() {
        let acc = accumulator();
        let base = action(3, ActionType::Settlement, 10);
        let start = acc.initialize();
        let h = acc.update(&start, &base).unwrap();

        let mut amount = base.clone();
        amount.amount = 11;
        let mut kind = base.clone();
        kind.action_type = ActionType::Deposit;
        let mut sig = base.clone();
        sig.local_signature = vec![8u8; 40];
        for changed in [amount, kind, sig] {
            assert_ne!(acc.update(&start, &changed).unwrap(), h);
        }
    }

    #[test]
    fn empty_auth_encodes_as_zero() {
        let acc = accumulator();
        let mut a = action(4, ActionType::Deposit, 1);
        a.local_address.clear();
        a.local_signature.clear();
        let fields = acc.action_fields(&a).unwrap();
        assert_eq!(fields[4], Fp::zero());
        assert_eq!(fields[5], Fp::zero());
        assert_eq!(fields[0], Fp::from_u64(1));
    }

    #[test]
    fn bad_inputs_are_rejected() {
        let acc = accumulator();
        let mut a = action(5, ActionType::Deposit, 1);
        a.public_key = "garbage".into();
        assert!(acc.update(&acc.initialize(), &a).is_err());

        let config = AccumulatorConfig {
            genesis_hash: "not-a-number".into(),
            ..AccumulatorConfig::default()
        };
        assert!(ActionAccumulator::new(&config).is_err());

        let config = AccumulatorConfig {
            action_prefix: "MinaZkappEvent******MinaZkappEvent".into(),
            ..AccumulatorConfig::default()
        };
        assert!(matches!(
            ActionAccumulator::new(&config),
            Err(CryptoError::InvalidParams(_))
        ));
    }

    #[test]
    fn update_matches_prefixed_hashing() {
        let acc = accumulator();
        let a = action(6, ActionType::Withdrawal, 3);
        let poseidon = Poseidon::kimchi();
        let digest = poseidon
            .hash_with_prefix("MinaZkappEvent******", &acc.action_fields(&a).unwrap())
            .unwrap();
        let expected = poseidon
            .hash_with_prefix("MinaZkappSeqEvents**", &[acc.initialize(), digest])
            .unwrap();
        assert_eq!(acc.update(&acc.initialize(), &a).unwrap(), expected);
    }

    #[test]
    fn genesis_check_fingerprints_the_parameter_set() {
        // The development parameters cannot reproduce the attested chain's
        // empty action state.
        let acc = accumulator();
        assert!(matches!(
            acc.verify_genesis(),
            Err(CryptoError::InvalidParams(_))
        ));

        let derived = acc.derived_genesis().unwrap();
        let config = AccumulatorConfig {
            genesis_hash: derived.to_string(),
            ..AccumulatorConfig::default()
        };
        let matching = ActionAccumulator::new(&config).unwrap();
        assert!(matching.verify_genesis().is_ok());
        assert_eq!(matching.initialize(), derived);
    }
}
