// Path: crates/test_utils/src/mocks/validators.rs
use parking_lot::RwLock;
use pulsar_api::consensus::CrossChainValidatorSource;
use pulsar_types::app::{CrossChainValidator, ValidatorUpdate};
use pulsar_types::error::StateError;

/// A settable stand-in for the consumer module's validator set.
#[derive(Debug, Default)]
pub struct MockValidatorSource {
    validators: RwLock<Vec<CrossChainValidator>>,
    pending: RwLock<Option<Vec<ValidatorUpdate>>>,
}

impl MockValidatorSource {
    /// A source reporting `validators` as `(consensus address, power)` pairs.
    pub fn new(validators: &[(&str, i64)]) -> Self {
        let source = Self::default();
        source.set_validators(validators);
        source
    }

    pub fn set_validators(&self, validators: &[(&str, i64)]) {
        *self.validators.write() = validators
            .iter()
            .map(|(address, power)| CrossChainValidator {
                address: address.to_string(),
                power: *power,
            })
            .collect();
    }

    /// Sets (or with `None`, clears) the pending changes.
    pub fn set_pending(&self, changes: Option<&[(&str, i64)]>) {
        *self.pending.write() = changes.map(|changes| {
            changes
                .iter()
                .map(|(address, power)| ValidatorUpdate {
                    address: address.to_string(),
                    power: *power,
                })
                .collect()
        });
    }
}

impl CrossChainValidatorSource for MockValidatorSource {
    fn cross_chain_validators(&self) -> Result<Vec<CrossChainValidator>, StateError> {
        Ok(self.validators.read().clone())
    }

    fn pending_changes(&self) -> Result<Option<Vec<ValidatorUpdate>>, StateError> {
        Ok(self.pending.read().clone())
    }
}
