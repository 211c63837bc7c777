// Path: crates/cli/src/genesis.rs
//! The genesis document of a standalone node: the cross-chain validator set
//! and the key registrations present at height zero.

use anyhow::{Context, Result};
use pulsar_api::consensus::CrossChainValidatorSource;
use pulsar_types::app::{CrossChainValidator, RegisterKeysMsg, ValidatorUpdate};
use pulsar_types::error::StateError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// `genesis.json`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Genesis {
    /// The provider-chain validator set, ordered as the consumer module reports it.
    pub validators: Vec<CrossChainValidator>,
    /// Key registrations applied before the first block.
    pub key_stores: Vec<RegisterKeysMsg>,
}

impl Genesis {
    /// Reads a genesis document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading genesis file {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let genesis: Self = serde_json::from_str(raw)?;
        genesis.validate()?;
        Ok(genesis)
    }

    fn validate(&self) -> Result<()> {
        for validator in &self.validators {
            if validator.address.trim().is_empty() {
                anyhow::bail!("genesis validator with an empty address");
            }
            if validator.power <= 0 {
                anyhow::bail!(
                    "genesis validator {} has non-positive power {}",
                    validator.address,
                    validator.power
                );
            }
        }
        Ok(())
    }
}

/// A validator set fixed at startup, with no pending changes.
#[derive(Debug, Clone, Default)]
pub struct StaticValidatorSource {
    validators: Vec<CrossChainValidator>,
}

impl StaticValidatorSource {
    pub fn new(validators: Vec<CrossChainValidator>) -> Self {
        Self { validators }
    }
}

impl CrossChainValidatorSource for StaticValidatorSource {
    fn cross_chain_validators(&self) -> Result<Vec<CrossChainValidator>, StateError> {
        Ok(self.validators.clone())
    }

    fn pending_changes(&self) -> Result<Option<Vec<ValidatorUpdate>>, StateError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_an_empty_genesis() {
        assert_eq!(Genesis::from_json_str("{}").unwrap(), Genesis::default());
    }

    #[test]
    fn validators_must_have_power() {
        let raw = r#"{"validators":[{"address":"AA01","power":0}]}"#;
        assert!(Genesis::from_json_str(raw).is_err());
        let raw = r#"{"validators":[{"address":"AA01","power":10}]}"#;
        let genesis = Genesis::from_json_str(raw).unwrap();
        let source = StaticValidatorSource::new(genesis.validators);
        assert_eq!(source.cross_chain_validators().unwrap().len(), 1);
        assert_eq!(source.pending_changes().unwrap(), None);
    }
}
