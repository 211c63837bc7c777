// Path: crates/types/src/config/mod.rs

//! Shared configuration structures for the Pulsar validator (`validator.toml`).

use crate::app::BridgeParams;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Selects the foreign-chain signature domain.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// The test network; signatures use the testnet prefix.
    #[default]
    Devnet,
    /// The production network.
    Mainnet,
}

impl NetworkId {
    /// The single byte mixed into deterministic nonce derivation.
    pub fn as_byte(self) -> u8 {
        match self {
            NetworkId::Devnet => 0x00,
            NetworkId::Mainnet => 0x01,
        }
    }
}

/// Where and how to reach the external action verifier.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Base URL; requests go to `{base_url}/sign`.
    #[serde(default = "default_verifier_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_verifier_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_verifier_url() -> String {
    "http://localhost:9101".to_string()
}
fn default_verifier_timeout_ms() -> u64 {
    5_000
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            base_url: default_verifier_url(),
            timeout_ms: default_verifier_timeout_ms(),
        }
    }
}

/// Constants of the rolling action accumulator.
///
/// The prefixes are the 20-byte hash domains shared with the foreign chain's
/// action-state circuit and must not be changed on a live network. Prefixes
/// must be shorter than 32 bytes to pack into one field element.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccumulatorConfig {
    /// The decimal field element every fresh accumulator starts from.
    #[serde(default = "default_genesis_hash")]
    pub genesis_hash: String,
    /// Domain prefix used to hash a single action's fields.
    #[serde(default = "default_action_prefix")]
    pub action_prefix: String,
    /// Domain prefix used to fold an action digest into the running hash.
    #[serde(default = "default_combine_prefix")]
    pub combine_prefix: String,
    /// Path to the pinned Poseidon table (JSON: `mds`, `round_constants`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poseidon_params: Option<String>,
    /// Run on the built-in development Poseidon parameters when no table is
    /// configured. Hashes will not match the attested chain.
    #[serde(default)]
    pub development_params: bool,
}

fn default_genesis_hash() -> String {
    "25079927036070901246064867767436987657692091363973573142121686150614948079097".to_string()
}
fn default_action_prefix() -> String {
    "MinaZkappEvent******".to_string()
}
fn default_combine_prefix() -> String {
    "MinaZkappSeqEvents**".to_string()
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self {
            genesis_hash: default_genesis_hash(),
            action_prefix: default_action_prefix(),
            combine_prefix: default_combine_prefix(),
            poseidon_params: None,
            development_params: false,
        }
    }
}

/// Telemetry listener settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Whether to serve `/metrics`, `/healthz` and `/readyz`.
    #[serde(default)]
    pub enabled: bool,
    /// The socket address of the telemetry listener.
    #[serde(default = "default_telemetry_addr")]
    pub listen_address: String,
}

fn default_telemetry_addr() -> String {
    "127.0.0.1:9615".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_address: default_telemetry_addr(),
        }
    }
}

/// Configuration for a Pulsar validator process (`validator.toml`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// The local chain identifier.
    #[serde(default = "default_chain_id")]
    pub chain_id: String,
    /// The foreign-chain signature domain.
    #[serde(default)]
    pub network: NetworkId,
    /// Inline base58check foreign secret key. Takes precedence over `signing_key_file`.
    #[serde(default)]
    pub signing_key: Option<String>,
    /// Path to a file containing the base58check foreign secret key.
    #[serde(default)]
    pub signing_key_file: Option<String>,
    /// How many heights of local state roots to keep for vote-extension bodies.
    #[serde(default = "default_state_root_retention")]
    pub state_root_retention: u64,
    /// The external action verifier.
    #[serde(default)]
    pub verifier: VerifierConfig,
    /// Accumulator constants.
    #[serde(default)]
    pub accumulator: AccumulatorConfig,
    /// Bridge module parameters applied at genesis.
    #[serde(default)]
    pub bridge: BridgeParams,
    /// Metrics and health endpoints.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_chain_id() -> String {
    "pulsar-devnet".to_string()
}
fn default_state_root_retention() -> u64 {
    100
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            network: NetworkId::default(),
            signing_key: None,
            signing_key_file: None,
            state_root_retention: default_state_root_retention(),
            verifier: VerifierConfig::default(),
            accumulator: AccumulatorConfig::default(),
            bridge: BridgeParams::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl ValidatorConfig {
    /// Reads and validates a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain_id.trim().is_empty() {
            return Err(ConfigError::Invalid("chain_id cannot be empty".into()));
        }
        if self.state_root_retention < 2 {
            return Err(ConfigError::Invalid(
                "state_root_retention must be at least 2".into(),
            ));
        }
        if self.verifier.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "verifier.timeout_ms must be positive".into(),
            ));
        }
        if !(self.verifier.base_url.starts_with("http://")
            || self.verifier.base_url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid(format!(
                "verifier.base_url '{}' must be an http(s) URL",
                self.verifier.base_url
            )));
        }
        for (name, prefix) in [
            ("accumulator.action_prefix", &self.accumulator.action_prefix),
            ("accumulator.combine_prefix", &self.accumulator.combine_prefix),
        ] {
            if prefix.len() >= 32 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be shorter than 32 bytes",
                    name
                )));
            }
        }
        if self.accumulator.genesis_hash.is_empty()
            || !self
                .accumulator
                .genesis_hash
                .bytes()
                .all(|b| b.is_ascii_digit())
        {
            return Err(ConfigError::Invalid(
                "accumulator.genesis_hash must be a decimal field element".into(),
            ));
        }
        self.bridge
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    /// Returns the encoded foreign secret key from `signing_key` or `signing_key_file`.
    pub fn signing_key_material(&self) -> Result<String, ConfigError> {
        if let Some(key) = self.signing_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.trim().to_string());
        }
        let Some(path) = self.signing_key_file.as_ref() else {
            return Err(ConfigError::MissingSigningKey);
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let key = raw.trim();
        if key.is_empty() {
            return Err(ConfigError::MissingSigningKey);
        }
        Ok(key.to_string())
    }
}
