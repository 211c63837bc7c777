// Path: crates/types/src/error/mod.rs
//! Core error types for the Pulsar validator.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors related to the key-value state backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The requested key was not found in the state.
    #[error("Key not found in state")]
    KeyNotFound,
    /// An error occurred in the state backend.
    #[error("State backend error: {0}")]
    Backend(String),
    /// An error occurred while writing to the state.
    #[error("State write error: {0}")]
    WriteError(String),
    /// The provided value was invalid.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// An error occurred during state deserialization.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::KeyNotFound => "STATE_KEY_NOT_FOUND",
            Self::Backend(_) => "STATE_BACKEND_ERROR",
            Self::WriteError(_) => "STATE_WRITE_ERROR",
            Self::InvalidValue(_) => "STATE_INVALID_VALUE",
            Self::Decode(_) => "STATE_DECODE_ERROR",
        }
    }
}

/// Errors from the Pallas / Poseidon primitives and foreign-key encodings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// A foreign-chain address could not be decoded.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    /// A secret or public key was malformed.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    /// A signature could not be decoded.
    #[error("Invalid signature encoding: {0}")]
    InvalidSignature(String),
    /// A point does not satisfy the curve equation.
    #[error("Point is not on the curve")]
    NotOnCurve,
    /// An operation produced the point at infinity where a finite point was required.
    #[error("Unexpected point at infinity")]
    PointAtInfinity,
    /// A value could not be interpreted as a field element.
    #[error("Invalid field element: {0}")]
    InvalidFieldElement(String),
    /// Hash parameters were rejected.
    #[error("Invalid hash parameters: {0}")]
    InvalidParams(String),
}

impl ErrorCode for CryptoError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidAddress(_) => "CRYPTO_INVALID_ADDRESS",
            Self::InvalidKey(_) => "CRYPTO_INVALID_KEY",
            Self::InvalidSignature(_) => "CRYPTO_INVALID_SIGNATURE",
            Self::NotOnCurve => "CRYPTO_NOT_ON_CURVE",
            Self::PointAtInfinity => "CRYPTO_POINT_AT_INFINITY",
            Self::InvalidFieldElement(_) => "CRYPTO_INVALID_FIELD_ELEMENT",
            Self::InvalidParams(_) => "CRYPTO_INVALID_PARAMS",
        }
    }
}

/// Errors surfaced by the bank ledger collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The account does not hold enough of the requested denomination.
    #[error("Insufficient funds for {denom}: needed {needed}, available {available}")]
    InsufficientFunds {
        /// The denomination that was requested.
        denom: String,
        /// The amount required by the operation.
        needed: u128,
        /// The amount currently held.
        available: u128,
    },
    /// The amount was zero or otherwise unusable.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    /// The account address was malformed.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    /// A balance would overflow.
    #[error("Balance overflow")]
    Overflow,
    /// An error occurred in the ledger backend.
    #[error("Ledger backend error: {0}")]
    Backend(String),
}

impl ErrorCode for LedgerError {
    fn code(&self) -> &'static str {
        match self {
            Self::InsufficientFunds { .. } => "LEDGER_INSUFFICIENT_FUNDS",
            Self::InvalidAmount(_) => "LEDGER_INVALID_AMOUNT",
            Self::InvalidAddress(_) => "LEDGER_INVALID_ADDRESS",
            Self::Overflow => "LEDGER_OVERFLOW",
            Self::Backend(_) => "LEDGER_BACKEND_ERROR",
        }
    }
}

/// Errors from the external action-verification service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifierError {
    /// The request could not be delivered or timed out.
    #[error("Verifier transport error: {0}")]
    Transport(String),
    /// The verifier answered with a non-success status.
    #[error("Verifier returned status {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, for diagnostics.
        body: String,
    },
    /// The response body was not a valid mask document.
    #[error("Malformed verifier response: {0}")]
    Decode(String),
    /// The verifier client could not be constructed.
    #[error("Verifier client setup failed: {0}")]
    Setup(String),
}

impl ErrorCode for VerifierError {
    fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "VERIFIER_TRANSPORT",
            Self::Status { .. } => "VERIFIER_STATUS",
            Self::Decode(_) => "VERIFIER_DECODE",
            Self::Setup(_) => "VERIFIER_SETUP",
        }
    }
}

/// Errors from the foreign key registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyStoreError {
    /// The local identity already has a registered key.
    #[error("Identity already registered: {0}")]
    AlreadyRegistered(String),
    /// The foreign public key is already bound to another identity.
    #[error("Foreign public key already bound: {0}")]
    ForeignKeyInUse(String),
    /// No entry exists for the identity.
    #[error("Key store entry not found: {0}")]
    NotFound(String),
    /// Entries are immutable once written.
    #[error("Updating a key store entry is not allowed")]
    UpdateNotAllowed,
    /// The registration request was malformed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// The foreign public key failed to decode.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    /// A state access failed.
    #[error(transparent)]
    State(#[from] StateError),
}

impl ErrorCode for KeyStoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::AlreadyRegistered(_) => "KEYSTORE_ALREADY_REGISTERED",
            Self::ForeignKeyInUse(_) => "KEYSTORE_FOREIGN_KEY_IN_USE",
            Self::NotFound(_) => "KEYSTORE_NOT_FOUND",
            Self::UpdateNotAllowed => "KEYSTORE_UPDATE_NOT_ALLOWED",
            Self::InvalidRequest(_) => "KEYSTORE_INVALID_REQUEST",
            Self::Crypto(e) => e.code(),
            Self::State(e) => e.code(),
        }
    }
}

/// Errors that abort a bridge transaction as a whole.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// `next_height` does not advance the settled watermark.
    #[error("Invalid block height: next {next} must exceed settled {settled}")]
    InvalidBlockHeight {
        /// The currently settled height.
        settled: u64,
        /// The height supplied by the caller.
        next: u64,
    },
    /// The batch contained no actions.
    #[error("Empty action list")]
    EmptyActionList,
    /// An action failed basic validation.
    #[error("Invalid action at index {index}: {reason}")]
    InvalidAction {
        /// The position of the action in the submitted batch.
        index: usize,
        /// Why the action was rejected.
        reason: String,
    },
    /// The merkle witness was missing.
    #[error("Invalid merkle witness")]
    InvalidWitness,
    /// The submitting address was missing or malformed.
    #[error("Invalid creator: {0}")]
    InvalidCreator(String),
    /// The sender cannot cover the requested amount.
    #[error("Insufficient balance: needed {needed}, available {available}")]
    InsufficientBalance {
        /// The amount required.
        needed: u128,
        /// The amount held.
        available: u128,
    },
    /// The amount was zero.
    #[error("Invalid amount")]
    InvalidAmount,
    /// Module parameters failed validation.
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    /// A balance overflowed its integer range.
    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),
    /// The external verifier failed.
    #[error("Signer node verification failed: {0}")]
    Verifier(#[from] VerifierError),
    /// The ledger collaborator failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// A state access failed.
    #[error(transparent)]
    State(#[from] StateError),
    /// A hash or key operation failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    /// The key registry failed.
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),
}

impl ErrorCode for BridgeError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidBlockHeight { .. } => "BRIDGE_INVALID_BLOCK_HEIGHT",
            Self::EmptyActionList => "BRIDGE_EMPTY_ACTION_LIST",
            Self::InvalidAction { .. } => "BRIDGE_INVALID_ACTION",
            Self::InvalidWitness => "BRIDGE_INVALID_MERKLE_WITNESS",
            Self::InvalidCreator(_) => "BRIDGE_INVALID_CREATOR",
            Self::InsufficientBalance { .. } => "BRIDGE_INSUFFICIENT_BALANCE",
            Self::InvalidAmount => "BRIDGE_INVALID_AMOUNT",
            Self::InvalidParams(_) => "BRIDGE_INVALID_PARAMS",
            Self::Overflow(_) => "BRIDGE_OVERFLOW",
            Self::Verifier(_) => "BRIDGE_SIGNER_VERIFICATION",
            Self::Ledger(e) => e.code(),
            Self::State(e) => e.code(),
            Self::Crypto(e) => e.code(),
            Self::KeyStore(e) => e.code(),
        }
    }
}

/// Errors raised while producing or persisting vote extensions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoteExtError {
    /// A cross-chain validator has no registered foreign key.
    #[error("Failed to get key store for validator: {0}")]
    UnknownValidator(String),
    /// A validator set contained an address that could not be merkleized.
    #[error("Failed to merkleize validator set: {0}")]
    Merkleize(String),
    /// The extension could not be encoded.
    #[error("Vote extension serialization failed: {0}")]
    Serialization(String),
    /// The genesis state root constant failed to decode.
    #[error("Invalid genesis state root: {0}")]
    GenesisRoot(String),
    /// Signing or key handling failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    /// Persisting a record failed.
    #[error(transparent)]
    State(#[from] StateError),
}

impl ErrorCode for VoteExtError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownValidator(_) => "VOTE_EXT_UNKNOWN_VALIDATOR",
            Self::Merkleize(_) => "VOTE_EXT_MERKLEIZE",
            Self::Serialization(_) => "VOTE_EXT_SERIALIZATION",
            Self::GenesisRoot(_) => "VOTE_EXT_GENESIS_ROOT",
            Self::Crypto(e) => e.code(),
            Self::State(e) => e.code(),
        }
    }
}

/// Errors raised while loading node configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// The path that was read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file was not valid TOML for the expected schema.
    #[error("Failed to parse config: {0}")]
    Parse(String),
    /// A configuration value was out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
    /// No foreign signing key was configured.
    #[error("No foreign signing key configured (set `signing_key` or `signing_key_file`)")]
    MissingSigningKey,
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "CONFIG_IO",
            Self::Parse(_) => "CONFIG_PARSE",
            Self::Invalid(_) => "CONFIG_INVALID",
            Self::MissingSigningKey => "CONFIG_MISSING_SIGNING_KEY",
        }
    }
}

impl From<String> for StateError {
    fn from(s: String) -> Self {
        StateError::Decode(s)
    }
}
