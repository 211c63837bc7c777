// Path: crates/api/src/consensus/mod.rs

//! Defines the `VoteExtensionApp` trait the consensus engine drives once per
//! height, and the collaborators it reads from and writes to.

use crate::state::StateAccess;
use pulsar_types::app::{CrossChainValidator, ValidatorUpdate, VoteExtRecord};
use pulsar_types::error::{StateError, VoteExtError};
use std::fmt;

/// Why a vote extension or proposal was rejected. Never fatal to the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The extension bytes are not a valid signed extension.
    MalformedExtension(String),
    /// The validator has no key-store entry.
    UnknownValidator(String),
    /// The registered foreign key does not decode.
    InvalidRegisteredKey(String),
    /// The signature bytes do not decode.
    InvalidSignatureEncoding(String),
    /// The payload's signer differs from the registered address.
    SignerMismatch {
        /// The address claimed in the payload.
        claimed: String,
        /// The address registered for the validator.
        expected: String,
    },
    /// The signature does not verify against the registered key.
    InvalidSignature,
    /// This node could not derive its own expected body.
    ExpectedBodyUnavailable(String),
    /// A body field differs from this node's expectation.
    FieldMismatch(&'static str),
    /// The first transaction does not carry the vote-extension marker.
    MissingMarker,
    /// The marker transaction does not decode.
    MalformedPayload(String),
    /// The payload does not include this node's own vote.
    MissingOwnVote,
    /// This node's own vote in the payload fails verification.
    InvalidOwnVote(String),
}

impl RejectReason {
    /// A stable, low-cardinality label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MalformedExtension(_) => "malformed_extension",
            Self::UnknownValidator(_) => "unknown_validator",
            Self::InvalidRegisteredKey(_) => "invalid_registered_key",
            Self::InvalidSignatureEncoding(_) => "invalid_signature_encoding",
            Self::SignerMismatch { .. } => "signer_mismatch",
            Self::InvalidSignature => "invalid_signature",
            Self::ExpectedBodyUnavailable(_) => "expected_body_unavailable",
            Self::FieldMismatch(_) => "field_mismatch",
            Self::MissingMarker => "missing_marker",
            Self::MalformedPayload(_) => "malformed_payload",
            Self::MissingOwnVote => "missing_own_vote",
            Self::InvalidOwnVote(_) => "invalid_own_vote",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedExtension(e) => write!(f, "invalid vote extension payload: {}", e),
            Self::UnknownValidator(v) => write!(f, "unknown validator address {}", v),
            Self::InvalidRegisteredKey(e) => write!(f, "failed to decode registered key: {}", e),
            Self::InvalidSignatureEncoding(e) => write!(f, "invalid signature encoding: {}", e),
            Self::SignerMismatch { claimed, expected } => write!(
                f,
                "validator address mismatch: ext {} expected {}",
                claimed, expected
            ),
            Self::InvalidSignature => write!(f, "signature verification failed"),
            Self::ExpectedBodyUnavailable(e) => {
                write!(f, "failed to get vote extension body: {}", e)
            }
            Self::FieldMismatch(field) => write!(f, "{} mismatch", field),
            Self::MissingMarker => write!(f, "proposal missing VOTEEXT transaction"),
            Self::MalformedPayload(e) => write!(f, "malformed VOTEEXT payload: {}", e),
            Self::MissingOwnVote => write!(f, "validator's vote extension missing from proposal"),
            Self::InvalidOwnVote(e) => write!(f, "own vote extension invalid: {}", e),
        }
    }
}

/// The verdict on a peer's vote extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyStatus {
    /// The extension is valid and matches this node's view.
    Accept,
    /// The extension is discarded.
    Reject(RejectReason),
}

impl VerifyStatus {
    /// Whether the status is `Accept`.
    pub fn is_accept(&self) -> bool {
        matches!(self, VerifyStatus::Accept)
    }

    /// The rejection reason, if any.
    pub fn reject_reason(&self) -> Option<&RejectReason> {
        match self {
            VerifyStatus::Accept => None,
            VerifyStatus::Reject(reason) => Some(reason),
        }
    }
}

/// The verdict on a block proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalStatus {
    /// The proposal may be voted on.
    Accept,
    /// The proposal is refused.
    Reject(RejectReason),
}

impl ProposalStatus {
    /// Whether the status is `Accept`.
    pub fn is_accept(&self) -> bool {
        matches!(self, ProposalStatus::Accept)
    }

    /// The rejection reason, if any.
    pub fn reject_reason(&self) -> Option<&RejectReason> {
        match self {
            ProposalStatus::Accept => None,
            ProposalStatus::Reject(reason) => Some(reason),
        }
    }
}

/// The per-height callbacks a consensus engine invokes on the application.
///
/// `verify_vote_extension` may be called concurrently; the others are called
/// once per height in sequence. Reads come from the caller's committed state;
/// `pre_finalize` writes through the caller's `StateAccess`, which is the
/// block's atomic boundary.
pub trait VoteExtensionApp: Send + Sync {
    /// Builds, signs and caches this node's extension for `height`.
    fn extend_vote(&self, state: &dyn StateAccess, height: u64) -> Result<Vec<u8>, VoteExtError>;

    /// Checks a peer's extension for `height`.
    fn verify_vote_extension(
        &self,
        state: &dyn StateAccess,
        height: u64,
        validator_address: &str,
        extension: &[u8],
    ) -> VerifyStatus;

    /// Returns the proposal's transactions, with the previous height's votes prepended.
    fn prepare_proposal(
        &self,
        state: &dyn StateAccess,
        height: u64,
        txs: Vec<Vec<u8>>,
        app_hash: &[u8],
    ) -> Result<Vec<Vec<u8>>, VoteExtError>;

    /// Checks that a proposal carries this node's vote for the previous height.
    fn process_proposal(
        &self,
        state: &dyn StateAccess,
        height: u64,
        txs: &[Vec<u8>],
        app_hash: &[u8],
    ) -> ProposalStatus;

    /// Persists the previous height's votes and clears them from memory.
    fn pre_finalize(
        &self,
        state: &mut dyn StateAccess,
        height: u64,
        app_hash: &[u8],
    ) -> Result<(), VoteExtError>;
}

/// Where finalized vote extensions are written.
pub trait VoteExtRecordSink: Send + Sync {
    /// Writes (or overwrites) a record under its index.
    fn set_vote_ext(
        &self,
        state: &mut dyn StateAccess,
        record: &VoteExtRecord,
    ) -> Result<(), StateError>;

    /// Appends `index` to the height's index list unless already present.
    fn set_vote_ext_index(
        &self,
        state: &mut dyn StateAccess,
        height: u64,
        index: &str,
    ) -> Result<(), StateError>;
}

/// The consumer module's view of the provider-chain validator set.
pub trait CrossChainValidatorSource: Send + Sync {
    /// The current cross-chain validator set.
    fn cross_chain_validators(&self) -> Result<Vec<CrossChainValidator>, StateError>;

    /// Validator-set changes pending for the current height, if any.
    fn pending_changes(&self) -> Result<Option<Vec<ValidatorUpdate>>, StateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_labels_are_stable() {
        assert_eq!(RejectReason::MissingMarker.label(), "missing_marker");
        assert_eq!(
            RejectReason::FieldMismatch("new block height").to_string(),
            "new block height mismatch"
        );
        assert!(VerifyStatus::Accept.is_accept());
        assert!(!ProposalStatus::Reject(RejectReason::MissingOwnVote).is_accept());
    }
}
