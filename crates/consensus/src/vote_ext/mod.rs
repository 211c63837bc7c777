// Path: crates/consensus/src/vote_ext/mod.rs
//! The vote-extension protocol.
//!
//! At `ExtendVote(H)` each validator signs a body attesting the validator-set
//! roots and local state roots for the transition `H-1 -> H`. Peers check the
//! body against their own in `VerifyVoteExtension`. The next proposer carries
//! every collected vote in a `VOTEEXT:` transaction, each validator checks its
//! own vote is present in `ProcessProposal`, and `PreFinalize` persists them.

mod cache;
mod handler;
mod wire;

pub use cache::VoteCache;
pub use handler::{VoteExtHandler, DEFAULT_STATE_ROOT_RETENTION};
pub use wire::{
    SignedVoteExtension, VoteExtPayload, VoteExtensionBody, GENESIS_STATE_ROOT_HEX,
    VOTE_EXT_MARKER,
};
