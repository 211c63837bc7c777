// Path: crates/types/src/keys/mod.rs
//! Defines constants for well-known state keys.
//!
//! Every durable record of the key registry, the vote-extension store and the
//! bridge module lives under one of these prefixes. Builders below are the only
//! place keys are assembled.

// --- Key Registry ---
/// State key prefix for `KeyStoreEntry` records, keyed by creator address.
pub const KEYSTORE_PREFIX: &[u8] = b"minakeys::keystore::";
/// State key prefix for the foreign-key reverse index (foreign key -> creator).
pub const FOREIGN_INDEX_PREFIX: &[u8] = b"minakeys::foreign::";

// --- Vote-Extension Store ---
/// State key prefix for `VoteExtRecord`s, keyed by `"<height>/<validator>"`.
pub const VOTE_EXT_PREFIX: &[u8] = b"minakeys::vote_ext::";
/// State key prefix for the per-height `VoteExtIndex`, keyed by big-endian height.
pub const VOTE_EXT_INDEX_PREFIX: &[u8] = b"minakeys::vote_ext_index::";

// --- Bridge ---
/// State key for the module's `BridgeParams`.
pub const BRIDGE_PARAMS_KEY: &[u8] = b"bridge::params";
/// State key prefix for withdrawal balances, keyed by foreign public key.
pub const BRIDGE_WITHDRAWAL_PREFIX: &[u8] = b"bridge::withdrawal::";
/// State key prefix for prover reward balances, keyed by local address.
pub const BRIDGE_REWARD_PREFIX: &[u8] = b"bridge::reward::";
/// State key for the list of approved actions.
pub const BRIDGE_APPROVED_ACTIONS_KEY: &[u8] = b"bridge::approved_actions";
/// State key for the rolling hash over approved actions.
pub const BRIDGE_APPROVED_HASH_KEY: &[u8] = b"bridge::approved_hash";
/// State key for the rolling hash over every processed action.
pub const BRIDGE_ALL_HASH_KEY: &[u8] = b"bridge::all_hash";
/// State key for the settled attested-chain height.
pub const BRIDGE_SETTLED_HEIGHT_KEY: &[u8] = b"bridge::settled_height";
/// State key prefix for `DepositRecord`s, keyed by recipient.
pub const BRIDGE_DEPOSIT_PREFIX: &[u8] = b"bridge::deposit::";

/// `minakeys::keystore::<creator>`
pub fn keystore_key(creator: &str) -> Vec<u8> {
    [KEYSTORE_PREFIX, creator.as_bytes()].concat()
}

/// `minakeys::foreign::<foreign_public_key>`
pub fn foreign_index_key(foreign_public_key: &str) -> Vec<u8> {
    [FOREIGN_INDEX_PREFIX, foreign_public_key.as_bytes()].concat()
}

/// `minakeys::vote_ext::<index>`
pub fn vote_ext_key(index: &str) -> Vec<u8> {
    [VOTE_EXT_PREFIX, index.as_bytes()].concat()
}

/// `minakeys::vote_ext_index::<height as 8 big-endian bytes>`
///
/// Big-endian heights make a prefix scan return indexes in height order.
pub fn vote_ext_index_key(height: u64) -> Vec<u8> {
    [VOTE_EXT_INDEX_PREFIX, &height.to_be_bytes()].concat()
}

/// `bridge::withdrawal::<foreign_public_key>`
pub fn withdrawal_key(foreign_public_key: &str) -> Vec<u8> {
    [BRIDGE_WITHDRAWAL_PREFIX, foreign_public_key.as_bytes()].concat()
}

/// `bridge::reward::<address>`
pub fn reward_key(address: &str) -> Vec<u8> {
    [BRIDGE_REWARD_PREFIX, address.as_bytes()].concat()
}

/// `bridge::deposit::<recipient>`
pub fn deposit_key(recipient: &str) -> Vec<u8> {
    [BRIDGE_DEPOSIT_PREFIX, recipient.as_bytes()].concat()
}

// --- Bank ---
/// State key prefix for bank balances, keyed by denomination then address.
pub const BANK_BALANCE_PREFIX: &[u8] = b"bank::balance::";

/// `bank::balance::<denom>::<address>`
pub fn bank_balance_key(denom: &str, address: &str) -> Vec<u8> {
    [BANK_BALANCE_PREFIX, denom.as_bytes(), b"::", address.as_bytes()].concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_keys_sort_by_height() {
        let mut keys = vec![
            vote_ext_index_key(300),
            vote_ext_index_key(2),
            vote_ext_index_key(70_000),
        ];
        keys.sort();
        assert_eq!(keys[0], vote_ext_index_key(2));
        assert_eq!(keys[2], vote_ext_index_key(70_000));
    }

    #[test]
    fn builders_use_their_prefix() {
        assert!(keystore_key("alice").starts_with(KEYSTORE_PREFIX));
        assert!(foreign_index_key("B62q").starts_with(FOREIGN_INDEX_PREFIX));
        assert_eq!(withdrawal_key("B62q"), b"bridge::withdrawal::B62q".to_vec());
    }
}
