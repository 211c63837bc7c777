// Path: crates/api/src/ledger/mod.rs

//! Defines the `Ledger` trait, the boundary to the chain's bank module.

use crate::state::StateAccess;
use pulsar_types::error::LedgerError;

/// Mint, burn and transfer primitives of the local bank ledger.
///
/// Every method takes the caller's `StateAccess` so ledger writes land in the
/// same overlay as the bridge's own writes and commit or vanish with them.
pub trait Ledger: Send + Sync {
    /// Creates `amount` of `denom` and credits it to `to`.
    fn mint(
        &self,
        state: &mut dyn StateAccess,
        denom: &str,
        amount: u128,
        to: &str,
    ) -> Result<(), LedgerError>;

    /// Debits `amount` of `denom` from `from` and destroys it.
    fn burn(
        &self,
        state: &mut dyn StateAccess,
        denom: &str,
        amount: u128,
        from: &str,
    ) -> Result<(), LedgerError>;

    /// The balance of `denom` held by `address`.
    fn balance(
        &self,
        state: &dyn StateAccess,
        denom: &str,
        address: &str,
    ) -> Result<u128, LedgerError>;

    /// Moves `amount` of `denom` from one account to another.
    fn transfer(
        &self,
        state: &mut dyn StateAccess,
        denom: &str,
        amount: u128,
        from: &str,
        to: &str,
    ) -> Result<(), LedgerError>;
}
