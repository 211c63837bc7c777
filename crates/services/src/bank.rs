// Path: crates/services/src/bank.rs
//! A minimal state-backed bank ledger for running the validator core without
//! a host chain. Balances are SCALE-encoded `u128`s under
//! `bank::balance::<denom>::<address>`.

use pulsar_api::ledger::Ledger;
use pulsar_api::state::{get_decoded, put_encoded, StateAccess};
use pulsar_types::error::LedgerError;
use pulsar_types::keys::bank_balance_key;

/// Keeps every balance in the caller's state.
#[derive(Debug, Default, Clone, Copy)]
pub struct StateBank;

impl StateBank {
    pub fn new() -> Self {
        Self
    }

    fn read(state: &dyn StateAccess, denom: &str, address: &str) -> Result<u128, LedgerError> {
        get_decoded::<u128>(state, &bank_balance_key(denom, address))
            .map(Option::unwrap_or_default)
            .map_err(|e| LedgerError::Backend(e.to_string()))
    }

    fn write(
        state: &mut dyn StateAccess,
        denom: &str,
        address: &str,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let key = bank_balance_key(denom, address);
        let result = if amount == 0 {
            state.delete(&key)
        } else {
            put_encoded(state, &key, &amount)
        };
        result.map_err(|e| LedgerError::Backend(e.to_string()))
    }

    fn check_address(address: &str) -> Result<(), LedgerError> {
        if address.trim().is_empty() {
            return Err(LedgerError::InvalidAddress("empty address".into()));
        }
        Ok(())
    }

    fn debit(
        state: &mut dyn StateAccess,
        denom: &str,
        amount: u128,
        from: &str,
    ) -> Result<(), LedgerError> {
        let available = Self::read(state, denom, from)?;
        let Some(left) = available.checked_sub(amount) else {
            return Err(LedgerError::InsufficientFunds {
                denom: denom.to_string(),
                needed: amount,
                available,
            });
        };
        Self::write(state, denom, from, left)
    }

    fn credit(
        state: &mut dyn StateAccess,
        denom: &str,
        amount: u128,
        to: &str,
    ) -> Result<(), LedgerError> {
        let next = Self::read(state, denom, to)?
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        Self::write(state, denom, to, next)
    }
}

impl Ledger for StateBank {
    fn mint(
        &self,
        state: &mut dyn StateAccess,
        denom: &str,
        amount: u128,
        to: &str,
    ) -> Result<(), LedgerError> {
        Self::check_address(to)?;
        Self::credit(state, denom, amount, to)?;
        tracing::debug!(target: "bank", denom, amount = %amount, to, "minted");
        Ok(())
    }

    fn burn(
        &self,
        state: &mut dyn StateAccess,
        denom: &str,
        amount: u128,
        from: &str,
    ) -> Result<(), LedgerError> {
        Self::check_address(from)?;
        Self::debit(state, denom, amount, from)?;
        tracing::debug!(target: "bank", denom, amount = %amount, from, "burned");
        Ok(())
    }

    fn balance(
        &self,
        state: &dyn StateAccess,
        denom: &str,
        address: &str,
    ) -> Result<u128, LedgerError> {
        Self::read(state, denom, address)
    }

    fn transfer(
        &self,
        state: &mut dyn StateAccess,
        denom: &str,
        amount: u128,
        from: &str,
        to: &str,
    ) -> Result<(), LedgerError> {
        Self::check_address(from)?;
        Self::check_address(to)?;
        Self::debit(state, denom, amount, from)?;
        Self::credit(state, denom, amount, to)
    }
}
