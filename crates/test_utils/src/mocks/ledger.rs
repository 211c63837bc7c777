// Path: crates/test_utils/src/mocks/ledger.rs
use pulsar_api::ledger::Ledger;
use pulsar_api::state::StateAccess;
use pulsar_types::error::LedgerError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

const BALANCE_PREFIX: &[u8] = b"mock_bank::";

/// A bank ledger that keeps balances in the caller's state, so its writes
/// commit or vanish with the surrounding overlay.
#[derive(Debug, Default)]
pub struct MockLedger {
    fail_mint: AtomicBool,
    fail_burn: AtomicBool,
    mints: AtomicU64,
    burns: AtomicU64,
}

fn balance_key(denom: &str, address: &str) -> Vec<u8> {
    [BALANCE_PREFIX, denom.as_bytes(), b"::", address.as_bytes()].concat()
}

fn read(state: &dyn StateAccess, denom: &str, address: &str) -> Result<u128, LedgerError> {
    let Some(bytes) = state
        .get(&balance_key(denom, address))
        .map_err(|e| LedgerError::Backend(e.to_string()))?
    else {
        return Ok(0);
    };
    let raw: [u8; 16] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| LedgerError::Backend("corrupt balance".into()))?;
    Ok(u128::from_be_bytes(raw))
}

fn write(
    state: &mut dyn StateAccess,
    denom: &str,
    address: &str,
    amount: u128,
) -> Result<(), LedgerError> {
    state
        .insert(&balance_key(denom, address), &amount.to_be_bytes())
        .map_err(|e| LedgerError::Backend(e.to_string()))
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `mint` fail.
    pub fn fail_mints(&self, fail: bool) {
        self.fail_mint.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `burn` fail.
    pub fn fail_burns(&self, fail: bool) {
        self.fail_burn.store(fail, Ordering::SeqCst);
    }

    /// Number of successful mints.
    pub fn mint_count(&self) -> u64 {
        self.mints.load(Ordering::SeqCst)
    }

    /// Number of successful burns.
    pub fn burn_count(&self) -> u64 {
        self.burns.load(Ordering::SeqCst)
    }

    /// Credits `address` directly, bypassing failure injection.
    pub fn fund(
        &self,
        state: &mut dyn StateAccess,
        denom: &str,
        amount: u128,
        address: &str,
    ) -> Result<(), LedgerError> {
        let current = read(state, denom, address)?;
        let next = current.checked_add(amount).ok_or(LedgerError::Overflow)?;
        write(state, denom, address, next)
    }
}

impl Ledger for MockLedger {
    fn mint(
        &self,
        state: &mut dyn StateAccess,
        denom: &str,
        amount: u128,
        to: &str,
    ) -> Result<(), LedgerError> {
        if self.fail_mint.load(Ordering::SeqCst) {
            return Err(LedgerError::Backend("mint disabled".into()));
        }
        if to.is_empty() {
            return Err(LedgerError::InvalidAddress("empty recipient".into()));
        }
        self.fund(state, denom, amount, to)?;
        self.mints.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn burn(
        &self,
        state: &mut dyn StateAccess,
        denom: &str,
        amount: u128,
        from: &str,
    ) -> Result<(), LedgerError> {
        if self.fail_burn.load(Ordering::SeqCst) {
            return Err(LedgerError::Backend("burn disabled".into()));
        }
        let available = read(state, denom, from)?;
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                denom: denom.to_string(),
                needed: amount,
                available,
            });
        }
        write(state, denom, from, available - amount)?;
        self.burns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn balance(
        &self,
        state: &dyn StateAccess,
        denom: &str,
        address: &str,
    ) -> Result<u128, LedgerError> {
        read(state, denom, address)
    }

    fn transfer(
        &self,
        state: &mut dyn StateAccess,
        denom: &str,
        amount: u128,
        from: &str,
        to: &str,
    ) -> Result<(), LedgerError> {
        let available = read(state, denom, from)?;
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                denom: denom.to_string(),
                needed: amount,
                available,
            });
        }
        write(state, denom, from, available - amount)?;
        self.fund(state, denom, amount, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_state::memory::MemoryState;

    #[test]
    fn balances_live_in_state() {
        let ledger = MockLedger::new();
        let mut state = MemoryState::new();
        ledger.mint(&mut state, "upmina", 100, "alice").unwrap();
        ledger
            .transfer(&mut state, "upmina", 40, "alice", "bob")
            .unwrap();
        assert_eq!(ledger.balance(&state, "upmina", "alice").unwrap(), 60);
        assert_eq!(ledger.balance(&state, "upmina", "bob").unwrap(), 40);
        assert!(matches!(
            ledger.burn(&mut state, "upmina", 61, "alice"),
            Err(LedgerError::InsufficientFunds { available: 60, .. })
        ));
    }

    #[test]
    fn failure_injection() {
        let ledger = MockLedger::new();
        let mut state = MemoryState::new();
        ledger.fail_mints(true);
        assert!(ledger.mint(&mut state, "upmina", 1, "alice").is_err());
        assert_eq!(ledger.mint_count(), 0);
        ledger.fail_mints(false);
        ledger.mint(&mut state, "upmina", 1, "alice").unwrap();
        assert_eq!(ledger.mint_count(), 1);
    }
}
