//! Native-unit ledger: the value half of every pool.
//!
//! Unlike token ledgers there is no allowance surface; native units only move
//! when their holder (or the runtime on its behalf) sends them with a call.

use std::collections::HashMap;

use types::{Address, Wad};

use crate::LedgerError;

#[derive(Debug, Clone, Default)]
pub struct NativeLedger {
    balances: HashMap<Address, Wad>,
}

impl NativeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, holder: Address) -> Wad {
        self.balances.get(&holder).copied().unwrap_or(0)
    }

    /// Credits new native units to an account. Harness-level faucet; inside
    /// a deployment native units only enter via `transfer`.
    pub fn deposit(&mut self, holder: Address, amount: Wad) -> Result<(), LedgerError> {
        let balance = self.balance_of(holder);
        let new_balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;
        self.balances.insert(holder, new_balance);
        Ok(())
    }

    /// Moves native units between accounts. Zero-amount moves succeed.
    pub fn transfer(&mut self, from: Address, to: Address, amount: Wad) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(from);
        if amount > from_balance {
            return Err(LedgerError::InsufficientBalance);
        }
        self.balances.insert(from, from_balance - amount);
        *self.balances.entry(to).or_insert(0) += amount;
        Ok(())
    }
}
