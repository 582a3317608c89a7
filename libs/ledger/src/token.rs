//! Fungible token ledger: balances, allowances, mint/burn, event records.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;
use types::{Address, Wad};

use crate::LedgerError;

/// Every ledger in the system uses 18-decimal fixed point.
pub const DECIMALS: u8 = 18;

/// Transfer/Approve notifications, recorded in call order. Mints appear as
/// transfers from the zero address, burns as transfers to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LedgerEvent {
    Transfer {
        from: Address,
        to: Address,
        amount: Wad,
    },
    Approve {
        owner: Address,
        spender: Address,
        amount: Wad,
    },
}

/// One fungible-ledger instance: a holder -> balance map, a
/// (owner, spender) -> allowance map, and the running total supply.
///
/// Conservation invariant: the sum of all balances always equals
/// `total_supply`, changed only by `mint` and `burn`.
#[derive(Debug, Clone)]
pub struct TokenLedger {
    name: String,
    symbol: String,
    total_supply: Wad,
    balances: HashMap<Address, Wad>,
    allowances: HashMap<(Address, Address), Wad>,
    events: Vec<LedgerEvent>,
}

impl TokenLedger {
    /// A fresh ledger with zero supply (LP shares, the reward token).
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        TokenLedger {
            name: name.into(),
            symbol: symbol.into(),
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// A ledger with its whole initial supply credited to one holder
    /// (deployed asset tokens).
    pub fn with_supply(
        name: impl Into<String>,
        symbol: impl Into<String>,
        supply: Wad,
        holder: Address,
    ) -> Self {
        let mut ledger = Self::new(name, symbol);
        ledger.total_supply = supply;
        ledger.balances.insert(holder, supply);
        ledger
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    pub fn total_supply(&self) -> Wad {
        self.total_supply
    }

    pub fn balance_of(&self, holder: Address) -> Wad {
        self.balances.get(&holder).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> Wad {
        self.allowances.get(&(owner, spender)).copied().unwrap_or(0)
    }

    /// Events recorded so far, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Sets `spender`'s allowance over `owner`'s balance.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: Wad) {
        self.allowances.insert((owner, spender), amount);
        self.events.push(LedgerEvent::Approve {
            owner,
            spender,
            amount,
        });
    }

    /// Moves `amount` from `from` to `to`. Zero-amount transfers succeed.
    pub fn transfer(&mut self, from: Address, to: Address, amount: Wad) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(from);
        if amount > from_balance {
            return Err(LedgerError::InsufficientBalance);
        }
        self.balances.insert(from, from_balance - amount);
        // Balances are bounded by total supply, so this cannot overflow.
        *self.balances.entry(to).or_insert(0) += amount;
        self.events.push(LedgerEvent::Transfer { from, to, amount });
        Ok(())
    }

    /// Delegated transfer: `spender` moves `amount` of `from`'s balance.
    /// The allowance check runs before the balance check and the allowance is
    /// only decremented once the transfer succeeds.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Wad,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(from, spender);
        if amount > allowed {
            return Err(LedgerError::InsufficientAllowance);
        }
        self.transfer(from, to, amount)?;
        self.allowances.insert((from, spender), allowed - amount);
        Ok(())
    }

    /// Creates `amount` new units for `to`. Authorization is the caller's
    /// concern; the registry gates its reward ledger behind the whitelist.
    pub fn mint(&mut self, to: Address, amount: Wad) -> Result<(), LedgerError> {
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;
        *self.balances.entry(to).or_insert(0) += amount;
        self.events.push(LedgerEvent::Transfer {
            from: Address::ZERO,
            to,
            amount,
        });
        debug!(ledger = %self.symbol, %to, amount, "minted");
        Ok(())
    }

    /// Destroys `amount` units held by `from`.
    pub fn burn(&mut self, from: Address, amount: Wad) -> Result<(), LedgerError> {
        let balance = self.balance_of(from);
        if amount > balance {
            return Err(LedgerError::BurnExceedsBalance);
        }
        self.balances.insert(from, balance - amount);
        self.total_supply -= amount;
        self.events.push(LedgerEvent::Transfer {
            from,
            to: Address::ZERO,
            amount,
        });
        debug!(ledger = %self.symbol, %from, amount, "burned");
        Ok(())
    }
}
