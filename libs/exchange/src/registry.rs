//! The factory/registry: one exchange per asset, the reward-token ledger,
//! and the mint whitelist.
//!
//! The registry is itself a fungible ledger (the INT reward token). Its own
//! address is whitelisted at construction, which bootstraps the chain of
//! trust: the registry whitelists each exchange it creates, and only
//! whitelisted addresses may mint rewards or extend the whitelist further.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info};
use types::{Address, Wad};

use ledger::TokenLedger;

use crate::error::DexError;

pub const REWARD_TOKEN_NAME: &str = "Intern token";
pub const REWARD_TOKEN_SYMBOL: &str = "INT";

/// Notification recorded on every successful reward mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TotalTokenStatus {
    pub exchange: Address,
    pub recipient: Address,
    pub amount: Wad,
    pub success: bool,
}

#[derive(Debug, Clone)]
pub struct Registry {
    address: Address,
    token: TokenLedger,
    whitelist: HashSet<Address>,
    exchanges: HashMap<Address, Address>,
    mint_events: Vec<TotalTokenStatus>,
}

impl Registry {
    pub fn new(address: Address) -> Self {
        let mut whitelist = HashSet::new();
        whitelist.insert(address);
        Registry {
            address,
            token: TokenLedger::new(REWARD_TOKEN_NAME, REWARD_TOKEN_SYMBOL),
            whitelist,
            exchanges: HashMap::new(),
            mint_events: Vec::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// The registry is its own deployer-equivalent owner.
    pub fn owner(&self) -> Address {
        self.address
    }

    /// Reward-token ledger surface.
    pub fn token(&self) -> &TokenLedger {
        &self.token
    }

    pub(crate) fn token_mut(&mut self) -> &mut TokenLedger {
        &mut self.token
    }

    /// Exchange address registered for `asset`, or the zero address if none.
    /// A miss is not an error.
    pub fn get_exchange(&self, asset: Address) -> Address {
        self.exchanges.get(&asset).copied().unwrap_or(Address::ZERO)
    }

    /// Records a newly deployed exchange for `asset` and whitelists it.
    /// Entries are write-once: a second registration for the same asset is
    /// rejected.
    pub(crate) fn register_exchange(
        &mut self,
        asset: Address,
        exchange: Address,
    ) -> Result<(), DexError> {
        if asset.is_zero() {
            return Err(DexError::InvalidAddress);
        }
        if self.exchanges.contains_key(&asset) {
            return Err(DexError::ExchangeExists);
        }
        self.exchanges.insert(asset, exchange);
        self.whitelist.insert(exchange);
        info!(%asset, %exchange, "exchange registered");
        Ok(())
    }

    pub fn whitelist_status(&self, address: Address) -> bool {
        self.whitelist.contains(&address)
    }

    /// Extends the whitelist. Only already-whitelisted callers may do so.
    pub fn add_to_whitelist(&mut self, caller: Address, address: Address) -> Result<(), DexError> {
        if !self.whitelist.contains(&caller) {
            return Err(DexError::NotWhitelisted);
        }
        self.whitelist.insert(address);
        Ok(())
    }

    /// Mints reward units to `to`. Restricted to whitelisted callers
    /// (created exchanges and the registry itself).
    pub fn mint(&mut self, caller: Address, to: Address, amount: Wad) -> Result<(), DexError> {
        if !self.whitelist.contains(&caller) {
            return Err(DexError::NotWhitelisted);
        }
        self.token.mint(to, amount)?;
        self.mint_events.push(TotalTokenStatus {
            exchange: caller,
            recipient: to,
            amount,
            success: true,
        });
        debug!(%caller, %to, amount, "reward minted");
        Ok(())
    }

    /// `TotalTokenStatus` notifications, oldest first.
    pub fn mint_events(&self) -> &[TotalTokenStatus] {
        &self.mint_events
    }
}
