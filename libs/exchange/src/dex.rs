//! The InternSwap runtime: owns all shared ledger state and applies every
//! public call atomically.
//!
//! There are no hidden singletons: the harness (or host process) constructs
//! one [`Dex`], funds accounts, deploys tokens, and drives every operation
//! through it with an explicit caller address. `&mut self` receivers
//! serialize calls; a concurrent host wraps the whole runtime in its own
//! lock.
//!
//! Atomicity: each mutating entry point snapshots the state and rolls back
//! on any error, so a failure in a nested step (the sibling exchange of a
//! token-to-token hop, the registry mint inside a staking withdrawal) undoes
//! the entire originating call.
//!
//! Time: reward accrual is lazy. The runtime carries a timestamp that only
//! the host advances; nothing runs in the background.

use std::collections::HashMap;

use tracing::{debug, info};
use types::{Address, Timestamp, Wad};

use ledger::{LedgerEvent, NativeLedger, TokenLedger};

use crate::config::Config;
use crate::error::DexError;
use crate::exchange::Exchange;
use crate::registry::{Registry, TotalTokenStatus};

#[derive(Debug, Clone)]
pub struct Dex {
    now: Timestamp,
    config: Config,
    native: NativeLedger,
    tokens: HashMap<Address, TokenLedger>,
    registry: Registry,
    exchanges: HashMap<Address, Exchange>,
    deployed: u64,
}

/// Deployed-contract addresses live in their own namespace (0xcc prefix) so
/// they can never collide with harness-picked account addresses.
fn contract_address(index: u64) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xcc;
    bytes[12..].copy_from_slice(&index.to_be_bytes());
    Address::new(bytes)
}

/// Resolves the ledger behind an asset address. The registry's own address
/// resolves to the reward-token ledger, so exchanges can trade INT like any
/// other asset.
fn asset_ledger_mut<'a>(
    tokens: &'a mut HashMap<Address, TokenLedger>,
    registry: &'a mut Registry,
    asset: Address,
) -> Result<&'a mut TokenLedger, DexError> {
    if asset == registry.address() {
        Ok(registry.token_mut())
    } else {
        tokens.get_mut(&asset).ok_or(DexError::UnknownToken)
    }
}

fn asset_ledger<'a>(
    tokens: &'a HashMap<Address, TokenLedger>,
    registry: &'a Registry,
    asset: Address,
) -> Result<&'a TokenLedger, DexError> {
    if asset == registry.address() {
        Ok(registry.token())
    } else {
        tokens.get(&asset).ok_or(DexError::UnknownToken)
    }
}

impl Dex {
    pub fn new(config: Config) -> Self {
        let registry_address = contract_address(1);
        info!(registry = %registry_address, "runtime initialized");
        Dex {
            now: 0,
            config,
            native: NativeLedger::new(),
            tokens: HashMap::new(),
            registry: Registry::new(registry_address),
            exchanges: HashMap::new(),
            deployed: 1,
        }
    }

    /// Runs `f` against the state, rolling everything back if it errors.
    fn transact<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, DexError>,
    ) -> Result<T, DexError> {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    fn allocate_address(&mut self) -> Address {
        self.deployed += 1;
        contract_address(self.deployed)
    }

    fn exchange(&self, address: Address) -> Result<&Exchange, DexError> {
        self.exchanges
            .get(&address)
            .ok_or(DexError::ExchangeNotFound)
    }

    // ---- clock & config ----------------------------------------------------

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn set_timestamp(&mut self, now: Timestamp) {
        self.now = now;
    }

    pub fn advance_time(&mut self, seconds: u64) {
        self.now += seconds;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ---- deployment & funding ----------------------------------------------

    /// Credits native units to an account (harness faucet).
    pub fn fund(&mut self, account: Address, amount: Wad) -> Result<(), DexError> {
        Ok(self.native.deposit(account, amount)?)
    }

    pub fn native_balance_of(&self, account: Address) -> Wad {
        self.native.balance_of(account)
    }

    /// Deploys a fresh asset ledger with its supply held by `deployer`.
    pub fn deploy_token(
        &mut self,
        deployer: Address,
        name: &str,
        symbol: &str,
        initial_supply: Wad,
    ) -> Address {
        let address = self.allocate_address();
        self.tokens.insert(
            address,
            TokenLedger::with_supply(name, symbol, initial_supply, deployer),
        );
        info!(%address, symbol, %deployer, "token deployed");
        address
    }

    // ---- registry/factory surface ------------------------------------------

    pub fn registry_address(&self) -> Address {
        self.registry.address()
    }

    /// Owner of the registry (the registry itself).
    pub fn registry_owner(&self) -> Address {
        self.registry.owner()
    }

    /// Deploys and registers a new exchange for `asset`. Fails on the zero
    /// address, on duplicates, and on assets with no resolvable ledger
    /// (undeployed addresses and LP-share addresses, which the pool paths
    /// cannot route); the new exchange is whitelisted immediately so it can
    /// mint staking rewards.
    pub fn create_exchange(&mut self, caller: Address, asset: Address) -> Result<Address, DexError> {
        self.transact(|dex| {
            let address = dex.allocate_address();
            dex.registry.register_exchange(asset, address)?;
            asset_ledger(&dex.tokens, &dex.registry, asset)?;
            dex.exchanges.insert(address, Exchange::new(address, asset));
            info!(%caller, %asset, exchange = %address, "exchange created");
            Ok(address)
        })
    }

    /// Exchange registered for `asset`, or the zero address. Not an error.
    pub fn get_exchange(&self, asset: Address) -> Address {
        self.registry.get_exchange(asset)
    }

    pub fn whitelist_status(&self, address: Address) -> bool {
        self.registry.whitelist_status(address)
    }

    pub fn add_to_whitelist(&mut self, caller: Address, address: Address) -> Result<(), DexError> {
        self.transact(|dex| dex.registry.add_to_whitelist(caller, address))
    }

    /// Direct reward-token mint, whitelist-gated.
    pub fn mint_reward(&mut self, caller: Address, to: Address, amount: Wad) -> Result<(), DexError> {
        self.transact(|dex| dex.registry.mint(caller, to, amount))
    }

    pub fn mint_events(&self) -> &[TotalTokenStatus] {
        self.registry.mint_events()
    }

    // ---- exchange surface --------------------------------------------------

    /// Asset reserve held by an exchange.
    pub fn get_token_balance(&self, exchange: Address) -> Result<Wad, DexError> {
        let exch = self.exchange(exchange)?;
        let asset = asset_ledger(&self.tokens, &self.registry, exch.asset())?;
        Ok(exch.reserve_asset(asset))
    }

    pub fn get_token_amount(&self, exchange: Address, native_in: Wad) -> Result<Wad, DexError> {
        let exch = self.exchange(exchange)?;
        let asset = asset_ledger(&self.tokens, &self.registry, exch.asset())?;
        exch.get_token_amount(native_in, &self.native, asset)
    }

    pub fn get_ether_amount(&self, exchange: Address, tokens_in: Wad) -> Result<Wad, DexError> {
        let exch = self.exchange(exchange)?;
        let asset = asset_ledger(&self.tokens, &self.registry, exch.asset())?;
        exch.get_ether_amount(tokens_in, &self.native, asset)
    }

    pub fn add_liquidity(
        &mut self,
        caller: Address,
        exchange: Address,
        max_tokens: Wad,
        native_sent: Wad,
    ) -> Result<Wad, DexError> {
        self.transact(|dex| {
            let now = dex.now;
            let rate = dex.config.accrual_rate_per_share;
            let Self {
                native,
                tokens,
                registry,
                exchanges,
                ..
            } = dex;
            let exch = exchanges
                .get_mut(&exchange)
                .ok_or(DexError::ExchangeNotFound)?;
            let asset = asset_ledger_mut(tokens, registry, exch.asset())?;
            exch.add_liquidity(caller, max_tokens, native_sent, native, asset, now, rate)
        })
    }

    pub fn remove_liquidity(
        &mut self,
        caller: Address,
        exchange: Address,
        amount: Wad,
    ) -> Result<(Wad, Wad), DexError> {
        self.transact(|dex| {
            let now = dex.now;
            let rate = dex.config.accrual_rate_per_share;
            let Self {
                native,
                tokens,
                registry,
                exchanges,
                ..
            } = dex;
            let exch = exchanges
                .get_mut(&exchange)
                .ok_or(DexError::ExchangeNotFound)?;
            let asset = asset_ledger_mut(tokens, registry, exch.asset())?;
            exch.remove_liquidity(caller, amount, native, asset, now, rate)
        })
    }

    pub fn swap_ether_to_token(
        &mut self,
        caller: Address,
        exchange: Address,
        min_tokens: Wad,
        native_sent: Wad,
    ) -> Result<Wad, DexError> {
        self.transact(|dex| {
            let Self {
                native,
                tokens,
                registry,
                exchanges,
                ..
            } = dex;
            let exch = exchanges
                .get(&exchange)
                .ok_or(DexError::ExchangeNotFound)?;
            let asset = asset_ledger_mut(tokens, registry, exch.asset())?;
            exch.swap_native_for_tokens(caller, caller, min_tokens, native_sent, native, asset)
        })
    }

    pub fn swap_token_to_ether(
        &mut self,
        caller: Address,
        exchange: Address,
        tokens_sold: Wad,
        min_native: Wad,
    ) -> Result<Wad, DexError> {
        self.transact(|dex| {
            let Self {
                native,
                tokens,
                registry,
                exchanges,
                ..
            } = dex;
            let exch = exchanges
                .get(&exchange)
                .ok_or(DexError::ExchangeNotFound)?;
            let asset = asset_ledger_mut(tokens, registry, exch.asset())?;
            exch.swap_tokens_for_native(caller, tokens_sold, min_native, native, asset)
        })
    }

    /// Single-hop asset-to-asset swap: sells on this exchange, forwards the
    /// native intermediate to the sibling registered for `other_asset`, and
    /// delivers the bought tokens straight to the caller.
    pub fn swap_token_to_token(
        &mut self,
        caller: Address,
        exchange: Address,
        tokens_sold: Wad,
        min_bought: Wad,
        other_asset: Address,
    ) -> Result<Wad, DexError> {
        self.transact(|dex| {
            let sibling_address = dex.registry.get_exchange(other_asset);
            let native_intermediate;
            {
                let Self {
                    native,
                    tokens,
                    registry,
                    exchanges,
                    ..
                } = dex;
                let exch = exchanges
                    .get(&exchange)
                    .ok_or(DexError::ExchangeNotFound)?;
                if sibling_address.is_zero() || other_asset == exch.asset() {
                    return Err(DexError::ExchangeNotFound);
                }
                let asset = asset_ledger_mut(tokens, registry, exch.asset())?;
                native_intermediate =
                    exch.swap_tokens_for_intermediate(caller, tokens_sold, native, asset)?;
            }

            let Self {
                native,
                tokens,
                registry,
                exchanges,
                ..
            } = dex;
            let sibling = exchanges
                .get(&sibling_address)
                .ok_or(DexError::ExchangeNotFound)?;
            let sibling_asset = asset_ledger_mut(tokens, registry, sibling.asset())?;
            let bought = sibling.swap_native_for_tokens(
                exchange,
                caller,
                min_bought,
                native_intermediate,
                native,
                sibling_asset,
            )?;
            debug!(
                %caller, from = %exchange, to = %sibling_address,
                tokens_sold, native_intermediate, bought, "token -> token hop"
            );
            Ok(bought)
        })
    }

    // ---- staking surface ---------------------------------------------------

    pub fn get_staked_amount(&self, exchange: Address, holder: Address) -> Result<Wad, DexError> {
        self.exchange(exchange)?
            .staked_amount(holder, self.now, self.config.accrual_rate_per_share)
    }

    /// Checkpoints the caller's accrual and mints the pending reward through
    /// the registry's whitelisted path.
    pub fn withdraw_staked_tokens(
        &mut self,
        caller: Address,
        exchange: Address,
    ) -> Result<Wad, DexError> {
        self.transact(|dex| {
            let now = dex.now;
            let rate = dex.config.accrual_rate_per_share;
            let Self {
                registry,
                exchanges,
                ..
            } = dex;
            let exch = exchanges
                .get_mut(&exchange)
                .ok_or(DexError::ExchangeNotFound)?;
            let amount = exch.take_withdrawable(caller, now, rate)?;
            registry.mint(exch.address(), caller, amount)?;
            Ok(amount)
        })
    }

    // ---- generic token surface ---------------------------------------------
    //
    // Routed by token address: deployed assets, the registry's reward token,
    // and each exchange's LP shares all expose the same ledger interface.

    fn any_ledger(&self, token: Address) -> Result<&TokenLedger, DexError> {
        if let Some(exch) = self.exchanges.get(&token) {
            Ok(exch.shares())
        } else {
            asset_ledger(&self.tokens, &self.registry, token)
        }
    }

    pub fn balance_of(&self, token: Address, holder: Address) -> Result<Wad, DexError> {
        Ok(self.any_ledger(token)?.balance_of(holder))
    }

    pub fn total_supply(&self, token: Address) -> Result<Wad, DexError> {
        Ok(self.any_ledger(token)?.total_supply())
    }

    pub fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<Wad, DexError> {
        Ok(self.any_ledger(token)?.allowance(owner, spender))
    }

    pub fn token_name(&self, token: Address) -> Result<String, DexError> {
        Ok(self.any_ledger(token)?.name().to_string())
    }

    pub fn token_symbol(&self, token: Address) -> Result<String, DexError> {
        Ok(self.any_ledger(token)?.symbol().to_string())
    }

    pub fn token_decimals(&self, token: Address) -> Result<u8, DexError> {
        Ok(self.any_ledger(token)?.decimals())
    }

    pub fn token_events(&self, token: Address) -> Result<&[LedgerEvent], DexError> {
        Ok(self.any_ledger(token)?.events())
    }

    pub fn approve(
        &mut self,
        caller: Address,
        token: Address,
        spender: Address,
        amount: Wad,
    ) -> Result<(), DexError> {
        self.transact(|dex| {
            if let Some(exch) = dex.exchanges.get_mut(&token) {
                exch.approve_shares(caller, spender, amount);
                Ok(())
            } else {
                asset_ledger_mut(&mut dex.tokens, &mut dex.registry, token)?
                    .approve(caller, spender, amount);
                Ok(())
            }
        })
    }

    /// Token transfer. LP-share transfers additionally checkpoint both
    /// holders' stake records at the transfer instant.
    pub fn transfer(
        &mut self,
        caller: Address,
        token: Address,
        to: Address,
        amount: Wad,
    ) -> Result<(), DexError> {
        self.transact(|dex| {
            let now = dex.now;
            let rate = dex.config.accrual_rate_per_share;
            if let Some(exch) = dex.exchanges.get_mut(&token) {
                exch.transfer_shares(caller, to, amount, now, rate)
            } else {
                Ok(asset_ledger_mut(&mut dex.tokens, &mut dex.registry, token)?
                    .transfer(caller, to, amount)?)
            }
        })
    }

    /// Delegated token transfer with the same LP-share checkpointing rule.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        token: Address,
        from: Address,
        to: Address,
        amount: Wad,
    ) -> Result<(), DexError> {
        self.transact(|dex| {
            let now = dex.now;
            let rate = dex.config.accrual_rate_per_share;
            if let Some(exch) = dex.exchanges.get_mut(&token) {
                exch.transfer_shares_from(caller, from, to, amount, now, rate)
            } else {
                Ok(asset_ledger_mut(&mut dex.tokens, &mut dex.registry, token)?
                    .transfer_from(caller, from, to, amount)?)
            }
        })
    }
}
