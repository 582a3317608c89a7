//! A single native/asset pool: liquidity provision, swap execution, LP-share
//! issuance, and staking accrual.
//!
//! Reserves are never stored separately: the native reserve *is* the native
//! ledger balance at the exchange address, and the asset reserve *is* the
//! asset ledger balance there. Derived reserves cannot drift from the
//! ledgers.
//!
//! Collaborator ledgers are passed in explicitly per call; the [`Dex`]
//! runtime (`crate::dex`) resolves them and serializes calls.

use std::collections::HashMap;

use tracing::debug;
use types::{Address, Timestamp, Wad};

use ledger::{LedgerError, NativeLedger, TokenLedger};

use crate::error::DexError;
use crate::stake::{self, StakeRecord};

/// LP-share ledger name, one instance per exchange.
pub const LP_TOKEN_NAME: &str = "InternSwap-V1";
pub const LP_TOKEN_SYMBOL: &str = "INTS-V1";

#[derive(Debug, Clone)]
pub struct Exchange {
    address: Address,
    asset: Address,
    shares: TokenLedger,
    stakes: HashMap<Address, StakeRecord>,
}

impl Exchange {
    pub fn new(address: Address, asset: Address) -> Self {
        Exchange {
            address,
            asset,
            shares: TokenLedger::new(LP_TOKEN_NAME, LP_TOKEN_SYMBOL),
            stakes: HashMap::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// The asset ledger this exchange trades against.
    pub fn asset(&self) -> Address {
        self.asset
    }

    /// Read-only LP-share surface (balances, supply, allowances, events).
    pub fn shares(&self) -> &TokenLedger {
        &self.shares
    }

    pub fn reserve_native(&self, native: &NativeLedger) -> Wad {
        native.balance_of(self.address)
    }

    pub fn reserve_asset(&self, asset: &TokenLedger) -> Wad {
        asset.balance_of(self.address)
    }

    // ---- pricing -----------------------------------------------------------

    /// Asset units bought for `native_in`. Pure quote, no state change.
    pub fn get_token_amount(
        &self,
        native_in: Wad,
        native: &NativeLedger,
        asset: &TokenLedger,
    ) -> Result<Wad, DexError> {
        Ok(amm::output_amount(
            native_in,
            self.reserve_native(native),
            self.reserve_asset(asset),
        )?)
    }

    /// Native units bought for `tokens_in`. Pure quote, no state change.
    pub fn get_ether_amount(
        &self,
        tokens_in: Wad,
        native: &NativeLedger,
        asset: &TokenLedger,
    ) -> Result<Wad, DexError> {
        Ok(amm::output_amount(
            tokens_in,
            self.reserve_asset(asset),
            self.reserve_native(native),
        )?)
    }

    // ---- liquidity ---------------------------------------------------------

    /// Supplies paired liquidity and mints LP shares to the caller.
    ///
    /// On the first deposit the caller sets the initial price: the exact
    /// `max_tokens` and `native_sent` are accepted and `native_sent` shares
    /// are minted (the native unit is the share-pricing numeraire).
    /// Afterwards the required asset amount follows the current ratio and
    /// `max_tokens` is only an upper bound on what the caller will fund.
    pub fn add_liquidity(
        &mut self,
        caller: Address,
        max_tokens: Wad,
        native_sent: Wad,
        native: &mut NativeLedger,
        asset: &mut TokenLedger,
        now: Timestamp,
        rate: Wad,
    ) -> Result<Wad, DexError> {
        let native_reserve = self.reserve_native(native);
        let asset_reserve = self.reserve_asset(asset);

        self.checkpoint(caller, now, rate)?;

        let minted = if native_reserve == 0 && asset_reserve == 0 {
            asset.transfer_from(self.address, caller, self.address, max_tokens)?;
            native.transfer(caller, self.address, native_sent)?;
            native_sent
        } else {
            let required_tokens = amm::mul_div(native_sent, asset_reserve, native_reserve)?;
            if max_tokens < required_tokens {
                return Err(DexError::NotEnoughInput);
            }
            asset.transfer_from(self.address, caller, self.address, required_tokens)?;
            native.transfer(caller, self.address, native_sent)?;
            amm::mul_div(native_sent, self.shares.total_supply(), native_reserve)?
        };

        self.shares.mint(caller, minted)?;
        debug!(exchange = %self.address, %caller, native_sent, minted, "liquidity added");
        Ok(minted)
    }

    /// Burns `amount` LP shares and pays out the proportional slice of both
    /// reserves, truncated in the pool's favor.
    pub fn remove_liquidity(
        &mut self,
        caller: Address,
        amount: Wad,
        native: &mut NativeLedger,
        asset: &mut TokenLedger,
        now: Timestamp,
        rate: Wad,
    ) -> Result<(Wad, Wad), DexError> {
        if amount > self.shares.balance_of(caller) {
            return Err(LedgerError::BurnExceedsBalance.into());
        }

        let total = self.shares.total_supply();
        let (native_out, tokens_out) = if total == 0 {
            (0, 0)
        } else {
            (
                amm::mul_div(amount, self.reserve_native(native), total)?,
                amm::mul_div(amount, self.reserve_asset(asset), total)?,
            )
        };

        self.checkpoint(caller, now, rate)?;
        self.shares.burn(caller, amount)?;
        native.transfer(self.address, caller, native_out)?;
        asset.transfer(self.address, caller, tokens_out)?;

        debug!(
            exchange = %self.address, %caller, amount, native_out, tokens_out,
            "liquidity removed"
        );
        Ok((native_out, tokens_out))
    }

    // ---- swaps -------------------------------------------------------------

    /// Swaps `native_sent` from `payer` for asset units delivered to
    /// `recipient`. The split payer/recipient form is what the
    /// token-to-token hop uses: the sibling exchange pays the native leg
    /// while the original caller receives the tokens.
    pub fn swap_native_for_tokens(
        &self,
        payer: Address,
        recipient: Address,
        min_tokens: Wad,
        native_sent: Wad,
        native: &mut NativeLedger,
        asset: &mut TokenLedger,
    ) -> Result<Wad, DexError> {
        let tokens_out = amm::output_amount(
            native_sent,
            self.reserve_native(native),
            self.reserve_asset(asset),
        )?;
        if tokens_out < min_tokens {
            return Err(DexError::NotEnoughInput);
        }

        native.transfer(payer, self.address, native_sent)?;
        asset.transfer(self.address, recipient, tokens_out)?;

        debug!(exchange = %self.address, %recipient, native_sent, tokens_out, "native -> asset");
        Ok(tokens_out)
    }

    /// Swaps `tokens_sold` (pulled from the caller via allowance) for native
    /// units paid back to the caller.
    pub fn swap_tokens_for_native(
        &self,
        caller: Address,
        tokens_sold: Wad,
        min_native: Wad,
        native: &mut NativeLedger,
        asset: &mut TokenLedger,
    ) -> Result<Wad, DexError> {
        let native_out = amm::output_amount(
            tokens_sold,
            self.reserve_asset(asset),
            self.reserve_native(native),
        )?;
        if native_out < min_native {
            return Err(DexError::NotEnoughInput);
        }

        asset.transfer_from(self.address, caller, self.address, tokens_sold)?;
        native.transfer(self.address, caller, native_out)?;

        debug!(exchange = %self.address, %caller, tokens_sold, native_out, "asset -> native");
        Ok(native_out)
    }

    /// First leg of a token-to-token hop: pulls the sold tokens into this
    /// pool and returns the native amount to forward to the sibling
    /// exchange. The native units stay here until the second leg spends
    /// them, so nothing strands if the whole call commits.
    pub fn swap_tokens_for_intermediate(
        &self,
        caller: Address,
        tokens_sold: Wad,
        native: &NativeLedger,
        asset: &mut TokenLedger,
    ) -> Result<Wad, DexError> {
        let native_out = amm::output_amount(
            tokens_sold,
            self.reserve_asset(asset),
            self.reserve_native(native),
        )?;
        asset.transfer_from(self.address, caller, self.address, tokens_sold)?;
        Ok(native_out)
    }

    // ---- staking -----------------------------------------------------------

    /// Folds the holder's accrual since the last checkpoint into their
    /// pending accumulator. Must run before any share-balance mutation.
    pub fn checkpoint(
        &mut self,
        holder: Address,
        now: Timestamp,
        rate: Wad,
    ) -> Result<(), DexError> {
        let balance = self.shares.balance_of(holder);
        let record = self.stakes.entry(holder).or_insert(StakeRecord {
            pending: 0,
            last_update: now,
        });
        let earned = stake::accrued(balance, now.saturating_sub(record.last_update), rate)?;
        record.pending = record
            .pending
            .checked_add(earned)
            .ok_or(amm::AmmError::Overflow)?;
        record.last_update = now;
        Ok(())
    }

    /// Claimable reward right now: checkpointed pending plus live accrual.
    /// Read-only projection; nothing is mutated.
    pub fn staked_amount(
        &self,
        holder: Address,
        now: Timestamp,
        rate: Wad,
    ) -> Result<Wad, DexError> {
        let balance = self.shares.balance_of(holder);
        let (pending, last_update) = match self.stakes.get(&holder) {
            Some(record) => (record.pending, record.last_update),
            None => (0, now),
        };
        let live = stake::accrued(balance, now.saturating_sub(last_update), rate)?;
        Ok(pending
            .checked_add(live)
            .ok_or(amm::AmmError::Overflow)?)
    }

    /// Checkpoints and drains the holder's pending reward. The runtime mints
    /// the returned amount through the registry's whitelisted path.
    pub fn take_withdrawable(
        &mut self,
        holder: Address,
        now: Timestamp,
        rate: Wad,
    ) -> Result<Wad, DexError> {
        self.checkpoint(holder, now, rate)?;
        let record = self.stakes.entry(holder).or_default();
        if record.pending == 0 {
            return Err(DexError::NothingToWithdraw);
        }
        let amount = record.pending;
        record.pending = 0;
        Ok(amount)
    }

    // ---- LP-share ledger surface -------------------------------------------

    /// Share transfer with stake checkpoints on both parties, so accrued
    /// time at the old balances is preserved exactly at the transfer
    /// instant.
    pub fn transfer_shares(
        &mut self,
        from: Address,
        to: Address,
        amount: Wad,
        now: Timestamp,
        rate: Wad,
    ) -> Result<(), DexError> {
        self.checkpoint(from, now, rate)?;
        self.checkpoint(to, now, rate)?;
        self.shares.transfer(from, to, amount)?;
        Ok(())
    }

    /// Delegated share transfer, checkpointing both holders.
    pub fn transfer_shares_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Wad,
        now: Timestamp,
        rate: Wad,
    ) -> Result<(), DexError> {
        self.checkpoint(from, now, rate)?;
        self.checkpoint(to, now, rate)?;
        self.shares.transfer_from(spender, from, to, amount)?;
        Ok(())
    }

    pub fn approve_shares(&mut self, owner: Address, spender: Address, amount: Wad) {
        self.shares.approve(owner, spender, amount);
    }
}
