//! # InternSwap Ledger - Fungible Balance Bookkeeping
//!
//! ## Purpose
//!
//! The fungible-ledger primitive written once and shared by every token-like
//! entity in the system: tradable assets, LP shares, and the registry's
//! reward token. Balance and allowance maps with standard conservation rules
//! (transfers conserve supply, `transfer_from` decrements the allowance) plus
//! a native-unit ledger for the value half of each pool.
//!
//! ## Integration Points
//!
//! - **Consumers**: the exchange (asset reserves, LP shares), the registry
//!   (reward token), the runtime (native balances)
//! - **Events**: Transfer/Approve records appended per ledger, rolled back
//!   with the rest of the state when a call aborts
//! - **Errors**: stable reason strings callers match on exactly

pub mod native;
pub mod token;

pub use native::NativeLedger;
pub use token::{LedgerEvent, TokenLedger, DECIMALS};

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// Transfer amount exceeds the sender's balance.
    #[error("not enough tokens!")]
    InsufficientBalance,

    /// Delegated transfer exceeds the spender's allowance.
    #[error("check allowance!")]
    InsufficientAllowance,

    /// Burn amount exceeds the holder's balance.
    #[error("burn amount exceeds balance")]
    BurnExceedsBalance,

    /// Minting would overflow the total supply.
    #[error("arithmetic overflow")]
    SupplyOverflow,
}
