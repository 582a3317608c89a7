//! Error taxonomy for the exchange and registry.
//!
//! Reason strings are part of the public contract: callers and the test
//! suites match on them exactly, so they must stay stable. Ledger and math
//! errors pass through transparently to keep their own strings intact.

use amm::AmmError;
use ledger::LedgerError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DexError {
    /// Offered amount is below the required minimum, or a slippage bound
    /// was violated.
    #[error("not enough input amount!")]
    NotEnoughInput,

    /// No exchange is registered for the requested asset (or the asset is
    /// this exchange's own).
    #[error("exchange doesn't exist!")]
    ExchangeNotFound,

    /// The zero address was supplied where a real asset is required.
    #[error("invalid address!")]
    InvalidAddress,

    /// An exchange for this asset is already registered.
    #[error("exchange already exist!")]
    ExchangeExists,

    /// Mint or whitelist extension attempted by a non-whitelisted caller.
    #[error("you are not whitelisted!")]
    NotWhitelisted,

    /// Staking withdrawal with nothing accrued.
    #[error("0 INT to withdraw!")]
    NothingToWithdraw,

    /// No ledger is deployed at the given token address.
    #[error("unknown token!")]
    UnknownToken,

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Math(#[from] AmmError),
}
