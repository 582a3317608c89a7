//! Time-weighted staking accrual.
//!
//! Each LP-share holder carries a pending-reward accumulator plus the
//! timestamp of its last checkpoint. Accrual is computed lazily from elapsed
//! time; every balance mutation checkpoints first, so time already served at
//! the old balance is never lost or double-counted and no holder iteration
//! is ever needed.

use amm::{checked_wad, AmmError, U256};
use serde::Serialize;
use types::{Timestamp, Wad, SECONDS_PER_DAY};

/// Per-holder accrual state. The holder's share balance itself lives in the
/// exchange's share ledger.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StakeRecord {
    /// Rewards accrued up to `last_update`, not yet withdrawn.
    pub pending: Wad,
    /// Timestamp of the last checkpoint.
    pub last_update: Timestamp,
}

/// Rewards earned by holding `balance` shares for `elapsed` seconds at
/// `rate` units per share-day. Multiplies before dividing in 256 bits and
/// truncates, so rounding always favors the reward pool.
pub fn accrued(balance: Wad, elapsed: u64, rate: Wad) -> Result<Wad, AmmError> {
    // Three factors can exceed 256 bits; U256's plain `Mul` panics.
    let earned = U256::from(balance)
        .checked_mul(U256::from(rate))
        .and_then(|product| product.checked_mul(U256::from(elapsed)))
        .ok_or(AmmError::Overflow)?
        / U256::from(SECONDS_PER_DAY);
    checked_wad(earned)
}
