//! # InternSwap Exchange - Pools, Registry, and Staking Rewards
//!
//! ## Purpose
//!
//! The core of the InternSwap engine: one [`Exchange`] per tradable asset
//! holding a native/asset pool, pricing swaps with the constant-product
//! formula, issuing LP shares, and accruing time-weighted staking rewards;
//! a [`Registry`] that creates and deduplicates exchanges, gates reward
//! minting behind a whitelist, and doubles as the reward-token ledger; and
//! a [`Dex`] runtime that owns all shared state and applies every public
//! call atomically.
//!
//! ## Integration Points
//!
//! - **Input Sources**: explicit caller addresses on every entry point; a
//!   harness-controlled clock for lazy reward accrual
//! - **Output Destinations**: ledger state, Transfer/Approve records,
//!   `TotalTokenStatus` mint notifications
//! - **Pricing**: `internswap-amm` integer-exact quotes (0.3% input fee)
//! - **Atomicity**: snapshot/rollback per call; an error anywhere leaves no
//!   partial effects, including nested sibling-exchange and registry calls
//!
//! ## Architecture Role
//!
//! ```text
//! Caller → [Dex runtime] → [Exchange] ⇄ [NativeLedger / TokenLedger]
//!              ↓               ↓ mint rewards
//!          [Registry] ← whitelist gate ← created exchanges
//! ```

pub mod config;
pub mod dex;
pub mod error;
pub mod exchange;
pub mod registry;
pub mod stake;

pub use config::Config;
pub use dex::Dex;
pub use error::DexError;
pub use exchange::{Exchange, LP_TOKEN_NAME, LP_TOKEN_SYMBOL};
pub use registry::{Registry, TotalTokenStatus, REWARD_TOKEN_NAME, REWARD_TOKEN_SYMBOL};
pub use stake::StakeRecord;
