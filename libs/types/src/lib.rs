//! # InternSwap Shared Types
//!
//! ## Purpose
//!
//! Primitive types shared by every InternSwap crate: 20-byte [`Address`]
//! identities for accounts, tokens and exchanges, and the fixed-point
//! amount scale used throughout the engine.
//!
//! ## Integration Points
//!
//! - **Consumers**: ledger bookkeeping, AMM math, exchange/registry state
//! - **Precision**: all amounts are wad-scaled unsigned integers (1e18),
//!   matching the 18-decimal ledger convention
//! - **Serialization**: serde derives on all types for config and state dumps

pub mod address;

pub use address::Address;

/// Fixed-point amount, scaled by [`WAD`] (18 decimals).
pub type Wad = u128;

/// One whole unit at 18-decimal fixed-point scale.
pub const WAD: Wad = 1_000_000_000_000_000_000;

/// Wall-clock-equivalent time in seconds.
pub type Timestamp = u64;

/// Seconds per staking-accrual day.
pub const SECONDS_PER_DAY: u64 = 86_400;
