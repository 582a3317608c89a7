//! # InternSwap AMM Math - Exact Constant-Product Pricing
//!
//! ## Purpose
//!
//! Integer-exact constant-product formulas for pool pricing. All amounts are
//! wad-scaled `u128`; every multiply-before-divide runs through a 256-bit
//! intermediate so no operand pair can overflow, and every division truncates
//! toward zero. Truncation always lands in the pool's favor, so repeated
//! small operations can never leak value out of the reserves.
//!
//! ## Integration Points
//!
//! - **Input Sources**: pool reserves read from the ledgers at call time
//! - **Output Destinations**: exchange swap/liquidity paths, staking accrual
//! - **Fee Model**: fixed 0.3% input fee folded into the quote
//!   (`997/1000` on the input amount)

use thiserror::Error;
use types::Wad;
use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer for overflow-safe intermediate products.
    pub struct U256(4);
}

/// Input-fee numerator: the pool prices `input * 997 / 1000`.
pub const FEE_NUMERATOR: u128 = 997;
/// Input-fee denominator.
pub const FEE_DENOMINATOR: u128 = 1000;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AmmError {
    /// A quote was requested against an empty reserve.
    #[error("no liquidity!")]
    NoLiquidity,

    /// An intermediate result does not fit back into a wad amount, or a
    /// denominator was zero.
    #[error("arithmetic overflow")]
    Overflow,
}

/// Narrows a 256-bit intermediate back to a wad amount.
pub fn checked_wad(value: U256) -> Result<Wad, AmmError> {
    if value > U256::from(u128::MAX) {
        Err(AmmError::Overflow)
    } else {
        Ok(value.as_u128())
    }
}

/// Computes `a * b / denominator` with a 256-bit product, truncating toward
/// zero. Used for every proportional-share calculation in the engine.
pub fn mul_div(a: Wad, b: Wad, denominator: Wad) -> Result<Wad, AmmError> {
    if denominator == 0 {
        return Err(AmmError::Overflow);
    }
    checked_wad(U256::from(a) * U256::from(b) / U256::from(denominator))
}

/// Constant-product quote with the 0.3% input fee folded in:
///
/// ```text
/// output = input * 997 * output_reserve / (input_reserve * 1000 + input * 997)
/// ```
///
/// Fails with [`AmmError::NoLiquidity`] if either reserve is zero. The result
/// is always strictly less than `output_reserve`, so a swap can never drain
/// the pool.
pub fn output_amount(
    input_amount: Wad,
    input_reserve: Wad,
    output_reserve: Wad,
) -> Result<Wad, AmmError> {
    if input_reserve == 0 || output_reserve == 0 {
        return Err(AmmError::NoLiquidity);
    }

    // Three u128-sized factors can exceed 256 bits, and U256's plain `Mul`
    // panics on overflow.
    let input_with_fee = U256::from(input_amount) * U256::from(FEE_NUMERATOR);
    let numerator = input_with_fee
        .checked_mul(U256::from(output_reserve))
        .ok_or(AmmError::Overflow)?;
    let denominator = U256::from(input_reserve) * U256::from(FEE_DENOMINATOR) + input_with_fee;

    checked_wad(numerator / denominator)
}
