//! Constant-product math with exact calculations
//!
//! Preserves full precision using Decimal type so share issuance and swap
//! outputs are bit-for-bit reproducible across hosts.

use anyhow::{bail, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Multiplier applied to `sqrt(x * y)` when a pool issues its first shares.
pub const SHARE_SCALE: Decimal = dec!(1_000_000);

/// Constant-product math functions with zero precision loss
pub struct CpmmMath;

impl CpmmMath {
    /// Shares issued when a pool is created: `1_000_000 * sqrt(x * y)`.
    ///
    /// # Arguments
    /// * `deposit_x` - Initial deposit of the first paired asset
    /// * `deposit_y` - Initial deposit of the second paired asset
    pub fn initial_shares(deposit_x: Decimal, deposit_y: Decimal) -> Result<Decimal> {
        if deposit_x <= dec!(0) || deposit_y <= dec!(0) {
            bail!("Initial deposits must be positive");
        }

        let product = deposit_x * deposit_y;
        Ok(SHARE_SCALE * Self::decimal_sqrt(product)?)
    }

    /// Shares issued for a deposit into an existing pool.
    ///
    /// Takes the minimum of both sides' pro-rata claims so a lopsided deposit
    /// cannot mint more shares than the scarcer side justifies:
    /// `min(input_x * supply / reserve_x, input_y * supply / reserve_y)`.
    pub fn deposit_shares(
        input_x: Decimal,
        input_y: Decimal,
        shares_supply: Decimal,
        reserve_x: Decimal,
        reserve_y: Decimal,
    ) -> Result<Decimal> {
        if input_x <= dec!(0) || input_y <= dec!(0) {
            bail!("Deposit amounts must be positive");
        }
        if shares_supply <= dec!(0) {
            bail!("Shares supply must be positive");
        }
        if reserve_x <= dec!(0) || reserve_y <= dec!(0) {
            bail!("Reserves must be positive");
        }

        let claim_x = input_x * shares_supply / reserve_x;
        let claim_y = input_y * shares_supply / reserve_y;
        Ok(claim_x.min(claim_y))
    }

    /// Reserve amounts paid out when `shares` are burned.
    ///
    /// Exact algebraic inverse of [`Self::deposit_shares`] for matching
    /// ratios: `(shares * reserve_x / supply, shares * reserve_y / supply)`.
    pub fn withdrawal_amounts(
        shares: Decimal,
        shares_supply: Decimal,
        reserve_x: Decimal,
        reserve_y: Decimal,
    ) -> Result<(Decimal, Decimal)> {
        if shares <= dec!(0) {
            bail!("Burned share amount must be positive");
        }
        if shares_supply <= dec!(0) {
            bail!("Shares supply must be positive");
        }
        if shares > shares_supply {
            bail!("Cannot burn more shares than the outstanding supply");
        }
        if reserve_x <= dec!(0) || reserve_y <= dec!(0) {
            bail!("Reserves must be positive");
        }

        let out_x = shares * reserve_x / shares_supply;
        let out_y = shares * reserve_y / shares_supply;
        Ok((out_x, out_y))
    }

    /// Output amount for a swap against the constant-product invariant.
    ///
    /// `k = reserve_in * reserve_out`;
    /// `output = reserve_out - k / (reserve_in + amount_in)`.
    /// For all valid inputs the output is strictly between zero and
    /// `reserve_out`, so a swap can never drain a reserve.
    pub fn swap_output(
        amount_in: Decimal,
        reserve_in: Decimal,
        reserve_out: Decimal,
    ) -> Result<Decimal> {
        if amount_in <= dec!(0) {
            bail!("Input amount must be positive");
        }
        if reserve_in <= dec!(0) || reserve_out <= dec!(0) {
            bail!("Reserves must be positive");
        }
        if amount_in >= reserve_in {
            bail!("Input amount must be below the input-side reserve");
        }

        let k = reserve_in * reserve_out;
        Ok(reserve_out - k / (reserve_in + amount_in))
    }

    /// Instantaneous exchange rate at the current reserves.
    pub fn spot_price(reserve_in: Decimal, reserve_out: Decimal) -> Result<Decimal> {
        if reserve_in <= dec!(0) || reserve_out <= dec!(0) {
            bail!("Reserves must be positive");
        }
        Ok(reserve_out / reserve_in)
    }

    /// Price impact of a trade as a percentage of the pre-trade rate.
    pub fn price_impact(
        amount_in: Decimal,
        reserve_in: Decimal,
        reserve_out: Decimal,
    ) -> Result<Decimal> {
        let price_before = Self::spot_price(reserve_in, reserve_out)?;

        let output = Self::swap_output(amount_in, reserve_in, reserve_out)?;
        let price_after = (reserve_out - output) / (reserve_in + amount_in);

        Ok((price_before - price_after).abs() / price_before * dec!(100))
    }

    /// Calculate square root of a Decimal using Newton's method
    /// Maintains precision for large numbers
    pub(crate) fn decimal_sqrt(value: Decimal) -> Result<Decimal> {
        if value < dec!(0) {
            bail!("Cannot calculate square root of negative number");
        }
        if value == dec!(0) {
            return Ok(dec!(0));
        }

        // Initial guess
        let mut x = value;
        let mut last_x = dec!(0);
        let epsilon = dec!(0.0000000001); // Precision threshold

        // Newton's method: x_new = (x + value/x) / 2
        let max_iterations = 100;
        for _ in 0..max_iterations {
            let next_x = (x + value / x) / dec!(2);

            // Check convergence
            if (next_x - last_x).abs() < epsilon {
                x = next_x;
                break;
            }

            last_x = x;
            x = next_x;
        }

        // Snap perfect squares to their exact root so integer realization
        // downstream cannot lose a unit to convergence error.
        let rounded = x.round();
        if rounded * rounded == value {
            return Ok(rounded);
        }

        Ok(x)
    }
}

/// Floor a computed quantity to an integer ledger unit.
///
/// Rounding is always toward the pool: a provider or trader receives the
/// floor of the exact quantity, never the ceiling.
pub fn floor_to_unit(value: Decimal) -> Result<u64> {
    if value < dec!(0) {
        bail!("Cannot realize a negative amount on the ledger");
    }
    value
        .floor()
        .to_u64()
        .ok_or_else(|| anyhow::anyhow!("Amount {value} exceeds the representable ledger range"))
}
