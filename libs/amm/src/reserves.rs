//! Supply/reserve snapshot in math-ready form.

use crate::cpmm::CpmmMath;
use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time supply and reserve state of one pool.
///
/// A snapshot is fetched immediately before an online execution and may be
/// stale by the time the assembled batch settles; nothing here re-validates
/// against live ledger state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolReserves {
    pub shares_supply: Decimal,
    pub reserve_x: Decimal,
    pub reserve_y: Decimal,
}

impl PoolReserves {
    pub fn new(shares_supply: Decimal, reserve_x: Decimal, reserve_y: Decimal) -> Self {
        Self {
            shares_supply,
            reserve_x,
            reserve_y,
        }
    }

    /// Shares minted for a deposit of `input_x` and `input_y`.
    pub fn deposit_shares(&self, input_x: Decimal, input_y: Decimal) -> Result<Decimal> {
        CpmmMath::deposit_shares(
            input_x,
            input_y,
            self.shares_supply,
            self.reserve_x,
            self.reserve_y,
        )
    }

    /// Reserve amounts released when `shares` are burned.
    pub fn withdrawal_amounts(&self, shares: Decimal) -> Result<(Decimal, Decimal)> {
        CpmmMath::withdrawal_amounts(shares, self.shares_supply, self.reserve_x, self.reserve_y)
    }

    /// Output of a swap paying `amount_in` of the x-side asset.
    pub fn swap_x_for_y(&self, amount_in: Decimal) -> Result<Decimal> {
        CpmmMath::swap_output(amount_in, self.reserve_x, self.reserve_y)
    }

    /// Output of a swap paying `amount_in` of the y-side asset.
    pub fn swap_y_for_x(&self, amount_in: Decimal) -> Result<Decimal> {
        CpmmMath::swap_output(amount_in, self.reserve_y, self.reserve_x)
    }

    /// The invariant `k = reserve_x * reserve_y`.
    pub fn constant_product(&self) -> Decimal {
        self.reserve_x * self.reserve_y
    }
}
