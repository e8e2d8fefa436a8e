//! # Tidepool AMM Library - Constant-Product Pool Mathematics
//!
//! ## Purpose
//!
//! Pure arithmetic for constant-product (`x * y = k`) liquidity pools:
//! initial share issuance, pro-rata deposit and withdrawal quantities, and
//! swap output amounts. All calculations use `Decimal` arithmetic so
//! financial quantities carry no floating-point precision loss; callers
//! floor results to integer ledger units at the boundary.
//!
//! ## Integration Points
//!
//! - **Input Sources**: supply/reserve snapshots read from the ledger by the
//!   pool orchestrator
//! - **Output Destinations**: the pool operation set, which turns computed
//!   quantities into transfer and supply-change transactions
//! - **Precision**: exact `Decimal` arithmetic, Newton's method square root
//!
//! The published formulas are fee-less: no trading fee is deducted from swap
//! or deposit quantities. Fee accrual is a documented gap of the source
//! system, not an omission of this crate.

pub mod cpmm;
pub mod reserves;

pub use cpmm::{floor_to_unit, CpmmMath, SHARE_SCALE};
pub use reserves::PoolReserves;

/// Common types for AMM calculations
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
