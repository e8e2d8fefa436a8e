//! Asset amounts as they appear in assembled transactions.

use crate::identifiers::AssetIdentifier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A quantity of a concrete asset, in the asset's smallest indivisible unit.
///
/// Amounts are plain non-negative integers; fractional quantities produced by
/// the math engine are floored before they reach an `AssetAmount` so the pool
/// never pays out more than the invariant allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAmount {
    pub identifier: AssetIdentifier,
    pub amount: u64,
}

impl AssetAmount {
    pub fn new(identifier: AssetIdentifier, amount: u64) -> Self {
        Self { identifier, amount }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl fmt::Display for AssetAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.identifier)
    }
}
