//! # Tidepool Types - Shared Identifier and Amount System
//!
//! Foundational types for the Tidepool pool-operation builder: deterministic
//! asset identifiers, ledger addresses, asset amounts, the fixed metadata key
//! scheme shared between pool creation and the registry, and the error
//! contract of the command framework.
//!
//! Identifiers here are registry-free: the 4-byte asset id is derived by
//! hashing the `(target, source, name)` triple, so any party holding the same
//! triple computes the same id without coordination.

pub mod amounts;
pub mod errors;
pub mod identifiers;
pub mod metadata;

pub use amounts::AssetAmount;
pub use errors::{CommandError, CommandResult, LedgerError};
pub use identifiers::{derive_asset_id, Address, AssetId, AssetIdentifier, AssetSource};
pub use metadata::{metadata_key, pool_id_key, x_id_key, y_id_key};
