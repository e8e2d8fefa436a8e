//! # Tidepool Commands - Pool Operation Framework
//!
//! ## Purpose
//!
//! The command execution framework around the constant-product engine: turns
//! a named operation plus arguments into a deterministically ordered,
//! correctly-signed, unsigned atomic batch of ledger operations. Per-call
//! execution contexts, a shared authorization/assembly state machine, the
//! five pool operations, the orchestrator that binds a pool to a ledger
//! reader, and the registry that lists self-published pools.
//!
//! ## Integration Points
//!
//! - **Input Sources**: named [`context::Inputs`], supply/reserve snapshots
//!   read through [`tidepool_ledger::LedgerReader`]
//! - **Output Destinations**: unsigned [`tidepool_ledger::AtomicBatch`]
//!   handles, signed and broadcast out of band
//! - **Authorization**: every dispatch validates its argument schema, then
//!   its allowance predicate, before any transaction is produced
//!
//! Execution is all-or-nothing by construction: a batch either assembles
//! completely or an error is raised; partially-assembled output never
//! escapes.

pub mod command;
pub mod context;
pub mod ops;
pub mod orchestrator;
pub mod registry;

#[cfg(test)]
mod testing;

pub use command::{
    can_execute, descriptor, execute, Allowance, OperationKind, PoolBinding, PoolOperation,
    PoolSnapshot, PoolView, STANDARD_NAME,
};
pub use context::{ArgShape, ArgValue, Context, Inputs};
pub use ops::{operation_for, AddLiquidity, CreatePool, Publish, RemoveLiquidity, Swap};
pub use orchestrator::{Pool, DEFAULT_REVISION};
pub use registry::{PoolListing, PoolRegistry};
