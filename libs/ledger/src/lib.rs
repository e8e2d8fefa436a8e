//! # Tidepool Ledger - External Collaborator Surface
//!
//! The boundary between the pool engine and the distributed ledger it
//! computes against. This crate owns two things:
//!
//! - the [`LedgerReader`] capability trait: the read-only view of the ledger
//!   (network identity, asset supply, account balances, metadata, proof
//!   records) that the orchestrator and registry consume. Implementations
//!   live outside this workspace; tests ship an in-memory one.
//! - the batch data model: the ordered `(transaction, signer)` pairs an
//!   operation assembles, wrapped as one unsigned [`AtomicBatch`] that
//!   settles all-or-nothing once co-signed and broadcast out of band.
//!
//! Signing, wire-format encoding and broadcasting are explicitly not here.

pub mod adapter;
pub mod batch;
pub mod params;

pub use adapter::{LedgerReader, MetadataEntry, ProofRecord};
pub use batch::{AtomicBatch, BatchEntry, BatchHandle, LedgerTransaction, SupplyChange};
pub use params::{NetworkKind, NetworkParams, TransactionParameters};
