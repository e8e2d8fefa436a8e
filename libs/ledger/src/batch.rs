//! The unsigned atomic batch assembled by pool operations.
//!
//! A batch is an ordered sequence of `(transaction, signer)` pairs. Once
//! broadcast and fully co-signed, all entries settle or none do. The batch
//! leaves this workspace unsigned; signer assignment is the contract the
//! assembling operation must get right: every transfer that debits an
//! identity is signed by that identity, and every definition, supply,
//! metadata or restriction change on the target's namespace is signed by the
//! target. Reordering entries without re-deriving signers is unsafe.

use crate::params::{NetworkParams, TransactionParameters};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use tidepool_types::{Address, AssetAmount, AssetIdentifier, LedgerError};

/// Direction and magnitude of a shares-supply change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplyChange {
    Increase(u64),
    Decrease(u64),
}

/// One ledger sub-operation as emitted by a pool operation.
///
/// The sender of a [`LedgerTransaction::Transfer`] is implicit: it is the
/// entry's signer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerTransaction {
    /// Define a new asset under the signer's namespace.
    DefineAsset {
        identifier: AssetIdentifier,
        /// Whether holders may pass the asset around outside pool
        /// operations. Pool shares are not transferable by trade.
        transferable: bool,
    },

    /// Mint or burn supply of an asset owned by the signer.
    ChangeSupply {
        asset: AssetIdentifier,
        delta: SupplyChange,
    },

    /// Move amounts from the signer to `recipient`, optionally carrying a
    /// plain-text message.
    Transfer {
        recipient: Address,
        amounts: Vec<AssetAmount>,
        message: Option<String>,
    },

    /// Attach a scoped key/value record to an asset in the signer's
    /// namespace.
    AttachMetadata {
        subject: AssetIdentifier,
        key: u64,
        value: String,
    },

    /// Restrict which assets `account` may ever hold.
    RestrictHoldings {
        account: Address,
        allowed: Vec<AssetIdentifier>,
    },
}

impl LedgerTransaction {
    /// An execution-proof record: a zero-amount transfer carrying the
    /// operation descriptor as its message.
    pub fn proof_record(recipient: &Address, descriptor: impl Into<String>) -> Self {
        Self::Transfer {
            recipient: recipient.clone(),
            amounts: Vec::new(),
            message: Some(descriptor.into()),
        }
    }
}

/// A transaction paired with the identity that must sign it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub transaction: LedgerTransaction,
    pub signer: Address,
}

impl BatchEntry {
    pub fn new(transaction: LedgerTransaction, signer: Address) -> Self {
        Self { transaction, signer }
    }
}

/// An ordered, all-or-nothing set of ledger operations, left unsigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicBatch {
    entries: Vec<BatchEntry>,
    network: NetworkParams,
    parameters: TransactionParameters,
}

impl AtomicBatch {
    pub fn new(
        entries: Vec<BatchEntry>,
        network: NetworkParams,
        parameters: TransactionParameters,
    ) -> Self {
        Self {
            entries,
            network,
            parameters,
        }
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn network(&self) -> &NetworkParams {
        &self.network
    }

    pub fn parameters(&self) -> &TransactionParameters {
        &self.parameters
    }

    /// Distinct identities whose co-signatures the batch requires, in order
    /// of first appearance.
    pub fn required_signers(&self) -> Vec<&Address> {
        let mut signers: Vec<&Address> = Vec::new();
        for entry in &self.entries {
            if !signers.contains(&&entry.signer) {
                signers.push(&entry.signer);
            }
        }
        signers
    }

    /// Opaque shareable handle for out-of-band signing.
    ///
    /// The encoding here (JSON + base64) is a placeholder for the ledger
    /// SDK's own transaction URI format; only the logical ordered content is
    /// contractual.
    pub fn handle(&self) -> Result<BatchHandle, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        Ok(BatchHandle(
            base64::engine::general_purpose::STANDARD.encode(json),
        ))
    }
}

/// Serializable handle to an assembled batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchHandle(String);

impl BatchHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover the logical batch content from a handle.
    pub fn decode(&self) -> Result<AtomicBatch, LedgerError> {
        let json = base64::engine::general_purpose::STANDARD
            .decode(&self.0)
            .map_err(|e| LedgerError::MalformedResponse(format!("handle is not base64: {e}")))?;
        serde_json::from_slice(&json)
            .map_err(|e| LedgerError::MalformedResponse(format!("handle payload is malformed: {e}")))
    }
}

impl fmt::Display for BatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
