//! Read-only ledger capability consumed by the orchestrator and registry.

use crate::params::NetworkParams;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tidepool_types::{Address, AssetAmount, AssetIdentifier, LedgerError};

/// A scoped key/value record attached to an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub key: u64,
    pub value: String,
}

/// An execution-proof record observed in an account's incoming transfers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRecord {
    pub sender: Address,
    pub message: String,
}

/// Read-only view of the ledger.
///
/// Implementations live outside this workspace (a node REST client, an
/// indexer, a test double). All reads are point-in-time with no ordering
/// guarantee relative to other actors' ledger activity; the framework never
/// retries a failed read.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Identity parameters of the connected network.
    fn network(&self) -> &NetworkParams;

    /// Current total supply of an asset, in smallest units.
    async fn asset_supply(&self, asset: &AssetIdentifier) -> Result<u64, LedgerError>;

    /// Current holdings of an account, one entry per held asset.
    async fn account_balances(&self, account: &Address) -> Result<Vec<AssetAmount>, LedgerError>;

    /// Metadata records attached to an asset.
    async fn asset_metadata(
        &self,
        asset: &AssetIdentifier,
    ) -> Result<Vec<MetadataEntry>, LedgerError>;

    /// Proof records received by an account, newest last.
    async fn incoming_proofs(&self, account: &Address) -> Result<Vec<ProofRecord>, LedgerError>;

    /// Balance of one specific asset held by an account; zero when the
    /// account does not hold it.
    async fn balance_of(
        &self,
        account: &Address,
        asset: &AssetIdentifier,
    ) -> Result<u64, LedgerError> {
        let balances = self.account_balances(account).await?;
        Ok(balances
            .iter()
            .find(|held| &held.identifier == asset)
            .map(|held| held.amount)
            .unwrap_or(0))
    }
}
