//! Published-pool registry.
//!
//! Pools announce themselves by sending a publish proof record to a
//! well-known collector identity. Listing scans the collector's incoming
//! records for the publish descriptor prefix, recovers each shares-asset id
//! and reads back the three creation-time metadata records to reconstruct
//! the full pool info. Records that fail to resolve are skipped, not fatal.

use crate::command::{OperationKind, STANDARD_NAME};
use crate::orchestrator::DEFAULT_REVISION;
use futures::future::join_all;
use std::sync::Arc;
use tidepool_ledger::LedgerReader;
use tidepool_types::{
    pool_id_key, x_id_key, y_id_key, Address, AssetId, AssetIdentifier, LedgerError,
};
use tracing::{debug, warn};

/// A pool reconstructed from its publish record and creation metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolListing {
    pub target: Address,
    pub shares: AssetIdentifier,
    pub x_id: AssetId,
    pub y_id: AssetId,
}

pub struct PoolRegistry {
    collector: Address,
    reader: Arc<dyn LedgerReader>,
    revision: u32,
}

impl PoolRegistry {
    pub fn new(collector: Address, reader: Arc<dyn LedgerReader>) -> Self {
        Self::with_revision(collector, reader, DEFAULT_REVISION)
    }

    pub fn with_revision(collector: Address, reader: Arc<dyn LedgerReader>, revision: u32) -> Self {
        Self {
            collector,
            reader,
            revision,
        }
    }

    /// The exact prefix a publish descriptor carries for this revision.
    fn publish_prefix(&self) -> String {
        format!(
            "{STANDARD_NAME}(v{}):{}:",
            self.revision,
            OperationKind::Publish.name()
        )
    }

    /// All pools that have published to the collector, deduplicated.
    pub async fn list(&self) -> Result<Vec<PoolListing>, LedgerError> {
        let proofs = self.reader.incoming_proofs(&self.collector).await?;
        let prefix = self.publish_prefix();

        let mut candidates: Vec<(Address, AssetId)> = Vec::new();
        for proof in &proofs {
            let Some(id_hex) = proof.message.strip_prefix(&prefix) else {
                continue;
            };
            match AssetId::from_hex(id_hex) {
                Ok(id) => {
                    let candidate = (proof.sender.clone(), id);
                    if !candidates.contains(&candidate) {
                        candidates.push(candidate);
                    }
                }
                Err(error) => {
                    warn!(sender = %proof.sender, %error, "ignoring malformed publish record");
                }
            }
        }
        debug!(
            collector = %self.collector,
            candidates = candidates.len(),
            "resolving published pools"
        );

        let resolved = join_all(
            candidates
                .into_iter()
                .map(|(target, id)| self.resolve(target, id)),
        )
        .await;
        Ok(resolved.into_iter().flatten().collect())
    }

    /// Read back the three creation-time metadata records for one candidate.
    async fn resolve(&self, target: Address, shares_id: AssetId) -> Option<PoolListing> {
        let shares = AssetIdentifier::new(shares_id, target.clone());
        let entries = match self.reader.asset_metadata(&shares).await {
            Ok(entries) => entries,
            Err(error) => {
                warn!(%shares, %error, "skipping pool with unreadable metadata");
                return None;
            }
        };

        let find = |key: u64| {
            entries
                .iter()
                .find(|entry| entry.key == key)
                .and_then(|entry| AssetId::from_hex(&entry.value).ok())
        };
        let (Some(pool_id), Some(x_id), Some(y_id)) =
            (find(pool_id_key()), find(x_id_key()), find(y_id_key()))
        else {
            warn!(%shares, "skipping pool with incomplete metadata");
            return None;
        };
        if pool_id != shares_id {
            warn!(%shares, "skipping pool whose metadata contradicts its published id");
            return None;
        }

        Some(PoolListing {
            target,
            shares,
            x_id,
            y_id,
        })
    }
}
