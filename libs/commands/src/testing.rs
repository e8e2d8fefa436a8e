//! Shared fixtures for the crate's unit tests: a canned in-memory ledger and
//! ready-made bindings, contexts and snapshots.

use crate::command::{PoolBinding, PoolSnapshot};
use crate::context::{Context, Inputs};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tidepool_ledger::{
    LedgerReader, MetadataEntry, NetworkKind, NetworkParams, ProofRecord, TransactionParameters,
};
use tidepool_types::{
    Address, AssetAmount, AssetId, AssetIdentifier, AssetSource, LedgerError,
};

pub(crate) const TARGET: &str = "TPOOLTARGETAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
pub(crate) const GENERATION_HASH: &str =
    "57F7DA205008026C776CB6AED843393F04CD458E0AA2D9F1D5F31A402072B2D6";

pub(crate) fn fee_asset() -> AssetIdentifier {
    AssetIdentifier::new(
        AssetId::from_bytes([0x3A, 0x84, 0x55, 0xCD]),
        Address::new("TFEEOWNERAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"),
    )
}

pub(crate) fn x_asset() -> AssetIdentifier {
    AssetIdentifier::new(
        AssetId::from_bytes([0x01, 0x02, 0x03, 0x04]),
        Address::new("TXOWNERAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"),
    )
}

pub(crate) fn y_asset() -> AssetIdentifier {
    AssetIdentifier::new(
        AssetId::from_bytes([0x05, 0x06, 0x07, 0x08]),
        Address::new("TYOWNERAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"),
    )
}

pub(crate) fn test_network() -> NetworkParams {
    NetworkParams {
        kind: NetworkKind::Testnet,
        generation_hash: GENERATION_HASH.to_string(),
        epoch_offset: 1_615_853_185,
        fee_asset: fee_asset(),
    }
}

pub(crate) fn test_binding() -> PoolBinding {
    PoolBinding::derive(
        "surfer:xym",
        Address::new(TARGET),
        AssetSource::new(GENERATION_HASH),
    )
}

/// Balanced 10:10 pool with the canonical 10M share supply.
pub(crate) fn test_snapshot() -> PoolSnapshot {
    PoolSnapshot {
        shares_supply: 10_000_000,
        x: x_asset(),
        reserve_x: 10,
        y: y_asset(),
        reserve_y: 10,
    }
}

/// In-memory ledger with canned responses and an injectable failure switch.
#[derive(Default)]
pub(crate) struct StaticLedger {
    pub network: Option<NetworkParams>,
    pub supplies: HashMap<AssetIdentifier, u64>,
    pub balances: HashMap<Address, Vec<AssetAmount>>,
    pub metadata: HashMap<AssetIdentifier, Vec<MetadataEntry>>,
    pub proofs: HashMap<Address, Vec<ProofRecord>>,
    pub fail_reads: bool,
}

impl StaticLedger {
    pub(crate) fn new() -> Self {
        Self {
            network: Some(test_network()),
            ..Self::default()
        }
    }

    fn guard(&self) -> Result<(), LedgerError> {
        if self.fail_reads {
            Err(LedgerError::ReadFailed("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LedgerReader for StaticLedger {
    fn network(&self) -> &NetworkParams {
        self.network.as_ref().unwrap()
    }

    async fn asset_supply(&self, asset: &AssetIdentifier) -> Result<u64, LedgerError> {
        self.guard()?;
        self.supplies
            .get(asset)
            .copied()
            .ok_or_else(|| LedgerError::AssetNotFound {
                asset: asset.to_string(),
            })
    }

    async fn account_balances(&self, account: &Address) -> Result<Vec<AssetAmount>, LedgerError> {
        self.guard()?;
        Ok(self.balances.get(account).cloned().unwrap_or_default())
    }

    async fn asset_metadata(
        &self,
        asset: &AssetIdentifier,
    ) -> Result<Vec<MetadataEntry>, LedgerError> {
        self.guard()?;
        Ok(self.metadata.get(asset).cloned().unwrap_or_default())
    }

    async fn incoming_proofs(&self, account: &Address) -> Result<Vec<ProofRecord>, LedgerError> {
        self.guard()?;
        Ok(self.proofs.get(account).cloned().unwrap_or_default())
    }
}

pub(crate) fn test_context(
    actor: Address,
    inputs: Inputs,
    parameters: TransactionParameters,
) -> Context {
    test_context_with(Arc::new(StaticLedger::new()), actor, inputs, parameters)
}

pub(crate) fn test_context_with(
    reader: Arc<StaticLedger>,
    actor: Address,
    inputs: Inputs,
    parameters: TransactionParameters,
) -> Context {
    Context::new(1, actor, reader, parameters, inputs)
}
