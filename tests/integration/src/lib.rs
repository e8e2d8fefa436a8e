//! Test support for end-to-end pool lifecycle runs: an in-memory ledger that
//! both serves reads and settles assembled batches.
//!
//! Settlement is all-or-nothing, like the real ledger: entries are applied to
//! a working copy of the state in order, and the copy is committed only when
//! every entry succeeds. Each transfer debits the entry's signer, so a batch
//! with a wrong signer assignment fails to settle here the same way it would
//! fail co-signing in production.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tidepool_ledger::{
    AtomicBatch, LedgerReader, LedgerTransaction, MetadataEntry, NetworkKind, NetworkParams,
    ProofRecord, SupplyChange,
};
use tidepool_types::{Address, AssetAmount, AssetId, AssetIdentifier, LedgerError};
use tracing::debug;

pub const GENERATION_HASH: &str =
    "57F7DA205008026C776CB6AED843393F04CD458E0AA2D9F1D5F31A402072B2D6";

pub fn testnet_params() -> NetworkParams {
    NetworkParams {
        kind: NetworkKind::Testnet,
        generation_hash: GENERATION_HASH.to_string(),
        epoch_offset: 1_615_853_185,
        fee_asset: AssetIdentifier::new(
            AssetId::from_bytes([0x3A, 0x84, 0x55, 0xCD]),
            Address::new("TFEEOWNERAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"),
        ),
    }
}

/// Route test logs through `RUST_LOG`; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[derive(Default, Clone)]
struct LedgerState {
    supplies: HashMap<AssetIdentifier, u64>,
    balances: HashMap<Address, HashMap<AssetIdentifier, u64>>,
    metadata: HashMap<AssetIdentifier, HashMap<u64, String>>,
    proofs: HashMap<Address, Vec<ProofRecord>>,
}

impl LedgerState {
    fn credit(&mut self, account: &Address, asset: &AssetIdentifier, amount: u64) {
        *self
            .balances
            .entry(account.clone())
            .or_default()
            .entry(asset.clone())
            .or_insert(0) += amount;
    }

    fn debit(&mut self, account: &Address, asset: &AssetIdentifier, amount: u64) -> Result<()> {
        let held = self
            .balances
            .entry(account.clone())
            .or_default()
            .entry(asset.clone())
            .or_insert(0);
        if *held < amount {
            bail!("{account} holds {held} of {asset}, cannot debit {amount}");
        }
        *held -= amount;
        Ok(())
    }
}

/// In-memory ledger: read capability plus batch settlement.
pub struct InMemoryLedger {
    network: NetworkParams,
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    pub fn new(network: NetworkParams) -> Self {
        Self {
            network,
            state: Mutex::new(LedgerState::default()),
        }
    }

    pub fn testnet() -> Self {
        Self::new(testnet_params())
    }

    /// Seed an account with funds outside any batch.
    pub fn credit(&self, account: &Address, amount: &AssetAmount) {
        let mut state = self.state.lock().unwrap();
        state.credit(account, &amount.identifier, amount.amount);
        if !state.supplies.contains_key(&amount.identifier) {
            state.supplies.insert(amount.identifier.clone(), 0);
        }
    }

    pub fn balance(&self, account: &Address, asset: &AssetIdentifier) -> u64 {
        self.state
            .lock()
            .unwrap()
            .balances
            .get(account)
            .and_then(|held| held.get(asset))
            .copied()
            .unwrap_or(0)
    }

    pub fn supply(&self, asset: &AssetIdentifier) -> u64 {
        self.state
            .lock()
            .unwrap()
            .supplies
            .get(asset)
            .copied()
            .unwrap_or(0)
    }

    /// Settle a fully co-signed batch: every entry applies in order or none
    /// do.
    pub fn settle(&self, batch: &AtomicBatch) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let mut working = state.clone();

        for entry in batch.entries() {
            let signer = &entry.signer;
            match &entry.transaction {
                LedgerTransaction::DefineAsset { identifier, .. } => {
                    if identifier.target != *signer {
                        bail!("asset {identifier} can only be defined by its owner");
                    }
                    working.supplies.entry(identifier.clone()).or_insert(0);
                }
                LedgerTransaction::ChangeSupply { asset, delta } => {
                    if asset.target != *signer {
                        bail!("supply of {asset} can only be changed by its owner");
                    }
                    match delta {
                        SupplyChange::Increase(amount) => {
                            *working.supplies.entry(asset.clone()).or_insert(0) += amount;
                            working.credit(signer, asset, *amount);
                        }
                        SupplyChange::Decrease(amount) => {
                            working.debit(signer, asset, *amount)?;
                            let supply = working.supplies.entry(asset.clone()).or_insert(0);
                            if *supply < *amount {
                                bail!("cannot burn {amount} of {asset}, supply is {supply}");
                            }
                            *supply -= amount;
                        }
                    }
                }
                LedgerTransaction::Transfer {
                    recipient,
                    amounts,
                    message,
                } => {
                    for amount in amounts {
                        working.debit(signer, &amount.identifier, amount.amount)?;
                        working.credit(recipient, &amount.identifier, amount.amount);
                    }
                    if let Some(message) = message {
                        working
                            .proofs
                            .entry(recipient.clone())
                            .or_default()
                            .push(ProofRecord {
                                sender: signer.clone(),
                                message: message.clone(),
                            });
                    }
                }
                LedgerTransaction::AttachMetadata {
                    subject,
                    key,
                    value,
                } => {
                    if subject.target != *signer {
                        bail!("metadata on {subject} can only be attached by its owner");
                    }
                    working
                        .metadata
                        .entry(subject.clone())
                        .or_default()
                        .insert(*key, value.clone());
                }
                // Restriction bookkeeping is the real ledger's concern; the
                // mock only validates that the right identity signed it.
                LedgerTransaction::RestrictHoldings { account, .. } => {
                    if account != signer {
                        bail!("holdings of {account} can only be restricted by the account itself");
                    }
                }
            }
        }

        *state = working;
        debug!(entries = batch.len(), "batch settled");
        Ok(())
    }
}

#[async_trait]
impl LedgerReader for InMemoryLedger {
    fn network(&self) -> &NetworkParams {
        &self.network
    }

    async fn asset_supply(&self, asset: &AssetIdentifier) -> Result<u64, LedgerError> {
        self.state
            .lock()
            .unwrap()
            .supplies
            .get(asset)
            .copied()
            .ok_or_else(|| LedgerError::AssetNotFound {
                asset: asset.to_string(),
            })
    }

    async fn account_balances(&self, account: &Address) -> Result<Vec<AssetAmount>, LedgerError> {
        let state = self.state.lock().unwrap();
        let mut held: Vec<AssetAmount> = state
            .balances
            .get(account)
            .map(|assets| {
                assets
                    .iter()
                    .filter(|(_, amount)| **amount > 0)
                    .map(|(asset, amount)| AssetAmount::new(asset.clone(), *amount))
                    .collect()
            })
            .unwrap_or_default();
        held.sort_by(|a, b| a.identifier.id.to_hex().cmp(&b.identifier.id.to_hex()));
        Ok(held)
    }

    async fn asset_metadata(
        &self,
        asset: &AssetIdentifier,
    ) -> Result<Vec<MetadataEntry>, LedgerError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .metadata
            .get(asset)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(key, value)| MetadataEntry {
                        key: *key,
                        value: value.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn incoming_proofs(&self, account: &Address) -> Result<Vec<ProofRecord>, LedgerError> {
        let state = self.state.lock().unwrap();
        Ok(state.proofs.get(account).cloned().unwrap_or_default())
    }
}
