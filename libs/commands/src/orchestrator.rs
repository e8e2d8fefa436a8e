//! Pool orchestrator.
//!
//! Binds a pool name, target identity and ledger reader together, derives
//! the shares asset once, keeps the read-state snapshot fresh and drives
//! dispatch through the static operation table. The online entry points
//! refresh the snapshot first; the offline ones use whatever snapshot is
//! already held, which is how snapshot-free operations (creation, publish)
//! run without touching the ledger.

use crate::command::{self, Allowance, OperationKind, PoolBinding, PoolSnapshot, PoolView};
use crate::context::{ArgValue, Context, Inputs};
use crate::ops::operation_for;
use std::sync::Arc;
use tidepool_ledger::{AtomicBatch, LedgerReader, MetadataEntry, TransactionParameters};
use tidepool_types::{
    x_id_key, y_id_key, Address, AssetAmount, AssetId, AssetIdentifier, AssetSource,
    CommandResult, LedgerError,
};
use tracing::{debug, warn};

/// Framework revision stamped into descriptors until a format change bumps it.
pub const DEFAULT_REVISION: u32 = 1;

pub struct Pool {
    binding: PoolBinding,
    reader: Arc<dyn LedgerReader>,
    revision: u32,
    snapshot: Option<PoolSnapshot>,
}

impl Pool {
    pub fn new(name: impl Into<String>, target: Address, reader: Arc<dyn LedgerReader>) -> Self {
        Self::with_revision(name, target, reader, DEFAULT_REVISION)
    }

    pub fn with_revision(
        name: impl Into<String>,
        target: Address,
        reader: Arc<dyn LedgerReader>,
        revision: u32,
    ) -> Self {
        let source = AssetSource::new(reader.network().generation_hash.clone());
        let binding = PoolBinding::derive(name, target, source);
        Self {
            binding,
            reader,
            revision,
            snapshot: None,
        }
    }

    pub fn binding(&self) -> &PoolBinding {
        &self.binding
    }

    pub fn shares_asset(&self) -> &AssetIdentifier {
        &self.binding.shares
    }

    pub fn snapshot(&self) -> Option<&PoolSnapshot> {
        self.snapshot.as_ref()
    }

    /// Best-effort snapshot refresh.
    ///
    /// A failed read is swallowed: the previous snapshot (possibly none, on a
    /// first call) stays in place and operations that require reserve state
    /// fail closed at their allowance check.
    pub async fn synchronize(&mut self) {
        match self.read_snapshot().await {
            Ok(snapshot) => {
                debug!(
                    pool = %self.binding.name,
                    supply = snapshot.shares_supply,
                    reserve_x = snapshot.reserve_x,
                    reserve_y = snapshot.reserve_y,
                    "snapshot refreshed"
                );
                self.snapshot = Some(snapshot);
            }
            Err(error) => {
                warn!(
                    pool = %self.binding.name,
                    %error,
                    "snapshot refresh failed, keeping previous state"
                );
            }
        }
    }

    async fn read_snapshot(&self) -> Result<PoolSnapshot, LedgerError> {
        let shares = &self.binding.shares;
        let metadata = self.reader.asset_metadata(shares).await?;
        let x_id = Self::metadata_id(&metadata, x_id_key()).ok_or_else(|| {
            LedgerError::MalformedResponse("pool metadata is missing the x-asset id".to_string())
        })?;
        let y_id = Self::metadata_id(&metadata, y_id_key()).ok_or_else(|| {
            LedgerError::MalformedResponse("pool metadata is missing the y-asset id".to_string())
        })?;

        let shares_supply = self.reader.asset_supply(shares).await?;
        let balances = self.reader.account_balances(&self.binding.target).await?;
        let x = Self::reserve_entry(&balances, x_id).ok_or_else(|| {
            LedgerError::MalformedResponse("pool target holds no x-side reserve".to_string())
        })?;
        let y = Self::reserve_entry(&balances, y_id).ok_or_else(|| {
            LedgerError::MalformedResponse("pool target holds no y-side reserve".to_string())
        })?;

        Ok(PoolSnapshot {
            shares_supply,
            x: x.identifier.clone(),
            reserve_x: x.amount,
            y: y.identifier.clone(),
            reserve_y: y.amount,
        })
    }

    fn metadata_id(entries: &[MetadataEntry], key: u64) -> Option<AssetId> {
        entries
            .iter()
            .find(|entry| entry.key == key)
            .and_then(|entry| AssetId::from_hex(&entry.value).ok())
    }

    fn reserve_entry(balances: &[AssetAmount], id: AssetId) -> Option<&AssetAmount> {
        balances.iter().find(|held| held.identifier.id == id)
    }

    /// Online allowance check: refreshes the snapshot, then runs the
    /// operation's argument and allowance validation.
    pub async fn can_execute(
        &mut self,
        actor: &Address,
        kind: OperationKind,
        inputs: Inputs,
    ) -> CommandResult<Allowance> {
        self.synchronize().await;
        let view = self.view_online(kind, &inputs).await;
        let operation = operation_for(kind, self.binding.clone());
        let ctx = Context::new(
            self.revision,
            actor.clone(),
            Arc::clone(&self.reader),
            TransactionParameters::default(),
            inputs,
        );
        command::can_execute(operation.as_ref(), &ctx, &view)
    }

    /// Online execution: refresh the snapshot, then dispatch.
    pub async fn execute(
        &mut self,
        actor: &Address,
        kind: OperationKind,
        inputs: Inputs,
        parameters: TransactionParameters,
    ) -> CommandResult<AtomicBatch> {
        self.synchronize().await;
        let view = self.view_online(kind, &inputs).await;
        self.dispatch(actor, kind, inputs, parameters, view)
    }

    /// Offline execution: no synchronization, no ledger reads; uses the
    /// snapshot already held, if any.
    pub fn execute_offline(
        &self,
        actor: &Address,
        kind: OperationKind,
        inputs: Inputs,
        parameters: TransactionParameters,
    ) -> CommandResult<AtomicBatch> {
        self.dispatch(actor, kind, inputs, parameters, self.view_offline())
    }

    /// String entry point. An unknown operation name is fatal, never
    /// silently ignored.
    pub async fn execute_named(
        &mut self,
        actor: &Address,
        name: &str,
        inputs: Inputs,
        parameters: TransactionParameters,
    ) -> CommandResult<AtomicBatch> {
        let kind: OperationKind = name.parse()?;
        self.execute(actor, kind, inputs, parameters).await
    }

    /// Assemble the creation batch for this pool.
    pub fn create(
        &self,
        actor: &Address,
        provider: Address,
        input_x: AssetAmount,
        input_y: AssetAmount,
        parameters: TransactionParameters,
    ) -> CommandResult<AtomicBatch> {
        let inputs = Inputs::new()
            .with("provider", provider)
            .with("input_x", input_x)
            .with("input_y", input_y);
        self.execute_offline(actor, OperationKind::CreatePool, inputs, parameters)
    }

    /// Assemble the self-publication record for a registry collector.
    pub fn publish(
        &self,
        actor: &Address,
        registry: Address,
        parameters: TransactionParameters,
    ) -> CommandResult<AtomicBatch> {
        let inputs = Inputs::new().with("registry", registry);
        self.execute_offline(actor, OperationKind::Publish, inputs, parameters)
    }

    fn dispatch(
        &self,
        actor: &Address,
        kind: OperationKind,
        inputs: Inputs,
        parameters: TransactionParameters,
        view: PoolView,
    ) -> CommandResult<AtomicBatch> {
        let operation = operation_for(kind, self.binding.clone());
        let ctx = Context::new(
            self.revision,
            actor.clone(),
            Arc::clone(&self.reader),
            parameters,
            inputs,
        );
        command::execute(operation.as_ref(), &ctx, &view)
    }

    /// View for an online dispatch: the held snapshot, plus the provider's
    /// share balance where the operation checks holdings. A failed balance
    /// read fails closed.
    async fn view_online(&self, kind: OperationKind, inputs: &Inputs) -> PoolView {
        let provider_shares = if kind == OperationKind::RemoveLiquidity {
            match inputs.get("provider") {
                Some(ArgValue::Address(provider)) => {
                    match self.reader.balance_of(provider, &self.binding.shares).await {
                        Ok(balance) => Some(balance),
                        Err(error) => {
                            warn!(
                                pool = %self.binding.name,
                                %error,
                                "share balance read failed, failing closed"
                            );
                            None
                        }
                    }
                }
                _ => None,
            }
        } else {
            None
        };

        PoolView {
            snapshot: self.snapshot.clone(),
            provider_shares,
        }
    }

    fn view_offline(&self) -> PoolView {
        PoolView {
            snapshot: self.snapshot.clone(),
            provider_shares: None,
        }
    }
}
