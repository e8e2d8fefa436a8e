//! Pool creation.
//!
//! The only operation that runs without a reserve snapshot: the pool does
//! not exist yet. It issues the shares asset, attaches the three metadata
//! records the registry later reads back, locks the target identity down to
//! the four assets a pool may ever hold, seeds both reserves from the
//! provider and hands the provider the initial shares.

use crate::command::{
    descriptor, Allowance, OperationKind, PoolBinding, PoolOperation, PoolView,
};
use crate::context::{ArgShape, Context};
use crate::ops::assembly_denied;
use rust_decimal::Decimal;
use tidepool_amm::{floor_to_unit, CpmmMath};
use tidepool_ledger::{BatchEntry, LedgerTransaction, SupplyChange};
use tidepool_types::{pool_id_key, x_id_key, y_id_key, AssetAmount, CommandResult};

pub struct CreatePool {
    binding: PoolBinding,
}

impl CreatePool {
    pub fn new(binding: PoolBinding) -> Self {
        Self { binding }
    }
}

impl PoolOperation for CreatePool {
    fn kind(&self) -> OperationKind {
        OperationKind::CreatePool
    }

    fn binding(&self) -> &PoolBinding {
        &self.binding
    }

    fn required_inputs(&self) -> &'static [(&'static str, ArgShape)] {
        &[
            ("provider", ArgShape::Address),
            ("input_x", ArgShape::Amount),
            ("input_y", ArgShape::Amount),
        ]
    }

    /// Anyone may create a pool.
    fn allowance(&self, _ctx: &Context, _view: &PoolView) -> Allowance {
        Allowance::granted()
    }

    fn assemble(&self, ctx: &Context, _view: &PoolView) -> CommandResult<Vec<BatchEntry>> {
        let op = self.kind().name();
        let provider = ctx.inputs.address(op, "provider")?.clone();
        let input_x = ctx.inputs.amount(op, "input_x")?.clone();
        let input_y = ctx.inputs.amount(op, "input_y")?.clone();

        let minted = CpmmMath::initial_shares(
            Decimal::from(input_x.amount),
            Decimal::from(input_y.amount),
        )
        .and_then(floor_to_unit)
        .map_err(|e| assembly_denied(self.kind(), ctx, e))?;

        let target = &self.binding.target;
        let shares = &self.binding.shares;
        let fee_asset = ctx.reader.network().fee_asset.clone();
        let proof = descriptor(self.kind(), ctx.revision, &shares.id);

        Ok(vec![
            // Issue the shares asset under the target's namespace.
            BatchEntry::new(
                LedgerTransaction::DefineAsset {
                    identifier: shares.clone(),
                    transferable: false,
                },
                target.clone(),
            ),
            BatchEntry::new(
                LedgerTransaction::ChangeSupply {
                    asset: shares.clone(),
                    delta: SupplyChange::Increase(minted),
                },
                target.clone(),
            ),
            // The three records the registry reads back at listing time.
            BatchEntry::new(
                LedgerTransaction::AttachMetadata {
                    subject: shares.clone(),
                    key: pool_id_key(),
                    value: shares.id.to_hex(),
                },
                target.clone(),
            ),
            BatchEntry::new(
                LedgerTransaction::AttachMetadata {
                    subject: shares.clone(),
                    key: x_id_key(),
                    value: input_x.identifier.id.to_hex(),
                },
                target.clone(),
            ),
            BatchEntry::new(
                LedgerTransaction::AttachMetadata {
                    subject: shares.clone(),
                    key: y_id_key(),
                    value: input_y.identifier.id.to_hex(),
                },
                target.clone(),
            ),
            // The target may only ever hold shares, fee and the two paired
            // assets.
            BatchEntry::new(
                LedgerTransaction::RestrictHoldings {
                    account: target.clone(),
                    allowed: vec![
                        shares.clone(),
                        fee_asset,
                        input_x.identifier.clone(),
                        input_y.identifier.clone(),
                    ],
                },
                target.clone(),
            ),
            BatchEntry::new(
                LedgerTransaction::Transfer {
                    recipient: provider.clone(),
                    amounts: vec![AssetAmount::new(shares.clone(), minted)],
                    message: None,
                },
                target.clone(),
            ),
            BatchEntry::new(
                LedgerTransaction::Transfer {
                    recipient: target.clone(),
                    amounts: vec![input_x],
                    message: None,
                },
                provider.clone(),
            ),
            BatchEntry::new(
                LedgerTransaction::Transfer {
                    recipient: target.clone(),
                    amounts: vec![input_y],
                    message: None,
                },
                provider.clone(),
            ),
            BatchEntry::new(
                LedgerTransaction::proof_record(target, proof),
                ctx.actor.clone(),
            ),
        ])
    }
}
