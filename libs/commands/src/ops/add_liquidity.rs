//! Deposit into an existing pool.

use crate::command::{
    descriptor, Allowance, OperationKind, PoolBinding, PoolOperation, PoolView,
};
use crate::context::{ArgShape, Context};
use crate::ops::{assembly_denied, require_snapshot};
use rust_decimal::Decimal;
use tidepool_amm::floor_to_unit;
use tidepool_ledger::{BatchEntry, LedgerTransaction, SupplyChange};
use tidepool_types::{AssetAmount, CommandResult};

pub struct AddLiquidity {
    binding: PoolBinding,
}

impl AddLiquidity {
    pub fn new(binding: PoolBinding) -> Self {
        Self { binding }
    }
}

impl PoolOperation for AddLiquidity {
    fn kind(&self) -> OperationKind {
        OperationKind::AddLiquidity
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

    /// Allowed whenever a supply/reserve snapshot is present.
    fn allowance(&self, _ctx: &Context, view: &PoolView) -> Allowance {
        if view.snapshot.is_some() {
            Allowance::granted()
        } else {
            Allowance::denied("reserve snapshot unavailable")
        }
    }

    fn assemble(&self, ctx: &Context, view: &PoolView) -> CommandResult<Vec<BatchEntry>> {
        let op = self.kind().name();
        let provider = ctx.inputs.address(op, "provider")?.clone();
        let input_x = ctx.inputs.amount(op, "input_x")?.clone();
        let input_y = ctx.inputs.amount(op, "input_y")?.clone();
        let snapshot = require_snapshot(self.kind(), ctx, view)?;

        if input_x.identifier.id != snapshot.x.id || input_y.identifier.id != snapshot.y.id {
            return Err(assembly_denied(
                self.kind(),
                ctx,
                anyhow::anyhow!("deposit sides do not match the pool's paired assets"),
            ));
        }

        let minted = snapshot
            .reserves()
            .deposit_shares(Decimal::from(input_x.amount), Decimal::from(input_y.amount))
            .and_then(floor_to_unit)
            .map_err(|e| assembly_denied(self.kind(), ctx, e))?;

        let target = &self.binding.target;
        let shares = &self.binding.shares;
        let proof = descriptor(self.kind(), ctx.revision, &shares.id);

        Ok(vec![
            BatchEntry::new(
                LedgerTransaction::ChangeSupply {
                    asset: shares.clone(),
                    delta: SupplyChange::Increase(minted),
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
