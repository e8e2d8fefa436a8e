//! Withdraw from a pool by burning shares.
//!
//! The supply change burns out of the target's own balance, so the shares
//! travel provider -> target before the burn; both reserve payouts then flow
//! target -> provider.

use crate::command::{
    descriptor, Allowance, OperationKind, PoolBinding, PoolOperation, PoolView,
};
use crate::context::{ArgShape, Context};
use crate::ops::{assembly_denied, require_snapshot};
use rust_decimal::Decimal;
use tidepool_amm::floor_to_unit;
use tidepool_ledger::{BatchEntry, LedgerTransaction, SupplyChange};
use tidepool_types::{AssetAmount, CommandResult};

pub struct RemoveLiquidity {
    binding: PoolBinding,
}

impl RemoveLiquidity {
    pub fn new(binding: PoolBinding) -> Self {
        Self { binding }
    }
}

impl PoolOperation for RemoveLiquidity {
    fn kind(&self) -> OperationKind {
        OperationKind::RemoveLiquidity
    }

    fn binding(&self) -> &PoolBinding {
        &self.binding
    }

    fn required_inputs(&self) -> &'static [(&'static str, ArgShape)] {
        &[
            ("provider", ArgShape::Address),
            ("input_shares", ArgShape::Quantity),
        ]
    }

    /// Allowed iff a snapshot is present and the provider holds at least the
    /// shares being burned. An unknown holding fails closed.
    fn allowance(&self, ctx: &Context, view: &PoolView) -> Allowance {
        if view.snapshot.is_none() {
            return Allowance::denied("reserve snapshot unavailable");
        }
        let Ok(input_shares) = ctx.inputs.quantity(self.kind().name(), "input_shares") else {
            return Allowance::denied("input_shares is malformed");
        };
        if input_shares == 0 {
            return Allowance::denied("burned share amount must be positive");
        }
        match view.provider_shares {
            None => Allowance::denied("provider share balance unavailable"),
            Some(held) if input_shares > held => {
                Allowance::denied("cannot burn more shares than the provider holds")
            }
            Some(_) => Allowance::granted(),
        }
    }

    fn assemble(&self, ctx: &Context, view: &PoolView) -> CommandResult<Vec<BatchEntry>> {
        let op = self.kind().name();
        let provider = ctx.inputs.address(op, "provider")?.clone();
        let input_shares = ctx.inputs.quantity(op, "input_shares")?;
        let snapshot = require_snapshot(self.kind(), ctx, view)?;

        let (out_x, out_y) = snapshot
            .reserves()
            .withdrawal_amounts(Decimal::from(input_shares))
            .map_err(|e| assembly_denied(self.kind(), ctx, e))?;
        let out_x = floor_to_unit(out_x).map_err(|e| assembly_denied(self.kind(), ctx, e))?;
        let out_y = floor_to_unit(out_y).map_err(|e| assembly_denied(self.kind(), ctx, e))?;

        let target = &self.binding.target;
        let shares = &self.binding.shares;
        let proof = descriptor(self.kind(), ctx.revision, &shares.id);

        Ok(vec![
            // Shares return to the issuer so the burn can debit them.
            BatchEntry::new(
                LedgerTransaction::Transfer {
                    recipient: target.clone(),
                    amounts: vec![AssetAmount::new(shares.clone(), input_shares)],
                    message: None,
                },
                provider.clone(),
            ),
            BatchEntry::new(
                LedgerTransaction::ChangeSupply {
                    asset: shares.clone(),
                    delta: SupplyChange::Decrease(input_shares),
                },
                target.clone(),
            ),
            BatchEntry::new(
                LedgerTransaction::Transfer {
                    recipient: provider.clone(),
                    amounts: vec![AssetAmount::new(snapshot.x.clone(), out_x)],
                    message: None,
                },
                target.clone(),
            ),
            BatchEntry::new(
                LedgerTransaction::Transfer {
                    recipient: provider.clone(),
                    amounts: vec![AssetAmount::new(snapshot.y.clone(), out_y)],
                    message: None,
                },
                target.clone(),
            ),
            BatchEntry::new(
                LedgerTransaction::proof_record(target, proof),
                ctx.actor.clone(),
            ),
        ])
    }
}
