//! Exchange one paired asset for the other against the invariant.

use crate::command::{
    descriptor, Allowance, OperationKind, PoolBinding, PoolOperation, PoolView,
};
use crate::context::{ArgShape, Context};
use crate::ops::{assembly_denied, require_snapshot};
use rust_decimal::Decimal;
use tidepool_amm::{floor_to_unit, CpmmMath};
use tidepool_ledger::{BatchEntry, LedgerTransaction};
use tidepool_types::{AssetAmount, AssetIdentifier, CommandResult};

pub struct Swap {
    binding: PoolBinding,
}

impl Swap {
    pub fn new(binding: PoolBinding) -> Self {
        Self { binding }
    }

    /// Orient the pool around the trade: (input reserve, output side with its
    /// reserve), or `None` when the input is not one of the pool's assets.
    fn orient<'a>(
        snapshot: &'a crate::command::PoolSnapshot,
        input: &AssetIdentifier,
    ) -> Option<(u64, &'a AssetIdentifier, u64)> {
        if input.id == snapshot.x.id {
            Some((snapshot.reserve_x, &snapshot.y, snapshot.reserve_y))
        } else if input.id == snapshot.y.id {
            Some((snapshot.reserve_y, &snapshot.x, snapshot.reserve_x))
        } else {
            None
        }
    }
}

impl PoolOperation for Swap {
    fn kind(&self) -> OperationKind {
        OperationKind::Swap
    }

    fn binding(&self) -> &PoolBinding {
        &self.binding
    }

    fn required_inputs(&self) -> &'static [(&'static str, ArgShape)] {
        &[
            ("trader", ArgShape::Address),
            ("input_x", ArgShape::Amount),
            ("output", ArgShape::Asset),
        ]
    }

    /// Allowed iff a snapshot is present, the input is one pool side with the
    /// output being the other, and `0 < input < input-side reserve`.
    fn allowance(&self, ctx: &Context, view: &PoolView) -> Allowance {
        let Some(snapshot) = view.snapshot.as_ref() else {
            return Allowance::denied("reserve snapshot unavailable");
        };
        let op = self.kind().name();
        let Ok(input) = ctx.inputs.amount(op, "input_x") else {
            return Allowance::denied("swap input is malformed");
        };
        let Ok(output) = ctx.inputs.asset(op, "output") else {
            return Allowance::denied("swap output is malformed");
        };

        let Some((reserve_in, out_side, _)) = Self::orient(snapshot, &input.identifier) else {
            return Allowance::denied("swap input is not one of the pool's paired assets");
        };
        if output != out_side.id {
            return Allowance::denied("swap output must be the opposite paired asset");
        }
        if input.amount == 0 {
            return Allowance::denied("swap input must be positive");
        }
        if input.amount >= reserve_in {
            return Allowance::denied("swap input must be below the pool reserve");
        }
        Allowance::granted()
    }

    fn assemble(&self, ctx: &Context, view: &PoolView) -> CommandResult<Vec<BatchEntry>> {
        let op = self.kind().name();
        let trader = ctx.inputs.address(op, "trader")?.clone();
        let input = ctx.inputs.amount(op, "input_x")?.clone();
        let snapshot = require_snapshot(self.kind(), ctx, view)?;

        let (reserve_in, out_side, reserve_out) = Self::orient(snapshot, &input.identifier)
            .ok_or_else(|| {
                assembly_denied(
                    self.kind(),
                    ctx,
                    anyhow::anyhow!("swap input is not one of the pool's paired assets"),
                )
            })?;

        let output_amount = CpmmMath::swap_output(
            Decimal::from(input.amount),
            Decimal::from(reserve_in),
            Decimal::from(reserve_out),
        )
        .and_then(floor_to_unit)
        .map_err(|e| assembly_denied(self.kind(), ctx, e))?;

        let target = &self.binding.target;
        let proof = descriptor(self.kind(), ctx.revision, &self.binding.shares.id);

        Ok(vec![
            BatchEntry::new(
                LedgerTransaction::Transfer {
                    recipient: target.clone(),
                    amounts: vec![input],
                    message: None,
                },
                trader.clone(),
            ),
            BatchEntry::new(
                LedgerTransaction::Transfer {
                    recipient: trader.clone(),
                    amounts: vec![AssetAmount::new(out_side.clone(), output_amount)],
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
