//! Self-publication to a registry collector.
//!
//! A single proof record sent to the registry identity. The descriptor names
//! the pool's shares-asset id; the registry's prefix filter recovers it.

use crate::command::{
    descriptor, OperationKind, PoolBinding, PoolOperation, PoolView,
};
use crate::context::{ArgShape, Context};
use tidepool_ledger::{BatchEntry, LedgerTransaction};
use tidepool_types::CommandResult;

pub struct Publish {
    binding: PoolBinding,
}

impl Publish {
    pub fn new(binding: PoolBinding) -> Self {
        Self { binding }
    }
}

impl PoolOperation for Publish {
    fn kind(&self) -> OperationKind {
        OperationKind::Publish
    }

    fn binding(&self) -> &PoolBinding {
        &self.binding
    }

    fn required_inputs(&self) -> &'static [(&'static str, ArgShape)] {
        &[("registry", ArgShape::Address)]
    }

    // Default allowance: only the pool's target identity may publish.

    fn assemble(&self, ctx: &Context, _view: &PoolView) -> CommandResult<Vec<BatchEntry>> {
        let op = self.kind().name();
        let registry = ctx.inputs.address(op, "registry")?.clone();
        let proof = descriptor(self.kind(), ctx.revision, &self.binding.shares.id);

        Ok(vec![BatchEntry::new(
            LedgerTransaction::proof_record(&registry, proof),
            self.binding.target.clone(),
        )])
    }
}
