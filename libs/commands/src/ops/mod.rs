//! The five pool operations.
//!
//! Each operation declares its argument schema, its allowance predicate and
//! its ordered transaction list; the shared state machine in
//! [`crate::command`] drives them. Construction goes through the static
//! [`operation_for`] table.

mod add_liquidity;
mod create;
mod publish;
mod remove_liquidity;
mod swap;

pub use add_liquidity::AddLiquidity;
pub use create::CreatePool;
pub use publish::Publish;
pub use remove_liquidity::RemoveLiquidity;
pub use swap::Swap;

use crate::command::{OperationKind, PoolBinding, PoolOperation, PoolSnapshot, PoolView};
use crate::context::Context;
use tidepool_types::{CommandError, CommandResult};

/// Static operation table: kind to constructor, no dynamic registry.
pub fn operation_for(kind: OperationKind, binding: PoolBinding) -> Box<dyn PoolOperation> {
    match kind {
        OperationKind::CreatePool => Box::new(CreatePool::new(binding)),
        OperationKind::AddLiquidity => Box::new(AddLiquidity::new(binding)),
        OperationKind::RemoveLiquidity => Box::new(RemoveLiquidity::new(binding)),
        OperationKind::Swap => Box::new(Swap::new(binding)),
        OperationKind::Publish => Box::new(Publish::new(binding)),
    }
}

/// A condition discovered during assembly that the allowance predicate would
/// have denied. Reported with the same error kind a denial produces.
pub(crate) fn assembly_denied(
    kind: OperationKind,
    ctx: &Context,
    error: anyhow::Error,
) -> CommandError {
    CommandError::OperationForbidden {
        operation: kind.name().to_string(),
        actor: ctx.actor.to_string(),
        reason: error.to_string(),
    }
}

/// Snapshot access for assembly paths that require one.
pub(crate) fn require_snapshot<'a>(
    kind: OperationKind,
    ctx: &Context,
    view: &'a PoolView,
) -> CommandResult<&'a PoolSnapshot> {
    view.snapshot.as_ref().ok_or_else(|| {
        assembly_denied(kind, ctx, anyhow::anyhow!("reserve snapshot unavailable"))
    })
}
