//! Operation contract and the shared authorization/execution state machine.
//!
//! Every pool operation moves through the same states:
//! `Unchecked -> Authorized -> Assembled -> Executed`, or `Unchecked ->
//! Rejected` (terminal). The transitions live in two free functions,
//! [`can_execute`] and [`execute`], parameterized over any [`PoolOperation`];
//! operations themselves only declare their mandatory arguments, their
//! allowance predicate and their ordered transaction list.
//!
//! The framework's output boundary is an unsigned atomic batch. Nothing here
//! signs or broadcasts.

use crate::context::{ArgShape, Context};
use std::fmt;
use std::str::FromStr;
use tidepool_amm::PoolReserves;
use tidepool_ledger::{AtomicBatch, BatchEntry};
use tidepool_types::{
    derive_asset_id, Address, AssetId, AssetIdentifier, AssetSource, CommandError, CommandResult,
};

/// Standard name embedded in every operation descriptor.
pub const STANDARD_NAME: &str = "tidepool";

/// The closed set of pool operations.
///
/// Dispatch goes through this enum rather than a dynamic name registry;
/// the string entry point fails with a typed [`CommandError::InvalidCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    CreatePool,
    AddLiquidity,
    RemoveLiquidity,
    Swap,
    Publish,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::CreatePool,
        OperationKind::AddLiquidity,
        OperationKind::RemoveLiquidity,
        OperationKind::Swap,
        OperationKind::Publish,
    ];

    /// Kebab-case operation name as it appears in descriptors.
    pub fn name(self) -> &'static str {
        match self {
            OperationKind::CreatePool => "create-pool",
            OperationKind::AddLiquidity => "add-liquidity",
            OperationKind::RemoveLiquidity => "remove-liquidity",
            OperationKind::Swap => "swap",
            OperationKind::Publish => "publish",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationKind {
    type Err = CommandError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| CommandError::InvalidCommand {
                name: name.to_string(),
            })
    }
}

/// Outcome of an allowance check. Pure data, never a side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allowance {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl Allowance {
    pub fn granted() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// What an operation knows about its pool: the name, the custodial target
/// identity, and the shares asset derived once from `(name, target, source)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolBinding {
    pub name: String,
    pub target: Address,
    pub source: AssetSource,
    pub shares: AssetIdentifier,
}

impl PoolBinding {
    /// Bind a pool, deriving its shares-asset id deterministically.
    pub fn derive(name: impl Into<String>, target: Address, source: AssetSource) -> Self {
        let name = name.into();
        let id = derive_asset_id(&name, &target, &source);
        let shares = AssetIdentifier::new(id, target.clone());
        Self {
            name,
            target,
            source,
            shares,
        }
    }
}

/// Point-in-time pool read state with both asset sides resolved.
///
/// Fetched immediately before an online execution; may be stale by the time
/// the assembled batch settles. Nothing re-validates it at broadcast time.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSnapshot {
    pub shares_supply: u64,
    pub x: AssetIdentifier,
    pub reserve_x: u64,
    pub y: AssetIdentifier,
    pub reserve_y: u64,
}

impl PoolSnapshot {
    /// Math-ready view of the snapshot.
    pub fn reserves(&self) -> PoolReserves {
        PoolReserves::new(
            self.shares_supply.into(),
            self.reserve_x.into(),
            self.reserve_y.into(),
        )
    }
}

/// Read state handed to one operation dispatch.
///
/// The snapshot is passed explicitly instead of being mutated onto the
/// operation instance, so "required but absent" is an ordinary denial
/// (fail closed) rather than a partially-initialized object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolView {
    pub snapshot: Option<PoolSnapshot>,
    /// Current shares balance of the identity being debited, where the
    /// operation needs it (remove-liquidity). `None` fails closed.
    pub provider_shares: Option<u64>,
}

impl PoolView {
    pub fn offline() -> Self {
        Self::default()
    }
}

/// Render the descriptor embedded verbatim as a proof record:
/// `"<standard-name>(v<revision>):<operation-name>:<shares-id>"`.
///
/// This string is the only durable, ledger-visible evidence of which logical
/// operation a batch represents; downstream readers parse it by exact prefix
/// match, so the format is stable.
pub fn descriptor(kind: OperationKind, revision: u32, shares: &AssetId) -> String {
    format!("{STANDARD_NAME}(v{revision}):{}:{}", kind.name(), shares)
}

/// One pool operation: declared arguments, allowance predicate, transaction
/// list. The shared state machine does the rest.
pub trait PoolOperation {
    fn kind(&self) -> OperationKind;

    fn binding(&self) -> &PoolBinding;

    /// The operation's argument schema: mandatory names with their expected
    /// shapes, checked once at the boundary before any authorization logic
    /// runs.
    fn required_inputs(&self) -> &'static [(&'static str, ArgShape)];

    /// Operation-specific allowance predicate.
    ///
    /// The default is self-administration: only the pool's target identity
    /// may execute.
    fn allowance(&self, ctx: &Context, _view: &PoolView) -> Allowance {
        if ctx.actor == self.binding().target {
            Allowance::granted()
        } else {
            Allowance::denied("only the pool target identity may execute this operation")
        }
    }

    /// Ordered transaction list with the required signer per entry.
    fn assemble(&self, ctx: &Context, view: &PoolView) -> CommandResult<Vec<BatchEntry>>;
}

/// `Unchecked -> Authorized` transition.
///
/// Validates the declared argument schema first: an absent or wrong-shaped
/// mandatory argument is reported before any allowance logic or arithmetic
/// runs. Then applies the operation's allowance predicate.
pub fn can_execute(
    operation: &dyn PoolOperation,
    ctx: &Context,
    view: &PoolView,
) -> CommandResult<Allowance> {
    for (name, shape) in operation.required_inputs() {
        match ctx.inputs.get(name) {
            Some(value) if value.shape() == *shape => {}
            _ => {
                return Err(CommandError::MissingArgument {
                    operation: operation.kind().name().to_string(),
                    argument: (*name).to_string(),
                })
            }
        }
    }
    Ok(operation.allowance(ctx, view))
}

/// `Authorized -> Assembled -> Executed` transition.
///
/// Re-runs [`can_execute`]; a denial becomes [`CommandError::OperationForbidden`]
/// and nothing else happens. An empty transaction list at assembly time is
/// always fatal ([`CommandError::EmptyContract`]); otherwise the list is
/// wrapped as one unsigned atomic batch carrying the network parameters from
/// the context's reader and the call's transaction parameters.
pub fn execute(
    operation: &dyn PoolOperation,
    ctx: &Context,
    view: &PoolView,
) -> CommandResult<AtomicBatch> {
    let allowance = can_execute(operation, ctx, view)?;
    if !allowance.allowed {
        return Err(CommandError::OperationForbidden {
            operation: operation.kind().name().to_string(),
            actor: ctx.actor.to_string(),
            reason: allowance
                .reason
                .unwrap_or_else(|| "operation not allowed".to_string()),
        });
    }

    let entries = operation.assemble(ctx, view)?;
    if entries.is_empty() {
        return Err(CommandError::EmptyContract {
            operation: operation.kind().name().to_string(),
        });
    }

    Ok(AtomicBatch::new(
        entries,
        ctx.reader.network().clone(),
        ctx.parameters.clone(),
    ))
}
