//! Per-invocation execution context.
//!
//! A [`Context`] bundles everything one operation dispatch needs: the acting
//! identity, the ledger read capability, broadcast parameters and the named
//! argument set. One instance is constructed per call and discarded after the
//! batch is produced; the only mutation after construction is
//! [`Context::set_input`], used by the orchestrator to inject
//! operation-specific parameters before dispatch.

use std::collections::BTreeMap;
use std::sync::Arc;
use tidepool_ledger::{LedgerReader, TransactionParameters};
use tidepool_types::{Address, AssetAmount, AssetId, CommandError, CommandResult};

/// A typed argument value.
///
/// Arguments are a closed union rather than an "anything" bag: each operation
/// parses the values it declares exactly once at its boundary, and a value of
/// the wrong shape is reported the same way as an absent one.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// An account identity (provider, trader, registry collector).
    Address(Address),
    /// A concrete asset quantity (deposits, swap input).
    Amount(AssetAmount),
    /// A bare asset reference (swap output side).
    Asset(AssetId),
    /// A plain integer quantity (shares to burn).
    Quantity(u64),
}

impl From<Address> for ArgValue {
    fn from(value: Address) -> Self {
        Self::Address(value)
    }
}

impl From<AssetAmount> for ArgValue {
    fn from(value: AssetAmount) -> Self {
        Self::Amount(value)
    }
}

impl From<AssetId> for ArgValue {
    fn from(value: AssetId) -> Self {
        Self::Asset(value)
    }
}

impl From<u64> for ArgValue {
    fn from(value: u64) -> Self {
        Self::Quantity(value)
    }
}

/// Shape of an argument value, used to declare an operation's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgShape {
    Address,
    Amount,
    Asset,
    Quantity,
}

impl ArgValue {
    pub fn shape(&self) -> ArgShape {
        match self {
            ArgValue::Address(_) => ArgShape::Address,
            ArgValue::Amount(_) => ArgShape::Amount,
            ArgValue::Asset(_) => ArgShape::Asset,
            ArgValue::Quantity(_) => ArgShape::Quantity,
        }
    }
}

/// Named argument set for one invocation.
///
/// Names are unique within a call; insertion order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inputs {
    values: BTreeMap<String, ArgValue>,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion for call sites constructing inputs inline.
    pub fn with(mut self, name: &str, value: impl Into<ArgValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Insert or replace a named argument.
    pub fn set(&mut self, name: &str, value: impl Into<ArgValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Look up an argument; absent names are simply `None`, never an error.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// Look up an argument, falling back to `default` when absent.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a ArgValue) -> &'a ArgValue {
        self.values.get(name).unwrap_or(default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    fn missing(operation: &str, argument: &str) -> CommandError {
        CommandError::MissingArgument {
            operation: operation.to_string(),
            argument: argument.to_string(),
        }
    }

    /// Typed accessor: the named argument as an account identity.
    pub fn address(&self, operation: &str, name: &str) -> CommandResult<&Address> {
        match self.values.get(name) {
            Some(ArgValue::Address(address)) => Ok(address),
            _ => Err(Self::missing(operation, name)),
        }
    }

    /// Typed accessor: the named argument as an asset amount.
    pub fn amount(&self, operation: &str, name: &str) -> CommandResult<&AssetAmount> {
        match self.values.get(name) {
            Some(ArgValue::Amount(amount)) => Ok(amount),
            _ => Err(Self::missing(operation, name)),
        }
    }

    /// Typed accessor: the named argument as a bare asset reference.
    pub fn asset(&self, operation: &str, name: &str) -> CommandResult<AssetId> {
        match self.values.get(name) {
            Some(ArgValue::Asset(id)) => Ok(*id),
            _ => Err(Self::missing(operation, name)),
        }
    }

    /// Typed accessor: the named argument as a plain quantity.
    pub fn quantity(&self, operation: &str, name: &str) -> CommandResult<u64> {
        match self.values.get(name) {
            Some(ArgValue::Quantity(value)) => Ok(*value),
            _ => Err(Self::missing(operation, name)),
        }
    }
}

/// Immutable-per-call bundle of actor identity, ledger capability,
/// transaction parameters and named arguments.
#[derive(Clone)]
pub struct Context {
    /// Framework revision embedded in operation descriptors.
    pub revision: u32,
    /// The identity on whose behalf the operation runs.
    pub actor: Address,
    /// Read-only ledger capability.
    pub reader: Arc<dyn LedgerReader>,
    /// Per-call broadcast parameters.
    pub parameters: TransactionParameters,
    /// Named argument set.
    pub inputs: Inputs,
}

impl Context {
    pub fn new(
        revision: u32,
        actor: Address,
        reader: Arc<dyn LedgerReader>,
        parameters: TransactionParameters,
        inputs: Inputs,
    ) -> Self {
        Self {
            revision,
            actor,
            reader,
            parameters,
            inputs,
        }
    }

    /// Argument lookup with an explicit default; never fails.
    pub fn get_input<'a>(&'a self, name: &str, default: &'a ArgValue) -> &'a ArgValue {
        self.inputs.get_or(name, default)
    }

    /// Append an argument; the orchestrator's injection point before dispatch.
    pub fn set_input(&mut self, name: &str, value: impl Into<ArgValue>) {
        self.inputs.set(name, value);
    }
}
