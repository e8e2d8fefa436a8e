//! Error contract of the command framework and the ledger capability.
//!
//! All command errors are final, non-retryable and raised synchronously at
//! the point of detection; the orchestrator performs no recovery and
//! propagates them unmodified. Error kind plus message is the full contract,
//! there is no user-facing formatting layer.

use thiserror::Error;

/// Result type alias for command execution.
pub type CommandResult<T> = std::result::Result<T, CommandError>;

/// Failures raised by the command execution framework.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A declared mandatory argument was absent from the execution context.
    /// Raised before any authorization or computation runs.
    #[error("operation '{operation}' is missing mandatory argument '{argument}'")]
    MissingArgument {
        operation: String,
        argument: String,
    },

    /// An orchestrator was asked to dispatch an operation name it does not
    /// know. Always fatal, never silently ignored.
    #[error("unknown operation '{name}'")]
    InvalidCommand { name: String },

    /// The operation's allowance predicate returned a denial. Raised by
    /// `execute`, never by `can_execute` itself.
    #[error("operation '{operation}' forbidden for {actor}: {reason}")]
    OperationForbidden {
        operation: String,
        actor: String,
        reason: String,
    },

    /// The operation produced an empty transaction list at assembly time.
    /// A zero-operation batch is never valid; this indicates a misconfigured
    /// operation.
    #[error("operation '{operation}' assembled an empty contract")]
    EmptyContract { operation: String },

    /// Raised by the external key-derivation collaborator and propagated
    /// unmodified; the framework itself never constructs derivation paths.
    #[error("invalid key derivation path '{path}'")]
    InvalidDerivationPath { path: String },
}

/// Failures surfaced by a ledger reader implementation.
///
/// Read failures during snapshot synchronization are swallowed by the
/// orchestrator (the snapshot simply stays unavailable and downstream
/// allowance checks fail closed); everywhere else they propagate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("ledger read failed: {0}")]
    ReadFailed(String),

    #[error("asset {asset} not found on ledger")]
    AssetNotFound { asset: String },

    #[error("account {address} not found on ledger")]
    AccountNotFound { address: String },

    #[error("malformed ledger response: {0}")]
    MalformedResponse(String),
}
