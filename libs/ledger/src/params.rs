//! Network identity and per-call broadcast parameters.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tidepool_types::AssetIdentifier;

/// Ledger network family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    Mainnet,
    Testnet,
}

/// Identity parameters of the connected ledger network, supplied by the
/// ledger adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub kind: NetworkKind,
    /// Hash of the network's genesis block; distinguishes forks that share
    /// a network kind.
    pub generation_hash: String,
    /// Seconds between the Unix epoch and the network's own epoch.
    pub epoch_offset: u64,
    /// Asset in which transaction fees are paid.
    pub fee_asset: AssetIdentifier,
}

/// Per-call broadcast parameters. Defaults are applied when the caller does
/// not supply them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionParameters {
    /// How long after assembly the batch stays broadcastable, in seconds.
    pub deadline_secs: u64,
    /// Optional cap on the fee the signers are willing to pay.
    pub max_fee: Option<u64>,
}

impl Default for TransactionParameters {
    fn default() -> Self {
        Self {
            deadline_secs: 2 * 60 * 60,
            max_fee: None,
        }
    }
}

impl TransactionParameters {
    /// Absolute deadline in milliseconds of network epoch time.
    pub fn deadline_millis(&self, network: &NetworkParams) -> i64 {
        let now = Utc::now().timestamp();
        (now - network.epoch_offset as i64 + self.deadline_secs as i64) * 1000
    }
}
