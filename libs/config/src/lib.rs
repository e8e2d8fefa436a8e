//! # Tidepool Configuration
//!
//! Deployment configuration for tools embedding the pool engine: which
//! network to assemble batches for, default broadcast parameters and the
//! registry collector identity. Loaded from a TOML file with
//! `TIDEPOOL_`-prefixed environment overrides.
//!
//! ```toml
//! [network]
//! kind = "testnet"
//! generation_hash = "57F7DA205008026C776CB6AED843393F04CD458E0AA2D9F1D5F31A402072B2D6"
//! epoch_offset = 1615853185
//! fee_asset_id = "3A8455CD"
//! fee_asset_owner = "TFEEOWNERAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"
//!
//! [batch]
//! deadline_secs = 7200
//!
//! [registry]
//! collector = "TREGISTRYAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"
//! ```

use anyhow::{Context as _, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tidepool_ledger::{NetworkKind, NetworkParams, TransactionParameters};
use tidepool_types::{Address, AssetId, AssetIdentifier};
use tracing::debug;

/// Default configuration file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/tidepool.toml";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TidepoolConfig {
    #[serde(default)]
    pub network: NetworkSection,

    #[serde(default)]
    pub batch: BatchSection,

    #[serde(default)]
    pub registry: RegistrySection,
}

/// Network identity the assembled batches are bound to.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NetworkSection {
    pub kind: NetworkKind,
    pub generation_hash: String,
    pub epoch_offset: u64,
    /// Hex id of the fee asset.
    pub fee_asset_id: String,
    /// Address owning the fee asset's namespace.
    pub fee_asset_owner: String,
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            kind: NetworkKind::Testnet,
            generation_hash: String::new(),
            epoch_offset: 0,
            fee_asset_id: "00000000".to_string(),
            fee_asset_owner: String::new(),
        }
    }
}

impl NetworkSection {
    /// Materialize the network parameters, validating the fee-asset id.
    pub fn params(&self) -> Result<NetworkParams> {
        let fee_id = AssetId::from_hex(&self.fee_asset_id)
            .with_context(|| format!("invalid fee asset id '{}'", self.fee_asset_id))?;
        Ok(NetworkParams {
            kind: self.kind,
            generation_hash: self.generation_hash.clone(),
            epoch_offset: self.epoch_offset,
            fee_asset: AssetIdentifier::new(fee_id, Address::new(self.fee_asset_owner.clone())),
        })
    }
}

/// Default broadcast parameters applied when a call omits its own.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BatchSection {
    pub deadline_secs: u64,
    pub max_fee: Option<u64>,
}

impl Default for BatchSection {
    fn default() -> Self {
        let defaults = TransactionParameters::default();
        Self {
            deadline_secs: defaults.deadline_secs,
            max_fee: defaults.max_fee,
        }
    }
}

impl BatchSection {
    pub fn parameters(&self) -> TransactionParameters {
        TransactionParameters {
            deadline_secs: self.deadline_secs,
            max_fee: self.max_fee,
        }
    }
}

/// Registry collector the publish operation targets.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RegistrySection {
    pub collector: Option<String>,
}

impl RegistrySection {
    pub fn collector_address(&self) -> Option<Address> {
        self.collector.as_deref().map(Address::new)
    }
}

/// Load configuration from a TOML file with environment overrides.
///
/// The file is optional; absent sections fall back to defaults. Environment
/// variables use the `TIDEPOOL_` prefix with `__` as the section separator,
/// e.g. `TIDEPOOL_NETWORK__EPOCH_OFFSET=1615853185`.
pub fn load_config(base_path: Option<&Path>) -> Result<TidepoolConfig> {
    let base = base_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    debug!(path = %base.display(), "loading configuration");

    let config = Config::builder()
        .add_source(File::from(base).required(false))
        .add_source(Environment::with_prefix("TIDEPOOL").separator("__"))
        .build()
        .context("Failed to load configuration")?;

    config
        .try_deserialize()
        .context("Failed to parse configuration")
}
