//! Deterministic asset and account identification.
//!
//! An asset id is the first 4 bytes of the SHA3-512 digest of
//! `target-address || '-' || source || '-' || name`. The derivation is pure
//! and total: the same triple always yields the same id, distinct triples
//! collide only with hash-birthday probability. Ids are computed once at
//! pool-creation time and never mutated afterwards.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_512};
use std::fmt;

/// Raw 4-byte asset id, uppercase-hex in display contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId([u8; 4]);

impl AssetId {
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Parse an id from its 8-character hex rendering.
    pub fn from_hex(text: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 4];
        hex::decode_to_slice(text, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// An account identity on the ledger, in the ledger's own string address form.
///
/// The framework treats addresses as opaque; equality is what matters for
/// authorization and signer assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self(address.to_string())
    }
}

/// Identity of the ledger network an asset or pool belongs to.
///
/// Pools living on different sources are never interchangeable, so the source
/// participates in id derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetSource(String);

impl AssetSource {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A concrete asset reference: the derived id plus the identity that owns the
/// asset's namespace. Identifies either a pool-shares asset or any paired
/// currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetIdentifier {
    pub id: AssetId,
    pub target: Address,
}

impl AssetIdentifier {
    pub fn new(id: AssetId, target: Address) -> Self {
        Self { id, target }
    }
}

impl fmt::Display for AssetIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.target)
    }
}

/// Derive the 4-byte asset id for a `(name, target, source)` triple.
pub fn derive_asset_id(name: &str, target: &Address, source: &AssetSource) -> AssetId {
    let mut hasher = Sha3_512::new();
    hasher.update(target.as_str().as_bytes());
    hasher.update(b"-");
    hasher.update(source.as_str().as_bytes());
    hasher.update(b"-");
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();

    let mut id = [0u8; 4];
    id.copy_from_slice(&digest[..4]);
    AssetId(id)
}
