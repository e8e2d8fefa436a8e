//! Fixed metadata key scheme shared by pool creation and the registry.
//!
//! Three records are attached to a pool's shares asset at creation time: the
//! pool's own shares id and the ids of both paired currencies. The registry
//! reads the same three keys back when it reconstructs published pool
//! listings, so the key derivation is a bit-exact contract: SHA3-256 of the
//! literal key name, first 8 bytes as a big-endian u64.

use sha3::{Digest, Sha3_256};

pub const POOL_ID_KEY_NAME: &str = "Pool_Id";
pub const X_ID_KEY_NAME: &str = "X_Id";
pub const Y_ID_KEY_NAME: &str = "Y_Id";

/// Derive the scoped metadata key for a literal key name.
pub fn metadata_key(name: &str) -> u64 {
    let digest = Sha3_256::digest(name.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Key under which the pool's own shares-asset id is stored.
pub fn pool_id_key() -> u64 {
    metadata_key(POOL_ID_KEY_NAME)
}

/// Key under which the first paired asset's id is stored.
pub fn x_id_key() -> u64 {
    metadata_key(X_ID_KEY_NAME)
}

/// Key under which the second paired asset's id is stored.
pub fn y_id_key() -> u64 {
    metadata_key(Y_ID_KEY_NAME)
}
