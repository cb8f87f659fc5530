use sha2::{Digest, Sha256};

/// SHA-256 digest type.
pub type Sha256Digest = [u8; 32];

/// Compute SHA-256 hash of a byte slice.
pub fn sha256(data: &[u8]) -> Sha256Digest {
    Sha256::digest(data).into()
}

/// Hash photo bytes into the `0x`-prefixed form carried in a signature payload.
pub fn photo_hash(data: &[u8]) -> String {
    format!("0x{}", hex::encode(sha256(data)))
}
