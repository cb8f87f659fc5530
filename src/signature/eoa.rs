//! Offline verification for externally owned accounts.
//!
//! Handles wallets that sign with a plain secp256k1 key using the EIP-191
//! personal-message scheme. Smart-contract wallets need an on-chain authority.

use async_trait::async_trait;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};

use super::verify::{AuthorityError, SignatureAuthority};
use crate::config;

const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Recovers the signer from an `r || s || v` signature and compares addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct EoaAuthority;

#[async_trait]
impl SignatureAuthority for EoaAuthority {
    async fn is_valid_signature(
        &self,
        signer_address: &str,
        message: &str,
        signature: &str,
    ) -> Result<bool, AuthorityError> {
        let expected = decode_hex(signer_address)?;
        if expected.len() != config::ADDRESS_BYTES {
            return Err(AuthorityError::Malformed(format!(
                "address must be {} bytes, got {}",
                config::ADDRESS_BYTES,
                expected.len()
            )));
        }
        let recovered = recover_signer(message, signature)?;
        Ok(recovered.eq_ignore_ascii_case(signer_address))
    }
}

/// Hash a message the way wallets do for `personal_sign`.
pub fn personal_message_hash(message: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(format!("{}{}", PERSONAL_MESSAGE_PREFIX, message.len()).as_bytes());
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// Lowercase `0x` address of a public key: the last 20 bytes of its Keccak-256.
pub fn address_of(key: &VerifyingKey) -> String {
    let point = key.to_encoded_point(false);
    let digest = Keccak256::digest(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&digest[12..]))
}

/// Recover the address that produced `signature` over `message`.
pub fn recover_signer(message: &str, signature: &str) -> Result<String, AuthorityError> {
    let bytes = decode_hex(signature)?;
    if bytes.len() != config::SIGNATURE_BYTES {
        return Err(AuthorityError::Malformed(format!(
            "signature must be {} bytes, got {}",
            config::SIGNATURE_BYTES,
            bytes.len()
        )));
    }

    // v is 0/1 or the legacy 27/28
    let v = match bytes[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        v => return Err(AuthorityError::Malformed(format!("invalid recovery byte {v}"))),
    };
    let recovery_id = RecoveryId::from_byte(v)
        .ok_or_else(|| AuthorityError::Malformed(format!("invalid recovery byte {v}")))?;
    let sig = Signature::from_slice(&bytes[..64]).map_err(|e| AuthorityError::Malformed(e.to_string()))?;

    let prehash = personal_message_hash(message);
    let key = VerifyingKey::recover_from_prehash(&prehash, &sig, recovery_id)
        .map_err(|e| AuthorityError::Malformed(e.to_string()))?;
    Ok(address_of(&key))
}

fn decode_hex(value: &str) -> Result<Vec<u8>, AuthorityError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits).map_err(|e| AuthorityError::Malformed(e.to_string()))
}
