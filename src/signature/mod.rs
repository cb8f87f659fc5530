//! Versioned signature payloads.
//!
//! Wire format: `snapthentic:v1:<signerAddress>:<hash>:<signature>:<txHash>`,
//! every field a `0x`-prefixed hex string of fixed width. The same brand prefix
//! is applied to a bare hash before it is signed.

pub mod eoa;
pub mod verify;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::config;

pub use eoa::EoaAuthority;
pub use verify::{SignatureAuthority, SignatureVerifier, Verdict, VerificationRequest};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid signature brand and version")]
    InvalidBrandAndVersion,
    #[error("expected {expected} colon-delimited segments, got {got}")]
    SegmentCount { expected: usize, got: usize },
    #[error("field {field} must be 0x followed by {expected_bytes} hex-encoded bytes")]
    InvalidField {
        field: &'static str,
        expected_bytes: usize,
    },
}

/// The four provenance fields carried inside a sealed photo.
///
/// Only built through [`SignaturePayloadV1::new`] or parsing, so every value
/// serializes to a string that parses back to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignaturePayloadV1 {
    signer_address: String,
    hash: String,
    signature: String,
    tx_hash: String,
}

impl SignaturePayloadV1 {
    /// Build a payload, checking every field against its fixed width.
    pub fn new(
        signer_address: impl Into<String>,
        hash: impl Into<String>,
        signature: impl Into<String>,
        tx_hash: impl Into<String>,
    ) -> Result<Self, SignatureError> {
        let payload = Self {
            signer_address: signer_address.into(),
            hash: hash.into(),
            signature: signature.into(),
            tx_hash: tx_hash.into(),
        };
        payload.validate()?;
        Ok(payload)
    }

    pub fn signer_address(&self) -> &str {
        &self.signer_address
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn tx_hash(&self) -> &str {
        &self.tx_hash
    }

    fn validate(&self) -> Result<(), SignatureError> {
        check_hex_field("signerAddress", &self.signer_address, config::ADDRESS_BYTES)?;
        check_hex_field("hash", &self.hash, config::HASH_BYTES)?;
        check_hex_field("signature", &self.signature, config::SIGNATURE_BYTES)?;
        check_hex_field("txHash", &self.tx_hash, config::TX_HASH_BYTES)
    }

    /// The fields a signer authorised; the transaction reference is not part of it.
    pub fn verification_request(&self) -> VerificationRequest {
        VerificationRequest {
            signer_address: self.signer_address.clone(),
            hash: self.hash.clone(),
            signature: self.signature.clone(),
        }
    }
}

impl fmt::Display for SignaturePayloadV1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&construct_v1_signature(self))
    }
}

impl FromStr for SignaturePayloadV1 {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_v1_signature(s)
    }
}

/// Prepend the brand and version tag to an arbitrary message.
pub fn prefix_signature(message: &str) -> String {
    format!("{}{}", config::PAYLOAD_PREFIX, message)
}

/// Remove a leading brand and version tag, if present.
pub fn strip_prefix(signature: &str) -> &str {
    signature
        .strip_prefix(config::PAYLOAD_PREFIX)
        .unwrap_or(signature)
}

/// Add a `0x` prefix to a hex string that lacks one.
pub fn ensure_hex_prefix(value: &str) -> String {
    if value.starts_with("0x") {
        value.to_string()
    } else {
        format!("0x{value}")
    }
}

/// Serialize a payload: the four fields colon-joined behind the version tag.
pub fn construct_v1_signature(payload: &SignaturePayloadV1) -> String {
    prefix_signature(&format!(
        "{}:{}:{}:{}",
        payload.signer_address, payload.hash, payload.signature, payload.tx_hash
    ))
}

/// Parse and validate a serialized payload. Exactly six segments are accepted.
pub fn parse_v1_signature(s: &str) -> Result<SignaturePayloadV1, SignatureError> {
    let segments: Vec<&str> = s.split(':').collect();

    let brand = segments.iter().take(2).copied().collect::<Vec<_>>().join(":");
    if brand != config::VERSION_TAG {
        return Err(SignatureError::InvalidBrandAndVersion);
    }

    let [_, _, signer_address, hash, signature, tx_hash] = segments[..] else {
        return Err(SignatureError::SegmentCount {
            expected: 6,
            got: segments.len(),
        });
    };

    let payload = SignaturePayloadV1 {
        signer_address: signer_address.to_string(),
        hash: hash.to_string(),
        signature: signature.to_string(),
        tx_hash: tx_hash.to_string(),
    };
    payload.validate()?;
    Ok(payload)
}

fn check_hex_field(field: &'static str, value: &str, bytes: usize) -> Result<(), SignatureError> {
    let valid = value
        .strip_prefix("0x")
        .is_some_and(|digits| digits.len() == bytes * 2 && digits.bytes().all(|b| b.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(SignatureError::InvalidField {
            field,
            expected_bytes: bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0xe6b5c6c9e44d5deda5a0932f73958036d0007c8a";
    const HASH: &str = "0x9d2d73820220892f87fc9b64489bdf029eda5c673dfe00ae303755e2ea8e663e";
    const SIGNATURE: &str = "0x0b24413d4490223aeba9ebdd88b2054634284133b43b9a693630d2841d0bbdbc58f1da122fc38d6204204d4dc93d88b0fe05fe90ba7b1da0166bb567838a33e61c";
    const TX_HASH: &str = "0x5e0c1b7c5d2f9a8e3b4c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5e6f70";

    fn sample() -> SignaturePayloadV1 {
        SignaturePayloadV1::new(ADDRESS, HASH, SIGNATURE, TX_HASH).unwrap()
    }

    #[test]
    fn test_prefix_and_strip() {
        assert_eq!(prefix_signature("abc"), "snapthentic:v1:abc");
        assert_eq!(strip_prefix("snapthentic:v1:abc"), "abc");
        assert_eq!(strip_prefix("other:v1:abc"), "other:v1:abc");
        assert_eq!(strip_prefix(&prefix_signature(HASH)), HASH);
    }

    #[test]
    fn test_ensure_hex_prefix() {
        assert_eq!(ensure_hex_prefix("abcd"), "0xabcd");
        assert_eq!(ensure_hex_prefix("0xabcd"), "0xabcd");
    }

    #[test]
    fn test_construct_layout() {
        let s = construct_v1_signature(&sample());
        assert_eq!(s, format!("snapthentic:v1:{ADDRESS}:{HASH}:{SIGNATURE}:{TX_HASH}"));
        assert_eq!(s, sample().to_string());
    }

    #[test]
    fn test_parse_roundtrip() {
        let p = sample();
        assert_eq!(parse_v1_signature(&construct_v1_signature(&p)).unwrap(), p);
        assert_eq!(p.to_string().parse::<SignaturePayloadV1>().unwrap(), p);
    }

    #[test]
    fn test_parse_accepts_uppercase_hex() {
        let upper = SIGNATURE[2..].to_uppercase();
        let s = format!("snapthentic:v1:{ADDRESS}:{HASH}:0x{upper}:{TX_HASH}");
        assert!(parse_v1_signature(&s).is_ok());
    }

    #[test]
    fn test_parse_rejects_wrong_brand() {
        let s = format!("wrong:v1:{ADDRESS}:{HASH}:{SIGNATURE}:{TX_HASH}");
        assert_eq!(parse_v1_signature(&s), Err(SignatureError::InvalidBrandAndVersion));
        let s = format!("snapthentic:v2:{ADDRESS}:{HASH}:{SIGNATURE}:{TX_HASH}");
        assert_eq!(parse_v1_signature(&s), Err(SignatureError::InvalidBrandAndVersion));
        assert_eq!(parse_v1_signature(""), Err(SignatureError::InvalidBrandAndVersion));
    }

    #[test]
    fn test_parse_rejects_short_address() {
        let short = &ADDRESS[..40];
        let s = format!("snapthentic:v1:{short}:{HASH}:{SIGNATURE}:{TX_HASH}");
        assert_eq!(
            parse_v1_signature(&s),
            Err(SignatureError::InvalidField {
                field: "signerAddress",
                expected_bytes: 20
            })
        );
    }

    #[test]
    fn test_parse_rejects_segment_count() {
        let missing = format!("snapthentic:v1:{ADDRESS}:{HASH}:{SIGNATURE}");
        assert_eq!(
            parse_v1_signature(&missing),
            Err(SignatureError::SegmentCount { expected: 6, got: 5 })
        );
        let extra = format!("snapthentic:v1:{ADDRESS}:{HASH}:{SIGNATURE}:{TX_HASH}:0x00");
        assert_eq!(
            parse_v1_signature(&extra),
            Err(SignatureError::SegmentCount { expected: 6, got: 7 })
        );
    }

    #[test]
    fn test_parse_rejects_bad_fields() {
        let no_prefix = format!("snapthentic:v1:{ADDRESS}:{}:{SIGNATURE}:{TX_HASH}", &HASH[2..]);
        assert!(matches!(
            parse_v1_signature(&no_prefix),
            Err(SignatureError::InvalidField { field: "hash", .. })
        ));

        let non_hex = TX_HASH.replace('a', "g");
        let s = format!("snapthentic:v1:{ADDRESS}:{HASH}:{SIGNATURE}:{non_hex}");
        assert!(matches!(
            parse_v1_signature(&s),
            Err(SignatureError::InvalidField { field: "txHash", .. })
        ));
    }

    #[test]
    fn test_new_validates() {
        assert!(SignaturePayloadV1::new(ADDRESS, HASH, &SIGNATURE[..100], TX_HASH).is_err());
    }

    #[test]
    fn test_new_rejects_fields_that_break_the_layout() {
        assert_eq!(
            SignaturePayloadV1::new("0x1234", "zz:zz", "", ""),
            Err(SignatureError::InvalidField {
                field: "signerAddress",
                expected_bytes: 20
            })
        );
        assert!(matches!(
            SignaturePayloadV1::new(ADDRESS, format!("{HASH}:00"), SIGNATURE, TX_HASH),
            Err(SignatureError::InvalidField { field: "hash", .. })
        ));
    }

    #[test]
    fn test_getters_expose_validated_fields() {
        let p = sample();
        assert_eq!(p.signer_address(), ADDRESS);
        assert_eq!(p.hash(), HASH);
        assert_eq!(p.signature(), SIGNATURE);
        assert_eq!(p.tx_hash(), TX_HASH);
    }

    #[test]
    fn test_verification_request_drops_tx_hash() {
        let req = sample().verification_request();
        assert_eq!(req.signer_address, ADDRESS);
        assert_eq!(req.hash, HASH);
        assert_eq!(req.signature, SIGNATURE);
    }
}
