use async_trait::async_trait;
use log::{debug, warn};
use thiserror::Error;

use super::prefix_signature;
use crate::config::VerifierConfig;

#[derive(Error, Debug)]
pub enum AuthorityError {
    #[error("malformed verification input: {0}")]
    Malformed(String),
    #[error("verification backend failed: {0}")]
    Backend(String),
}

/// External capability that decides whether `signer_address` authorised `message`.
///
/// Implementations range from an on-chain smart-contract wallet check to a local
/// ECDSA recovery ([`EoaAuthority`](super::EoaAuthority)). The verifier only ever
/// passes the branded message that was actually signed.
#[async_trait]
pub trait SignatureAuthority: Send + Sync {
    async fn is_valid_signature(
        &self,
        signer_address: &str,
        message: &str,
        signature: &str,
    ) -> Result<bool, AuthorityError>;
}

/// The fields of a signature payload that a signer authorised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub signer_address: String,
    pub hash: String,
    pub signature: String,
}

/// Outcome of a verification attempt.
///
/// `Unavailable` covers authority faults and timeouts. The boolean surface folds
/// it into `false`, so callers relying only on
/// [`SignatureVerifier::verify_v1_signature`] cannot tell a forged signature from
/// an unreachable backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid,
    Unavailable,
}

impl Verdict {
    pub fn is_valid(self) -> bool {
        self == Verdict::Valid
    }
}

/// Fail-closed signature verification over an injected authority.
pub struct SignatureVerifier<A> {
    authority: A,
    config: VerifierConfig,
}

impl<A: SignatureAuthority> SignatureVerifier<A> {
    pub fn new(authority: A, config: VerifierConfig) -> Self {
        Self { authority, config }
    }

    pub fn authority(&self) -> &A {
        &self.authority
    }

    /// Ask the authority once, bounded by the configured timeout. Never retries.
    pub async fn verify(&self, request: &VerificationRequest) -> Verdict {
        let message = prefix_signature(&request.hash);
        let call = self
            .authority
            .is_valid_signature(&request.signer_address, &message, &request.signature);

        match tokio::time::timeout(self.config.timeout, call).await {
            Ok(Ok(true)) => {
                debug!("signature valid for {}", request.signer_address);
                Verdict::Valid
            }
            Ok(Ok(false)) => {
                debug!("signature rejected for {}", request.signer_address);
                Verdict::Invalid
            }
            Ok(Err(e)) => {
                warn!("verification failed for {}: {}", request.signer_address, e);
                Verdict::Unavailable
            }
            Err(_) => {
                warn!(
                    "verification for {} timed out after {:?}",
                    request.signer_address, self.config.timeout
                );
                Verdict::Unavailable
            }
        }
    }

    /// Boolean verification: `true` only for a confirmed valid signature.
    pub async fn verify_v1_signature(&self, request: &VerificationRequest) -> bool {
        self.verify(request).await.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    struct StubAuthority {
        answer: Result<bool, String>,
        seen: Mutex<Vec<String>>,
    }

    impl StubAuthority {
        fn new(answer: Result<bool, String>) -> Self {
            Self {
                answer,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SignatureAuthority for StubAuthority {
        async fn is_valid_signature(
            &self,
            _signer_address: &str,
            message: &str,
            _signature: &str,
        ) -> Result<bool, AuthorityError> {
            self.seen.lock().unwrap().push(message.to_string());
            self.answer.clone().map_err(AuthorityError::Backend)
        }
    }

    struct SlowAuthority;

    #[async_trait]
    impl SignatureAuthority for SlowAuthority {
        async fn is_valid_signature(&self, _: &str, _: &str, _: &str) -> Result<bool, AuthorityError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(true)
        }
    }

    fn request() -> VerificationRequest {
        VerificationRequest {
            signer_address: "0x00000000000000000000000000000000000000aa".into(),
            hash: format!("0x{}", "11".repeat(32)),
            signature: format!("0x{}", "22".repeat(65)),
        }
    }

    #[tokio::test]
    async fn test_valid_signature() {
        let verifier = SignatureVerifier::new(StubAuthority::new(Ok(true)), VerifierConfig::default());
        assert_eq!(verifier.verify(&request()).await, Verdict::Valid);
        assert!(verifier.verify_v1_signature(&request()).await);
    }

    #[tokio::test]
    async fn test_authority_receives_branded_hash() {
        let verifier = SignatureVerifier::new(StubAuthority::new(Ok(true)), VerifierConfig::default());
        verifier.verify(&request()).await;
        let seen = verifier.authority().seen.lock().unwrap().clone();
        assert_eq!(seen, vec![format!("snapthentic:v1:0x{}", "11".repeat(32))]);
    }

    #[tokio::test]
    async fn test_invalid_signature() {
        let verifier = SignatureVerifier::new(StubAuthority::new(Ok(false)), VerifierConfig::default());
        assert_eq!(verifier.verify(&request()).await, Verdict::Invalid);
        assert!(!verifier.verify_v1_signature(&request()).await);
    }

    #[tokio::test]
    async fn test_authority_fault_fails_closed() {
        let verifier = SignatureVerifier::new(
            StubAuthority::new(Err("rpc unreachable".into())),
            VerifierConfig::default(),
        );
        assert_eq!(verifier.verify(&request()).await, Verdict::Unavailable);
        assert!(!verifier.verify_v1_signature(&request()).await);
        assert_eq!(verifier.authority().seen.lock().unwrap().len(), 2, "no retries");
    }

    #[tokio::test]
    async fn test_timeout_fails_closed() {
        let config = VerifierConfig {
            timeout: Duration::from_millis(50),
        };
        let verifier = SignatureVerifier::new(SlowAuthority, config);
        assert_eq!(verifier.verify(&request()).await, Verdict::Unavailable);
    }
}
