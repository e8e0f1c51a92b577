//! # Signing Algorithms
//!
//! A signing algorithm turns `(derived key, value)` into raw signature bytes.
//! The set is closed: extend it by adding a variant.

use std::str::FromStr;

use cachet_core::{constant_time_equal, CryptoError};
use serde::{Deserialize, Serialize};

use crate::digest::DigestMethod;

/// Strategy for producing the raw signature over a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningAlgorithm {
    /// Empty signature. Provides no integrity at all.
    None,
    /// `HMAC(digest, key, value)`.
    Hmac(DigestMethod),
}

impl Default for SigningAlgorithm {
    fn default() -> Self {
        Self::Hmac(DigestMethod::default())
    }
}

impl SigningAlgorithm {
    /// Produce the raw signature of `value` under `key`.
    pub fn get_signature(&self, key: &[u8], value: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self {
            Self::None => Ok(Vec::new()),
            Self::Hmac(digest) => digest.hmac(key, value),
        }
    }

    /// Check `candidate` against the expected signature in constant time.
    pub fn verify_signature(
        &self,
        key: &[u8],
        value: &[u8],
        candidate: &[u8],
    ) -> Result<bool, CryptoError> {
        let expected = self.get_signature(key, value)?;
        Ok(constant_time_equal(candidate, &expected))
    }
}

/// Algorithm selector for configuration, where the HMAC digest comes from
/// the signer's own digest method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    /// HMAC over the signer's digest method.
    #[default]
    Hmac,
    /// No signature.
    None,
}

impl AlgorithmKind {
    /// Resolve against a digest method.
    pub fn with_digest(self, digest: DigestMethod) -> SigningAlgorithm {
        match self {
            Self::Hmac => SigningAlgorithm::Hmac(digest),
            Self::None => SigningAlgorithm::None,
        }
    }
}

impl FromStr for AlgorithmKind {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hmac" => Ok(Self::Hmac),
            "none" => Ok(Self::None),
            other => Err(CryptoError::UnknownAlgorithm(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use cachet_core::urlsafe_b64_encode;

    #[test]
    fn test_none_returns_empty_signature() {
        let sig = SigningAlgorithm::None.get_signature(b"secret", b"hello").unwrap();
        assert!(sig.is_empty());
    }

    #[test]
    fn test_none_verifies_only_empty() {
        let alg = SigningAlgorithm::None;
        assert!(alg.verify_signature(b"secret", b"hello", b"").unwrap());
        assert!(!alg.verify_signature(b"secret", b"hello", b"x").unwrap());
    }

    #[test]
    fn test_hmac_defaults_to_sha1() {
        let sig = SigningAlgorithm::default()
            .get_signature(b"secret", b"hello")
            .unwrap();
        // Standard base64: URIFXAX5RPhXVe/FzYlw4ZTp9Fs=
        assert_eq!(urlsafe_b64_encode(&sig), "URIFXAX5RPhXVe_FzYlw4ZTp9Fs");
    }

    #[test]
    fn test_hmac_md5() {
        let sig = SigningAlgorithm::Hmac(DigestMethod::Md5)
            .get_signature(b"secret", b"hello")
            .unwrap();
        // Standard base64: ut5jhjxh7QsxZYBuzWrO/A==
        assert_eq!(urlsafe_b64_encode(&sig), "ut5jhjxh7QsxZYBuzWrO_A");
    }

    #[test]
    fn test_hmac_verify() {
        let alg = SigningAlgorithm::Hmac(DigestMethod::Sha256);
        let sig = alg.get_signature(b"key", b"value").unwrap();
        assert!(alg.verify_signature(b"key", b"value", &sig).unwrap());
        assert!(!alg.verify_signature(b"key", b"valuE", &sig).unwrap());
        assert!(!alg.verify_signature(b"kez", b"value", &sig).unwrap());
        assert!(!alg.verify_signature(b"key", b"value", &sig[..10]).unwrap());
    }

    #[test]
    fn test_kind_resolution() {
        assert_eq!(
            AlgorithmKind::Hmac.with_digest(DigestMethod::Sha512),
            SigningAlgorithm::Hmac(DigestMethod::Sha512)
        );
        assert_eq!(
            AlgorithmKind::None.with_digest(DigestMethod::Sha512),
            SigningAlgorithm::None
        );
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("hmac".parse::<AlgorithmKind>().unwrap(), AlgorithmKind::Hmac);
        assert_eq!("none".parse::<AlgorithmKind>().unwrap(), AlgorithmKind::None);
        assert!(matches!(
            "rsa".parse::<AlgorithmKind>(),
            Err(CryptoError::UnknownAlgorithm(_))
        ));
    }
}
