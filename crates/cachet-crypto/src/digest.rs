//! # Digest Methods
//!
//! The closed set of hash functions a signer can be configured with. The
//! same method drives key derivation and, unless overridden, the HMAC
//! signing algorithm.

use std::str::FromStr;

use cachet_core::CryptoError;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

/// A hash function usable for key derivation and HMAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestMethod {
    /// SHA-1 (160-bit). The default, for wire compatibility.
    #[default]
    Sha1,
    /// SHA-224.
    Sha224,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
    /// MD5. Only for interoperating with legacy tokens.
    Md5,
}

impl DigestMethod {
    /// Returns the method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Md5 => "md5",
        }
    }

    /// Hash `data`.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => Sha1::digest(data).to_vec(),
            Self::Sha224 => Sha224::digest(data).to_vec(),
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
            Self::Md5 => Md5::digest(data).to_vec(),
        }
    }

    /// Compute `HMAC(self, key, message)`.
    pub fn hmac(&self, key: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self {
            Self::Sha1 => mac::<Hmac<Sha1>>(key, message),
            Self::Sha224 => mac::<Hmac<Sha224>>(key, message),
            Self::Sha256 => mac::<Hmac<Sha256>>(key, message),
            Self::Sha384 => mac::<Hmac<Sha384>>(key, message),
            Self::Sha512 => mac::<Hmac<Sha512>>(key, message),
            Self::Md5 => mac::<Hmac<Md5>>(key, message),
        }
    }
}

fn mac<M: Mac + KeyInit>(key: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut mac = <M as KeyInit>::new_from_slice(key)
        .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

impl FromStr for DigestMethod {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha1" => Ok(Self::Sha1),
            "sha224" => Ok(Self::Sha224),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            "md5" => Ok(Self::Md5),
            other => Err(CryptoError::UnknownDigestMethod(other.to_string())),
        }
    }
}

impl std::fmt::Display for DigestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn test_default_is_sha1() {
        assert_eq!(DigestMethod::default(), DigestMethod::Sha1);
    }

    #[test]
    fn test_digest_lengths() {
        let cases = [
            (DigestMethod::Sha1, 20),
            (DigestMethod::Sha224, 28),
            (DigestMethod::Sha256, 32),
            (DigestMethod::Sha384, 48),
            (DigestMethod::Sha512, 64),
            (DigestMethod::Md5, 16),
        ];
        for (method, len) in cases {
            assert_eq!(method.digest(b"abc").len(), len, "{method}");
            assert_eq!(method.hmac(b"k", b"abc").unwrap().len(), len, "{method}");
        }
    }

    #[test]
    fn test_known_sha1_vector() {
        assert_eq!(
            hex(&DigestMethod::Sha1.digest(b"abc")),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_hmac_accepts_long_keys() {
        let key = vec![7u8; 1024];
        assert!(DigestMethod::Sha256.hmac(&key, b"value").is_ok());
    }

    #[test]
    fn test_parse_roundtrip() {
        for method in [
            DigestMethod::Sha1,
            DigestMethod::Sha224,
            DigestMethod::Sha256,
            DigestMethod::Sha384,
            DigestMethod::Sha512,
            DigestMethod::Md5,
        ] {
            assert_eq!(method.as_str().parse::<DigestMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "whirlpool".parse::<DigestMethod>(),
            Err(CryptoError::UnknownDigestMethod("whirlpool".into()))
        );
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&DigestMethod::Sha256).unwrap();
        assert_eq!(json, "\"sha256\"");
    }
}
