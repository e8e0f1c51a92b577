//! # Key Derivation
//!
//! The signing key is never the raw secret. It is derived from
//! `(secret, salt, digest)` on every sign/verify call, so one secret can
//! serve several purposes without their signatures being interchangeable.
//!
//! | method | key |
//! |---|---|
//! | `concat` | `digest(salt ++ secret)` |
//! | `django-concat` | `digest(salt ++ "signer" ++ secret)` |
//! | `hmac` | `HMAC(digest, key = secret, message = salt)` |

use std::str::FromStr;

use cachet_core::{CryptoError, SecretKey};
use serde::{Deserialize, Serialize};

use crate::digest::DigestMethod;

/// How the signing key is derived from the secret and salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyDerivation {
    /// `digest(salt ++ secret)`.
    Concat,
    /// `digest(salt ++ "signer" ++ secret)`.
    #[default]
    DjangoConcat,
    /// `HMAC(digest, secret, salt)`.
    Hmac,
}

impl KeyDerivation {
    /// Returns the method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concat => "concat",
            Self::DjangoConcat => "django-concat",
            Self::Hmac => "hmac",
        }
    }

    /// Derive the signing key.
    pub fn derive_key(
        &self,
        digest: DigestMethod,
        secret: &SecretKey,
        salt: &str,
    ) -> Result<Vec<u8>, CryptoError> {
        match self {
            Self::Concat => Ok(digest.digest(&[salt.as_bytes(), secret.as_bytes()].concat())),
            Self::DjangoConcat => Ok(digest.digest(
                &[salt.as_bytes(), b"signer".as_slice(), secret.as_bytes()].concat(),
            )),
            Self::Hmac => digest.hmac(secret.as_bytes(), salt.as_bytes()),
        }
    }
}

impl FromStr for KeyDerivation {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concat" => Ok(Self::Concat),
            "django-concat" => Ok(Self::DjangoConcat),
            "hmac" => Ok(Self::Hmac),
            other => Err(CryptoError::UnknownKeyDerivation(other.to_string())),
        }
    }
}

impl std::fmt::Display for KeyDerivation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_django_concat() {
        assert_eq!(KeyDerivation::default(), KeyDerivation::DjangoConcat);
    }

    #[test]
    fn test_methods_produce_distinct_keys() {
        let secret = SecretKey::from("secret");
        let keys: Vec<Vec<u8>> = [
            KeyDerivation::Concat,
            KeyDerivation::DjangoConcat,
            KeyDerivation::Hmac,
        ]
        .iter()
        .map(|m| m.derive_key(DigestMethod::Sha1, &secret, "salty").unwrap())
        .collect();
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[1], keys[2]);
        assert_ne!(keys[0], keys[2]);
    }

    #[test]
    fn test_concat_is_plain_digest() {
        let secret = SecretKey::from("secret");
        let key = KeyDerivation::Concat
            .derive_key(DigestMethod::Sha256, &secret, "salty")
            .unwrap();
        assert_eq!(key, DigestMethod::Sha256.digest(b"saltysecret"));
    }

    #[test]
    fn test_salt_changes_key() {
        let secret = SecretKey::from("secret");
        let a = KeyDerivation::DjangoConcat
            .derive_key(DigestMethod::Sha1, &secret, "a")
            .unwrap();
        let b = KeyDerivation::DjangoConcat
            .derive_key(DigestMethod::Sha1, &secret, "b")
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("concat".parse::<KeyDerivation>().unwrap(), KeyDerivation::Concat);
        assert_eq!(
            "django-concat".parse::<KeyDerivation>().unwrap(),
            KeyDerivation::DjangoConcat
        );
        assert_eq!("hmac".parse::<KeyDerivation>().unwrap(), KeyDerivation::Hmac);
    }

    #[test]
    fn test_parse_garbage_is_unknown_key_derivation() {
        assert_eq!(
            "garbage".parse::<KeyDerivation>(),
            Err(CryptoError::UnknownKeyDerivation("garbage".into()))
        );
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&KeyDerivation::DjangoConcat).unwrap();
        assert_eq!(json, "\"django-concat\"");
    }
}
