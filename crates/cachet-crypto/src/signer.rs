//! # Signer
//!
//! Signs strings into the `VALUE SEP SIGNATURE` wire format and verifies
//! them again.
//!
//! ## Wire Format
//!
//! `SIGNATURE` is the URL-safe, unpadded base64 of the algorithm's raw
//! output. On verification the signed string is split at the *last*
//! separator, so a value that itself contains the separator survives the
//! round trip.
//!
//! ## Security Invariant
//!
//! The signing key is derived from `(secret, salt, digest)` on every call.
//! It is never cached on the signer and never logged.

use cachet_core::{
    urlsafe_b64_decode, urlsafe_b64_encode, BadSignature, CryptoError, Error, SecretKey,
};

use crate::algorithm::{AlgorithmKind, SigningAlgorithm};
use crate::config::SignerConfig;
use crate::derivation::KeyDerivation;
use crate::digest::DigestMethod;

/// Salt used by [`Signer::new`].
pub const DEFAULT_SALT: &str = "itsdangerous.Signer";

/// Separator used by [`Signer::new`].
pub const DEFAULT_SEPARATOR: &str = ".";

/// Characters that may appear in a signature or timestamp segment.
const BASE64_URL_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_=";

/// Something that can sign strings and verify them again.
///
/// Serializers are generic over this trait, so any signer (including
/// test doubles) plugs in at compile time.
pub trait ValueSigner: Clone {
    /// Append a separator and signature to `value`.
    fn sign(&self, value: &str) -> Result<String, CryptoError>;

    /// Verify `signed` and return the original value.
    ///
    /// # Errors
    ///
    /// [`Error::BadData`] when the string was tampered with or is malformed,
    /// [`Error::Crypto`] when the signer itself cannot operate.
    fn unsign(&self, signed: &str) -> Result<String, Error>;

    /// `Ok(true)` iff [`unsign`](Self::unsign) succeeds. Tampering yields
    /// `Ok(false)`. Configuration errors still escape.
    fn validate(&self, signed: &str) -> Result<bool, CryptoError> {
        verdict(self.unsign(signed))
    }

    /// The same signer with a different salt.
    fn salted(&self, salt: &str) -> Self;
}

/// Fold an unsign result into a validity flag, letting only configuration
/// errors through.
pub(crate) fn verdict<T>(result: Result<T, Error>) -> Result<bool, CryptoError> {
    match result {
        Ok(_) => Ok(true),
        Err(Error::Crypto(e)) => Err(e),
        Err(_) => Ok(false),
    }
}

/// Produces and verifies `value.signature` strings from a shared secret.
///
/// Configuration is fixed at construction; every method takes `&self` and
/// touches no shared state, so a `Signer` can be used from many threads.
#[derive(Debug, Clone)]
pub struct Signer {
    secret: SecretKey,
    salt: String,
    separator: String,
    key_derivation: KeyDerivation,
    digest_method: DigestMethod,
    algorithm: Option<SigningAlgorithm>,
}

impl Signer {
    /// A signer with the default salt, separator, `django-concat` key
    /// derivation, and HMAC-SHA1.
    pub fn new(secret: impl Into<SecretKey>) -> Self {
        Self {
            secret: secret.into(),
            salt: DEFAULT_SALT.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            key_derivation: KeyDerivation::default(),
            digest_method: DigestMethod::default(),
            algorithm: None,
        }
    }

    /// Build a signer from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSeparator`] if the configured separator
    /// is unusable.
    pub fn from_config(
        secret: impl Into<SecretKey>,
        config: &SignerConfig,
    ) -> Result<Self, CryptoError> {
        let signer = Self::new(secret)
            .with_salt(config.salt.clone())
            .with_separator(config.separator.clone())?
            .with_key_derivation(config.key_derivation)
            .with_digest_method(config.digest_method);
        Ok(match config.algorithm {
            AlgorithmKind::Hmac => signer,
            kind => signer.with_algorithm(kind.with_digest(config.digest_method)),
        })
    }

    /// Replace the salt.
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = salt.into();
        self
    }

    /// Replace the separator.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSeparator`] if `separator` is empty or
    /// contains a character that can occur in a signature.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Result<Self, CryptoError> {
        let separator = separator.into();
        if separator.is_empty() || separator.chars().any(|c| BASE64_URL_ALPHABET.contains(c)) {
            return Err(CryptoError::InvalidSeparator(separator));
        }
        self.separator = separator;
        Ok(self)
    }

    /// Replace the key derivation method.
    pub fn with_key_derivation(mut self, key_derivation: KeyDerivation) -> Self {
        self.key_derivation = key_derivation;
        self
    }

    /// Replace the digest method. Unless an algorithm was set explicitly,
    /// HMAC signing follows this digest too.
    pub fn with_digest_method(mut self, digest_method: DigestMethod) -> Self {
        self.digest_method = digest_method;
        self
    }

    /// Pin the signing algorithm, decoupling it from the digest method.
    pub fn with_algorithm(mut self, algorithm: SigningAlgorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// The key derivation salt.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// The wire separator.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The key derivation method.
    pub fn key_derivation(&self) -> KeyDerivation {
        self.key_derivation
    }

    /// The digest method.
    pub fn digest_method(&self) -> DigestMethod {
        self.digest_method
    }

    /// The effective signing algorithm.
    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
            .unwrap_or(SigningAlgorithm::Hmac(self.digest_method))
    }

    /// Derive the signing key from the secret and salt.
    pub fn derive_key(&self) -> Result<Vec<u8>, CryptoError> {
        self.key_derivation
            .derive_key(self.digest_method, &self.secret, &self.salt)
    }

    /// The encoded signature of `value`.
    pub fn get_signature(&self, value: &str) -> Result<String, CryptoError> {
        let key = self.derive_key()?;
        let sig = self.algorithm().get_signature(&key, value.as_bytes())?;
        Ok(urlsafe_b64_encode(&sig))
    }

    /// `value ++ separator ++ signature`.
    pub fn sign(&self, value: &str) -> Result<String, CryptoError> {
        Ok(format!("{value}{}{}", self.separator, self.get_signature(value)?))
    }

    /// Check an encoded signature against `value`.
    ///
    /// A signature that is not valid base64 simply fails verification.
    pub fn verify_signature(&self, value: &str, signature: &str) -> Result<bool, CryptoError> {
        let candidate = match urlsafe_b64_decode(signature) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(salt = %self.salt, error = %e, "undecodable signature");
                return Ok(false);
            }
        };
        let key = self.derive_key()?;
        self.algorithm()
            .verify_signature(&key, value.as_bytes(), &candidate)
    }

    /// Verify `signed` and return the value it carries.
    ///
    /// # Errors
    ///
    /// - [`BadSignature`] without payload if the separator is absent.
    /// - [`BadSignature`] carrying the unverified value if the signature
    ///   does not match.
    pub fn unsign(&self, signed: &str) -> Result<String, Error> {
        let Some((value, signature)) = signed.rsplit_once(self.separator.as_str()) else {
            return Err(BadSignature::new(format!(
                "no {:?} found in value",
                self.separator
            ))
            .into());
        };
        if self.verify_signature(value, signature)? {
            return Ok(value.to_string());
        }
        tracing::debug!(salt = %self.salt, "signature mismatch");
        Err(BadSignature::with_payload(
            format!("signature {signature:?} does not match"),
            value,
        )
        .into())
    }

    /// `Ok(true)` iff [`unsign`](Self::unsign) succeeds.
    pub fn validate(&self, signed: &str) -> Result<bool, CryptoError> {
        verdict(self.unsign(signed))
    }
}

impl ValueSigner for Signer {
    fn sign(&self, value: &str) -> Result<String, CryptoError> {
        Signer::sign(self, value)
    }

    fn unsign(&self, signed: &str) -> Result<String, Error> {
        Signer::unsign(self, signed)
    }

    fn salted(&self, salt: &str) -> Self {
        self.clone().with_salt(salt)
    }
}
