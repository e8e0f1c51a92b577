//! Signer configuration.
//!
//! Everything about a signer except its secret. Loadable from any serde
//! format, or from environment variables with per-field defaults. Secrets
//! are not part of this type.

use serde::{Deserialize, Serialize};

use cachet_core::CryptoError;

use crate::algorithm::AlgorithmKind;
use crate::derivation::KeyDerivation;
use crate::digest::DigestMethod;
use crate::signer::{DEFAULT_SALT, DEFAULT_SEPARATOR};

/// Non-secret signer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Key derivation salt. Default: `itsdangerous.Signer`.
    pub salt: String,
    /// Wire separator. Default: `.`.
    pub separator: String,
    /// Default: `django-concat`.
    pub key_derivation: KeyDerivation,
    /// Default: `sha1`.
    pub digest_method: DigestMethod,
    /// Default: `hmac`.
    pub algorithm: AlgorithmKind,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            salt: DEFAULT_SALT.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            key_derivation: KeyDerivation::default(),
            digest_method: DigestMethod::default(),
            algorithm: AlgorithmKind::default(),
        }
    }
}

impl SignerConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables, each optional:
    /// - `{PREFIX}_SALT`
    /// - `{PREFIX}_SEPARATOR`
    /// - `{PREFIX}_KEY_DERIVATION` (`concat`, `django-concat`, `hmac`)
    /// - `{PREFIX}_DIGEST_METHOD` (`sha1`, `sha224`, `sha256`, `sha384`, `sha512`, `md5`)
    /// - `{PREFIX}_ALGORITHM` (`hmac`, `none`)
    ///
    /// # Errors
    ///
    /// Returns the matching `Unknown*` variant of [`CryptoError`] for an
    /// unrecognized method name.
    pub fn from_env(prefix: &str) -> Result<Self, CryptoError> {
        Self::from_lookup(prefix, |key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading `{PREFIX}_*` variables
    /// through `lookup` instead of the process environment.
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self, CryptoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(format!("{prefix}_{name}").as_str());
        let defaults = Self::default();
        let config = Self {
            salt: var("SALT").unwrap_or(defaults.salt),
            separator: var("SEPARATOR").unwrap_or(defaults.separator),
            key_derivation: parse(var("KEY_DERIVATION"))?.unwrap_or(defaults.key_derivation),
            digest_method: parse(var("DIGEST_METHOD"))?.unwrap_or(defaults.digest_method),
            algorithm: parse(var("ALGORITHM"))?.unwrap_or(defaults.algorithm),
        };
        tracing::debug!(
            prefix,
            salt = %config.salt,
            key_derivation = %config.key_derivation,
            digest_method = %config.digest_method,
            "loaded signer configuration from environment"
        );
        Ok(config)
    }
}

fn parse<T>(raw: Option<String>) -> Result<Option<T>, CryptoError>
where
    T: std::str::FromStr<Err = CryptoError>,
{
    raw.map(|raw| raw.parse()).transpose()
}
