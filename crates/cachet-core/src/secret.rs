//! # Secret Keys
//!
//! The shared secret every signer derives its signing key from. It is
//! wiped from memory on drop and never rendered by `Debug`.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// An opaque shared secret.
///
/// Does not implement `Display`, `Serialize`, or `PartialEq`. Secrets must
/// not end up in logs or responses, and equality on them would not be
/// constant-time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    /// Wrap raw secret bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Borrow the raw secret bytes for key derivation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for SecretKey {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes())
    }
}

impl From<String> for SecretKey {
    fn from(secret: String) -> Self {
        Self::new(secret.into_bytes())
    }
}

impl From<&[u8]> for SecretKey {
    fn from(secret: &[u8]) -> Self {
        Self::new(secret)
    }
}

impl From<Vec<u8>> for SecretKey {
    fn from(secret: Vec<u8>) -> Self {
        Self::new(secret)
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}
