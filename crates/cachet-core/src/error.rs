//! # Error Taxonomy
//!
//! Structured error types for signing, verification, and payload decoding,
//! built with `thiserror`.
//!
//! ## Design
//!
//! - [`BadData`] is the root of every tampering/corruption failure. Each of
//!   its variants carries whatever could be recovered before the failure:
//!   the unverified payload, and for timestamped values the signing instant.
//!   Callers that only hold the error can still inspect what was rejected.
//! - [`CryptoError`] covers configuration and primitive failures. These are
//!   never the sender's fault, so `validate` and `loads_unsafe` let them
//!   escape instead of folding them into `false`.
//! - [`Error`] is what fallible top-level operations return.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Signature verification failed, or the signed value had no separator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("bad signature: {message}")]
pub struct BadSignature {
    /// What went wrong.
    pub message: String,
    /// The candidate value that failed verification, when it could be split
    /// out. Untrusted.
    pub payload: Option<String>,
}

impl BadSignature {
    /// A failure with nothing recovered.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            payload: None,
        }
    }

    /// A failure carrying the unverified candidate value.
    pub fn with_payload(message: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            payload: Some(payload.into()),
        }
    }
}

/// The timestamp segment was missing or malformed, or a signature failure
/// was surfaced through the timestamp layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("bad time signature: {message}")]
pub struct BadTimeSignature {
    /// What went wrong.
    pub message: String,
    /// The value with the timestamp split off, when recoverable. Untrusted.
    pub payload: Option<String>,
    /// The claimed signing instant, when it could be decoded. Untrusted.
    pub date_signed: Option<DateTime<Utc>>,
}

/// The signature is valid but older than the caller's maximum age.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("signature expired: {message}")]
pub struct SignatureExpired {
    /// Age and limit, rendered for humans.
    pub message: String,
    /// The value that was signed. Its signature verified, so only its
    /// freshness is in question.
    pub payload: String,
    /// When the value was signed.
    pub date_signed: DateTime<Utc>,
}

/// The payload codec rejected the verified (or recovered) payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("bad payload: could not decode the payload: {message}")]
pub struct BadPayload {
    /// The codec's own error message.
    pub message: String,
}

/// Root category for every tampering or corruption failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BadData {
    /// See [`BadSignature`].
    #[error(transparent)]
    Signature(#[from] BadSignature),

    /// See [`BadTimeSignature`].
    #[error(transparent)]
    TimeSignature(#[from] BadTimeSignature),

    /// See [`SignatureExpired`].
    #[error(transparent)]
    Expired(#[from] SignatureExpired),

    /// See [`BadPayload`].
    #[error(transparent)]
    Payload(#[from] BadPayload),
}

impl BadData {
    /// The unverified payload attached to the failure, if any.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Signature(e) => e.payload.as_deref(),
            Self::TimeSignature(e) => e.payload.as_deref(),
            Self::Expired(e) => Some(&e.payload),
            Self::Payload(_) => None,
        }
    }

    /// The signing instant attached to the failure, if any.
    pub fn date_signed(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::TimeSignature(e) => e.date_signed,
            Self::Expired(e) => Some(e.date_signed),
            Self::Signature(_) | Self::Payload(_) => None,
        }
    }
}

/// Configuration or primitive failure. Not a tampering condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The key derivation method name is not recognized.
    #[error("unknown key derivation method: {0:?}")]
    UnknownKeyDerivation(String),

    /// The digest method name is not recognized.
    #[error("unknown digest method: {0:?}")]
    UnknownDigestMethod(String),

    /// The signing algorithm name is not recognized.
    #[error("unknown signing algorithm: {0:?}")]
    UnknownAlgorithm(String),

    /// The separator is empty or could occur inside a signature.
    #[error("invalid separator {0:?}: must be non-empty and contain no base64url characters")]
    InvalidSeparator(String),

    /// The MAC rejected the derived key.
    #[error("invalid signing key: {0}")]
    InvalidKey(String),
}

/// Low-level decode failure in the wire encodings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Not valid URL-safe base64.
    #[error("invalid base64: {0}")]
    InvalidBase64(String),

    /// A big-endian integer wider than 64 bits.
    #[error("integer of {0} bytes does not fit in 64 bits")]
    IntegerOverflow(usize),
}

/// Top-level error for cachet operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The signed data was tampered with, corrupted, or expired.
    #[error(transparent)]
    BadData(#[from] BadData),

    /// Signer misconfiguration or primitive failure.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The payload codec could not encode a value.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The byte stream could not be read or written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The unverified payload attached to a [`BadData`] failure, if any.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::BadData(e) => e.payload(),
            _ => None,
        }
    }
}

impl From<BadSignature> for Error {
    fn from(e: BadSignature) -> Self {
        Self::BadData(e.into())
    }
}

impl From<BadTimeSignature> for Error {
    fn from(e: BadTimeSignature) -> Self {
        Self::BadData(e.into())
    }
}

impl From<SignatureExpired> for Error {
    fn from(e: SignatureExpired) -> Self {
        Self::BadData(e.into())
    }
}

impl From<BadPayload> for Error {
    fn from(e: BadPayload) -> Self {
        Self::BadData(e.into())
    }
}
