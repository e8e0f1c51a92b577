//! # Payload Codecs
//!
//! A codec turns structured values into the string that gets signed, and
//! back. Failures on decode surface to callers as `BadPayload`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use cachet_core::{urlsafe_b64_decode, urlsafe_b64_encode};

/// A codec-specific failure, carried as its rendered message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CodecError(pub String);

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        Self(e.to_string())
    }
}

/// Encodes values to strings and decodes them back.
pub trait PayloadCodec: Clone {
    /// Encode `value`.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CodecError>;

    /// Decode `payload`.
    fn decode<T: DeserializeOwned>(&self, payload: &str) -> Result<T, CodecError>;
}

/// Compact JSON via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl PayloadCodec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CodecError> {
        Ok(serde_json::to_string(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, payload: &str) -> Result<T, CodecError> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// Wraps another codec and base64url-encodes its output, so the payload
/// contains only `A-Z a-z 0-9 - _`.
///
/// Payloads are never compressed. A payload carrying the `.` compression
/// marker is rejected on decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlSafeCodec<C = JsonCodec> {
    inner: C,
}

impl<C: PayloadCodec> UrlSafeCodec<C> {
    /// Wrap `inner`.
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: PayloadCodec> PayloadCodec for UrlSafeCodec<C> {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CodecError> {
        let encoded = self.inner.encode(value)?;
        Ok(urlsafe_b64_encode(encoded.as_bytes()))
    }

    fn decode<T: DeserializeOwned>(&self, payload: &str) -> Result<T, CodecError> {
        if payload.starts_with('.') {
            return Err(CodecError(
                "compressed payloads are not supported".to_string(),
            ));
        }
        let bytes = urlsafe_b64_decode(payload).map_err(|e| CodecError(e.to_string()))?;
        let text = String::from_utf8(bytes).map_err(|e| CodecError(e.to_string()))?;
        self.inner.decode(&text)
    }
}
