//! # Serializer
//!
//! Encodes a value with a [`PayloadCodec`], then signs the payload with a
//! [`ValueSigner`]. Reading reverses the two steps.
//!
//! The signer and codec are type parameters, fixed at compile time.
//! `Serializer::new` gives the common case: JSON payloads signed by a
//! [`Signer`] salted with [`DEFAULT_SALT`].

use std::borrow::Cow;
use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use cachet_core::{BadPayload, CryptoError, Error, SecretKey};
use cachet_crypto::{Signer, ValueSigner};

use crate::codec::{JsonCodec, PayloadCodec};

/// Salt used by [`Serializer::new`] and
/// [`TimedSerializer::new`](crate::TimedSerializer::new).
pub const DEFAULT_SALT: &str = "itsdangerous";

/// Signs structured values into strings and loads them back.
#[derive(Debug, Clone)]
pub struct Serializer<S = Signer, C = JsonCodec> {
    signer: S,
    codec: C,
}

impl Serializer {
    /// JSON payloads, signed with [`Signer`] defaults and salt
    /// [`DEFAULT_SALT`].
    pub fn new(secret: impl Into<SecretKey>) -> Self {
        Self::from_parts(Signer::new(secret).with_salt(DEFAULT_SALT), JsonCodec)
    }
}

impl<S: ValueSigner, C: PayloadCodec> Serializer<S, C> {
    /// Assemble a serializer from a configured signer and a codec.
    pub fn from_parts(signer: S, codec: C) -> Self {
        Self { signer, codec }
    }

    /// The same signer with a different codec.
    pub fn with_codec<C2: PayloadCodec>(self, codec: C2) -> Serializer<S, C2> {
        Serializer {
            signer: self.signer,
            codec,
        }
    }

    /// A copy of this serializer whose signer uses `salt`.
    pub fn with_salt(&self, salt: &str) -> Self {
        Self {
            signer: self.make_signer(Some(salt)).into_owned(),
            codec: self.codec.clone(),
        }
    }

    /// The configured signer.
    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// The configured codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// The configured signer, or a copy of it salted with `salt`.
    pub(crate) fn make_signer(&self, salt: Option<&str>) -> Cow<'_, S> {
        match salt {
            Some(salt) => Cow::Owned(self.signer.salted(salt)),
            None => Cow::Borrowed(&self.signer),
        }
    }

    /// Encode `value` and sign the payload.
    ///
    /// # Errors
    ///
    /// [`Error::Serialization`] if the codec cannot encode `value`,
    /// [`Error::Crypto`] if the signer cannot operate.
    pub fn dumps<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, Error> {
        let payload = self.dump_payload(value)?;
        Ok(self.signer.sign(&payload)?)
    }

    /// [`dumps`](Self::dumps) into a writer.
    pub fn dump<T, W>(&self, value: &T, sink: &mut W) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
        W: Write,
    {
        let signed = self.dumps(value)?;
        sink.write_all(signed.as_bytes())?;
        Ok(())
    }

    /// Verify `signed` and decode its payload.
    ///
    /// # Errors
    ///
    /// Whatever the signer's `unsign` reports, or [`BadPayload`] if the
    /// verified payload does not decode.
    pub fn loads<T: DeserializeOwned>(&self, signed: &str) -> Result<T, Error> {
        let payload = self.signer.unsign(signed)?;
        Ok(self.load_payload(&payload)?)
    }

    /// [`loads`](Self::loads) from a reader.
    pub fn load<T, R>(&self, source: &mut R) -> Result<T, Error>
    where
        T: DeserializeOwned,
        R: Read,
    {
        self.loads(&read_all(source)?)
    }

    /// Load `signed` without failing on tampering.
    ///
    /// Returns `(true, Some(value))` when the signature verifies. Otherwise
    /// returns `(false, value)`, where `value` is a best-effort decode of the
    /// payload the failed check carried, or `None` when there is none or it
    /// does not decode. The value in a `false` result is untrusted.
    ///
    /// # Errors
    ///
    /// Only [`CryptoError`], when the signer itself cannot operate.
    pub fn loads_unsafe<T: DeserializeOwned>(
        &self,
        signed: &str,
    ) -> Result<(bool, Option<T>), CryptoError> {
        match self.loads(signed) {
            Ok(value) => Ok((true, Some(value))),
            Err(err) => self.recover(err),
        }
    }

    /// [`loads_unsafe`](Self::loads_unsafe) from a reader.
    pub fn load_unsafe<T, R>(&self, source: &mut R) -> Result<(bool, Option<T>), Error>
    where
        T: DeserializeOwned,
        R: Read,
    {
        Ok(self.loads_unsafe(&read_all(source)?)?)
    }

    pub(crate) fn dump_payload<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, Error> {
        self.codec
            .encode(value)
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    pub(crate) fn load_payload<T: DeserializeOwned>(&self, payload: &str) -> Result<T, BadPayload> {
        self.codec.decode(payload).map_err(|e| BadPayload {
            message: e.to_string(),
        })
    }

    /// Turn a failed load into the untrusted result of `loads_unsafe`.
    pub(crate) fn recover<T: DeserializeOwned>(
        &self,
        err: Error,
    ) -> Result<(bool, Option<T>), CryptoError> {
        let bad = match err {
            Error::Crypto(e) => return Err(e),
            Error::BadData(bad) => bad,
            _ => return Ok((false, None)),
        };
        let Some(payload) = bad.payload() else {
            return Ok((false, None));
        };
        match self.load_payload(payload) {
            Ok(value) => {
                tracing::debug!(reason = %bad, "recovered untrusted payload");
                Ok((false, Some(value)))
            }
            Err(e) => {
                tracing::debug!(reason = %bad, error = %e, "untrusted payload did not decode");
                Ok((false, None))
            }
        }
    }
}

pub(crate) fn read_all<R: Read>(source: &mut R) -> Result<String, Error> {
    let mut buf = String::new();
    source.read_to_string(&mut buf)?;
    Ok(buf)
}
