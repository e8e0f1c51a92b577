//! # Timed Serializer
//!
//! A [`Serializer`] whose signer is always a [`TimestampSigner`], so every
//! dumped value carries its signing time and every read can enforce a
//! maximum age.

use std::io::{Read, Write};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use cachet_core::{Clock, CryptoError, Error, SecretKey};
use cachet_crypto::{Signer, TimestampSigner};

use crate::codec::{JsonCodec, PayloadCodec};
use crate::serializer::{read_all, Serializer, DEFAULT_SALT};

/// Signs structured values together with their signing time.
#[derive(Debug, Clone)]
pub struct TimedSerializer<C = JsonCodec> {
    inner: Serializer<TimestampSigner, C>,
}

impl TimedSerializer {
    /// JSON payloads, signed with [`TimestampSigner`] defaults and salt
    /// [`DEFAULT_SALT`].
    pub fn new(secret: impl Into<SecretKey>) -> Self {
        let signer = TimestampSigner::from_signer(Signer::new(secret).with_salt(DEFAULT_SALT));
        Self::from_parts(signer, JsonCodec)
    }
}

impl<C: PayloadCodec> TimedSerializer<C> {
    /// Assemble a timed serializer from a configured signer and a codec.
    pub fn from_parts(signer: TimestampSigner, codec: C) -> Self {
        Self {
            inner: Serializer::from_parts(signer, codec),
        }
    }

    /// The same serializer with a different codec.
    pub fn with_codec<C2: PayloadCodec>(self, codec: C2) -> TimedSerializer<C2> {
        TimedSerializer {
            inner: self.inner.with_codec(codec),
        }
    }

    /// Replace the clock used for signing and for age checks.
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        let codec = self.inner.codec().clone();
        let signer = self.inner.signer().clone().with_clock(clock);
        Self::from_parts(signer, codec)
    }

    /// A copy of this serializer whose signer uses `salt`.
    pub fn with_salt(&self, salt: &str) -> Self {
        Self {
            inner: self.inner.with_salt(salt),
        }
    }

    /// The configured signer.
    pub fn signer(&self) -> &TimestampSigner {
        self.inner.signer()
    }

    /// Encode `value` and sign the payload with the current time.
    pub fn dumps<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, Error> {
        self.inner.dumps(value)
    }

    /// [`dumps`](Self::dumps) into a writer.
    pub fn dump<T, W>(&self, value: &T, sink: &mut W) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
        W: Write,
    {
        self.inner.dump(value, sink)
    }

    /// Verify `signed`, enforce `max_age` if given, and decode the payload.
    pub fn loads<T: DeserializeOwned>(
        &self,
        signed: &str,
        max_age: Option<Duration>,
    ) -> Result<T, Error> {
        self.loads_timestamped(signed, max_age)
            .map(|(value, _)| value)
    }

    /// Like [`loads`](Self::loads), also returning when the value was signed.
    pub fn loads_timestamped<T: DeserializeOwned>(
        &self,
        signed: &str,
        max_age: Option<Duration>,
    ) -> Result<(T, DateTime<Utc>), Error> {
        let (payload, date_signed) = self.signer().unsign_timestamped(signed, max_age)?;
        let value = self.inner.load_payload(&payload)?;
        Ok((value, date_signed))
    }

    /// [`loads`](Self::loads) from a reader.
    pub fn load<T, R>(&self, source: &mut R, max_age: Option<Duration>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        R: Read,
    {
        self.loads(&read_all(source)?, max_age)
    }

    /// [`loads_timestamped`](Self::loads_timestamped) from a reader.
    pub fn load_timestamped<T, R>(
        &self,
        source: &mut R,
        max_age: Option<Duration>,
    ) -> Result<(T, DateTime<Utc>), Error>
    where
        T: DeserializeOwned,
        R: Read,
    {
        self.loads_timestamped(&read_all(source)?, max_age)
    }

    /// Load `signed` without failing on tampering or expiry.
    ///
    /// An expired value whose signature is intact comes back as
    /// `(false, Some(value))`.
    pub fn loads_unsafe<T: DeserializeOwned>(
        &self,
        signed: &str,
        max_age: Option<Duration>,
    ) -> Result<(bool, Option<T>), CryptoError> {
        match self.loads(signed, max_age) {
            Ok(value) => Ok((true, Some(value))),
            Err(err) => self.inner.recover(err),
        }
    }

    /// [`loads_unsafe`](Self::loads_unsafe) from a reader.
    pub fn load_unsafe<T, R>(
        &self,
        source: &mut R,
        max_age: Option<Duration>,
    ) -> Result<(bool, Option<T>), Error>
    where
        T: DeserializeOwned,
        R: Read,
    {
        Ok(self.loads_unsafe(&read_all(source)?, max_age)?)
    }

    /// Like [`loads_unsafe`](Self::loads_unsafe), also returning when the
    /// value was signed.
    ///
    /// After a failed check the pair is present only if both the payload and
    /// its claimed signing time were recovered. Both are untrusted.
    pub fn loads_unsafe_timestamped<T: DeserializeOwned>(
        &self,
        signed: &str,
        max_age: Option<Duration>,
    ) -> Result<(bool, Option<(T, DateTime<Utc>)>), CryptoError> {
        let err = match self.loads_timestamped(signed, max_age) {
            Ok(pair) => return Ok((true, Some(pair))),
            Err(err) => err,
        };
        let date_signed = match &err {
            Error::BadData(bad) => bad.date_signed(),
            _ => None,
        };
        let (_, value) = self.inner.recover::<T>(err)?;
        Ok((false, value.zip(date_signed)))
    }

    /// [`loads_unsafe_timestamped`](Self::loads_unsafe_timestamped) from a
    /// reader.
    pub fn load_unsafe_timestamped<T, R>(
        &self,
        source: &mut R,
        max_age: Option<Duration>,
    ) -> Result<(bool, Option<(T, DateTime<Utc>)>), Error>
    where
        T: DeserializeOwned,
        R: Read,
    {
        Ok(self.loads_unsafe_timestamped(&read_all(source)?, max_age)?)
    }
}
