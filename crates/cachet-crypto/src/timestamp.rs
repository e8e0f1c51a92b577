//! # Timestamp Signer
//!
//! Extends [`Signer`] with an embedded signing time:
//! `VALUE SEP TIMESTAMP SEP SIGNATURE`, where the signature covers
//! `VALUE SEP TIMESTAMP`. On verification a maximum age can be enforced.
//!
//! ## Failure Precedence
//!
//! A bad signature always wins over anything the timestamp says. When the
//! signature fails, the timestamp is still split off and decoded, but only so
//! it can be attached to the error for diagnostics. It is never used for an
//! expiry decision.

use std::sync::Arc;

use cachet_core::{
    bytes_to_int, int_to_bytes, urlsafe_b64_decode, urlsafe_b64_encode, BadData,
    BadTimeSignature, Clock, CryptoError, Error, SecretKey, SignatureExpired, SystemClock,
};
use chrono::{DateTime, Duration, Utc};

use crate::signer::{verdict, Signer, ValueSigner};

/// Produces and verifies `value.timestamp.signature` strings.
#[derive(Debug, Clone)]
pub struct TimestampSigner {
    signer: Signer,
    clock: Arc<dyn Clock>,
}

impl TimestampSigner {
    /// A timestamp signer with [`Signer::new`] defaults and the system clock.
    pub fn new(secret: impl Into<SecretKey>) -> Self {
        Self::from_signer(Signer::new(secret))
    }

    /// Wrap an already configured signer, reading time from the system clock.
    pub fn from_signer(signer: Signer) -> Self {
        Self {
            signer,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The underlying signer.
    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Seconds since the reference epoch, per this signer's clock.
    pub fn get_timestamp(&self) -> i64 {
        self.clock.now_offset()
    }

    /// The UTC instant of a wire timestamp.
    pub fn timestamp_to_instant(&self, ts: i64) -> Option<DateTime<Utc>> {
        self.clock.to_instant(ts)
    }

    /// Sign `value` together with the current time.
    pub fn sign(&self, value: &str) -> Result<String, CryptoError> {
        // Clocks set before the epoch encode as zero.
        let ts = u64::try_from(self.get_timestamp()).unwrap_or(0);
        let sep = self.signer.separator();
        let body = format!("{value}{sep}{}", urlsafe_b64_encode(&int_to_bytes(ts)));
        let signature = self.signer.get_signature(&body)?;
        Ok(format!("{body}{sep}{signature}"))
    }

    /// Verify `signed`, enforce `max_age` if given, and return the value.
    pub fn unsign(&self, signed: &str, max_age: Option<Duration>) -> Result<String, Error> {
        self.unsign_timestamped(signed, max_age)
            .map(|(value, _)| value)
    }

    /// Like [`unsign`](Self::unsign), also returning when the value was
    /// signed.
    ///
    /// # Errors
    ///
    /// - The original `BadSignature` if the signature fails and no timestamp
    ///   can be split off.
    /// - [`BadTimeSignature`] if the signature fails (carrying the value and
    ///   the claimed signing time), if the timestamp is missing, or if it is
    ///   malformed.
    /// - [`SignatureExpired`] if the signature is valid but older than
    ///   `max_age`.
    pub fn unsign_timestamped(
        &self,
        signed: &str,
        max_age: Option<Duration>,
    ) -> Result<(String, DateTime<Utc>), Error> {
        let sep = self.signer.separator();
        let (body, sig_err) = match self.signer.unsign(signed) {
            Ok(body) => (Some(body), None),
            Err(Error::BadData(BadData::Signature(e))) => (e.payload.clone(), Some(e)),
            Err(e) => return Err(e),
        };

        let Some((value, ts_enc)) = body.as_deref().and_then(|b| b.rsplit_once(sep)) else {
            if let Some(e) = sig_err {
                return Err(e.into());
            }
            return Err(BadTimeSignature {
                message: "timestamp missing".to_string(),
                payload: body.clone(),
                date_signed: None,
            }
            .into());
        };

        let decoded = self.decode_timestamp(ts_enc);

        if let Some(e) = sig_err {
            return Err(BadTimeSignature {
                message: e.message,
                payload: Some(value.to_string()),
                date_signed: decoded.map(|(_, at)| at),
            }
            .into());
        }

        let Some((ts, date_signed)) = decoded else {
            return Err(BadTimeSignature {
                message: "malformed timestamp".to_string(),
                payload: Some(value.to_string()),
                date_signed: None,
            }
            .into());
        };

        if let Some(max_age) = max_age {
            let age = self.get_timestamp() - ts;
            let limit = max_age.num_seconds();
            if age > limit {
                tracing::debug!(age, max_age = limit, "signature expired");
                return Err(SignatureExpired {
                    message: format!("signature age {age} > {limit} seconds"),
                    payload: value.to_string(),
                    date_signed,
                }
                .into());
            }
        }

        Ok((value.to_string(), date_signed))
    }

    /// `Ok(true)` iff [`unsign`](Self::unsign) succeeds.
    pub fn validate(&self, signed: &str, max_age: Option<Duration>) -> Result<bool, CryptoError> {
        verdict(self.unsign(signed, max_age))
    }

    fn decode_timestamp(&self, ts_enc: &str) -> Option<(i64, DateTime<Utc>)> {
        let bytes = urlsafe_b64_decode(ts_enc).ok()?;
        let ts = i64::try_from(bytes_to_int(&bytes).ok()?).ok()?;
        let at = self.timestamp_to_instant(ts)?;
        Some((ts, at))
    }
}

impl ValueSigner for TimestampSigner {
    fn sign(&self, value: &str) -> Result<String, CryptoError> {
        TimestampSigner::sign(self, value)
    }

    fn unsign(&self, signed: &str) -> Result<String, Error> {
        TimestampSigner::unsign(self, signed, None)
    }

    fn salted(&self, salt: &str) -> Self {
        Self {
            signer: self.signer.clone().with_salt(salt),
            clock: Arc::clone(&self.clock),
        }
    }
}
