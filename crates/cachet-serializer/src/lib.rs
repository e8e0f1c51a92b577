//! # cachet-serializer — Signed Serialization
//!
//! Layers a payload codec over a signer:
//!
//! ```text
//! dumps: value --codec.encode--> payload --signer.sign--> wire string
//! loads: wire string --signer.unsign--> payload --codec.decode--> value
//! ```
//!
//! - [`Serializer`] signs with a plain [`Signer`](cachet_crypto::Signer) by
//!   default, and is generic over any [`ValueSigner`](cachet_crypto::ValueSigner).
//! - [`TimedSerializer`] always signs with a
//!   [`TimestampSigner`](cachet_crypto::TimestampSigner) and threads a maximum
//!   age through every read.
//! - [`JsonCodec`] is the default codec. [`UrlSafeCodec`] base64url-encodes
//!   another codec's output so the whole signed string is URL-safe.
//!
//! Reads come in two flavours: `loads`, which fails on any tampering, and
//! `loads_unsafe`, which always answers with an explicit trust flag and a
//! best-effort decode of whatever payload could be recovered.

pub mod codec;
pub mod serializer;
pub mod timed;

pub use codec::{CodecError, JsonCodec, PayloadCodec, UrlSafeCodec};
pub use serializer::{Serializer, DEFAULT_SALT};
pub use timed::TimedSerializer;
