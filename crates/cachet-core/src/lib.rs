//! # cachet-core — Foundational Types for cachet
//!
//! The leaf of the cachet workspace. Everything that both the signers and the
//! serializers need lives here, and nothing here knows about either of them.
//!
//! - **Encoding**: URL-safe unpadded base64, minimal big-endian integer
//!   encoding, and constant-time byte comparison.
//! - **Clock**: the `Clock` capability that timestamp signers read the current
//!   instant from, together with the fixed reference [`EPOCH`].
//! - **Secret keys**: [`SecretKey`], a zeroizing newtype that never prints
//!   its contents.
//! - **Errors**: the layered [`BadData`] taxonomy and the top-level [`Error`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cachet-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod clock;
pub mod encoding;
pub mod error;
pub mod secret;

// Re-export primary types for ergonomic imports.
pub use clock::{Clock, FixedClock, SystemClock, EPOCH};
pub use encoding::{
    bytes_to_int, constant_time_equal, int_to_bytes, urlsafe_b64_decode, urlsafe_b64_encode,
};
pub use error::{
    BadData, BadPayload, BadSignature, BadTimeSignature, CryptoError, DecodeError, Error,
    SignatureExpired,
};
pub use secret::SecretKey;
