//! # cachet-crypto — Signing Primitives
//!
//! Turns a shared secret into signed strings and back:
//!
//! - [`DigestMethod`]: the hash family (SHA-1 by default) used both for key
//!   derivation and inside HMAC.
//! - [`SigningAlgorithm`]: how a raw signature is produced from a derived
//!   key: `Hmac(digest)` or `None`.
//! - [`KeyDerivation`]: how the signing key is derived from secret + salt.
//! - [`Signer`]: produces and verifies `value.signature`.
//! - [`TimestampSigner`]: produces and verifies `value.timestamp.signature`,
//!   with optional maximum age.
//! - [`SignerConfig`]: the non-secret part of a signer, loadable from serde
//!   formats or the environment.
//!
//! Both signers implement [`ValueSigner`], the seam the serializers build on.
//!
//! ## Crate Policy
//!
//! - Depends only on `cachet-core` internally.
//! - Derived keys are recomputed on every call and never stored.
//! - Secrets never reach `tracing` fields or `Debug` output.

pub mod algorithm;
pub mod config;
pub mod derivation;
pub mod digest;
pub mod signer;
pub mod timestamp;

pub use algorithm::{AlgorithmKind, SigningAlgorithm};
pub use config::SignerConfig;
pub use derivation::KeyDerivation;
pub use digest::DigestMethod;
pub use signer::{Signer, ValueSigner, DEFAULT_SALT, DEFAULT_SEPARATOR};
pub use timestamp::TimestampSigner;
