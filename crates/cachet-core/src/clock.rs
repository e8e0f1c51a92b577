//! # Signing Clock
//!
//! Timestamp signers never read the system time directly. They go through a
//! [`Clock`], so a deterministic [`FixedClock`] can stand in for
//! [`SystemClock`] wherever reproducible timestamps are needed.
//!
//! Timestamps on the wire are whole seconds since [`EPOCH`]
//! (2011-01-01T00:00:00Z) rather than since the Unix epoch.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// Reference epoch for wire timestamps: 2011-01-01T00:00:00Z, in Unix seconds.
pub const EPOCH: i64 = 1_293_840_000;

/// Source of the current instant for timestamp signing and expiry checks.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// The current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Whole seconds elapsed since [`EPOCH`].
    fn now_offset(&self) -> i64 {
        self.now().timestamp() - EPOCH
    }

    /// The UTC instant `offset` seconds after [`EPOCH`], or `None` if it is
    /// outside the representable range.
    fn to_instant(&self, offset: i64) -> Option<DateTime<Utc>> {
        EPOCH
            .checked_add(offset)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// The real-time clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A frozen clock that reports the same instant until it is explicitly moved.
///
/// Sub-second precision is discarded, matching the resolution of wire
/// timestamps.
#[derive(Debug)]
pub struct FixedClock {
    secs: AtomicI64,
}

impl FixedClock {
    /// Freeze the clock at `instant`.
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            secs: AtomicI64::new(instant.timestamp()),
        }
    }

    /// Move the frozen instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.secs.store(instant.timestamp(), Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let secs = self.secs.load(Ordering::SeqCst);
        // Only ever stored from a valid `DateTime<Utc>`.
        DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
