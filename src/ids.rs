//! Identifier generation.
//!
//! Ids are derived from the wall clock and are only unique-ish: two records
//! created within the same millisecond receive the same id. Callers that
//! create records at a high rate must tolerate collisions.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of record identifiers.
pub trait IdSource: fmt::Debug {
    fn next_id(&self) -> i64;
}

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl IdSource for SystemClock {
    fn next_id(&self) -> i64 {
        generate_id()
    }
}

/// Always yields the same id.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl IdSource for FixedClock {
    fn next_id(&self) -> i64 {
        self.0
    }
}

/// Yields `start`, `start + step`, `start + 2 * step`, ...
#[derive(Debug)]
pub struct SequenceClock {
    next: AtomicI64,
    step: i64,
}

impl SequenceClock {
    pub fn new(start: i64, step: i64) -> Self {
        Self { next: AtomicI64::new(start), step }
    }
}

impl IdSource for SequenceClock {
    fn next_id(&self) -> i64 {
        self.next.fetch_add(self.step, Ordering::Relaxed)
    }
}

impl<T: IdSource + ?Sized> IdSource for &T {
    fn next_id(&self) -> i64 {
        (**self).next_id()
    }
}

impl<T: IdSource + ?Sized> IdSource for Box<T> {
    fn next_id(&self) -> i64 {
        (**self).next_id()
    }
}

/// Wall clock by default, or a deterministic sequence starting at `start`.
pub fn clock_from(start: Option<i64>) -> Box<dyn IdSource> {
    match start {
        Some(start) => Box::new(SequenceClock::new(start, 1)),
        None => Box::new(SystemClock),
    }
}

/// Reads the process clock and scales it to milliseconds.
pub fn generate_id() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
