//! Analysis clock — the single source of "now" for expiry and
//! trailing-window checks.
//!
//! RULE: No component calls `Utc::now()` directly.
//! The assembler receives a `Clock` so tests can pin time.

use crate::types::Timestamp;
use chrono::{Duration, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Reads the system wall clock. Used by the runner.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock pinned to one instant. Advances only when told to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: Timestamp,
}

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        Self { now }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.now
    }
}
