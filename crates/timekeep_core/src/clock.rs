//! Time source for record stamping.
//!
//! Services and repositories read the current instant only through a `Clock`,
//! so stamping is deterministic under test.

use crate::model::record::Timestamp;
use chrono::Utc;

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Wall-clock UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}
