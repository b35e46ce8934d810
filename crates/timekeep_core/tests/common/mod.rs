//! Shared fixtures for integration tests.
#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use std::cell::Cell;
use timekeep_core::{Clock, IdGenerator, RecordId, Timestamp};

/// Yields `00000000-0000-4000-8000-00000000000N` style ids in order.
#[derive(Default)]
pub struct SequentialIds {
    issued: Cell<u64>,
}

impl SequentialIds {
    pub fn issued(&self) -> u64 {
        self.issued.get()
    }
}

impl IdGenerator for SequentialIds {
    fn generate(&self) -> RecordId {
        let next = self.issued.get() + 1;
        self.issued.set(next);
        RecordId::from(format!("00000000-0000-4000-8000-{next:012}"))
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    pub fn starting_at(now: Timestamp) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_at(t0())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

pub fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 9, 2, 9, 0, 0).unwrap()
}
