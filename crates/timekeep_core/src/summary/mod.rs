//! Derived values for display: durations and monetary totals.
//!
//! # Responsibility
//! - Compute live and finished durations from entries.
//! - Price entries against project hourly rates.
//!
//! # Invariants
//! - Every function is pure; callers pass `now` explicitly.
//! - Malformed input degrades to empty labels or zero, never an error.

pub mod billing;
pub mod duration;

pub use billing::{entries_total_amount, entries_total_value};
pub use duration::{
    clock_time_label, entries_total_time, entry_duration_label, formatted_interval,
    live_formatted_interval,
};
