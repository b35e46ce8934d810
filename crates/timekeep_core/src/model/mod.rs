//! Domain model for time tracking.
//!
//! # Responsibility
//! - Define the record contract shared by every stored collection.
//! - Define time entries and the projects they bill against.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId` assigned at creation.
//! - Updates are explicit per-field shallow merges.

pub mod project;
pub mod record;
pub mod time_entry;
