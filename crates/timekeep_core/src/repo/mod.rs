//! Repository layer over stored collections.
//!
//! # Responsibility
//! - Provide domain-agnostic CRUD primitives for any `Record` collection.
//! - Keep id/timestamp stamping in one place.
//!
//! # Invariants
//! - Repository operations are pure over their inputs apart from reading the
//!   injected id generator and clock.
//! - Semantic failures (`NotFound`) are values, never panics.

pub mod record_repo;
