//! Core use-case services.
//!
//! # Responsibility
//! - Apply domain rules on top of the generic record repository.
//! - Persist through a `ListStore` so callers never touch storage details.

pub mod entry_service;
pub mod project_service;
