//! Record id generation.
//!
//! # Responsibility
//! - Define the injectable id source used by repositories and services.
//!
//! # Invariants
//! - Core logic never generates ids except through an `IdGenerator`.
//! - Generated ids are unique for the lifetime of the generator.

use crate::model::record::RecordId;
use uuid::Uuid;

/// Source of fresh record ids.
pub trait IdGenerator {
    fn generate(&self) -> RecordId;
}

impl<G: IdGenerator + ?Sized> IdGenerator for &G {
    fn generate(&self) -> RecordId {
        (**self).generate()
    }
}

/// Random v4 UUID ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn generate(&self) -> RecordId {
        RecordId::from(Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::{IdGenerator, UuidV4Generator};
    use std::collections::HashSet;

    #[test]
    fn uuid_generator_yields_distinct_uuid_shaped_ids() {
        let ids = (0..64)
            .map(|_| UuidV4Generator.generate())
            .collect::<HashSet<_>>();
        assert_eq!(ids.len(), 64);
        assert!(ids.iter().all(|id| id.is_uuid_like()));
    }
}
