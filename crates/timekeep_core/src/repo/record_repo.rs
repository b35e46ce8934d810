//! Generic record repository over in-memory collections.
//!
//! # Responsibility
//! - Provide add/update/delete/find primitives for any `Record` type.
//! - Stamp ids and timestamps through injected `IdGenerator`/`Clock`.
//!
//! # Invariants
//! - Collections are values: every operation reads `&[T]` and returns a new
//!   `Vec<T>`. The caller's slice is never modified.
//! - `add` always assigns a freshly generated id.
//! - `update` preserves ordering and replaces the matched element in place
//!   within the returned collection.
//! - Deleting an absent id is a no-op, not an error.

use crate::clock::Clock;
use crate::ids::IdGenerator;
use crate::model::record::{Record, RecordId, RecordUpdate, Upsert};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository-level failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    NotFound(RecordId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "record with id {id} does not exist"),
        }
    }
}

impl Error for RepoError {}

/// Result of a single-record write: the full new collection plus the record
/// that was written.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutput<T> {
    pub values: Vec<T>,
    pub new_value: T,
}

/// Result of a batch update. `new_values` holds only records that matched,
/// in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateManyOutput<T> {
    pub values: Vec<T>,
    pub new_values: Vec<T>,
}

/// Stateless repository bound to one record type.
pub struct RecordRepository<T, G, C> {
    ids: G,
    clock: C,
    _record: PhantomData<fn() -> T>,
}

impl<T, G, C> RecordRepository<T, G, C>
where
    T: Record,
    G: IdGenerator,
    C: Clock,
{
    pub fn new(ids: G, clock: C) -> Self {
        Self {
            ids,
            clock,
            _record: PhantomData,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn has_record(&self, records: &[T], id: &RecordId) -> bool {
        records.iter().any(|record| record.id() == id)
    }

    /// Returns the record with exactly `id`, if any.
    pub fn get<'r>(&self, records: &'r [T], id: &RecordId) -> Option<&'r T> {
        records.iter().find(|record| record.id() == id)
    }

    /// Appends a new record built from `draft` (or type defaults).
    pub fn add(&self, records: &[T], draft: Option<T::Draft>) -> WriteOutput<T> {
        let new_value = T::from_draft(
            self.ids.generate(),
            self.clock.now(),
            draft.unwrap_or_default(),
        );

        let mut values = Vec::with_capacity(records.len() + 1);
        values.extend_from_slice(records);
        values.push(new_value.clone());

        WriteOutput { values, new_value }
    }

    /// Shallow-merges `update` onto the record it targets.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no record has `update`'s id.
    pub fn update(&self, records: &[T], update: &T::Update) -> RepoResult<WriteOutput<T>> {
        let id = update.target_id();
        let index = records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| RepoError::NotFound(id.clone()))?;

        let new_value = records[index].merged(update, self.clock.now());
        let mut values = records.to_vec();
        values[index] = new_value.clone();

        Ok(WriteOutput { values, new_value })
    }

    /// Applies each update in order; unmatched ids are skipped.
    ///
    /// Later updates see the result of earlier ones, so two updates for the
    /// same id both apply and both appear in `new_values`.
    pub fn update_many(&self, records: &[T], updates: &[T::Update]) -> UpdateManyOutput<T> {
        let mut values = records.to_vec();
        let mut new_values = Vec::new();
        let at = self.clock.now();

        for update in updates {
            let id = update.target_id();
            let Some(index) = values.iter().position(|record| record.id() == id) else {
                continue;
            };
            let new_value = values[index].merged(update, at);
            values[index] = new_value.clone();
            new_values.push(new_value);
        }

        UpdateManyOutput { values, new_values }
    }

    /// Removes the record with `id`. Absent ids leave the collection as is.
    pub fn delete_one(&self, records: &[T], id: &RecordId) -> Vec<T> {
        records
            .iter()
            .filter(|record| record.id() != id)
            .cloned()
            .collect()
    }

    /// Removes every record whose id is listed.
    pub fn delete_many(&self, records: &[T], ids: &[RecordId]) -> Vec<T> {
        records
            .iter()
            .filter(|record| !ids.contains(record.id()))
            .cloned()
            .collect()
    }

    /// Keeps only records whose id is listed.
    ///
    /// This is the filter older stored-collection code ran under the name
    /// "delete many"; kept for callers migrating from it.
    pub fn retain_many(&self, records: &[T], ids: &[RecordId]) -> Vec<T> {
        records
            .iter()
            .filter(|record| ids.contains(record.id()))
            .cloned()
            .collect()
    }

    /// Dispatches to `update` for update payloads and `add` otherwise.
    pub fn add_or_update(&self, records: &[T], payload: Upsert<T>) -> RepoResult<WriteOutput<T>> {
        match payload {
            Upsert::Update(update) => self.update(records, &update),
            Upsert::Create(draft) => Ok(self.add(records, draft)),
        }
    }
}
