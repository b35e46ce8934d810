//! Shared record shape for every stored collection.
//!
//! # Responsibility
//! - Define the identity/timestamp contract all stored records satisfy.
//! - Define how drafts become records and how updates merge into records.
//!
//! # Invariants
//! - `id` and `created_at` are assigned once, at creation, and never change.
//! - `updated_at` is stamped by the core on every merge, never by callers.
//! - Merges are shallow: fields absent from an update keep their value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Instant type used for every stored timestamp.
pub type Timestamp = DateTime<Utc>;

/// Stable identifier for a stored record.
///
/// Generated ids are hyphenated UUID strings. Ids read back from storage or
/// supplied by callers are kept verbatim, so lookups by a malformed id simply
/// miss instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Accepts `value` only if it has exactly five dash-separated segments.
    ///
    /// This is a shape check, not a UUID grammar check.
    pub fn parse_loose(value: &str) -> Option<Self> {
        if looks_like_uuid(value) {
            Some(Self(value.to_string()))
        } else {
            None
        }
    }

    /// Whether this id has the five-segment UUID shape.
    pub fn is_uuid_like(&self) -> bool {
        looks_like_uuid(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn looks_like_uuid(value: &str) -> bool {
    value.split('-').count() == 5
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Uuid> for RecordId {
    fn from(value: Uuid) -> Self {
        Self(value.hyphenated().to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A stored, identifiable, timestamped value.
pub trait Record: Clone {
    /// Creation input. Carries no id: ids are always generated.
    type Draft: Default;
    /// Partial update addressed to one record by id.
    type Update: RecordUpdate;

    fn id(&self) -> &RecordId;
    fn created_at(&self) -> Timestamp;
    fn updated_at(&self) -> Option<Timestamp>;

    /// Builds a new record from a draft. Draft fields left unset take the
    /// record type's defaults.
    fn from_draft(id: RecordId, created_at: Timestamp, draft: Self::Draft) -> Self;

    /// Returns a copy of `self` with every field present in `update` replaced
    /// and `updated_at` set to `at`.
    fn merged(&self, update: &Self::Update, at: Timestamp) -> Self;
}

/// Update shapes name their target by id.
pub trait RecordUpdate {
    fn target_id(&self) -> &RecordId;
}

/// Creation-or-update payload, dispatched on whether an id is present.
pub enum Upsert<T: Record> {
    Create(Option<T::Draft>),
    Update(T::Update),
}

/// Deserializes a clearable field: missing -> `None`, `null` -> `Some(None)`,
/// value -> `Some(Some(value))`.
///
/// Pair with `#[serde(default)]` so a missing key still yields `None`.
pub fn deserialize_patch_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Applies one clearable field of an update onto its current value.
pub(crate) fn merge_clearable<T: Clone>(current: &Option<T>, patch: &Option<Option<T>>) -> Option<T> {
    match patch {
        Some(value) => value.clone(),
        None => current.clone(),
    }
}
