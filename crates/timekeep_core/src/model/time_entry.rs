//! Time entry domain model.
//!
//! # Responsibility
//! - Define the stored entry shape and its creation/update inputs.
//! - Define the open-entry projection used by the running timer.
//!
//! # Invariants
//! - An entry is open exactly when `end_time` is `None`.
//! - `project_id` is a back-reference only; entries never own projects.
//! - At most one entry in a collection should be open. The entry service
//!   enforces this; the model does not.

use crate::model::record::{
    deserialize_patch_field, merge_clearable, Record, RecordId, RecordUpdate, Timestamp, Upsert,
};
use serde::{Deserialize, Serialize};

/// One timed unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: RecordId,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub title: String,
    pub start_time: Timestamp,
    /// `None` while the entry is running.
    #[serde(default)]
    pub end_time: Option<Timestamp>,
    #[serde(default)]
    pub project_id: Option<RecordId>,
}

impl TimeEntry {
    /// Whether this entry is still running.
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Returns the open projection, or `None` when the entry has ended.
    pub fn as_open(&self) -> Option<OpenTimeEntry> {
        if !self.is_open() {
            return None;
        }
        Some(OpenTimeEntry {
            id: self.id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            title: self.title.clone(),
            start_time: self.start_time,
            project_id: self.project_id.clone(),
        })
    }
}

/// A running entry. Same shape as [`TimeEntry`] without `end_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenTimeEntry {
    pub id: RecordId,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
    pub title: String,
    pub start_time: Timestamp,
    pub project_id: Option<RecordId>,
}

/// Input for creating an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimeEntry {
    #[serde(default)]
    pub title: Option<String>,
    /// Defaults to the creation instant.
    #[serde(default)]
    pub start_time: Option<Timestamp>,
    #[serde(default)]
    pub end_time: Option<Timestamp>,
    #[serde(default)]
    pub project_id: Option<RecordId>,
}

/// Partial update for one entry.
///
/// `end_time` and `project_id` are clearable: `Some(None)` removes the value.
/// Clearing `end_time` reopens the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntryUpdate {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Timestamp>,
    #[serde(
        default,
        deserialize_with = "deserialize_patch_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<Option<Timestamp>>,
    #[serde(
        default,
        deserialize_with = "deserialize_patch_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub project_id: Option<Option<RecordId>>,
}

impl TimeEntryUpdate {
    /// Update that touches nothing but `updated_at`.
    pub fn for_id(id: RecordId) -> Self {
        Self {
            id,
            title: None,
            start_time: None,
            end_time: None,
            project_id: None,
        }
    }

    /// Whether applying this update leaves the target open.
    ///
    /// `None` when the update does not touch `end_time`.
    pub fn leaves_open(&self) -> Option<bool> {
        self.end_time.as_ref().map(Option::is_none)
    }
}

impl RecordUpdate for TimeEntryUpdate {
    fn target_id(&self) -> &RecordId {
        &self.id
    }
}

impl Record for TimeEntry {
    type Draft = NewTimeEntry;
    type Update = TimeEntryUpdate;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    fn from_draft(id: RecordId, created_at: Timestamp, draft: NewTimeEntry) -> Self {
        Self {
            id,
            created_at,
            updated_at: None,
            title: draft.title.unwrap_or_default(),
            start_time: draft.start_time.unwrap_or(created_at),
            end_time: draft.end_time,
            project_id: draft.project_id,
        }
    }

    fn merged(&self, update: &TimeEntryUpdate, at: Timestamp) -> Self {
        Self {
            id: self.id.clone(),
            created_at: self.created_at,
            updated_at: Some(at),
            title: update.title.clone().unwrap_or_else(|| self.title.clone()),
            start_time: update.start_time.unwrap_or(self.start_time),
            end_time: merge_clearable(&self.end_time, &update.end_time),
            project_id: merge_clearable(&self.project_id, &update.project_id),
        }
    }
}

/// Entry payload as sent by a UI: an update when `id` is present, otherwise
/// a create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TimeEntryPayload {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_time: Option<Timestamp>,
    #[serde(default, deserialize_with = "deserialize_patch_field")]
    pub end_time: Option<Option<Timestamp>>,
    #[serde(default, deserialize_with = "deserialize_patch_field")]
    pub project_id: Option<Option<RecordId>>,
}

impl From<TimeEntryPayload> for Upsert<TimeEntry> {
    fn from(value: TimeEntryPayload) -> Self {
        match value.id {
            Some(id) => Upsert::Update(TimeEntryUpdate {
                id,
                title: value.title,
                start_time: value.start_time,
                end_time: value.end_time,
                project_id: value.project_id,
            }),
            None => Upsert::Create(Some(NewTimeEntry {
                title: value.title,
                start_time: value.start_time,
                end_time: value.end_time.flatten(),
                project_id: value.project_id.flatten(),
            })),
        }
    }
}

impl From<NewTimeEntry> for Upsert<TimeEntry> {
    fn from(value: NewTimeEntry) -> Self {
        Upsert::Create(Some(value))
    }
}

impl From<TimeEntryUpdate> for Upsert<TimeEntry> {
    fn from(value: TimeEntryUpdate) -> Self {
        Upsert::Update(value)
    }
}
