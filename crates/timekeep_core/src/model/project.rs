//! Project domain model.
//!
//! # Invariants
//! - `rate` is currency per hour when `rate_type` is `Hourly` or unset.
//! - A project without `rate` bills nothing.

use crate::model::record::{
    deserialize_patch_field, merge_clearable, Record, RecordId, RecordUpdate, Timestamp, Upsert,
};
use serde::{Deserialize, Serialize};

/// How `Project::rate` is applied. Only hourly billing exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateType {
    Hourly,
}

/// Billable grouping that time entries refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub rate_type: Option<RateType>,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub rate_type: Option<RateType>,
}

/// Partial update for one project. `rate` and `rate_type` are clearable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_patch_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub rate: Option<Option<f64>>,
    #[serde(
        default,
        deserialize_with = "deserialize_patch_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub rate_type: Option<Option<RateType>>,
}

impl ProjectUpdate {
    pub fn for_id(id: RecordId) -> Self {
        Self {
            id,
            title: None,
            rate: None,
            rate_type: None,
        }
    }
}

impl RecordUpdate for ProjectUpdate {
    fn target_id(&self) -> &RecordId {
        &self.id
    }
}

impl Record for Project {
    type Draft = NewProject;
    type Update = ProjectUpdate;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    fn from_draft(id: RecordId, created_at: Timestamp, draft: NewProject) -> Self {
        Self {
            id,
            title: draft.title.unwrap_or_default(),
            rate: draft.rate,
            rate_type: draft.rate_type,
            created_at,
            updated_at: None,
        }
    }

    fn merged(&self, update: &ProjectUpdate, at: Timestamp) -> Self {
        Self {
            id: self.id.clone(),
            title: update.title.clone().unwrap_or_else(|| self.title.clone()),
            rate: merge_clearable(&self.rate, &update.rate),
            rate_type: merge_clearable(&self.rate_type, &update.rate_type),
            created_at: self.created_at,
            updated_at: Some(at),
        }
    }
}

impl From<NewProject> for Upsert<Project> {
    fn from(value: NewProject) -> Self {
        Upsert::Create(Some(value))
    }
}

impl From<ProjectUpdate> for Upsert<Project> {
    fn from(value: ProjectUpdate) -> Self {
        Upsert::Update(value)
    }
}
