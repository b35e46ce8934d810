//! Project use-case service.
//!
//! # Responsibility
//! - Provide project CRUD through the generic record repository.
//!
//! # Invariants
//! - Deleting a project never touches entries that reference it; entries
//!   keep a dangling `project_id` and bill at zero.

use crate::clock::Clock;
use crate::ids::IdGenerator;
use crate::model::project::{NewProject, Project, ProjectUpdate};
use crate::model::record::{RecordId, Upsert};
use crate::repo::record_repo::{RecordRepository, RepoError};
use crate::store::{ListStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProjectResult<T> = Result<T, ProjectServiceError>;

#[derive(Debug)]
pub enum ProjectServiceError {
    NotFound(RecordId),
    Store(StoreError),
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "project with id {id} does not exist"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<StoreError> for ProjectServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RepoError> for ProjectServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
        }
    }
}

pub struct ProjectService<S, G, C> {
    store: S,
    repo: RecordRepository<Project, G, C>,
}

impl<S, G, C> ProjectService<S, G, C>
where
    S: ListStore<Project>,
    G: IdGenerator,
    C: Clock,
{
    pub fn new(store: S, ids: G, clock: C) -> Self {
        Self {
            store,
            repo: RecordRepository::new(ids, clock),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn projects(&self) -> ProjectResult<Vec<Project>> {
        Ok(self.store.all()?)
    }

    pub fn get_project(&self, id: &RecordId) -> ProjectResult<Option<Project>> {
        Ok(self.store.find(|project| &project.id == id)?)
    }

    pub fn has_project(&self, id: &RecordId) -> ProjectResult<bool> {
        Ok(self.store.some(|project| &project.id == id)?)
    }

    /// Creates a project; an absent draft yields an untitled, unrated one.
    pub fn add_project(&self, new_project: Option<NewProject>) -> ProjectResult<Project> {
        let project = self.store.try_update(|projects| {
            let output = self.repo.add(&projects, new_project);
            Ok::<_, ProjectServiceError>((output.values, output.new_value))
        })?;
        info!(
            "event=project_add module=project_service status=ok project_id={}",
            project.id
        );
        Ok(project)
    }

    /// # Errors
    /// - `NotFound` when no project has `update.id`.
    pub fn update_project(&self, update: ProjectUpdate) -> ProjectResult<Project> {
        let result: ProjectResult<Project> = self.store.try_update(|projects| {
            let output = self.repo.update(&projects, &update)?;
            Ok((output.values, output.new_value))
        });

        match &result {
            Ok(project) => info!(
                "event=project_update module=project_service status=ok project_id={}",
                project.id
            ),
            Err(err) => warn!(
                "event=project_update module=project_service status=rejected project_id={} error={err}",
                update.id
            ),
        }
        result
    }

    /// Removes the project with `id`; absent ids are ignored.
    pub fn delete_project(&self, id: &RecordId) -> ProjectResult<Vec<Project>> {
        let remaining = self.store.delete(id)?;
        info!(
            "event=project_delete module=project_service status=ok project_id={} remaining={}",
            id,
            remaining.len()
        );
        Ok(remaining)
    }

    pub fn add_or_update(&self, payload: impl Into<Upsert<Project>>) -> ProjectResult<Project> {
        match payload.into() {
            Upsert::Update(update) => self.update_project(update),
            Upsert::Create(draft) => self.add_project(draft),
        }
    }
}
