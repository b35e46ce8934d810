//! Time entry use-case service.
//!
//! # Responsibility
//! - Enforce the single-open-entry rule when starting entries.
//! - Route entry mutations through the record repository and persist each
//!   one with a single store write.
//!
//! # Invariants
//! - `add_entry` never succeeds while another entry is open, and writes
//!   nothing when it fails.
//! - Under `OpenEntryPolicy::EnforceOnAdd`, updates do not re-check the
//!   single-open rule; clearing `end_time` may leave two entries open.
//! - Failed operations leave the stored collection unchanged.

use crate::clock::Clock;
use crate::ids::IdGenerator;
use crate::model::record::{RecordId, Upsert};
use crate::model::time_entry::{NewTimeEntry, OpenTimeEntry, TimeEntry, TimeEntryUpdate};
use crate::repo::record_repo::{RecordRepository, RepoError};
use crate::store::{ListStore, StoreError};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type EntryResult<T> = Result<T, EntryServiceError>;

/// When the single-open-entry rule is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenEntryPolicy {
    /// Only `add_entry` checks the rule.
    #[default]
    EnforceOnAdd,
    /// Updates that would raise the number of open entries above one are
    /// rejected too.
    EnforceOnEveryMutation,
}

/// Errors from entry service operations.
#[derive(Debug)]
pub enum EntryServiceError {
    /// Another entry is still running.
    AlreadyRunning,
    /// No entry has the requested id.
    NotFound(RecordId),
    /// Backing store failure.
    Store(StoreError),
}

impl Display for EntryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "there's already a timer running"),
            Self::NotFound(id) => write!(f, "time entry not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EntryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for EntryServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RepoError> for EntryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
        }
    }
}

/// Entry service over a list store, id generator and clock.
pub struct EntryService<S, G, C> {
    store: S,
    repo: RecordRepository<TimeEntry, G, C>,
    policy: OpenEntryPolicy,
}

impl<S, G, C> EntryService<S, G, C>
where
    S: ListStore<TimeEntry>,
    G: IdGenerator,
    C: Clock,
{
    pub fn new(store: S, ids: G, clock: C) -> Self {
        Self {
            store,
            repo: RecordRepository::new(ids, clock),
            policy: OpenEntryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: OpenEntryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> OpenEntryPolicy {
        self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current entries in store order.
    pub fn entries(&self) -> EntryResult<Vec<TimeEntry>> {
        Ok(self.store.all()?)
    }

    pub fn has_open_entry(&self) -> EntryResult<bool> {
        Ok(self.store.some(TimeEntry::is_open)?)
    }

    /// First open entry in store order.
    pub fn find_open_entry(&self) -> EntryResult<Option<OpenTimeEntry>> {
        let open = self.store.find(TimeEntry::is_open)?;
        Ok(open.as_ref().and_then(TimeEntry::as_open))
    }

    /// Starts a new entry.
    ///
    /// `start_time` defaults to now and `title` to empty.
    ///
    /// # Errors
    /// - `AlreadyRunning` when any stored entry is open.
    pub fn add_entry(&self, new_entry: Option<NewTimeEntry>) -> EntryResult<TimeEntry> {
        let mut draft = new_entry.unwrap_or_default();
        draft.start_time.get_or_insert_with(|| self.repo.clock().now());
        draft.title.get_or_insert_with(String::new);

        let result: EntryResult<TimeEntry> = self.store.try_update(|entries| {
            if entries.iter().any(TimeEntry::is_open) {
                return Err(EntryServiceError::AlreadyRunning);
            }
            let output = self.repo.add(&entries, Some(draft));
            Ok((output.values, output.new_value))
        });

        match &result {
            Ok(entry) => info!(
                "event=entry_add module=entry_service status=ok entry_id={} open={}",
                entry.id,
                entry.is_open()
            ),
            Err(err) => log_failure("entry_add", err),
        }
        result
    }

    /// Shallow-merges `update` into the entry it targets.
    ///
    /// # Errors
    /// - `NotFound` when no entry has `update.id`.
    /// - `AlreadyRunning` under `EnforceOnEveryMutation` when the update
    ///   would leave more than one entry open.
    pub fn update_entry(&self, update: TimeEntryUpdate) -> EntryResult<TimeEntry> {
        let result: EntryResult<TimeEntry> = self.store.try_update(|entries| {
            let output = self.repo.update(&entries, &update)?;
            self.check_open_count(&entries, &output.values)?;
            Ok((output.values, output.new_value))
        });

        match &result {
            Ok(entry) => info!(
                "event=entry_update module=entry_service status=ok entry_id={} open={}",
                entry.id,
                entry.is_open()
            ),
            Err(err) => log_failure("entry_update", err),
        }
        result
    }

    /// Applies `updates` in order with one store write.
    ///
    /// Unmatched ids are skipped. Returns the entries that changed, in input
    /// order.
    pub fn update_entries(&self, updates: &[TimeEntryUpdate]) -> EntryResult<Vec<TimeEntry>> {
        let result: EntryResult<Vec<TimeEntry>> = self.store.try_update(|entries| {
            let output = self.repo.update_many(&entries, updates);
            self.check_open_count(&entries, &output.values)?;
            Ok((output.values, output.new_values))
        });

        match &result {
            Ok(changed) => info!(
                "event=entry_update_many module=entry_service status=ok requested={} changed={}",
                updates.len(),
                changed.len()
            ),
            Err(err) => log_failure("entry_update_many", err),
        }
        result
    }

    /// Removes the entry with `id`; absent ids are ignored.
    pub fn delete_entry(&self, id: &RecordId) -> EntryResult<()> {
        let remaining = self.store.delete(id)?;
        info!(
            "event=entry_delete module=entry_service status=ok entry_id={} remaining={}",
            id,
            remaining.len()
        );
        Ok(())
    }

    /// Removes every listed entry with one store write. Returns what remains.
    ///
    /// Nothing is written when none of `ids` is stored.
    pub fn delete_entries(&self, ids: &[RecordId]) -> EntryResult<Vec<TimeEntry>> {
        let current = self.store.all()?;
        if !current.iter().any(|entry| ids.contains(&entry.id)) {
            return Ok(current);
        }

        let remaining = self.store.try_update(|entries| {
            let remaining = self.repo.delete_many(&entries, ids);
            Ok::<_, EntryServiceError>((remaining.clone(), remaining))
        })?;
        info!(
            "event=entry_delete_many module=entry_service status=ok requested={} remaining={}",
            ids.len(),
            remaining.len()
        );
        Ok(remaining)
    }

    /// Updates when the payload names an id, otherwise starts a new entry.
    pub fn add_or_update(&self, payload: impl Into<Upsert<TimeEntry>>) -> EntryResult<TimeEntry> {
        match payload.into() {
            Upsert::Update(update) => self.update_entry(update),
            Upsert::Create(draft) => self.add_entry(draft),
        }
    }

    fn check_open_count(&self, before: &[TimeEntry], after: &[TimeEntry]) -> EntryResult<()> {
        if self.policy == OpenEntryPolicy::EnforceOnAdd {
            return Ok(());
        }

        let open_before = count_open(before);
        let open_after = count_open(after);
        if open_after > 1 && open_after > open_before {
            return Err(EntryServiceError::AlreadyRunning);
        }
        Ok(())
    }
}

fn count_open(entries: &[TimeEntry]) -> usize {
    entries.iter().filter(|entry| entry.is_open()).count()
}

fn log_failure(event: &str, err: &EntryServiceError) {
    match err {
        EntryServiceError::AlreadyRunning => warn!(
            "event={event} module=entry_service status=rejected error_code=already_running"
        ),
        EntryServiceError::NotFound(id) => warn!(
            "event={event} module=entry_service status=rejected error_code=not_found entry_id={id}"
        ),
        EntryServiceError::Store(store_err) => error!(
            "event={event} module=entry_service status=error error_code=store_failed error={store_err}"
        ),
    }
}
