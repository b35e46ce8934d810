//! Backing stores for record collections.
//!
//! # Responsibility
//! - Define the `ListStore` capability services persist through.
//! - Provide in-memory and SQLite implementations.
//! - Notify subscribers with the full snapshot after every write.
//!
//! # Invariants
//! - A write is read-modify-write over the whole collection; readers never
//!   see a partially applied transform.
//! - A refused `try_update` transform writes nothing and notifies nobody.
//! - Stores are single-threaded (`!Sync`); turns never interleave.

use crate::db::DbError;
use crate::model::record::{Record, RecordId};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryListStore;
pub use sqlite::SqliteListStore;

/// Collection name for time entries.
pub const ENTRY_COLLECTION: &str = "entry";
/// Collection name for projects.
pub const PROJECT_COLLECTION: &str = "project";

pub type StoreResult<T> = Result<T, StoreError>;

/// Backing-store failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialization(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "failed to serialize collection: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Change listener; receives the collection snapshot after each write.
pub type Listener<T> = Rc<dyn Fn(&[T])>;

/// Persistence and change-notification capability for one collection.
pub trait ListStore<T: Record> {
    /// Current snapshot in store order.
    fn all(&self) -> StoreResult<Vec<T>>;

    /// Runs `transform` over the current collection and persists its output.
    ///
    /// When `transform` returns `Err`, nothing is written and nobody is
    /// notified.
    fn try_update<F, R, E>(&self, transform: F) -> Result<R, E>
    where
        F: FnOnce(Vec<T>) -> Result<(Vec<T>, R), E>,
        E: From<StoreError>;

    fn subscribe(&self, listener: Listener<T>) -> Subscription;

    /// Returns `false` when `subscription` was not active.
    fn unsubscribe(&self, subscription: Subscription) -> bool;

    fn find<P>(&self, predicate: P) -> StoreResult<Option<T>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self.all()?.into_iter().find(|item| predicate(item)))
    }

    fn some<P>(&self, predicate: P) -> StoreResult<bool>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self.all()?.iter().any(predicate))
    }

    /// Replaces the collection with `transform(current)`.
    fn update<F>(&self, transform: F) -> StoreResult<()>
    where
        F: FnOnce(Vec<T>) -> Vec<T>,
    {
        self.try_update(|current| Ok::<_, StoreError>((transform(current), ())))
    }

    /// Replaces the whole collection.
    fn set(&self, items: Vec<T>) -> StoreResult<()> {
        self.update(|_| items)
    }

    /// Removes the record with `id` and returns what remains.
    ///
    /// An absent id writes nothing.
    fn delete(&self, id: &RecordId) -> StoreResult<Vec<T>> {
        let current = self.all()?;
        if !current.iter().any(|item| item.id() == id) {
            return Ok(current);
        }

        self.try_update(|items| {
            let remaining = items
                .into_iter()
                .filter(|item| item.id() != id)
                .collect::<Vec<_>>();
            Ok::<_, StoreError>((remaining.clone(), remaining))
        })
    }
}

/// Subscriber registry shared by store implementations.
pub(crate) struct Listeners<T> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(Subscription, Listener<T>)>>,
}

impl<T> Listeners<T> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn add(&self, listener: Listener<T>) -> Subscription {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let subscription = Subscription(id);
        self.entries.borrow_mut().push((subscription, listener));
        subscription
    }

    pub(crate) fn remove(&self, subscription: Subscription) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(active, _)| *active != subscription);
        entries.len() != before
    }

    /// Calls every listener with `snapshot`.
    ///
    /// Listeners are cloned out first so a listener may subscribe or
    /// unsubscribe while being notified.
    pub(crate) fn notify(&self, snapshot: &[T]) {
        let listeners = self
            .entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect::<Vec<_>>();
        for listener in listeners {
            listener(snapshot);
        }
    }
}
