//! In-memory list store.

use crate::model::record::Record;
use crate::store::{ListStore, Listener, Listeners, StoreError, StoreResult, Subscription};
use std::cell::RefCell;

/// Collection held in process memory. Nothing survives the process.
pub struct MemoryListStore<T> {
    items: RefCell<Vec<T>>,
    listeners: Listeners<T>,
}

impl<T: Record> MemoryListStore<T> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: RefCell::new(items),
            listeners: Listeners::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl<T: Record> Default for MemoryListStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> ListStore<T> for MemoryListStore<T> {
    fn all(&self) -> StoreResult<Vec<T>> {
        Ok(self.items.borrow().clone())
    }

    fn try_update<F, R, E>(&self, transform: F) -> Result<R, E>
    where
        F: FnOnce(Vec<T>) -> Result<(Vec<T>, R), E>,
        E: From<StoreError>,
    {
        let current = self.items.borrow().clone();
        let (next, output) = transform(current)?;
        *self.items.borrow_mut() = next;

        let snapshot = self.items.borrow().clone();
        self.listeners.notify(&snapshot);
        Ok(output)
    }

    fn subscribe(&self, listener: Listener<T>) -> Subscription {
        self.listeners.add(listener)
    }

    fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.listeners.remove(subscription)
    }

    fn find<P>(&self, predicate: P) -> StoreResult<Option<T>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self.items.borrow().iter().find(|item| predicate(*item)).cloned())
    }

    fn some<P>(&self, predicate: P) -> StoreResult<bool>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self.items.borrow().iter().any(predicate))
    }
}
