//! SQLite-backed list store.
//!
//! # Responsibility
//! - Persist one named collection as a JSON array in the `collections` table.
//!
//! # Invariants
//! - A missing row reads as an empty collection.
//! - A row whose payload does not decode reads as empty and logs an error
//!   event; the next write replaces it.
//! - Read-modify-write runs inside a single transaction.

use crate::model::record::Record;
use crate::store::{ListStore, Listener, Listeners, StoreError, StoreResult, Subscription};
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// One named collection stored in SQLite.
///
/// The connection must have been opened through [`crate::db::open_db`] or
/// [`crate::db::open_db_in_memory`] so the schema exists.
pub struct SqliteListStore<'conn, T> {
    conn: &'conn Connection,
    name: String,
    listeners: Listeners<T>,
}

impl<'conn, T> SqliteListStore<'conn, T>
where
    T: Record + Serialize + DeserializeOwned,
{
    pub fn new(conn: &'conn Connection, name: impl Into<String>) -> Self {
        Self {
            conn,
            name: name.into(),
            listeners: Listeners::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drops the stored row for this collection.
    pub fn clear(&self) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM collections WHERE name = ?1;", [&self.name])?;
        self.listeners.notify(&[]);
        Ok(())
    }

    fn read(&self, conn: &Connection) -> StoreResult<Vec<T>> {
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM collections WHERE name = ?1;",
                [&self.name],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(payload) => match serde_json::from_str(&payload) {
                Ok(items) => Ok(items),
                Err(err) => {
                    error!(
                        "event=collection_read module=store status=error collection={} error_code=invalid_payload error={err}",
                        self.name
                    );
                    Ok(Vec::new())
                }
            },
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, conn: &Connection, items: &[T]) -> StoreResult<()> {
        let payload = serde_json::to_string(items).map_err(StoreError::Serialization)?;
        conn.execute(
            "INSERT INTO collections (name, payload) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![self.name, payload],
        )?;
        debug!(
            "event=collection_write module=store status=ok collection={} items={}",
            self.name,
            items.len()
        );
        Ok(())
    }
}

impl<T> ListStore<T> for SqliteListStore<'_, T>
where
    T: Record + Serialize + DeserializeOwned,
{
    fn all(&self) -> StoreResult<Vec<T>> {
        self.read(self.conn)
    }

    fn try_update<F, R, E>(&self, transform: F) -> Result<R, E>
    where
        F: FnOnce(Vec<T>) -> Result<(Vec<T>, R), E>,
        E: From<StoreError>,
    {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|err| E::from(StoreError::from(err)))?;
        let current = self.read(&tx)?;
        let (next, output) = transform(current)?;
        self.write(&tx, &next)?;
        tx.commit().map_err(|err| E::from(StoreError::from(err)))?;

        self.listeners.notify(&next);
        Ok(output)
    }

    fn subscribe(&self, listener: Listener<T>) -> Subscription {
        self.listeners.add(listener)
    }

    fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.listeners.remove(subscription)
    }
}
