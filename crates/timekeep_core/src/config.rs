//! Core runtime configuration.
//!
//! # Responsibility
//! - Describe how the host wants the core wired: logging, storage location,
//!   and the open-entry enforcement policy.
//! - Open the configured storage connection.
//! - Build services that honor the configured policies.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - Unknown keys are rejected so typos surface instead of being ignored.

use crate::clock::Clock;
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::ids::IdGenerator;
use crate::logging::{init_logging, LogLevel, LoggingError};
use crate::model::time_entry::TimeEntry;
use crate::service::entry_service::{EntryService, OpenEntryPolicy};
use crate::store::ListStore;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub log_level: LogLevel,
    /// Absolute directory for rolling log files. No file logging when unset.
    pub log_dir: Option<PathBuf>,
    /// SQLite database file. Storage is in-memory when unset.
    pub database_path: Option<PathBuf>,
    pub open_entry_policy: OpenEntryPolicy,
}

impl CoreConfig {
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Starts file logging when `log_dir` is set; otherwise does nothing.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        match &self.log_dir {
            Some(dir) => init_logging(self.log_level, dir),
            None => Ok(()),
        }
    }

    /// Opens the configured database, applying migrations.
    pub fn open_database(&self) -> DbResult<Connection> {
        match &self.database_path {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }

    /// Entry service over `store` using `open_entry_policy`.
    pub fn entry_service<S, G, C>(&self, store: S, ids: G, clock: C) -> EntryService<S, G, C>
    where
        S: ListStore<TimeEntry>,
        G: IdGenerator,
        C: Clock,
    {
        EntryService::new(store, ids, clock).with_policy(self.open_entry_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::CoreConfig;
    use crate::clock::SystemClock;
    use crate::db::migrations::latest_version;
    use crate::ids::UuidV4Generator;
    use crate::logging::LogLevel;
    use crate::model::time_entry::TimeEntry;
    use crate::service::entry_service::OpenEntryPolicy;
    use crate::store::MemoryListStore;
    use std::path::PathBuf;

    #[test]
    fn empty_object_yields_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.open_entry_policy, OpenEntryPolicy::EnforceOnAdd);
    }

    #[test]
    fn parses_every_field() {
        let config = CoreConfig::from_json_str(
            r#"{
                "log_level": "warning",
                "log_dir": "/var/log/timekeep",
                "database_path": "/tmp/timekeep.db",
                "open_entry_policy": "enforce_on_every_mutation"
            }"#,
        )
        .unwrap();

        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/timekeep")));
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/timekeep.db")));
        assert_eq!(
            config.open_entry_policy,
            OpenEntryPolicy::EnforceOnEveryMutation
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CoreConfig::from_json_str(r#"{ "log_levle": "info" }"#).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn open_database_without_path_is_in_memory() {
        let conn = CoreConfig::default().open_database().unwrap();
        let version: u32 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, latest_version());
    }

    #[test]
    fn entry_service_uses_configured_policy() {
        let strict = CoreConfig {
            open_entry_policy: OpenEntryPolicy::EnforceOnEveryMutation,
            ..CoreConfig::default()
        };
        let service = strict.entry_service(
            MemoryListStore::<TimeEntry>::new(),
            UuidV4Generator,
            SystemClock,
        );
        assert_eq!(service.policy(), OpenEntryPolicy::EnforceOnEveryMutation);

        let default = CoreConfig::default().entry_service(
            MemoryListStore::<TimeEntry>::new(),
            UuidV4Generator,
            SystemClock,
        );
        assert_eq!(default.policy(), OpenEntryPolicy::EnforceOnAdd);
    }
}
