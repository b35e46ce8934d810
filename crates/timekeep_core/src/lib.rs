//! Core domain logic for timekeep.
//!
//! Time entries, the projects they bill against, the generic record
//! repository both go through, and the pure duration/value computations that
//! feed the display. Storage is reached only through the `ListStore`
//! capability.

pub mod clock;
pub mod config;
pub mod db;
pub mod ids;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod summary;

pub use clock::{Clock, SystemClock};
pub use config::CoreConfig;
pub use ids::{IdGenerator, UuidV4Generator};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::project::{NewProject, Project, ProjectUpdate, RateType};
pub use model::record::{Record, RecordId, RecordUpdate, Timestamp, Upsert};
pub use model::time_entry::{
    NewTimeEntry, OpenTimeEntry, TimeEntry, TimeEntryPayload, TimeEntryUpdate,
};
pub use repo::record_repo::{
    RecordRepository, RepoError, RepoResult, UpdateManyOutput, WriteOutput,
};
pub use service::entry_service::{
    EntryResult, EntryService, EntryServiceError, OpenEntryPolicy,
};
pub use service::project_service::{ProjectResult, ProjectService, ProjectServiceError};
pub use store::{
    ListStore, Listener, MemoryListStore, SqliteListStore, StoreError, StoreResult,
    Subscription, ENTRY_COLLECTION, PROJECT_COLLECTION,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
