mod common;

use chrono::Duration;
use common::{t0, ManualClock, SequentialIds};
use std::cell::RefCell;
use std::rc::Rc;
use timekeep_core::db::{open_db, open_db_in_memory};
use timekeep_core::{
    Clock, EntryService, EntryServiceError, ListStore, NewProject, Project, ProjectService,
    SqliteListStore, TimeEntry, TimeEntryUpdate, ENTRY_COLLECTION,
    PROJECT_COLLECTION,
};

#[test]
fn missing_collection_reads_as_empty() {
    let conn = open_db_in_memory().unwrap();
    let store: SqliteListStore<'_, TimeEntry> = SqliteListStore::new(&conn, ENTRY_COLLECTION);

    assert!(store.all().unwrap().is_empty());
    assert!(store.find(TimeEntry::is_open).unwrap().is_none());
}

#[test]
fn entries_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timekeep.db");
    let ids = SequentialIds::default();
    let clock = ManualClock::default();

    let stopped = {
        let conn = open_db(&path).unwrap();
        let service = EntryService::new(
            SqliteListStore::new(&conn, ENTRY_COLLECTION),
            &ids,
            &clock,
        );
        let entry = service.add_entry(None).unwrap();
        clock.advance(Duration::minutes(45));
        service
            .update_entry(TimeEntryUpdate {
                end_time: Some(Some(clock.now())),
                ..TimeEntryUpdate::for_id(entry.id)
            })
            .unwrap()
    };

    let conn = open_db(&path).unwrap();
    let store: SqliteListStore<'_, TimeEntry> = SqliteListStore::new(&conn, ENTRY_COLLECTION);
    let entries = store.all().unwrap();

    assert_eq!(entries, vec![stopped]);
    assert_eq!(entries[0].start_time, t0());
    assert_eq!(entries[0].end_time, Some(t0() + Duration::minutes(45)));
}

#[test]
fn collections_are_stored_independently() {
    let conn = open_db_in_memory().unwrap();
    let ids = SequentialIds::default();
    let clock = ManualClock::default();
    let entries = EntryService::new(SqliteListStore::new(&conn, ENTRY_COLLECTION), &ids, &clock);
    let projects =
        ProjectService::new(SqliteListStore::new(&conn, PROJECT_COLLECTION), &ids, &clock);

    projects
        .add_project(Some(NewProject {
            title: Some("client".to_string()),
            rate: Some(80.0),
            ..NewProject::default()
        }))
        .unwrap();
    entries.add_entry(None).unwrap();

    assert_eq!(projects.projects().unwrap().len(), 1);
    assert_eq!(entries.entries().unwrap().len(), 1);
    entries.store().clear().unwrap();
    assert!(entries.entries().unwrap().is_empty());
    assert_eq!(projects.projects().unwrap().len(), 1);
}

#[test]
fn undecodable_payload_reads_as_empty() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO collections (name, payload) VALUES (?1, ?2);",
        [PROJECT_COLLECTION, "{not json"],
    )
    .unwrap();
    let store: SqliteListStore<'_, Project> = SqliteListStore::new(&conn, PROJECT_COLLECTION);

    assert!(store.all().unwrap().is_empty());
}

#[test]
fn entry_service_recovers_from_undecodable_payload() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO collections (name, payload) VALUES (?1, ?2);",
        [ENTRY_COLLECTION, "garbage"],
    )
    .unwrap();
    let ids = SequentialIds::default();
    let clock = ManualClock::default();
    let service = EntryService::new(SqliteListStore::new(&conn, ENTRY_COLLECTION), &ids, &clock);

    assert!(!service.has_open_entry().unwrap());
    let entry = service.add_entry(None).unwrap();

    assert_eq!(service.entries().unwrap(), vec![entry]);
    let payload: String = conn
        .query_row(
            "SELECT payload FROM collections WHERE name = ?1;",
            [ENTRY_COLLECTION],
            |row| row.get(0),
        )
        .unwrap();
    assert!(payload.starts_with('['));
}

#[test]
fn rejected_add_leaves_row_and_listeners_untouched() {
    let conn = open_db_in_memory().unwrap();
    let ids = SequentialIds::default();
    let clock = ManualClock::default();
    let service = EntryService::new(SqliteListStore::new(&conn, ENTRY_COLLECTION), &ids, &clock);
    let running = service.add_entry(None).unwrap();

    let snapshots: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&snapshots);
    let subscription = service
        .store()
        .subscribe(Rc::new(move |items: &[TimeEntry]| seen.borrow_mut().push(items.len())));

    let err = service.add_entry(None).unwrap_err();
    assert!(matches!(err, EntryServiceError::AlreadyRunning));
    assert_eq!(service.entries().unwrap(), vec![running.clone()]);
    assert!(snapshots.borrow().is_empty());

    service
        .update_entry(TimeEntryUpdate {
            title: Some("named".to_string()),
            ..TimeEntryUpdate::for_id(running.id)
        })
        .unwrap();
    assert_eq!(*snapshots.borrow(), vec![1]);

    assert!(service.store().unsubscribe(subscription));
    assert!(!service.store().unsubscribe(subscription));
}
