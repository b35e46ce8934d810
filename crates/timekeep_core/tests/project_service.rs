mod common;

use chrono::Duration;
use common::{t0, ManualClock, SequentialIds};
use timekeep_core::summary::entries_total_value;
use timekeep_core::{
    EntryService, MemoryListStore, NewProject, NewTimeEntry, Project, ProjectService,
    ProjectServiceError, ProjectUpdate, RateType, RecordId, TimeEntry,
};

fn projects<'a>(
    ids: &'a SequentialIds,
    clock: &'a ManualClock,
) -> ProjectService<MemoryListStore<Project>, &'a SequentialIds, &'a ManualClock> {
    ProjectService::new(MemoryListStore::new(), ids, clock)
}

#[test]
fn add_without_draft_creates_untitled_unrated_project() {
    let ids = SequentialIds::default();
    let clock = ManualClock::default();
    let service = projects(&ids, &clock);

    let project = service.add_project(None).unwrap();

    assert_eq!(project.title, "");
    assert_eq!(project.rate, None);
    assert_eq!(project.created_at, t0());
    assert!(service.has_project(&project.id).unwrap());
    assert_eq!(service.get_project(&project.id).unwrap(), Some(project));
}

#[test]
fn update_can_clear_rate() {
    let ids = SequentialIds::default();
    let clock = ManualClock::default();
    let service = projects(&ids, &clock);
    let project = service
        .add_project(Some(NewProject {
            title: Some("client".to_string()),
            rate: Some(120.0),
            rate_type: Some(RateType::Hourly),
        }))
        .unwrap();

    clock.advance(Duration::days(1));
    let updated = service
        .update_project(ProjectUpdate {
            rate: Some(None),
            ..ProjectUpdate::for_id(project.id.clone())
        })
        .unwrap();

    assert_eq!(updated.title, "client");
    assert_eq!(updated.rate, None);
    assert_eq!(updated.rate_type, Some(RateType::Hourly));
    assert_eq!(updated.updated_at, Some(t0() + Duration::days(1)));
}

#[test]
fn update_unknown_project_is_not_found() {
    let ids = SequentialIds::default();
    let clock = ManualClock::default();
    let service = projects(&ids, &clock);

    let err = service
        .update_project(ProjectUpdate::for_id(RecordId::from("nope")))
        .unwrap_err();

    assert!(matches!(err, ProjectServiceError::NotFound(id) if id.as_str() == "nope"));
    assert!(service.projects().unwrap().is_empty());
}

#[test]
fn deleting_project_leaves_entries_billing_zero() {
    let ids = SequentialIds::default();
    let clock = ManualClock::default();
    let project_service = projects(&ids, &clock);
    let entry_service = EntryService::new(MemoryListStore::<TimeEntry>::new(), &ids, &clock);

    let project = project_service
        .add_project(Some(NewProject {
            rate: Some(60.0),
            ..NewProject::default()
        }))
        .unwrap();
    entry_service
        .add_entry(Some(NewTimeEntry {
            start_time: Some(t0()),
            end_time: Some(t0() + Duration::minutes(30)),
            project_id: Some(project.id.clone()),
            ..NewTimeEntry::default()
        }))
        .unwrap();

    let entries = entry_service.entries().unwrap();
    assert_eq!(
        entries_total_value(&project_service.projects().unwrap(), &entries),
        "30.00"
    );

    let remaining = project_service.delete_project(&project.id).unwrap();
    assert!(remaining.is_empty());
    let entries = entry_service.entries().unwrap();
    assert_eq!(entries[0].project_id, Some(project.id));
    assert_eq!(entries_total_value(&remaining, &entries), "0.00");
}
