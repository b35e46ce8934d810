//! Monetary totals from entries and project rates.
//!
//! # Invariants
//! - Only finished entries bill; an open entry contributes zero.
//! - Billed time is rounded to the nearest whole minute before pricing.
//! - Entries without a project, or whose project has no rate, bill zero.

use crate::model::project::{Project, RateType};
use crate::model::record::RecordId;
use crate::model::time_entry::TimeEntry;
use crate::summary::duration::elapsed_seconds;
use std::collections::HashMap;

/// Hourly rate per project id, for projects that define one.
pub fn rate_table(projects: &[Project]) -> HashMap<&RecordId, f64> {
    projects
        .iter()
        .filter_map(|project| match project.rate_type {
            None | Some(RateType::Hourly) => project.rate.map(|rate| (&project.id, rate)),
        })
        .collect()
}

/// Whole minutes billed for one entry, rounded half up.
pub fn billable_minutes(entry: &TimeEntry) -> i64 {
    match entry.end_time {
        Some(end) => (elapsed_seconds(entry.start_time, end) + 30) / 60,
        None => 0,
    }
}

/// Unformatted sum of entry values.
pub fn entries_total_amount(projects: &[Project], entries: &[TimeEntry]) -> f64 {
    let rates = rate_table(projects);
    entries
        .iter()
        .map(|entry| {
            let rate = entry
                .project_id
                .as_ref()
                .and_then(|project_id| rates.get(project_id))
                .copied()
                .unwrap_or(0.0);
            billable_minutes(entry) as f64 / 60.0 * rate
        })
        .fold(0.0, |total, value| total + value)
}

/// Total value of `entries` as a two-decimal currency string.
pub fn entries_total_value(projects: &[Project], entries: &[TimeEntry]) -> String {
    format!("{:.2}", entries_total_amount(projects, entries))
}

#[cfg(test)]
mod tests {
    use super::{billable_minutes, entries_total_value, rate_table};
    use crate::model::project::{Project, RateType};
    use crate::model::record::{RecordId, Timestamp};
    use crate::model::time_entry::TimeEntry;
    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
    }

    fn project(id: &str, rate: Option<f64>) -> Project {
        Project {
            id: RecordId::from(id),
            title: id.to_string(),
            rate,
            rate_type: None,
            created_at: t0(),
            updated_at: None,
        }
    }

    fn entry(project_id: Option<&str>, length_secs: Option<i64>) -> TimeEntry {
        TimeEntry {
            id: RecordId::from("e-0-0-0-0"),
            created_at: t0(),
            updated_at: None,
            title: String::new(),
            start_time: t0(),
            end_time: length_secs.map(|secs| t0() + Duration::seconds(secs)),
            project_id: project_id.map(RecordId::from),
        }
    }

    #[rstest]
    #[case::under_half_minute(29, 0)]
    #[case::half_minute(30, 1)]
    #[case::eighty_nine_seconds(89, 1)]
    #[case::ninety_seconds(90, 2)]
    #[case::thirty_minutes(1_800, 30)]
    fn billable_minutes_round_to_nearest(#[case] seconds: i64, #[case] minutes: i64) {
        assert_eq!(billable_minutes(&entry(None, Some(seconds))), minutes);
    }

    #[rstest]
    #[case::thirty_minutes_at_sixty(Some(1_800), "30.00")]
    #[case::eighty_nine_seconds_at_sixty(Some(89), "1.00")]
    #[case::open_entry(None, "0.00")]
    fn single_entry_value(#[case] length_secs: Option<i64>, #[case] expected: &str) {
        let projects = vec![project("p", Some(60.0))];
        let entries = vec![entry(Some("p"), length_secs)];
        assert_eq!(entries_total_value(&projects, &entries), expected);
    }

    #[test]
    fn unrated_and_unassigned_entries_bill_zero() {
        let projects = vec![project("rated", Some(90.0)), project("free", None)];
        let entries = vec![
            entry(Some("rated"), Some(3_600)),
            entry(Some("free"), Some(3_600)),
            entry(None, Some(3_600)),
            entry(Some("deleted"), Some(3_600)),
        ];
        assert_eq!(entries_total_value(&projects, &entries), "90.00");
        assert_eq!(entries_total_value(&[], &[]), "0.00");
    }

    #[test]
    fn empty_entries_total_zero() {
        assert_eq!(entries_total_value(&[], &[]), "0.00");
        assert_eq!(entries_total_value(&[project("p", Some(60.0))], &[]), "0.00");
    }

    #[test]
    fn rate_table_skips_projects_without_rate() {
        let mut hourly = project("c", Some(25.0));
        hourly.rate_type = Some(RateType::Hourly);
        let projects = vec![project("a", Some(10.0)), project("b", None), hourly];
        let rates = rate_table(&projects);
        assert_eq!(rates.len(), 2);
        assert_eq!(rates.get(&RecordId::from("a")), Some(&10.0));
        assert_eq!(rates.get(&RecordId::from("c")), Some(&25.0));
    }
}
