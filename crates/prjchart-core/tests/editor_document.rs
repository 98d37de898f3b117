//! Normalizing project documents as the schedule editor stores them

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use prjchart_core::{normalize_tasks, parse_project, ChartError, Timezone};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Exported from the editor, including fields the chart never reads
const WEBSITE: &str = r#"{
    "name": "Website relaunch",
    "selectedRow": 2,
    "canWrite": true,
    "tasks": [
        {"id": -1, "name": "Website relaunch", "code": "WEB", "level": 0, "status": "STATUS_ACTIVE",
         "start": 1704067200000, "end": 1705276800000, "duration": 15,
         "progress": 35, "workload": 120, "assigs": [], "hasChild": true, "collapsed": false},
        {"id": -2, "name": "Design", "code": "WEB.1", "level": 1, "status": "STATUS_DONE",
         "start": 1704067200000, "end": 1704412800000, "progress": "40", "workload": "40",
         "assigs": [{"resourceId": "alice", "roleId": "designer", "effort": 0}]},
        {"id": -3, "name": "Build", "code": "WEB.2", "level": 1, "status": "STATUS_ACTIVE",
         "start": 1704240000000, "end": 1704844800000, "progress": 10.5,
         "assigs": [{"resourceId": "bob"}, {"id": "carol"}], "depends": "2"},
        {"id": -4, "name": "Launch", "code": "WEB.3", "level": 1, "status": "STATUS_SUSPENDED",
         "start": 1705276800000, "end": 1705276800000, "startIsMilestone": true,
         "assigs": [], "depends": "2, 3"}
    ]
}"#;

#[test]
fn editor_export_normalizes() {
    let project = parse_project(WEBSITE).unwrap();
    assert_eq!(project.name.as_deref(), Some("Website relaunch"));

    let tasks = normalize_tasks(&project.tasks, Timezone::Utc).unwrap();
    assert_eq!(tasks.len(), 4);
    assert_eq!(
        tasks.iter().map(|t| t.task_index()).collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );

    let summary = &tasks[0];
    assert_eq!(summary.code_str(), Some("WEB"));
    assert_eq!(summary.level(), Some(0));
    assert_eq!(summary.duration(), 15);
    assert_eq!(summary.progress_text(), "35/120");
    assert_eq!(summary.assignees_text(), "");

    let design = &tasks[1];
    assert_eq!(design.status(), Some("STATUS_DONE"));
    assert_eq!(design.start(), date(2024, 1, 1));
    assert_eq!(design.end(), date(2024, 1, 5));
    assert_eq!(design.progress_fraction(), 1.0);
    assert_eq!(design.assignees_text(), "alice");

    let build = &tasks[2];
    assert_eq!(build.assignees(), ["bob", "carol"]);
    assert_eq!(build.depends(), ["2"]);
    assert_eq!(build.progress_text(), "10.5/100.0");
    assert_eq!(build.start_date(), "2024-01-03");
    assert_eq!(build.end_date(), "2024-01-10");

    let launch = &tasks[3];
    assert_eq!(launch.duration(), 1);
    assert_eq!(launch.depends(), ["2", "3"]);
    assert_eq!(launch.progress_text(), "0/100.0");
    assert_eq!(launch.progress_fraction(), 0.0);
}

#[test]
fn day_boundaries_follow_the_timezone() {
    // 2024-01-01T23:30:00Z
    let json = r#"{"tasks": [{"name": "Late", "start": 1704151800000, "end": 1704151800000}]}"#;
    let project = parse_project(json).unwrap();

    let utc = normalize_tasks(&project.tasks, Timezone::Utc).unwrap();
    assert_eq!(utc[0].start(), date(2024, 1, 1));

    let east: Timezone = "+02:00".parse().unwrap();
    let shifted = normalize_tasks(&project.tasks, east).unwrap();
    assert_eq!(shifted[0].start(), date(2024, 1, 2));

    let west: Timezone = "-05:00".parse().unwrap();
    let shifted = normalize_tasks(&project.tasks, west).unwrap();
    assert_eq!(shifted[0].start(), date(2024, 1, 1));
}

#[test]
fn pre_epoch_timestamps_floor_to_the_previous_day() {
    let json = r#"{"tasks": [{"name": "Old", "start": -1, "end": 0}]}"#;
    let project = parse_project(json).unwrap();
    let tasks = normalize_tasks(&project.tasks, Timezone::Utc).unwrap();
    assert_eq!(tasks[0].start(), date(1969, 12, 31));
    assert_eq!(tasks[0].end(), date(1970, 1, 1));
    assert_eq!(tasks[0].duration(), 2);
}

#[test]
fn first_bad_task_stops_normalization() {
    let json = r#"{"tasks": [
        {"name": "fine", "start": 1704067200000, "end": 1704067200000},
        {"name": "reversed", "start": 1704412800000, "end": 1704067200000},
        {"start": "yesterday", "end": 1704067200000}
    ]}"#;
    let project = parse_project(json).unwrap();
    let err = normalize_tasks(&project.tasks, Timezone::Utc).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Malformed task #1 (reversed): end 2024-01-01 is before start 2024-01-05"
    );
}

#[test]
fn unnamed_task_is_reported_by_position() {
    let json = r#"{"tasks": [{"start": "yesterday", "end": 1704067200000}]}"#;
    let project = parse_project(json).unwrap();
    match normalize_tasks(&project.tasks, Timezone::Utc) {
        Err(ChartError::MalformedTask { index, name, reason }) => {
            assert_eq!(index, 0);
            assert_eq!(name, "<unnamed>");
            assert!(reason.starts_with("start is not a millisecond timestamp"));
        }
        other => panic!("expected malformed task, got {:?}", other),
    }
}

#[test]
fn document_without_tasks_array_is_invalid() {
    assert!(matches!(
        parse_project(r#"{"name": "x"}"#),
        Err(ChartError::InvalidProject(_))
    ));
    assert!(matches!(parse_project("not json"), Err(ChartError::InvalidProject(_))));
}
