#![forbid(unsafe_code)]
use effectifs::{
    io, CoverageGap, ScheduleResult, StaffId, Summary, SummaryRenderer, TextSummary,
};
use std::collections::BTreeMap;
use tempfile::tempdir;

fn sample_result() -> ScheduleResult {
    let mut assignments = BTreeMap::new();
    assignments.insert(
        StaffId::new("a"),
        BTreeMap::from([(0u8, vec![9u8]), (1, vec![])]),
    );
    assignments.insert(
        StaffId::new("b"),
        BTreeMap::from([(0u8, vec![]), (1, vec![])]),
    );
    ScheduleResult {
        assignments,
        coverage_gaps: vec![CoverageGap {
            day: 0,
            hour: 10,
            covered: 0,
        }],
        hours_by_staff: BTreeMap::from([(StaffId::new("a"), 1), (StaffId::new("b"), 0)]),
        objective: 1.01,
    }
}

#[test]
fn schedule_json_uses_canonical_layout() {
    let value = serde_json::to_value(sample_result()).unwrap();
    assert_eq!(value["assignments"]["a"]["0"], serde_json::json!([9]));
    assert_eq!(
        value["coverage_gaps"][0],
        serde_json::json!({"day": 0, "hour": 10, "covered": 0})
    );
    assert_eq!(value["hours_by_staff"]["a"], 1);
    assert_eq!(value["objective"], 1.01);
}

#[test]
fn export_then_load_schedule() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/out/schedule.json");
    let result = sample_result();

    io::export_schedule_json(&path, &result).unwrap();
    let loaded = io::load_schedule_json(&path).unwrap();
    assert_eq!(loaded, result);
}

#[test]
fn assignments_csv_lists_one_row_per_hour() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("assignments.csv");
    io::export_assignments_csv(&path, &sample_result()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "staff_id,day,hour\na,0,9\n");
}

#[test]
fn input_file_becomes_request() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("input.json");
    std::fs::write(
        &path,
        r#"{
            "hours": {"start": 9, "end": 12},
            "days": [0, 2],
            "staff": [
                {"id": "s1", "name": "Sam", "availability": {"0": [9, 10], "2": [11]}},
                {"id": "s2"}
            ]
        }"#,
    )
    .unwrap();

    let req = io::load_input_json(&path).unwrap().into_request(2);
    assert_eq!(req.hours, vec![9, 10, 11]);
    assert_eq!(req.days, vec![0, 2]);
    assert_eq!(req.required_per_slot, 2);
    assert_eq!(req.staff[0].name, "Sam");
    assert!(req.staff[0].is_available(2, 11));
    assert_eq!(req.staff[1].name, "s2");
    assert!(req.staff[1].availability.is_empty());
}

#[test]
fn unreadable_input_is_an_error() {
    let dir = tempdir().unwrap();
    let err = io::load_input_json(dir.path().join("missing.json")).unwrap_err();
    assert!(err.to_string().starts_with("reading "));
}

#[test]
fn text_summary_lists_gaps_and_hours() {
    let result = sample_result();
    let summary = Summary {
        output: "out/schedule.json",
        result: &result,
        relaxed: false,
    };
    insta::assert_snapshot!(TextSummary.render(&summary), @r"
    Wrote schedule to out/schedule.json
    Objective: 1.01
    Coverage gaps: 1
      day 0 10:00 covered by 0
    Staff a: 1h
    Staff b: 0h
    Spread: 1h
    ");
}
