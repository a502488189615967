#![forbid(unsafe_code)]
use effectifs::{
    ConfigError, GoodLpSolver, SchedError, ScheduleRequest, ScheduleResult, Scheduler,
    SolutionStatus, SolveOptions, SolveOutcome, StaffAvailability, StaffId,
};
use std::time::{Duration, Instant};

fn every_day(id: &str, hours: &[u8]) -> StaffAvailability {
    (0..7).fold(StaffAvailability::new(id, id.to_uppercase()), |s, d| {
        s.with_hours(d, hours.iter().copied())
    })
}

fn scheduled(out: SolveOutcome) -> ScheduleResult {
    match out {
        SolveOutcome::Scheduled { status, result } => {
            assert_eq!(status, SolutionStatus::Optimal);
            result
        }
        other => panic!("expected a schedule, got {other:?}"),
    }
}

/// Vérifications indépendantes du solveur sur un résultat extrait.
fn check_invariants(req: &ScheduleRequest, result: &ScheduleResult) {
    for s in &req.staff {
        let mut total = 0;
        for d in &req.days {
            for h in result.hours_for(&s.id, *d) {
                assert!(s.is_available(*d, *h), "{} assigned outside availability", s.id);
            }
            total += result.hours_for(&s.id, *d).len() as u32;
        }
        assert_eq!(result.hours_by_staff[&s.id], total);
    }
    let required = req.required_per_slot as u32;
    for d in &req.days {
        for h in &req.hours {
            let covered = req
                .staff
                .iter()
                .filter(|s| result.hours_for(&s.id, *d).contains(h))
                .count() as u32;
            let gap = result.coverage_gaps.iter().find(|g| g.day == *d && g.hour == *h);
            if covered < required {
                assert_eq!(gap.map(|g| g.covered), Some(covered));
            } else {
                assert!(gap.is_none());
            }
        }
    }
}

#[test]
fn full_team_needed_everywhere() {
    let staff = vec![
        every_day("a", &[9, 10]),
        every_day("b", &[9, 10]),
        every_day("c", &[9, 10]),
    ];
    let req = ScheduleRequest::new(staff, (0..7).collect(), vec![9, 10], 3);

    let result = scheduled(Scheduler::default().solve(&req).unwrap());
    check_invariants(&req, &result);

    assert!(result.coverage_gaps.is_empty());
    for id in ["a", "b", "c"] {
        let id = StaffId::new(id);
        for d in 0..7 {
            assert_eq!(result.hours_for(&id, d), &[9, 10]);
        }
        assert_eq!(result.hours_by_staff[&id], 14);
    }
    assert_eq!(result.fairness_spread(), 0);
    assert!((result.objective - 0.42).abs() < 1e-6);
}

#[test]
fn full_week_with_five_staff_is_solved_quickly() {
    let hours: Vec<u8> = (9..18).collect();
    let staff = (1..=5).map(|i| every_day(&format!("s{i}"), &hours)).collect();
    let req = ScheduleRequest::new(staff, (0..7).collect(), hours.clone(), 3);

    let started = Instant::now();
    let result = scheduled(Scheduler::default().solve(&req).unwrap());
    assert!(started.elapsed() < Duration::from_secs(60), "took {:?}", started.elapsed());
    check_invariants(&req, &result);

    // 7 * 9 * 3 = 189 heures : 37 ou 38 par personne
    assert!(result.coverage_gaps.is_empty());
    assert_eq!(result.total_hours(), 189);
    assert!(result.fairness_spread() <= 1);
    assert!((result.objective - 2.89).abs() < 1e-4);
}

#[test]
fn understaffed_team_still_returns_a_result() {
    let staff = vec![every_day("a", &[9, 10, 11]), every_day("b", &[9, 10, 11])];
    let req = ScheduleRequest::new(staff, vec![0], vec![9, 10, 11], 3);

    let out = Scheduler::default().solve(&req).unwrap();
    assert!(out.is_infeasible());
    let result = out.into_result().expect("relaxed schedule");
    check_invariants(&req, &result);

    assert_eq!(result.coverage_gaps.len(), 3);
    assert!(result.coverage_gaps.iter().all(|g| g.covered <= 2));
}

#[test]
fn infeasibility_is_typed_when_relaxation_is_disabled() {
    let staff = vec![every_day("a", &[9]), every_day("b", &[9])];
    let req = ScheduleRequest::new(staff, vec![0], vec![9], 3);
    let sched = Scheduler::new(GoodLpSolver).with_options(SolveOptions {
        relax_on_infeasible: false,
        ..SolveOptions::default()
    });

    assert_eq!(
        sched.solve(&req).unwrap(),
        SolveOutcome::Infeasible { relaxed: None }
    );
}

#[test]
fn empty_staff_is_a_configuration_error() {
    let req = ScheduleRequest::new(Vec::new(), (0..7).collect(), (9..18).collect(), 3);
    let err = Scheduler::default().solve(&req).unwrap_err();
    assert!(matches!(err, SchedError::Config(ConfigError::EmptyStaff)));
}

#[test]
fn hours_are_balanced_across_staff() {
    // b n'est disponible que le lundi : il doit prendre les deux heures du lundi.
    let staff = vec![
        every_day("a", &[9, 10]),
        StaffAvailability::new("b", "B").with_hours(0, [9, 10]),
    ];
    let req = ScheduleRequest::new(staff, vec![0, 1], vec![9, 10], 1);

    let result = scheduled(Scheduler::default().solve(&req).unwrap());
    check_invariants(&req, &result);

    let a = StaffId::new("a");
    let b = StaffId::new("b");
    assert!(result.hours_for(&a, 0).is_empty());
    assert_eq!(result.hours_for(&a, 1), &[9, 10]);
    assert_eq!(result.hours_for(&b, 0), &[9, 10]);
    assert_eq!(result.fairness_spread(), 0);
    assert!((result.objective - 0.04).abs() < 1e-6);
}

#[test]
fn zero_requirement_schedules_nobody() {
    let staff = vec![every_day("a", &[9, 10]), every_day("b", &[9])];
    let req = ScheduleRequest::new(staff, vec![0, 3], vec![9, 10], 0);

    let result = scheduled(Scheduler::default().solve(&req).unwrap());
    check_invariants(&req, &result);
    assert!(result.coverage_gaps.is_empty());
    assert_eq!(result.total_hours(), 0);
}

#[test]
fn repeated_solves_are_identical() {
    let staff = vec![
        every_day("a", &[9, 10, 11]),
        every_day("b", &[10, 11]),
        every_day("c", &[9, 11]),
    ];
    let req = ScheduleRequest::new(staff, vec![0, 1, 2], vec![9, 10, 11], 1);
    let sched = Scheduler::default();

    let first = scheduled(sched.solve(&req).unwrap());
    let second = scheduled(sched.solve(&req).unwrap());
    check_invariants(&req, &first);
    assert_eq!(first.assignments, second.assignments);
    assert!(first.coverage_gaps.is_empty());
    assert!((first.objective - second.objective).abs() < 1e-9);
}

#[test]
fn concurrent_solves_do_not_interfere() {
    let sched = Scheduler::default();
    let requests: Vec<ScheduleRequest> = (1..=4u8)
        .map(|n| {
            let staff = (0..n).map(|i| every_day(&format!("s{i}"), &[9, 10])).collect();
            ScheduleRequest::new(staff, vec![0, 1], vec![9, 10], i64::from(n))
        })
        .collect();

    let sched = &sched;
    let results: Vec<ScheduleResult> = std::thread::scope(|scope| {
        let handles: Vec<_> = requests
            .iter()
            .map(|req| scope.spawn(move || scheduled(sched.solve(req).unwrap())))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (req, result) in requests.iter().zip(&results) {
        check_invariants(req, result);
        assert!(result.coverage_gaps.is_empty());
        assert_eq!(result.hours_by_staff.len(), req.staff.len());
        assert!(result.hours_by_staff.values().all(|h| *h == 4));
    }
}
